//! Chat platform seam and the notification shapes sent through it.

use crate::error::PlatformError;
use crate::types::{ConnectionState, DestinationId};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// A resolved, addressable notification target on the chat platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub id: DestinationId,
    /// Human-readable name, used in log lines only
    pub name: String,
}

/// Accent colours available for embeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    Default,
    DarkerGrey,
    Blue,
    Orange,
    Green,
    Red,
}

/// Rich card attached to a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub author: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub color: Color,
    pub timestamp: Option<DateTime<Local>>,
}

/// A rendered message ready to be sent to a destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Plain text body
    pub content: String,
    pub embed: Option<Embed>,
}

impl Notification {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            embed: None,
        }
    }

    pub fn embed(embed: Embed) -> Self {
        Self {
            content: String::new(),
            embed: Some(embed),
        }
    }
}

/// The chat platform session the dispatcher talks to.
#[async_trait]
pub trait ChatPlatform: Send + Sync + std::fmt::Debug {
    /// Looks up a destination by its configured id. `Ok(None)` means the id
    /// does not refer to a live destination.
    async fn resolve_destination(&self, id: DestinationId) -> Result<Option<Destination>, PlatformError>;

    async fn send(&self, destination: &Destination, notification: Notification) -> Result<(), PlatformError>;

    fn connection_state(&self) -> ConnectionState;
}
