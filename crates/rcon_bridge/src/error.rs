//! Error types for the bridge.
//!
//! Each collaborator boundary gets its own enum so callers can tell a slow
//! game server apart from a misconfigured chat destination.

use crate::types::{CommandId, DestinationId, NotificationCategory};
use std::time::Duration;
use thiserror::Error;

/// Failures reported by the RCON transport collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The RCON session is not connected, nothing was sent
    #[error("RCON session is not connected")]
    NotConnected,
}

/// Failures surfaced to callers of `execute_command`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// No reply arrived before the deadline
    #[error("No reply received from the game server for '{command}' (packet = {id}) within {timeout:?}")]
    Timeout {
        command: String,
        id: CommandId,
        timeout: Duration,
    },
    /// The transport handed out an identifier that is still awaiting a reply
    #[error("Command identifier {0} is already awaiting a reply")]
    IdentifierInUse(CommandId),
    /// The command could not be sent at all
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Failures reported by the chat-platform collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// The destination handle no longer refers to a live destination
    #[error("Destination {0} is gone")]
    DestinationGone(DestinationId),
    #[error("Platform request failed: {0}")]
    Request(String),
}

/// Internal dispatcher failures. These never escape the dispatcher's public
/// entry points; they are logged and the notification is dropped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("{category} destination with ID {id} not found! Check the configured destination ids")]
    DestinationNotFound {
        category: NotificationCategory,
        id: DestinationId,
    },
    #[error("Sending to {category} destination timed out after {timeout:?}")]
    SendTimeout {
        category: NotificationCategory,
        timeout: Duration,
    },
    #[error("Sending to {category} destination failed: {source}")]
    Send {
        category: NotificationCategory,
        #[source]
        source: PlatformError,
    },
}
