//! Runtime configuration for the bridge core.
//!
//! The binary loads its TOML file and converts it into a [`BridgeConfig`];
//! the core never reads files itself.

use crate::correlator::DEFAULT_COMMAND_TIMEOUT;
use crate::types::{DestinationId, NotificationCategory};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::Level;

/// Default bound on a single platform lookup or send.
pub const DEFAULT_PLATFORM_TIMEOUT: Duration = Duration::from_secs(5);

/// Destination id configured for each notification category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventChannelSettings {
    pub system_log_channel_id: DestinationId,
    pub chat_messages_channel_id: DestinationId,
    pub player_joins_channel_id: DestinationId,
    pub player_disconnects_channel_id: DestinationId,
}

impl EventChannelSettings {
    pub fn destination_id(&self, category: NotificationCategory) -> DestinationId {
        match category {
            NotificationCategory::SystemLog => self.system_log_channel_id,
            NotificationCategory::Chat => self.chat_messages_channel_id,
            NotificationCategory::PlayerJoin => self.player_joins_channel_id,
            NotificationCategory::PlayerLeave => self.player_disconnects_channel_id,
        }
    }
}

/// Configuration structure for the bridge core.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub event_channels: EventChannelSettings,
    /// Reply deadline used when a caller does not pass its own
    pub command_timeout: Duration,
    /// Bound on destination resolution and on each send
    pub platform_timeout: Duration,
    /// Least severe level mirrored to the system-log destination
    pub mirror_level: Level,
    /// Capacity of the inbound transport channel
    pub inbound_capacity: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            event_channels: EventChannelSettings::default(),
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            platform_timeout: DEFAULT_PLATFORM_TIMEOUT,
            mirror_level: Level::INFO,
            inbound_capacity: 1024,
        }
    }
}
