//! # Core Type Definitions
//!
//! Shared value types passed between the transport, the classifier, the
//! correlator and the dispatcher.
//!
//! - [`ClassifiedEvent`] - typed view of one unsolicited console line
//! - [`LogEvent`] - one log line captured for mirroring
//! - [`NotificationCategory`] - the four notification streams
//! - [`ConnectionState`] - connection state reported by either collaborator

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier the transport assigns to a command when it is sent.
pub type CommandId = i32;

/// Opaque numeric identifier of a destination on the chat platform.
pub type DestinationId = u64;

/// Connection state of a collaborator session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Disconnecting,
}

impl ConnectionState {
    pub fn is_connected(self) -> bool {
        matches!(self, ConnectionState::Connected)
    }
}

/// Events pushed by the RCON transport onto the inbound channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// A console message, either a command reply or an unsolicited line
    Message { id: CommandId, text: String },
    Connected,
    Disconnected,
}

/// A player joining or leaving the game server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerEvent {
    /// Slot number the server gave the player (`#5` in the console line)
    pub game_id: u32,
    pub name: String,
    pub time: DateTime<Local>,
}

/// An in-game chat line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The channel tag exactly as it appeared, e.g. `(Global)`
    pub channel_type: String,
    pub sender_name: String,
    /// Everything after the first `:` verbatim, leading space included
    pub content: String,
    pub time: DateTime<Local>,
}

/// Typed view of a console line that was not a command reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassifiedEvent {
    PlayerConnected(PlayerEvent),
    PlayerDisconnected(PlayerEvent),
    ChatMessage(ChatMessage),
    Unknown { raw: String },
}

impl ClassifiedEvent {
    /// The notification stream this event belongs to, `None` for `Unknown`.
    pub fn category(&self) -> Option<NotificationCategory> {
        match self {
            ClassifiedEvent::PlayerConnected(_) => Some(NotificationCategory::PlayerJoin),
            ClassifiedEvent::PlayerDisconnected(_) => Some(NotificationCategory::PlayerLeave),
            ClassifiedEvent::ChatMessage(_) => Some(NotificationCategory::Chat),
            ClassifiedEvent::Unknown { .. } => None,
        }
    }
}

/// A log line produced by the logging facility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    /// Severity or source tag, e.g. `INFO` or `ERROR`
    pub prefix: String,
    pub message: String,
    pub time: DateTime<Local>,
}

impl LogEvent {
    pub fn new(prefix: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            message: message.into(),
            time: Local::now(),
        }
    }
}

/// Logical notification stream, each mapped to one configured destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationCategory {
    SystemLog,
    Chat,
    PlayerJoin,
    PlayerLeave,
}

impl fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NotificationCategory::SystemLog => "System log",
            NotificationCategory::Chat => "Chat message",
            NotificationCategory::PlayerJoin => "Player join",
            NotificationCategory::PlayerLeave => "Player disconnect",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_category() {
        let time = Local::now();
        let player = PlayerEvent {
            game_id: 2,
            name: "Ann".to_string(),
            time,
        };

        assert_eq!(
            ClassifiedEvent::PlayerConnected(player.clone()).category(),
            Some(NotificationCategory::PlayerJoin)
        );
        assert_eq!(
            ClassifiedEvent::PlayerDisconnected(player).category(),
            Some(NotificationCategory::PlayerLeave)
        );
        let chat = ChatMessage {
            channel_type: "(Side)".to_string(),
            sender_name: "Ann".to_string(),
            content: " hi".to_string(),
            time,
        };
        assert_eq!(ClassifiedEvent::ChatMessage(chat).category(), Some(NotificationCategory::Chat));
        assert_eq!(
            ClassifiedEvent::Unknown {
                raw: "noise".to_string()
            }
            .category(),
            None
        );
    }

    #[test]
    fn test_category_display_names() {
        assert_eq!(NotificationCategory::SystemLog.to_string(), "System log");
        assert_eq!(NotificationCategory::PlayerLeave.to_string(), "Player disconnect");
    }
}
