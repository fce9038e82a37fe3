//! Notification rendering.
//!
//! Pure functions from bridge events to [`Notification`]s. Nothing here
//! touches the platform.

use crate::platform::{Color, Embed, Notification};
use crate::types::{ChatMessage, LogEvent, PlayerEvent};
use chrono::{DateTime, Local};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Accent colour for a chat channel tag. Unknown tags get [`Color::Default`].
pub fn chat_color(channel_type: &str) -> Color {
    match channel_type {
        "(Global)" => Color::DarkerGrey,
        "(Side)" => Color::Blue,
        "(Vehicle)" => Color::Orange,
        "(Group)" => Color::Green,
        _ => Color::Default,
    }
}

fn format_time(time: &DateTime<Local>) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Mirrors a log line as a code block.
pub fn render_log(event: &LogEvent) -> Notification {
    Notification::text(format!(
        "```[{}] || {} || {}```",
        format_time(&event.time),
        event.prefix,
        event.message
    ))
}

pub fn render_chat(message: &ChatMessage) -> Notification {
    Notification::embed(Embed {
        author: Some(format!("{} {}", message.channel_type, message.sender_name)),
        title: message.content.clone(),
        description: None,
        color: chat_color(&message.channel_type),
        timestamp: Some(message.time),
    })
}

pub fn render_player_connected(player: &PlayerEvent) -> Notification {
    Notification::embed(Embed {
        author: None,
        title: format!(":inbox_tray: {} has connected to the server!", player.name),
        description: Some(format!("{} | ID: {}", format_time(&player.time), player.game_id)),
        color: Color::Green,
        timestamp: None,
    })
}

pub fn render_player_disconnected(player: &PlayerEvent) -> Notification {
    Notification::embed(Embed {
        author: None,
        title: format!(":outbox_tray: {} has disconnected from the server!", player.name),
        description: Some(format!("{} | ID: {}", format_time(&player.time), player.game_id)),
        color: Color::Red,
        timestamp: None,
    })
}

/// Presents the reply of an executed command, titled with the command verb.
pub fn render_command_reply(command: &str, reply: &str) -> Notification {
    let verb = command.split(' ').next().unwrap_or_default();
    Notification::embed(Embed {
        author: None,
        title: verb.to_string(),
        description: Some(reply.to_string()),
        color: Color::Default,
        timestamp: None,
    })
}

pub fn render_command_failure(command: &str, reason: &str) -> Notification {
    Notification::embed(Embed {
        author: None,
        title: "Failed to execute command".to_string(),
        description: Some(format!("{command}\n{reason}")),
        color: Color::Red,
        timestamp: None,
    })
}
