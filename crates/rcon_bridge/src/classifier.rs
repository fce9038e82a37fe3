//! Console line classification.
//!
//! Turns one raw, unsolicited RCON console line into a [`ClassifiedEvent`].
//! Classification is total: anything that is not a player connect, player
//! disconnect or chat line becomes [`ClassifiedEvent::Unknown`].
//!
//! Recognised shapes, checked in this order:
//!
//! ```text
//! Player #5 Some Name disconnected
//! Player #5 Some Name (22.26.99.99:2304) connected
//! (Global) Some Name: message text
//! ```

use crate::types::{ChatMessage, ClassifiedEvent, PlayerEvent};
use chrono::{DateTime, Local};

const PLAYER_PREFIX: &str = "Player #";

/// Channel tags that open a chat line, in match order.
pub const CHAT_CHANNEL_TAGS: [&str; 5] = ["(Side)", "(Group)", "(Direct)", "(Vehicle)", "(Global)"];

/// Classifies a console line, stamping the event with the current local time.
pub fn classify(raw: &str) -> ClassifiedEvent {
    classify_at(raw, Local::now())
}

/// Classifies a console line using `time` as the event time.
///
/// Deterministic for a fixed `time`.
pub fn classify_at(raw: &str, time: DateTime<Local>) -> ClassifiedEvent {
    if let Some(game_id) = player_game_id(raw) {
        // "disconnected" also ends with "connected", so it must be tested first
        if raw.ends_with("disconnected") {
            return ClassifiedEvent::PlayerDisconnected(PlayerEvent {
                game_id,
                name: player_name(raw, 1),
                time,
            });
        }
        if raw.ends_with("connected") {
            // trailing "(ip:port) connected"
            return ClassifiedEvent::PlayerConnected(PlayerEvent {
                game_id,
                name: player_name(raw, 2),
                time,
            });
        }
    }

    if let Some(tag) = CHAT_CHANNEL_TAGS.iter().find(|tag| raw.starts_with(**tag)) {
        return ClassifiedEvent::ChatMessage(parse_chat(raw, tag, time));
    }

    ClassifiedEvent::Unknown {
        raw: raw.to_string(),
    }
}

/// Parses the contiguous digit run right after `Player #`.
///
/// Returns `None` when the line does not start with `Player #<digit>`.
fn player_game_id(raw: &str) -> Option<u32> {
    let rest = raw.strip_prefix(PLAYER_PREFIX)?;
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    rest[..digits].parse().ok()
}

/// Rebuilds a player name from single-space separated tokens, dropping
/// `Player`, `#<id>` and `trailing` tokens from the end.
fn player_name(raw: &str, trailing: usize) -> String {
    let tokens: Vec<&str> = raw.split(' ').collect();
    let end = tokens.len().saturating_sub(trailing);
    if end <= 2 {
        return String::new();
    }
    tokens[2..end].join(" ")
}

fn parse_chat(raw: &str, tag: &str, time: DateTime<Local>) -> ChatMessage {
    let (header, content) = raw.split_once(':').unwrap_or((raw, ""));
    let sender_name = header.split_once(' ').map(|(_, name)| name).unwrap_or("");

    ChatMessage {
        channel_type: tag.to_string(),
        sender_name: sender_name.to_string(),
        content: content.to_string(),
        time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(event: ClassifiedEvent) -> PlayerEvent {
        match event {
            ClassifiedEvent::PlayerConnected(p) | ClassifiedEvent::PlayerDisconnected(p) => p,
            other => panic!("expected a player event, got {:?}", other),
        }
    }

    #[test]
    fn test_message_kinds() {
        let cases = [
            ("Player #6 nadam (22.26.99.99:2304) connected", "connected"),
            ("Player #6 nadam (22.26.99.99:2304) disconnected", "disconnected"),
            ("(Global) Helle Duval: imagine cheating in arma tho [REDACTED] :)", "chat"),
            ("(Side) Altay: Welcome to the /server/ arma3!!!", "chat"),
            ("(Random) random message that makes no sense", "unknown"),
        ];

        for (raw, expected) in cases {
            let kind = match classify(raw) {
                ClassifiedEvent::PlayerConnected(_) => "connected",
                ClassifiedEvent::PlayerDisconnected(_) => "disconnected",
                ClassifiedEvent::ChatMessage(_) => "chat",
                ClassifiedEvent::Unknown { .. } => "unknown",
            };
            assert_eq!(kind, expected, "wrong kind for {raw:?}");
        }
    }

    #[test]
    fn test_player_connected() {
        let event = classify("Player #5 UltimateAntic (22.26.99.99:2304) connected");
        assert!(matches!(event, ClassifiedEvent::PlayerConnected(_)));
        let p = player(event);
        assert_eq!(p.game_id, 5);
        assert_eq!(p.name, "UltimateAntic");

        let p = player(classify("Player #6 Multi Word Name (22.26.99.99:2304) connected"));
        assert_eq!(p.game_id, 6);
        assert_eq!(p.name, "Multi Word Name");
    }

    #[test]
    fn test_player_disconnected() {
        let event = classify("Player #5 UltimateAntic disconnected");
        assert!(matches!(event, ClassifiedEvent::PlayerDisconnected(_)));
        let p = player(event);
        assert_eq!(p.game_id, 5);
        assert_eq!(p.name, "UltimateAntic");

        let p = player(classify("Player #6 Multi Word Name disconnected"));
        assert_eq!(p.game_id, 6);
        assert_eq!(p.name, "Multi Word Name");
    }

    #[test]
    fn test_multi_digit_game_id() {
        let p = player(classify("Player #42 Someone (1.2.3.4:2304) connected"));
        assert_eq!(p.game_id, 42);
        assert_eq!(p.name, "Someone");
    }

    #[test]
    fn test_player_prefix_without_digit_is_unknown() {
        let event = classify("Player #x Someone connected");
        assert!(matches!(event, ClassifiedEvent::Unknown { .. }));
    }

    #[test]
    fn test_chat_message() {
        let event = classify("(Global) Helle Duval: imagine cheating in arma tho [REDACTED] :)");
        let ClassifiedEvent::ChatMessage(chat) = event else {
            panic!("expected chat message");
        };
        assert_eq!(chat.channel_type, "(Global)");
        assert_eq!(chat.sender_name, "Helle Duval");
        assert_eq!(chat.content, " imagine cheating in arma tho [REDACTED] :)");

        let ClassifiedEvent::ChatMessage(chat) = classify("(Side) Altay: Welcome to the /server/ arma3!!!") else {
            panic!("expected chat message");
        };
        assert_eq!(chat.channel_type, "(Side)");
        assert_eq!(chat.sender_name, "Altay");
        assert_eq!(chat.content, " Welcome to the /server/ arma3!!!");
    }

    #[test]
    fn test_chat_content_keeps_every_colon() {
        let ClassifiedEvent::ChatMessage(chat) = classify("(Direct) Bob: time is 12:30: ok") else {
            panic!("expected chat message");
        };
        assert_eq!(chat.sender_name, "Bob");
        assert_eq!(chat.content, " time is 12:30: ok");
    }

    #[test]
    fn test_chat_tags_in_order() {
        for tag in CHAT_CHANNEL_TAGS {
            let raw = format!("{tag} Someone: hi");
            let ClassifiedEvent::ChatMessage(chat) = classify(&raw) else {
                panic!("expected chat message for {tag}");
            };
            assert_eq!(chat.channel_type, tag);
        }
    }

    #[test]
    fn test_classify_at_is_deterministic() {
        let time = Local::now();
        let raw = "(Vehicle) Driver: go go go";
        assert_eq!(classify_at(raw, time), classify_at(raw, time));
    }

    #[test]
    fn test_unknown_keeps_raw_line() {
        let raw = "RCon admin #0 (127.0.0.1:2306) logged in";
        assert_eq!(
            classify(raw),
            ClassifiedEvent::Unknown {
                raw: raw.to_string()
            }
        );
    }
}
