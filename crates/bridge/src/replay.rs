//! Replay mode collaborators.
//!
//! [`replay_lines`] feeds captured console lines into the bridge as if an RCON
//! session had delivered them, and [`ConsolePlatform`] prints every
//! notification as one JSON line on stdout instead of posting it to a chat
//! service.

use async_trait::async_trait;
use rcon_bridge::{
    ChatPlatform, CommandId, ConnectionState, Destination, DestinationId, Notification, PlatformError,
    RconTransport, TransportError, TransportEvent,
};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::debug;

/// Transport side of a replay session.
///
/// A recording cannot answer commands, so every send fails.
#[derive(Debug, Default)]
pub struct ReplayTransport {
    connected: AtomicBool,
}

impl ReplayTransport {
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }
}

impl RconTransport for ReplayTransport {
    fn send_command(&self, _command: &str) -> Result<CommandId, TransportError> {
        Err(TransportError::NotConnected)
    }

    fn connection_state(&self) -> ConnectionState {
        if self.connected.load(Ordering::SeqCst) {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }
}

/// Pushes every non-empty line from `reader` as a transport message, framed
/// by `Connected` and `Disconnected` events.
///
/// Returns the number of messages sent.
pub async fn replay_lines<R>(
    reader: R,
    transport: &ReplayTransport,
    inbound: mpsc::Sender<TransportEvent>,
) -> anyhow::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    transport.set_connected(true);
    inbound.send(TransportEvent::Connected).await?;

    let mut lines = reader.lines();
    let mut sent = 0usize;
    while let Some(line) = lines.next_line().await? {
        let text = line.trim_end();
        if text.is_empty() {
            continue;
        }
        // recorded lines are unsolicited, ids only need to be distinct
        let id = CommandId::try_from(sent).unwrap_or(CommandId::MAX);
        inbound
            .send(TransportEvent::Message {
                id,
                text: text.to_string(),
            })
            .await?;
        sent += 1;
    }

    transport.set_connected(false);
    inbound.send(TransportEvent::Disconnected).await?;
    debug!(messages = sent, "Replay finished");
    Ok(sent)
}

#[derive(Serialize)]
struct ConsoleLine<'a> {
    destination: &'a str,
    #[serde(flatten)]
    notification: &'a Notification,
}

/// Chat platform that writes notifications to stdout.
///
/// Destination id `0` means "not configured" and never resolves.
#[derive(Debug, Default)]
pub struct ConsolePlatform;

impl ConsolePlatform {
    pub fn format(destination: &Destination, notification: &Notification) -> Result<String, PlatformError> {
        serde_json::to_string(&ConsoleLine {
            destination: &destination.name,
            notification,
        })
        .map_err(|e| PlatformError::Request(e.to_string()))
    }
}

#[async_trait]
impl ChatPlatform for ConsolePlatform {
    async fn resolve_destination(&self, id: DestinationId) -> Result<Option<Destination>, PlatformError> {
        if id == 0 {
            return Ok(None);
        }
        Ok(Some(Destination {
            id,
            name: format!("channel-{id}"),
        }))
    }

    async fn send(&self, destination: &Destination, notification: Notification) -> Result<(), PlatformError> {
        // no logging here, it would be mirrored straight back into this sink
        println!("{}", Self::format(destination, &notification)?);
        Ok(())
    }

    fn connection_state(&self) -> ConnectionState {
        ConnectionState::Connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replay_frames_messages() {
        let transport = ReplayTransport::default();
        let (tx, mut rx) = mpsc::channel(16);
        let input: &[u8] = b"Player #1 Ann (1.2.3.4:2304) connected\n\n(Global) Ann: hi\r\n";

        let sent = replay_lines(input, &transport, tx).await.unwrap();
        assert_eq!(sent, 2);

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        assert_eq!(
            events,
            vec![
                TransportEvent::Connected,
                TransportEvent::Message {
                    id: 0,
                    text: "Player #1 Ann (1.2.3.4:2304) connected".to_string(),
                },
                TransportEvent::Message {
                    id: 1,
                    text: "(Global) Ann: hi".to_string(),
                },
                TransportEvent::Disconnected,
            ]
        );
        assert_eq!(transport.connection_state(), ConnectionState::Disconnected);
    }

    #[test]
    fn test_replay_transport_rejects_commands() {
        let transport = ReplayTransport::default();
        assert_eq!(transport.send_command("players"), Err(TransportError::NotConnected));
    }

    #[tokio::test]
    async fn test_console_platform_resolution() {
        let platform = ConsolePlatform;
        assert_eq!(platform.resolve_destination(0).await.unwrap(), None);

        let destination = platform.resolve_destination(42).await.unwrap().unwrap();
        assert_eq!(destination.id, 42);
        assert_eq!(destination.name, "channel-42");
    }

    #[test]
    fn test_console_format() {
        let destination = Destination {
            id: 7,
            name: "channel-7".to_string(),
        };
        let line = ConsolePlatform::format(&destination, &Notification::text("hello")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();

        assert_eq!(value["destination"], "channel-7");
        assert_eq!(value["content"], "hello");
    }
}
