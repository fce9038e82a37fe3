//! RCON transport seam.
//!
//! The bridge never speaks the RCON wire protocol itself. A connected client
//! implements [`RconTransport`] for outbound commands and pushes everything it
//! receives as [`TransportEvent`]s onto an mpsc channel that the bridge drains.

use crate::error::TransportError;
use crate::types::{CommandId, ConnectionState, TransportEvent};
use tokio::sync::mpsc;

/// Outbound half of a connected RCON session.
pub trait RconTransport: Send + Sync + std::fmt::Debug {
    /// Sends a command and returns the identifier the session assigned to it.
    ///
    /// The reply, if any, arrives later as a [`TransportEvent::Message`]
    /// carrying the same identifier.
    fn send_command(&self, command: &str) -> Result<CommandId, TransportError>;

    /// Current state of the session.
    fn connection_state(&self) -> ConnectionState;
}

/// Creates the inbound channel a transport publishes its events on.
pub fn transport_channel(capacity: usize) -> (mpsc::Sender<TransportEvent>, mpsc::Receiver<TransportEvent>) {
    mpsc::channel(capacity)
}
