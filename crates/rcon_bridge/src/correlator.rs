//! Command/reply correlation.
//!
//! The RCON session delivers replies on the same stream as unsolicited
//! console lines, tagged only with the identifier the transport assigned at
//! send time. [`CommandCorrelator`] remembers which identifiers belong to
//! commands that are still waiting, hands each reply to its waiter exactly
//! once, and gives everything else back to the caller for classification.
//!
//! Each pending command owns a `oneshot` channel, so a waiting caller is
//! parked by the runtime rather than polling the map.

use crate::error::CommandError;
use crate::transport::RconTransport;
use crate::types::CommandId;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, RwLock};
use tokio::time::Instant;
use tracing::{debug, error, warn};

/// Default time to wait for a reply, measured from the send.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// A command that has been sent and is waiting for its reply.
#[derive(Debug)]
struct PendingCommand {
    /// Distinguishes this registration from a later one reusing the same id
    token: u64,
    command: String,
    sent_at: Instant,
    reply_tx: oneshot::Sender<String>,
}

/// Removes a registration from the pending map when the waiting call ends,
/// including when its future is dropped before completing.
struct PendingGuard<'a> {
    pending: &'a DashMap<CommandId, PendingCommand>,
    id: CommandId,
    token: u64,
    armed: bool,
}

impl PendingGuard<'_> {
    /// Removes the entry if it is still this registration's.
    ///
    /// Returns `false` when the reply path already claimed it.
    fn release(&mut self) -> bool {
        self.armed = false;
        let token = self.token;
        self.pending
            .remove_if(&self.id, |_, pending| pending.token == token)
            .is_some()
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if self.armed && self.release() {
            debug!(id = self.id, "Command abandoned by its caller, entry removed");
        }
    }
}

/// Matches inbound replies to outstanding commands.
#[derive(Debug)]
pub struct CommandCorrelator {
    transport: Arc<dyn RconTransport>,
    pending: DashMap<CommandId, PendingCommand>,
    /// Held shared while a command is sent and registered, exclusively while a
    /// reply is matched, so a fast reply cannot slip in before registration.
    registration: RwLock<()>,
    next_token: AtomicU64,
    default_timeout: Duration,
}

impl CommandCorrelator {
    pub fn new(transport: Arc<dyn RconTransport>, default_timeout: Duration) -> Self {
        Self {
            transport,
            pending: DashMap::new(),
            registration: RwLock::new(()),
            next_token: AtomicU64::new(0),
            default_timeout,
        }
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Number of commands currently waiting for a reply.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, id: CommandId) -> bool {
        self.pending.contains_key(&id)
    }

    /// Sends a command and waits for the reply carrying its identifier.
    ///
    /// Only the calling task is suspended; other commands and the inbound
    /// message loop keep running.
    ///
    /// # Arguments
    ///
    /// * `command` - Raw command text handed to the transport
    /// * `timeout` - How long to wait for the reply, measured from the send
    ///
    /// # Returns
    ///
    /// The reply text exactly as the game server sent it.
    ///
    /// # Errors
    ///
    /// * [`CommandError::Transport`] - the transport refused the command
    /// * [`CommandError::IdentifierInUse`] - the assigned id is still pending
    /// * [`CommandError::Timeout`] - no reply within `timeout`
    ///
    /// The pending entry is gone once the call ends, whichever way it ends,
    /// and also when the returned future is dropped early.
    pub async fn execute_command(&self, command: &str, timeout: Duration) -> Result<String, CommandError> {
        let (mut guard, mut reply_rx) = self.register(command).await?;
        let id = guard.id;
        debug!(id, command, "Command sent, awaiting reply");

        if let Ok(Ok(reply)) = tokio::time::timeout(timeout, &mut reply_rx).await {
            guard.disarm();
            return Ok(reply);
        }

        // The reply path may have claimed the entry at the deadline. After
        // close() its send either already landed or fails and hands the text back.
        let claimed_by_reply = !guard.release();
        reply_rx.close();
        if claimed_by_reply {
            if let Ok(reply) = reply_rx.try_recv() {
                debug!(id, "Reply arrived as the timeout fired, keeping it");
                return Ok(reply);
            }
        }

        error!(id, command, "Command {} timed out! (packet = {})", command, id);
        Err(CommandError::Timeout {
            command: command.to_string(),
            id,
            timeout,
        })
    }

    /// Offers an inbound transport message to the correlator.
    ///
    /// # Arguments
    ///
    /// * `id` - Identifier the transport attached to the message
    /// * `text` - Message body
    ///
    /// # Returns
    ///
    /// `None` when the message was a reply and has been handed to its waiting
    /// caller. `Some(text)` when nobody is waiting for `id` (an unsolicited
    /// line, or a reply whose caller already gave up); the text should then be
    /// classified.
    pub async fn offer_reply(&self, id: CommandId, text: String) -> Option<String> {
        let pending = {
            let _gate = self.registration.write().await;
            self.pending.remove(&id)
        };

        let Some((_, pending)) = pending else {
            return Some(text);
        };

        match pending.reply_tx.send(text) {
            Ok(()) => {
                debug!(
                    id,
                    command = %pending.command,
                    elapsed_ms = pending.sent_at.elapsed().as_millis() as u64,
                    "Reply matched to pending command"
                );
                None
            }
            Err(text) => {
                // the waiter gave up between the lookup and the send
                debug!(id, command = %pending.command, "Waiter already gone, treating reply as unsolicited");
                Some(text)
            }
        }
    }

    async fn register(&self, command: &str) -> Result<(PendingGuard<'_>, oneshot::Receiver<String>), CommandError> {
        let _gate = self.registration.read().await;
        let id = self.transport.send_command(command)?;
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        let (reply_tx, reply_rx) = oneshot::channel();

        match self.pending.entry(id) {
            Entry::Occupied(_) => {
                warn!(id, command, "Transport reused an identifier that is still pending");
                Err(CommandError::IdentifierInUse(id))
            }
            Entry::Vacant(slot) => {
                slot.insert(PendingCommand {
                    token,
                    command: command.to_string(),
                    sent_at: Instant::now(),
                    reply_tx,
                });
                let guard = PendingGuard {
                    pending: &self.pending,
                    id,
                    token,
                    armed: true,
                };
                Ok((guard, reply_rx))
            }
        }
    }
}
