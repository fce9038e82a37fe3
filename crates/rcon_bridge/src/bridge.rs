//! Composition of correlator, classifier and dispatcher around the inbound
//! transport stream.

use crate::classifier::classify;
use crate::config::BridgeConfig;
use crate::correlator::CommandCorrelator;
use crate::dispatcher::EventDispatcher;
use crate::error::CommandError;
use crate::platform::{ChatPlatform, Notification};
use crate::render;
use crate::transport::RconTransport;
use crate::types::{ClassifiedEvent, CommandId, LogEvent, TransportEvent};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// The RCON to chat-platform bridge.
///
/// Feed it the transport's inbound events with [`RconBridge::run`] (or one at a
/// time with [`RconBridge::handle_transport_event`]) and issue administrative
/// commands with [`RconBridge::execute_command`] from any number of tasks.
#[derive(Debug)]
pub struct RconBridge {
    correlator: CommandCorrelator,
    dispatcher: Arc<EventDispatcher>,
}

impl RconBridge {
    pub fn new(transport: Arc<dyn RconTransport>, platform: Arc<dyn ChatPlatform>, config: BridgeConfig) -> Self {
        info!("RCON bridge created");
        Self {
            correlator: CommandCorrelator::new(transport, config.command_timeout),
            dispatcher: Arc::new(EventDispatcher::new(
                platform,
                config.event_channels,
                config.platform_timeout,
            )),
        }
    }

    pub fn correlator(&self) -> &CommandCorrelator {
        &self.correlator
    }

    pub fn dispatcher(&self) -> Arc<EventDispatcher> {
        self.dispatcher.clone()
    }

    /// Sends a command and waits for its reply. `None` uses the configured
    /// command timeout.
    pub async fn execute_command(&self, command: &str, timeout: Option<Duration>) -> Result<String, CommandError> {
        let timeout = timeout.unwrap_or_else(|| self.correlator.default_timeout());
        self.correlator.execute_command(command, timeout).await
    }

    /// Runs a command and renders the outcome for whoever asked for it.
    pub async fn exec(&self, command: &str) -> Notification {
        match self.execute_command(command, None).await {
            Ok(reply) => render::render_command_reply(command, &reply),
            Err(e) => render::render_command_failure(command, &e.to_string()),
        }
    }

    pub async fn handle_transport_event(&self, event: TransportEvent) {
        match event {
            TransportEvent::Message { id, text } => self.handle_message(id, text).await,
            TransportEvent::Connected => info!("RCON client connected!"),
            TransportEvent::Disconnected => error!("RCON client has disconnected!"),
        }
    }

    async fn handle_message(&self, id: CommandId, text: String) {
        let Some(text) = self.correlator.offer_reply(id, text).await else {
            return;
        };

        let event = classify(&text);
        if let ClassifiedEvent::Unknown { raw } = &event {
            debug!(id, raw = %raw, "Unclassified console message");
        }
        self.dispatcher.on_classified_event(&event).await;
    }

    /// Drains the inbound transport channel until every sender is dropped.
    pub async fn run(self: Arc<Self>, mut inbound: mpsc::Receiver<TransportEvent>) {
        while let Some(event) = inbound.recv().await {
            self.handle_transport_event(event).await;
        }
        info!("Inbound transport channel closed");
    }
}

/// Spawns the task that mirrors captured log lines to the system-log
/// destination.
pub fn spawn_log_mirror(
    dispatcher: Arc<EventDispatcher>,
    mut logs: mpsc::UnboundedReceiver<LogEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = logs.recv().await {
            dispatcher.on_logged(&event).await;
        }
    })
}
