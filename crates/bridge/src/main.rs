//! RCON bridge binary.
//!
//! Loads the configuration, installs logging (with the system-log mirror) and
//! runs the bridge core. Console traffic is replayed from a capture file or
//! stdin and every notification is printed as JSON, which makes the binary a
//! dry run of a live deployment.

mod cli;
mod config;
mod logging;
mod replay;
mod signals;

use anyhow::Context;
use cli::{CliArgs, ReplaySource};
use config::AppConfig;
use rcon_bridge::{log_mirror, spawn_log_mirror, transport_channel, BridgeConfig, RconBridge, TransportEvent};
use replay::{replay_lines, ConsolePlatform, ReplayTransport};
use signals::wait_for_shutdown;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::{error, info};

/// Grace period for the log mirror to drain before exit.
const MIRROR_DRAIN: Duration = Duration::from_millis(200);

pub struct Application {
    config: AppConfig,
    bridge_config: BridgeConfig,
    replay: ReplaySource,
}

impl Application {
    pub async fn new(args: CliArgs) -> anyhow::Result<Self> {
        let mut config = AppConfig::load_from_file(&args.config_path).await?;

        if let Some(log_level) = args.log_level {
            config.logging.level = log_level;
        }
        if let Some(mirror_level) = args.mirror_level {
            config.logging.mirror_level = mirror_level;
        }
        if args.json_logs {
            config.logging.json_format = true;
        }

        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Configuration validation failed: {e}"))?;
        let bridge_config = config.to_bridge_config()?;

        Ok(Self {
            config,
            bridge_config,
            replay: args.replay,
        })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let (mirror_layer, logs) = log_mirror(self.bridge_config.mirror_level);
        logging::setup_logging(&self.config.logging, mirror_layer)?;

        info!(
            host = %self.config.rcon.host,
            port = self.config.rcon.port,
            reconnect_on_packet_loss = self.config.rcon.reconnect_on_packet_loss,
            "Starting RCON bridge"
        );
        info!(
            command_timeout = ?self.bridge_config.command_timeout,
            platform_timeout = ?self.bridge_config.platform_timeout,
            "Timeouts configured"
        );

        let transport = Arc::new(ReplayTransport::default());
        let bridge = Arc::new(RconBridge::new(
            transport.clone(),
            Arc::new(ConsolePlatform),
            self.bridge_config.clone(),
        ));
        let mirror_handle = spawn_log_mirror(bridge.dispatcher(), logs);

        let (inbound_tx, inbound_rx) = transport_channel(self.bridge_config.inbound_capacity);
        let pump_handle = tokio::spawn(bridge.clone().run(inbound_rx));

        let mut replay_handle = tokio::spawn(replay_from(self.replay.clone(), transport, inbound_tx));

        tokio::select! {
            result = &mut replay_handle => {
                let messages = result??;
                info!(messages, "Replay complete");
                pump_handle.await?;
            }
            signal = wait_for_shutdown() => {
                let signal = signal?;
                info!(signal, "Shutdown signal received");
                replay_handle.abort();
                pump_handle.abort();
            }
        }

        tokio::time::sleep(MIRROR_DRAIN).await;
        mirror_handle.abort();
        info!(pending_commands = bridge.correlator().pending_count(), "RCON bridge stopped");
        Ok(())
    }
}

async fn replay_from(
    source: ReplaySource,
    transport: Arc<ReplayTransport>,
    inbound: mpsc::Sender<TransportEvent>,
) -> anyhow::Result<usize> {
    match source {
        ReplaySource::Stdin => replay_lines(BufReader::new(tokio::io::stdin()), &transport, inbound).await,
        ReplaySource::File(path) => {
            let file = tokio::fs::File::open(&path)
                .await
                .with_context(|| format!("opening {}", path.display()))?;
            replay_lines(BufReader::new(file), &transport, inbound).await
        }
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let app = match Application::new(args).await {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Failed to start application: {e:?}");
            std::process::exit(1);
        }
    };

    if let Err(e) = app.run().await {
        error!("Application error: {:?}", e);
        std::process::exit(1);
    }

    Ok(())
}
