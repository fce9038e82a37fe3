//! Logging setup.
//!
//! The console output honours `RUST_LOG`, falling back to the configured
//! level. The log mirror layer is attached beside it with its own level, so
//! the system log channel can be quieter or noisier than the console.

use crate::config::LoggingSettings;
use rcon_bridge::LogMirrorLayer;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Installs the global subscriber.
pub fn setup_logging(config: &LoggingSettings, mirror: LogMirrorLayer) -> anyhow::Result<()> {
    let log_level = config.level.as_str();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(mirror);

    if config.json_format {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_file(false)
                    .with_line_number(false)
                    .with_thread_ids(true)
                    .with_filter(filter),
            )
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_file(false)
                    .with_line_number(false)
                    .with_target(true)
                    .with_filter(filter),
            )
            .try_init()?;
    }

    info!(level = log_level, mirror_level = %config.mirror_level, "Logging initialized");
    Ok(())
}
