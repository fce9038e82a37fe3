//! Configuration management for the bridge binary.
//!
//! Loads the TOML file, applies defaults for missing values and converts the
//! result into the core's [`BridgeConfig`].

use anyhow::Context;
use rcon_bridge::{BridgeConfig, EventChannelSettings};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, Level};

const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

fn default_timeout_secs() -> u64 {
    30
}

fn default_resolve_timeout_ms() -> u64 {
    5000
}

fn default_inbound_capacity() -> usize {
    1024
}

fn default_mirror_level() -> String {
    "info".to_string()
}

/// Application configuration loaded from TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// RCON connection settings
    pub rcon: RconSettings,
    /// Destination channel ids per notification category
    #[serde(default)]
    pub event_channels: EventChannelSettings,
    /// Command and platform timeouts
    #[serde(default)]
    pub commands: CommandSettings,
    /// Logging configuration settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// RCON connection options handed to the transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RconSettings {
    pub host: String,
    pub port: u16,
    pub password: String,
    /// Reconnect after a keep-alive packet goes unanswered
    #[serde(default)]
    pub reconnect_on_packet_loss: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandSettings {
    /// Seconds to wait for a command reply
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Milliseconds allowed for a destination lookup or a send
    #[serde(default = "default_resolve_timeout_ms")]
    pub resolve_timeout_ms: u64,
    /// Inbound transport channel capacity
    #[serde(default = "default_inbound_capacity")]
    pub inbound_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    pub level: String,
    /// Whether to output logs in JSON format
    #[serde(default)]
    pub json_format: bool,
    /// Least severe level mirrored to the system log channel
    #[serde(default = "default_mirror_level")]
    pub mirror_level: String,
}

impl Default for RconSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 2302,
            password: String::new(),
            reconnect_on_packet_loss: true,
        }
    }
}

impl Default for CommandSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            resolve_timeout_ms: default_resolve_timeout_ms(),
            inbound_capacity: default_inbound_capacity(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            mirror_level: default_mirror_level(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    ///
    /// If the file doesn't exist, writes the default configuration to `path`
    /// and returns it.
    pub async fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            let config: AppConfig =
                toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
            Ok(config)
        } else {
            let default_config = AppConfig::default();
            let toml_content = toml::to_string_pretty(&default_config)?;
            tokio::fs::write(path, toml_content)
                .await
                .with_context(|| format!("writing {}", path.display()))?;
            info!("Created default configuration file: {}", path.display());
            Ok(default_config)
        }
    }

    /// Converts to the core runtime configuration. Call [`AppConfig::validate`] first.
    pub fn to_bridge_config(&self) -> anyhow::Result<BridgeConfig> {
        let mirror_level = Level::from_str(&self.logging.mirror_level)
            .map_err(|_| anyhow::anyhow!("Invalid mirror level: {}", self.logging.mirror_level))?;

        Ok(BridgeConfig {
            event_channels: self.event_channels.clone(),
            command_timeout: Duration::from_secs(self.commands.timeout_secs),
            platform_timeout: Duration::from_millis(self.commands.resolve_timeout_ms),
            mirror_level,
            inbound_capacity: self.commands.inbound_capacity,
        })
    }

    /// Validates the configuration for consistency and correctness.
    pub fn validate(&self) -> Result<(), String> {
        if self.rcon.host.trim().is_empty() {
            return Err("RCON host cannot be empty".to_string());
        }
        if self.rcon.port == 0 {
            return Err("RCON port cannot be 0".to_string());
        }

        if self.commands.timeout_secs == 0 {
            return Err("Command timeout must be greater than 0".to_string());
        }
        if self.commands.resolve_timeout_ms == 0 {
            return Err("Resolve timeout must be greater than 0".to_string());
        }
        if self.commands.inbound_capacity == 0 {
            return Err("Inbound capacity must be greater than 0".to_string());
        }

        for (name, level) in [
            ("log level", &self.logging.level),
            ("mirror level", &self.logging.mirror_level),
        ] {
            if !VALID_LEVELS.contains(&level.as_str()) {
                return Err(format!("Invalid {name}: {level}. Must be one of: {VALID_LEVELS:?}"));
            }
        }

        Ok(())
    }
}
