//! Command-line interface for the bridge binary.

use clap::{Arg, Command};
use std::path::PathBuf;

/// Source of console lines for replay mode: a file, or standard input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplaySource {
    Stdin,
    File(PathBuf),
}

impl From<&str> for ReplaySource {
    fn from(value: &str) -> Self {
        if value == "-" {
            Self::Stdin
        } else {
            Self::File(PathBuf::from(value))
        }
    }
}

/// Command line arguments parsed from user input.
///
/// Options given here override the matching configuration file settings.
#[derive(Debug, Clone)]
pub struct CliArgs {
    /// Path to the configuration file
    pub config_path: PathBuf,
    /// Where captured console lines are read from
    pub replay: ReplaySource,
    /// Optional override for log level
    pub log_level: Option<String>,
    /// Optional override for the mirrored log level
    pub mirror_level: Option<String>,
    /// Whether to force JSON log output
    pub json_logs: bool,
}

impl CliArgs {
    pub fn parse() -> Self {
        Self::from_matches(Self::command().get_matches())
    }

    fn command() -> Command {
        Command::new("RCON Bridge")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Forwards RCON console traffic to chat channels")
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Configuration file path")
                    .default_value("bridge.toml"),
            )
            .arg(
                Arg::new("replay")
                    .short('r')
                    .long("replay")
                    .value_name("FILE")
                    .help("Replay captured console lines from FILE ('-' for stdin)")
                    .default_value("-"),
            )
            .arg(
                Arg::new("log-level")
                    .short('l')
                    .long("log-level")
                    .value_name("LEVEL")
                    .help("Log level (trace, debug, info, warn, error)"),
            )
            .arg(
                Arg::new("mirror-level")
                    .long("mirror-level")
                    .value_name("LEVEL")
                    .help("Least severe level mirrored to the system log channel"),
            )
            .arg(
                Arg::new("json-logs")
                    .long("json-logs")
                    .help("Output logs in JSON format")
                    .action(clap::ArgAction::SetTrue),
            )
    }

    fn from_matches(matches: clap::ArgMatches) -> Self {
        Self {
            config_path: matches
                .get_one::<String>("config")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("bridge.toml")),
            replay: matches
                .get_one::<String>("replay")
                .map(|value| ReplaySource::from(value.as_str()))
                .unwrap_or(ReplaySource::Stdin),
            log_level: matches.get_one::<String>("log-level").cloned(),
            mirror_level: matches.get_one::<String>("mirror-level").cloned(),
            json_logs: matches.get_flag("json-logs"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_from(args: &[&str]) -> CliArgs {
        CliArgs::from_matches(CliArgs::command().get_matches_from(args))
    }

    #[test]
    fn test_defaults() {
        let args = parse_from(&["rcon-bridge"]);
        assert_eq!(args.config_path, PathBuf::from("bridge.toml"));
        assert_eq!(args.replay, ReplaySource::Stdin);
        assert!(args.log_level.is_none());
        assert!(args.mirror_level.is_none());
        assert!(!args.json_logs);
    }

    #[test]
    fn test_overrides() {
        let args = parse_from(&[
            "rcon-bridge",
            "-c",
            "custom.toml",
            "--replay",
            "console.log",
            "-l",
            "debug",
            "--mirror-level",
            "warn",
            "--json-logs",
        ]);
        assert_eq!(args.config_path, PathBuf::from("custom.toml"));
        assert_eq!(args.replay, ReplaySource::File(PathBuf::from("console.log")));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.mirror_level.as_deref(), Some("warn"));
        assert!(args.json_logs);
    }
}
