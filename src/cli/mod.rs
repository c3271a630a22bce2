//! Command-line interface for fmtsplice.
//!
//! This module handles argument parsing and turning flags into a
//! [`WatchConfig`]. No watching or formatting happens here.

use crate::config::{ReplayMode, WatchConfig};
use crate::error::Result;
use clap::Parser;
use std::path::PathBuf;

/// fmtsplice: reformat saved files and splice the result into the open buffer.
#[derive(Parser, Debug)]
#[command(name = "fmtsplice")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run the install command after tests pass.
    #[arg(short = 'i', long = "install")]
    pub install_after: bool,

    /// Shell command to run after every successful build.
    #[arg(short = 'r', long = "run", value_name = "CMD")]
    pub run_after: Option<String>,

    /// Directory to watch (a file path means its directory).
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// JSON configuration file.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Where save events come from.
    #[arg(long, value_enum, default_value = "watch")]
    pub events: EventMode,

    /// Write the report to a file instead of standard output.
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Only edit the buffer when the whole diff parses.
    #[arg(long)]
    pub atomic: bool,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Source of save events.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventMode {
    /// Editor event log lines (`<window> <op> <path>`) on standard input.
    Log,
    /// Filesystem notifications under the root; standard input carries
    /// window commands (`Del`, `Clear`).
    Watch,
}

impl Cli {
    /// Build the effective configuration: file (if any), then flags.
    pub fn to_config(&self) -> Result<WatchConfig> {
        let mut config = match &self.config {
            Some(path) => WatchConfig::load(path)?,
            None => WatchConfig::default(),
        };
        if let Some(root) = &self.root {
            config = config.with_root(root);
        }
        if self.install_after {
            config.install_after = true;
        }
        if let Some(cmd) = &self.run_after {
            config.run_after = Some(cmd.clone());
        }
        if self.atomic {
            config.replay_mode = ReplayMode::Atomic;
        }
        Ok(config)
    }
}

/// Parse command-line arguments.
///
/// Returns the parsed Cli struct or exits on error.
pub fn parse_args() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from(["fmtsplice", "-i", "-r", "make lint", "--atomic", "--root", "/nonexistent/proj"]);
        let config = cli.to_config().unwrap();
        assert!(config.install_after);
        assert_eq!(config.run_after.as_deref(), Some("make lint"));
        assert_eq!(config.replay_mode, ReplayMode::Atomic);
        assert_eq!(config.root, PathBuf::from("/nonexistent/proj"));
        assert_eq!(cli.events, EventMode::Watch);
    }

    #[test]
    fn test_log_mode() {
        let cli = Cli::parse_from(["fmtsplice", "--events", "log", "-v"]);
        assert_eq!(cli.events, EventMode::Log);
        assert!(cli.verbose);
        assert!(!cli.to_config().unwrap().install_after);
    }
}
