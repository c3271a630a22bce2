//! External programs: the formatter, the line diff tool and build commands.
//!
//! None of these are implemented here; they are invoked as subprocesses and
//! only their exit status and output are interpreted. There is no timeout:
//! a tool that hangs holds up the save cycle until it exits.

mod run;

use crate::config::CommandSpec;
use crate::error::{FmtspliceError, Result};
use std::path::Path;
use std::process::Command;
use which::which;

pub use run::{run_command, run_shell};

/// Result of formatting one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatOutcome {
    /// The complete reformatted file.
    Formatted(Vec<u8>),
    /// The formatter rejected the file.
    Failed {
        /// Operational failure rather than ordinary diagnostics.
        fatal: bool,
        /// Exit status or launch error.
        status: String,
        /// Combined stdout and stderr.
        output: Vec<u8>,
    },
}

/// Reformats a file on disk without modifying it.
pub trait Formatter {
    /// Name shown in reports.
    fn name(&self) -> &str;

    /// Format the file at `path`.
    fn format(&self, path: &Path) -> FormatOutcome;
}

/// Produces a classic diff summary between two files.
pub trait DiffTool {
    /// Diff `old` against `new`.
    fn diff(&self, old: &Path, new: &Path) -> Result<String>;
}

/// A formatter that writes the formatted file to stdout.
#[derive(Debug, Clone)]
pub struct CommandFormatter {
    command: CommandSpec,
    fatal_marker: String,
}

impl CommandFormatter {
    /// Run `command <path>`; output containing `fatal_marker` is fatal-class.
    pub fn new(command: CommandSpec, fatal_marker: impl Into<String>) -> Self {
        Self {
            command,
            fatal_marker: fatal_marker.into(),
        }
    }
}

impl Formatter for CommandFormatter {
    fn name(&self) -> &str {
        &self.command.program
    }

    fn format(&self, path: &Path) -> FormatOutcome {
        let output = Command::new(&self.command.program)
            .args(&self.command.args)
            .arg(path)
            .output();

        match output {
            Ok(result) if result.status.success() => {
                if !result.stderr.is_empty() {
                    log::warn!(
                        "{} wrote to stderr while formatting {}: {}",
                        self.command.program,
                        path.display(),
                        String::from_utf8_lossy(&result.stderr).trim()
                    );
                }
                FormatOutcome::Formatted(result.stdout)
            }
            Ok(result) => {
                let mut combined = result.stdout;
                combined.extend_from_slice(&result.stderr);
                let fatal = !self.fatal_marker.is_empty()
                    && String::from_utf8_lossy(&combined).contains(&self.fatal_marker);
                FormatOutcome::Failed {
                    fatal,
                    status: result.status.to_string(),
                    output: combined,
                }
            }
            Err(e) => FormatOutcome::Failed {
                fatal: true,
                status: e.to_string(),
                output: Vec::new(),
            },
        }
    }
}

/// A diff tool invoked as `program args.. <old> <new>`.
///
/// Exit status is ignored: `diff` exits 1 whenever the inputs differ.
#[derive(Debug, Clone)]
pub struct CommandDiff {
    command: CommandSpec,
}

impl CommandDiff {
    /// Wrap `command`.
    pub fn new(command: CommandSpec) -> Self {
        Self { command }
    }
}

impl DiffTool for CommandDiff {
    fn diff(&self, old: &Path, new: &Path) -> Result<String> {
        let output = Command::new(&self.command.program)
            .args(&self.command.args)
            .arg(old)
            .arg(new)
            .output()
            .map_err(|e| {
                FmtspliceError::Other(format!("failed to run {}: {}", self.command.program, e))
            })?;
        if !output.stderr.is_empty() {
            log::warn!(
                "{}: {}",
                self.command.program,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Log whether each configured tool can be found.
pub fn probe_tools(commands: &[&CommandSpec]) {
    for command in commands {
        match which(&command.program) {
            Ok(path) => log::debug!("{} -> {}", command.program, path.display()),
            Err(_) => log::warn!("{} not found on PATH", command.program),
        }
    }
}
