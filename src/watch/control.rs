//! Commands aimed at the report window itself.

use crate::error::Result;
use crate::report::ReportSink;

/// A command executed in the report window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlCommand {
    /// `Del`: close the window and stop watching.
    Delete,
    /// `Clear`: empty the report.
    Clear,
    /// Anything else; left to the editor.
    Other(String),
}

impl ControlCommand {
    /// Parse a command word.
    pub fn parse(text: &str) -> Self {
        match text.trim() {
            "Del" => ControlCommand::Delete,
            "Clear" => ControlCommand::Clear,
            other => ControlCommand::Other(other.to_string()),
        }
    }
}

/// Why the control task stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlExit {
    /// The window was deleted; the process should exit.
    Deleted,
    /// The command stream ended.
    Closed,
}

/// Handle window commands until `Del` or the end of the stream.
///
/// Runs alongside the save-event loop and touches nothing but `report`.
pub fn run_control<I>(commands: I, report: &ReportSink) -> Result<ControlExit>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    for command in commands {
        match ControlCommand::parse(command.as_ref()) {
            ControlCommand::Delete => {
                log::debug!("report window deleted");
                report.mark_clean()?;
                return Ok(ControlExit::Deleted);
            }
            ControlCommand::Clear => report.clear()?,
            ControlCommand::Other(text) if text.is_empty() => {}
            ControlCommand::Other(text) => log::debug!("passing {:?} to the editor", text),
        }
    }
    Ok(ControlExit::Closed)
}
