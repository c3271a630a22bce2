//! Reformat a saved file and replay the change into its buffer.
//!
//! The cycle for one file:
//! 1. Format the on-disk file with the external formatter
//! 2. Compare; identical output ends the cycle with no buffer I/O
//! 3. Write the formatted bytes to a temp file and diff it against the original
//! 4. Replay the diff summary bottom-up as line-addressed buffer edits
//!
//! Directives are applied in descending order of their old start line, so an
//! edit never shifts the lines a still-pending edit refers to. A replay that
//! aborts part way leaves the edits made so far in the buffer.

use crate::buffer::{Address, BufferHost, EditSink, WindowId};
use crate::config::{ReplayMode, WatchConfig};
use crate::diff::{find_lines, is_detail_line, parse_directive, DiffDirective, DiffKind, DiffSet};
use crate::error::{FmtspliceError, Result};
use crate::report::ReportSink;
use crate::tools::{CommandDiff, CommandFormatter, DiffTool, FormatOutcome, Formatter};
use std::fmt;
use std::io::Write;
use std::path::Path;

/// Stages of a replay cycle, logged as they are reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayState {
    /// The formatter produced output.
    Formatted,
    /// Output differs from the file on disk.
    Compared,
    /// A diff summary is available.
    DiffGenerated,
    /// Edits are being applied.
    Replaying,
    /// The cycle finished.
    Done,
    /// The cycle stopped early.
    Aborted,
}

impl fmt::Display for ReplayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReplayState::Formatted => "formatted",
            ReplayState::Compared => "compared",
            ReplayState::DiffGenerated => "diff-generated",
            ReplayState::Replaying => "replaying",
            ReplayState::Done => "done",
            ReplayState::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Why a cycle stopped early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    /// The formatter failed; its output was reported.
    FormatterFailed {
        /// Fatal-class failure.
        fatal: bool,
    },
    /// A summary line had no operator.
    UnparseableDiff {
        /// The offending line.
        line: String,
    },
    /// The buffer refused an address or a write.
    EditFailed {
        /// The buffer's error.
        message: String,
    },
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::FormatterFailed { fatal: true } => write!(f, "formatter failed (fatal)"),
            AbortReason::FormatterFailed { fatal: false } => write!(f, "formatter failed"),
            AbortReason::UnparseableDiff { line } => write!(f, "cannot parse diff line: {:?}", line),
            AbortReason::EditFailed { message } => write!(f, "edit failed: {}", message),
        }
    }
}

/// Terminal state of a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayOutcome {
    /// All directives were applied (possibly none).
    Done {
        /// Number of buffer edits made.
        edits: usize,
    },
    /// The cycle stopped early.
    Aborted(AbortReason),
}

impl ReplayOutcome {
    /// Returns true for [`ReplayOutcome::Done`].
    pub fn is_done(&self) -> bool {
        matches!(self, ReplayOutcome::Done { .. })
    }

    fn aborted(reason: AbortReason) -> Self {
        log::debug!("replay {}: {}", ReplayState::Aborted, reason);
        ReplayOutcome::Aborted(reason)
    }
}

/// Formats saved files and replays the result into their buffers.
pub struct Replayer {
    formatter: Box<dyn Formatter>,
    diff_tool: Box<dyn DiffTool>,
    mode: ReplayMode,
}

impl Replayer {
    /// Build a replayer from explicit tools.
    pub fn new(formatter: Box<dyn Formatter>, diff_tool: Box<dyn DiffTool>, mode: ReplayMode) -> Self {
        Self {
            formatter,
            diff_tool,
            mode,
        }
    }

    /// Build a replayer running the tools named in `config`.
    pub fn from_config(config: &WatchConfig) -> Self {
        Self::new(
            Box::new(CommandFormatter::new(
                config.formatter.clone(),
                config.fatal_marker.clone(),
            )),
            Box::new(CommandDiff::new(config.diff.clone())),
            config.replay_mode,
        )
    }

    /// Run one reformat cycle for `path`, shown in `window`.
    ///
    /// Tool failures and replay aborts are reported and returned as
    /// [`ReplayOutcome::Aborted`]. `Err` is reserved for failures that end the
    /// process: unreadable file, no temp file, unopenable buffer, broken report.
    /// A buffer that is not UTF-8 text only aborts this cycle.
    pub fn reformat(
        &self,
        report: &ReportSink,
        host: &dyn BufferHost,
        window: WindowId,
        path: &Path,
    ) -> Result<ReplayOutcome> {
        let original = std::fs::read(path).map_err(|e| FmtspliceError::io(path, e))?;

        let formatted = match self.formatter.format(path) {
            FormatOutcome::Formatted(bytes) => bytes,
            FormatOutcome::Failed {
                fatal,
                status,
                output,
            } => {
                if fatal {
                    report.write_str(&format!(
                        "{} {}: {}\n",
                        self.formatter.name(),
                        path.display(),
                        status
                    ))?;
                }
                report.write_bytes(&output)?;
                return Ok(ReplayOutcome::aborted(AbortReason::FormatterFailed { fatal }));
            }
        };
        log::debug!("{}: {}", path.display(), ReplayState::Formatted);

        if original == formatted {
            log::debug!("{}: unchanged", path.display());
            return Ok(ReplayOutcome::Done { edits: 0 });
        }
        log::debug!("{}: {}", path.display(), ReplayState::Compared);

        let mut temp = tempfile::Builder::new()
            .prefix("fmtsplice")
            .tempfile()
            .map_err(FmtspliceError::TempFile)?;
        temp.write_all(&formatted).map_err(FmtspliceError::TempFile)?;
        temp.flush().map_err(FmtspliceError::TempFile)?;

        let summary = match self.diff_tool.diff(path, temp.path()) {
            Ok(summary) => summary,
            Err(e) => {
                log::warn!("diff failed for {}: {}", path.display(), e);
                String::new()
            }
        };
        log::debug!("{}: {}", path.display(), ReplayState::DiffGenerated);

        let outcome = match host.open(window, path) {
            Ok(mut sink) => self.replay_and_commit(sink.as_mut(), path, &summary, &formatted),
            Err(FmtspliceError::NotText { source, .. }) => {
                log::warn!("{} is not UTF-8 text: {}", path.display(), source);
                ReplayOutcome::aborted(AbortReason::EditFailed {
                    message: format!("not UTF-8 text: {}", source),
                })
            }
            Err(e) => return Err(e),
        };

        match &outcome {
            ReplayOutcome::Done { edits } => {
                log::debug!("{}: {} ({} edits)", path.display(), ReplayState::Done, edits)
            }
            ReplayOutcome::Aborted(reason) => {
                report.write_str(&format!("{}: {}\n", path.display(), reason))?;
            }
        }
        Ok(outcome)
    }

    fn replay_and_commit(
        &self,
        sink: &mut dyn EditSink,
        path: &Path,
        summary: &str,
        formatted: &[u8],
    ) -> ReplayOutcome {
        let outcome = replay_summary(sink, summary, formatted, self.mode);
        match sink.commit() {
            Err(e) => {
                log::error!("cannot commit {}: {}", path.display(), e);
                if outcome.is_done() {
                    ReplayOutcome::aborted(AbortReason::EditFailed {
                        message: e.to_string(),
                    })
                } else {
                    outcome
                }
            }
            Ok(()) => outcome,
        }
    }
}

/// Replay a diff summary of `old → new` onto `sink`, which holds `old`.
///
/// `new` is the full reformatted text that the summary's new-side line
/// numbers refer to.
pub fn replay_summary(
    sink: &mut dyn EditSink,
    summary: &str,
    new: &[u8],
    mode: ReplayMode,
) -> ReplayOutcome {
    match mode {
        ReplayMode::Incremental => replay_incremental(sink, summary, new),
        ReplayMode::Atomic => replay_atomic(sink, summary, new),
    }
}

fn replay_incremental(sink: &mut dyn EditSink, summary: &str, new: &[u8]) -> ReplayOutcome {
    if let Err(reason) = begin_undo_group(sink) {
        return ReplayOutcome::aborted(reason);
    }
    log::debug!("{}", ReplayState::Replaying);

    let mut edits = 0;
    for line in summary.lines().rev() {
        if line.is_empty() || is_detail_line(line) {
            continue;
        }
        let directive = match parse_directive(line) {
            Ok(Some(directive)) => directive,
            Ok(None) => continue,
            Err(e) => {
                log::error!("{}", e);
                return ReplayOutcome::aborted(AbortReason::UnparseableDiff {
                    line: line.to_string(),
                });
            }
        };
        if let Err(reason) = apply_logged(sink, &directive, new) {
            return ReplayOutcome::aborted(reason);
        }
        edits += 1;
    }
    ReplayOutcome::Done { edits }
}

fn replay_atomic(sink: &mut dyn EditSink, summary: &str, new: &[u8]) -> ReplayOutcome {
    let set = match DiffSet::parse(summary) {
        Ok(set) => set,
        Err(FmtspliceError::DiffParse { line }) => {
            log::error!("cannot parse diff line: {:?}", line);
            return ReplayOutcome::aborted(AbortReason::UnparseableDiff { line });
        }
        Err(e) => {
            return ReplayOutcome::aborted(AbortReason::UnparseableDiff {
                line: e.to_string(),
            })
        }
    };
    if let Err(reason) = begin_undo_group(sink) {
        return ReplayOutcome::aborted(reason);
    }
    log::debug!("{} ({} directives)", ReplayState::Replaying, set.len());

    let mut edits = 0;
    for directive in set.in_replay_order() {
        if let Err(reason) = apply_logged(sink, &directive, new) {
            return ReplayOutcome::aborted(reason);
        }
        edits += 1;
    }
    ReplayOutcome::Done { edits }
}

fn begin_undo_group(sink: &mut dyn EditSink) -> std::result::Result<(), AbortReason> {
    sink.set_undo_mark(true)
        .and_then(|_| sink.set_undo_mark(false))
        .map_err(|e| {
            log::error!("cannot mark buffer: {}", e);
            AbortReason::EditFailed {
                message: e.to_string(),
            }
        })
}

fn apply_logged(
    sink: &mut dyn EditSink,
    directive: &DiffDirective,
    new: &[u8],
) -> std::result::Result<(), AbortReason> {
    apply_directive(sink, directive, new).map_err(|e| {
        log::error!("applying {}: {}", directive, e);
        AbortReason::EditFailed {
            message: e.to_string(),
        }
    })
}

/// Translate one directive into an address and a write on `sink`.
pub fn apply_directive(sink: &mut dyn EditSink, directive: &DiffDirective, new: &[u8]) -> Result<()> {
    let old = directive.old;
    match directive.kind {
        DiffKind::Append => {
            sink.set_address(Address::After(old.start))?;
            sink.write_selection(find_lines(new, directive.new.start, directive.new.end))
        }
        DiffKind::Change => {
            sink.set_address(Address::Lines {
                start: old.start,
                end: old.end,
            })?;
            sink.write_selection(find_lines(new, directive.new.start, directive.new.end))
        }
        DiffKind::Delete => {
            sink.set_address(Address::Lines {
                start: old.start,
                end: old.end,
            })?;
            sink.write_selection(&[])
        }
    }
}
