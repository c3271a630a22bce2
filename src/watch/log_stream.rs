//! Editor event log: `<window> <op> <path>` per line.

use super::{EventSource, SaveEvent};
use crate::buffer::WindowId;
use crate::error::{FmtspliceError, Result};
use std::io::BufRead;
use std::path::PathBuf;

/// Reads save events from a line-oriented log such as an editor's event feed.
///
/// Lines that do not parse are logged and skipped.
pub struct LogEventSource<R> {
    reader: R,
    line: String,
}

impl<R: BufRead> LogEventSource<R> {
    /// Read events from `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
        }
    }
}

impl<R: BufRead> EventSource for LogEventSource<R> {
    fn next_event(&mut self) -> Result<Option<SaveEvent>> {
        loop {
            self.line.clear();
            let n = self
                .reader
                .read_line(&mut self.line)
                .map_err(|e| FmtspliceError::EventStream(e.to_string()))?;
            if n == 0 {
                return Ok(None);
            }
            let line = self.line.trim_end_matches(['\n', '\r']);
            if line.trim().is_empty() {
                continue;
            }
            match parse_log_line(line) {
                Some(event) => return Ok(Some(event)),
                None => log::warn!("ignoring malformed event {:?}", line),
            }
        }
    }
}

/// Parse `<window> <op> [path]`; the path may contain spaces.
pub fn parse_log_line(line: &str) -> Option<SaveEvent> {
    let mut parts = line.splitn(3, ' ');
    let window = parts.next()?.parse::<u64>().ok()?;
    let op = parts.next()?.to_string();
    if op.is_empty() {
        return None;
    }
    let path = parts.next().unwrap_or("");
    Some(SaveEvent {
        window: WindowId(window),
        op,
        path: PathBuf::from(path),
    })
}
