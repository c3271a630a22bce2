//! Save events and the window control task.
//!
//! A save event names the window and file that were written. Events come
//! either from an editor's event log (one `<window> <op> <path>` line per
//! event) or from filesystem notifications.

mod control;
mod fs;
mod ledger;
mod log_stream;

use crate::buffer::WindowId;
use crate::error::Result;
use std::path::PathBuf;

pub use control::{run_control, ControlCommand, ControlExit};
pub use fs::FsEventSource;
pub use ledger::DigestLedger;
pub use log_stream::LogEventSource;

/// Operation name of a save.
pub const PUT: &str = "put";

/// One notification from the editor or filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveEvent {
    /// Window showing the file.
    pub window: WindowId,
    /// Operation, e.g. `put`, `new`, `del`.
    pub op: String,
    /// The file concerned.
    pub path: PathBuf,
}

impl SaveEvent {
    /// A `put` event for `path`.
    pub fn put(window: WindowId, path: impl Into<PathBuf>) -> Self {
        Self {
            window,
            op: PUT.to_string(),
            path: path.into(),
        }
    }

    /// Returns true for saves.
    pub fn is_put(&self) -> bool {
        self.op == PUT
    }
}

/// A blocking stream of events.
pub trait EventSource {
    /// Wait for the next event; `Ok(None)` when the stream has ended.
    fn next_event(&mut self) -> Result<Option<SaveEvent>>;
}
