//! Editable buffers that diff directives are replayed against.
//!
//! The replayer only needs line-addressed selection, selection replacement
//! and undo marking, so any live editor window can be driven through
//! [`EditSink`]. Two implementations ship with the crate:
//! - [`RopeBuffer`]: in-memory text with undo groups
//! - [`FileBuffer`]: a rope loaded from disk and committed back atomically

mod file;
mod rope;

use crate::error::Result;
use std::fmt;
use std::path::Path;

pub use file::{FileBuffer, FileBufferHost};
pub use rope::RopeBuffer;

/// Opaque identifier of an editor window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where the next write lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Address {
    /// Whole lines `start..=end` (1-based), trailing newlines included.
    Lines {
        /// First selected line.
        start: usize,
        /// Last selected line.
        end: usize,
    },
    /// Zero-width point right after line `n`; `After(0)` is the top of the buffer.
    After(usize),
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Lines { start, end } => write!(f, "{},{}", start, end),
            Address::After(line) => write!(f, "{}+#0", line),
        }
    }
}

/// A mutable text surface addressed by line numbers.
pub trait EditSink {
    /// Select `address`; fails when it does not exist in the buffer.
    fn set_address(&mut self, address: Address) -> Result<()>;

    /// Replace the current selection with `content` (empty deletes).
    fn write_selection(&mut self, content: &[u8]) -> Result<()>;

    /// Turn automatic undo marking on (setting a mark now) or off.
    ///
    /// Turning it on and straight back off makes every following edit part of
    /// a single undo step.
    fn set_undo_mark(&mut self, enabled: bool) -> Result<()>;

    /// Clear the buffer's modified flag.
    fn mark_clean(&mut self) -> Result<()>;

    /// Flush edits to wherever the buffer lives. Live windows need nothing.
    fn commit(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Opens the buffer belonging to a saved file.
pub trait BufferHost {
    /// Open `path` as shown in `window`.
    fn open(&self, window: WindowId, path: &Path) -> Result<Box<dyn EditSink>>;
}
