//! fmtsplice: reformat-on-save with minimal buffer edits.
//!
//! When a watched file is saved, fmtsplice runs the formatter on it, diffs
//! the result against the file, and replays the diff as line-range edits on
//! the open buffer instead of overwriting it. Build and test output for the
//! file's package is then collected into a shared report.

#![warn(missing_docs)]

pub mod buffer;
pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod replay;
pub mod report;
pub mod session;
pub mod tools;
pub mod watch;

/// Re-export common error types for convenience.
pub use error::{FmtspliceError, Result};

/// Re-export the session for convenience.
pub use session::Session;

/// fmtsplice version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
