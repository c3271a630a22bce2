//! Shared report buffer.
//!
//! Formatter diagnostics, test output and window notices all land in one
//! report region. Several threads write to it (the save-event loop, the
//! control task and the stdout/stderr pumps of running commands), so every
//! operation on the underlying window holds one mutex for its full duration.

mod window;

use crate::error::{FmtspliceError, Result};
use regex::bytes::Regex;
use std::io;
use std::sync::{Mutex, OnceLock};

pub use window::{ConsoleWindow, FileWindow, MemoryWindow};

/// The surface a [`ReportSink`] writes to.
pub trait ReportWindow: Send {
    /// Remove everything from the window.
    fn clear(&mut self) -> io::Result<()>;

    /// Append bytes at the end of the window.
    fn append(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Clear the window's modified flag.
    fn mark_clean(&mut self) -> io::Result<()>;
}

/// Mutex-guarded handle on the report window.
pub struct ReportSink {
    window: Mutex<Box<dyn ReportWindow>>,
}

impl ReportSink {
    /// Wrap `window`.
    pub fn new(window: impl ReportWindow + 'static) -> Self {
        Self {
            window: Mutex::new(Box::new(window)),
        }
    }

    /// Empty the report and mark it clean.
    pub fn clear(&self) -> Result<()> {
        self.with_window(|w| {
            w.clear()?;
            w.mark_clean()
        })
    }

    /// Append `bytes` with terminal control sequences removed, then mark clean.
    ///
    /// Returns the number of input bytes consumed, stripped ones included.
    pub fn write_bytes(&self, bytes: &[u8]) -> Result<usize> {
        let stripped = strip_terminal(bytes);
        self.with_window(|w| {
            w.append(&stripped)?;
            w.mark_clean()
        })?;
        Ok(bytes.len())
    }

    /// Append a string.
    pub fn write_str(&self, text: &str) -> Result<()> {
        self.write_bytes(text.as_bytes()).map(|_| ())
    }

    /// Mark the window clean without writing.
    pub fn mark_clean(&self) -> Result<()> {
        self.with_window(|w| w.mark_clean())
    }

    fn with_window(&self, op: impl FnOnce(&mut dyn ReportWindow) -> io::Result<()>) -> Result<()> {
        let mut guard = self
            .window
            .lock()
            .map_err(|_| FmtspliceError::Other("report window lock poisoned".to_string()))?;
        op(guard.as_mut()).map_err(FmtspliceError::Report)
    }
}

impl io::Write for &ReportSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_bytes(buf).map_err(io::Error::other)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn terminal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // A character (or a stray non-UTF-8 byte) followed by backspace, or an
    // ANSI CSI sequence.
    RE.get_or_init(|| {
        Regex::new(r"(?:.|(?-u:[^\n]))\x08|\x1b\[[0-9;?]+[A-Za-z]")
            .expect("terminal pattern is valid")
    })
}

/// Remove backspace overstrikes and ANSI CSI sequences.
pub fn strip_terminal(bytes: &[u8]) -> Vec<u8> {
    terminal_re().replace_all(bytes, &b""[..]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;

    #[test]
    fn test_strip_ansi_color() {
        assert_eq!(strip_terminal(b"\x1b[31mFAIL\x1b[0m ok"), b"FAIL ok");
        assert_eq!(strip_terminal(b"\x1b[?25lhidden"), b"hidden");
    }

    #[test]
    fn test_strip_overstrike() {
        assert_eq!(strip_terminal(b"b\x08bo\x08ol\x08ld\x08d"), b"bold");
        assert_eq!(strip_terminal(b"_\x08x"), b"x");
    }

    #[test]
    fn test_strip_multibyte_overstrike() {
        assert_eq!(strip_terminal("\u{e9}\x08e".as_bytes()), b"e");
        assert_eq!(strip_terminal("caf\u{e9}\x08\u{e9}!".as_bytes()), "caf\u{e9}!".as_bytes());
        assert_eq!(strip_terminal(b"\xe9\x08x"), b"x");
        assert_eq!(strip_terminal("na\u{ef}ve\n".as_bytes()), "na\u{ef}ve\n".as_bytes());
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(strip_terminal(b"ok  \tpkg\t0.01s\n"), b"ok  \tpkg\t0.01s\n");
    }

    #[test]
    fn test_write_counts_stripped_bytes() {
        let window = MemoryWindow::new();
        let sink = ReportSink::new(window.clone());
        let n = sink.write_bytes(b"\x1b[1mhi\x1b[0m\n").unwrap();
        assert_eq!(n, 11);
        assert_eq!(window.contents(), b"hi\n");
        assert!(!window.is_dirty());
    }

    #[test]
    fn test_clear() {
        let window = MemoryWindow::new();
        let sink = ReportSink::new(window.clone());
        sink.write_str("old output\n").unwrap();
        sink.clear().unwrap();
        sink.write_str("$\n").unwrap();
        assert_eq!(window.text(), "$\n");
    }

    #[test]
    fn test_io_write() {
        let window = MemoryWindow::new();
        let sink = ReportSink::new(window.clone());
        writeln!(&sink, "$ {} {}", "go", "test").unwrap();
        assert_eq!(window.text(), "$ go test\n");
    }

    #[test]
    fn test_concurrent_writers_do_not_interleave_within_a_write() {
        let window = MemoryWindow::new();
        let sink = Arc::new(ReportSink::new(window.clone()));
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let sink = Arc::clone(&sink);
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        sink.write_str(&format!("writer-{}-line\n", i)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let text = window.text();
        assert_eq!(text.lines().count(), 200);
        assert!(text
            .lines()
            .all(|l| l.starts_with("writer-") && l.ends_with("-line")));
    }
}
