//! Concrete report windows.

use super::ReportWindow;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Writes the report to standard output.
///
/// Clearing prints a blank separator line since a terminal cannot be rewound.
#[derive(Debug, Default)]
pub struct ConsoleWindow;

impl ReportWindow for ConsoleWindow {
    fn clear(&mut self) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(b"\n")?;
        out.flush()
    }

    fn append(&mut self, bytes: &[u8]) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(bytes)?;
        out.flush()
    }

    fn mark_clean(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Keeps the report in a file that is truncated on every clear.
#[derive(Debug)]
pub struct FileWindow {
    path: PathBuf,
    file: File,
}

impl FileWindow {
    /// Create (or truncate) the report file at `path`.
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }
}

impl ReportWindow for FileWindow {
    fn clear(&mut self) -> io::Result<()> {
        self.file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        Ok(())
    }

    fn append(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.file.write_all(bytes)
    }

    fn mark_clean(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    contents: Vec<u8>,
    dirty: bool,
}

/// In-memory window; clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryWindow {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryWindow {
    /// Create an empty window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the contents.
    pub fn contents(&self) -> Vec<u8> {
        self.lock().contents.clone()
    }

    /// Contents decoded lossily as UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.lock().contents).into_owned()
    }

    /// Whether the window was modified since it was last marked clean.
    pub fn is_dirty(&self) -> bool {
        self.lock().dirty
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ReportWindow for MemoryWindow {
    fn clear(&mut self) -> io::Result<()> {
        let mut state = self.lock();
        state.contents.clear();
        state.dirty = true;
        Ok(())
    }

    fn append(&mut self, bytes: &[u8]) -> io::Result<()> {
        let mut state = self.lock();
        state.contents.extend_from_slice(bytes);
        state.dirty = true;
        Ok(())
    }

    fn mark_clean(&mut self) -> io::Result<()> {
        self.lock().dirty = false;
        Ok(())
    }
}
