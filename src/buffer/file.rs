//! Buffers backed by files on disk.

use super::{Address, BufferHost, EditSink, RopeBuffer, WindowId};
use crate::error::{FmtspliceError, Result};
use crate::watch::DigestLedger;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// A [`RopeBuffer`] loaded from `path`, written back by [`EditSink::commit`].
///
/// Commits go through a sibling temp file, fsync and rename so a reader never
/// sees a half-written file.
#[derive(Debug)]
pub struct FileBuffer {
    path: PathBuf,
    buffer: RopeBuffer,
    ledger: Option<DigestLedger>,
}

impl FileBuffer {
    /// Load `path` into memory.
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| FmtspliceError::io(path, e))?;
        let text = std::str::from_utf8(&bytes).map_err(|source| FmtspliceError::NotText {
            path: path.to_path_buf(),
            source,
        })?;
        let buffer = RopeBuffer::from_text(text);
        Ok(Self {
            path: path.to_path_buf(),
            buffer,
            ledger: None,
        })
    }

    /// Record every commit in `ledger` so the file watcher can ignore it.
    pub fn with_ledger(mut self, ledger: DigestLedger) -> Self {
        self.ledger = Some(ledger);
        self
    }
}

impl EditSink for FileBuffer {
    fn set_address(&mut self, address: Address) -> Result<()> {
        self.buffer.set_address(address)
    }

    fn write_selection(&mut self, content: &[u8]) -> Result<()> {
        self.buffer.write_selection(content)
    }

    fn set_undo_mark(&mut self, enabled: bool) -> Result<()> {
        self.buffer.set_undo_mark(enabled)
    }

    fn mark_clean(&mut self) -> Result<()> {
        self.buffer.mark_clean()
    }

    fn commit(&mut self) -> Result<()> {
        if !self.buffer.is_modified() {
            return Ok(());
        }
        let bytes = self.buffer.to_bytes();
        if let Some(ledger) = &self.ledger {
            ledger.record(&self.path, &bytes);
        }
        write_atomic(&self.path, &bytes, "fmtsplice")?;
        log::debug!("committed {} bytes to {}", bytes.len(), self.path.display());
        self.buffer.mark_clean()
    }
}

/// Opens saved files as [`FileBuffer`]s; the window id is ignored.
#[derive(Debug, Clone, Default)]
pub struct FileBufferHost {
    ledger: Option<DigestLedger>,
}

impl FileBufferHost {
    /// Create a host without self-write tracking.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a host whose buffers record their commits in `ledger`.
    pub fn with_ledger(ledger: DigestLedger) -> Self {
        Self {
            ledger: Some(ledger),
        }
    }
}

impl BufferHost for FileBufferHost {
    fn open(&self, window: WindowId, path: &Path) -> Result<Box<dyn EditSink>> {
        log::debug!("opening buffer for window {} ({})", window, path.display());
        let mut buffer = FileBuffer::open(path)?;
        if let Some(ledger) = &self.ledger {
            buffer = buffer.with_ledger(ledger.clone());
        }
        Ok(Box::new(buffer))
    }
}

fn write_atomic(file_path: &Path, content: &[u8], suffix: &str) -> Result<()> {
    let temp_path = temp_path_for(file_path, suffix)?;
    let mut temp_file = File::create(&temp_path).map_err(|e| FmtspliceError::io(&temp_path, e))?;
    temp_file.write_all(content)?;
    temp_file.sync_all()?;
    std::fs::rename(&temp_path, file_path).map_err(|e| FmtspliceError::io(file_path, e))?;
    Ok(())
}

fn temp_path_for(file_path: &Path, suffix: &str) -> Result<PathBuf> {
    let file_dir = file_path
        .parent()
        .ok_or_else(|| FmtspliceError::Other("File has no parent directory".to_string()))?;
    let file_name = file_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("tmp");
    Ok(file_dir.join(format!(".{}.{}.tmp", file_name, suffix)))
}
