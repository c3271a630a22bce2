//! Digests of file contents fmtsplice wrote itself.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Shared map from file to the SHA-256 of its last known contents.
///
/// The filesystem watcher consults it to tell a user's save from the write
/// that replaying a diff produces, and from repeated notifications of one
/// save.
#[derive(Debug, Clone, Default)]
pub struct DigestLedger {
    digests: Arc<Mutex<HashMap<PathBuf, String>>>,
}

impl DigestLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember `contents` as the current state of `path`.
    pub fn record(&self, path: &Path, contents: &[u8]) {
        let digest = compute_hash(contents);
        if let Ok(mut digests) = self.digests.lock() {
            digests.insert(path.to_path_buf(), digest);
        }
    }

    /// Returns true when `contents` matches what was last recorded for `path`.
    pub fn is_current(&self, path: &Path, contents: &[u8]) -> bool {
        let digest = compute_hash(contents);
        self.digests
            .lock()
            .map(|digests| digests.get(path) == Some(&digest))
            .unwrap_or(false)
    }

    /// Record `contents` and report whether they are new.
    pub fn observe(&self, path: &Path, contents: &[u8]) -> bool {
        if self.is_current(path, contents) {
            return false;
        }
        self.record(path, contents);
        true
    }
}

/// Compute SHA-256 hash of file contents.
fn compute_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let result = hasher.finalize();
    format!("{:x}", result)
}
