//! Save events from filesystem notifications.

use super::{DigestLedger, EventSource, SaveEvent};
use crate::buffer::WindowId;
use crate::error::Result;
use notify::event::ModifyKind;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};

/// Reports every content change under a directory as a `put` in window 0.
///
/// Several notifications for one save, and the writes fmtsplice itself
/// makes, are collapsed through a [`DigestLedger`]: an event is only
/// produced when the file's contents differ from the last ones seen.
pub struct FsEventSource {
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    pending: VecDeque<PathBuf>,
    ledger: DigestLedger,
}

impl FsEventSource {
    /// Start watching `root` recursively.
    pub fn new(root: &Path, ledger: DigestLedger) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        let mut watcher = RecommendedWatcher::new(tx, Config::default())?;
        watcher.watch(root, RecursiveMode::Recursive)?;
        log::debug!("watching {}", root.display());
        Ok(Self {
            _watcher: watcher,
            rx,
            pending: VecDeque::new(),
            ledger,
        })
    }
}

impl EventSource for FsEventSource {
    fn next_event(&mut self) -> Result<Option<SaveEvent>> {
        loop {
            while let Some(path) = self.pending.pop_front() {
                // Directories and files deleted since the notification fail here.
                let Ok(contents) = std::fs::read(&path) else {
                    continue;
                };
                if self.ledger.observe(&path, &contents) {
                    return Ok(Some(SaveEvent::put(WindowId(0), path)));
                }
            }

            match self.rx.recv() {
                Ok(Ok(event)) => {
                    if is_content_change(&event.kind) {
                        for path in event.paths {
                            if !self.pending.contains(&path) {
                                self.pending.push_back(path);
                            }
                        }
                    }
                }
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => return Ok(None),
            }
        }
    }
}

fn is_content_change(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_)
            | EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Name(_) | ModifyKind::Any)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, DataChange, MetadataKind};

    #[test]
    fn test_content_change_kinds() {
        assert!(is_content_change(&EventKind::Create(CreateKind::File)));
        assert!(is_content_change(&EventKind::Modify(ModifyKind::Data(
            DataChange::Content
        ))));
        assert!(!is_content_change(&EventKind::Modify(ModifyKind::Metadata(
            MetadataKind::Permissions
        ))));
        assert!(!is_content_change(&EventKind::Access(AccessKind::Any)));
    }
}
