//! In-memory rope buffer.

use super::{Address, EditSink};
use crate::error::{FmtspliceError, Result};
use ropey::Rope;
use std::ops::Range;

/// Text held in a [`Rope`] with acme-style undo marking.
///
/// Lines break on `\n` only.
#[derive(Debug, Clone)]
pub struct RopeBuffer {
    rope: Rope,
    selection: Range<usize>,
    undo_marking: bool,
    undo: Vec<Rope>,
    modified: bool,
}

impl RopeBuffer {
    /// Create a buffer holding `text`.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            selection: 0..0,
            undo_marking: true,
            undo: Vec::new(),
            modified: false,
        }
    }

    /// Current contents.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Current contents as bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.text().into_bytes()
    }

    /// Number of lines, counting a final line without a newline.
    pub fn line_count(&self) -> usize {
        let lines = self.rope.len_lines();
        if self.rope.len_chars() == 0 {
            0
        } else if self.rope.char(self.rope.len_chars() - 1) == '\n' {
            lines - 1
        } else {
            lines
        }
    }

    /// Current selection as a byte range.
    pub fn selection_bytes(&self) -> Range<usize> {
        self.rope.char_to_byte(self.selection.start)..self.rope.char_to_byte(self.selection.end)
    }

    /// Whether anything was written since the last [`EditSink::mark_clean`].
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Number of undo steps available.
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Revert to the most recent undo point. Returns false when there is none.
    pub fn undo(&mut self) -> bool {
        match self.undo.pop() {
            Some(previous) => {
                self.rope = previous;
                self.selection = 0..0;
                self.modified = true;
                true
            }
            None => false,
        }
    }

    fn resolve(&self, address: Address) -> Result<Range<usize>> {
        let lines = self.line_count();
        let out_of_range = || FmtspliceError::InvalidAddress {
            address: address.to_string(),
            lines,
        };
        match address {
            Address::Lines { start, end } => {
                if start == 0 || start > end || end > lines {
                    return Err(out_of_range());
                }
                Ok(self.rope.line_to_char(start - 1)..self.rope.line_to_char(end))
            }
            Address::After(line) => {
                if line > lines {
                    return Err(out_of_range());
                }
                let at = self.rope.line_to_char(line);
                Ok(at..at)
            }
        }
    }
}

impl EditSink for RopeBuffer {
    fn set_address(&mut self, address: Address) -> Result<()> {
        self.selection = self.resolve(address)?;
        Ok(())
    }

    fn write_selection(&mut self, content: &[u8]) -> Result<()> {
        let content = std::str::from_utf8(content)?;
        if self.undo_marking {
            self.undo.push(self.rope.clone());
        }
        let start = self.selection.start;
        self.rope.remove(self.selection.clone());
        self.rope.insert(start, content);
        self.selection = start..start + content.chars().count();
        self.modified = true;
        Ok(())
    }

    fn set_undo_mark(&mut self, enabled: bool) -> Result<()> {
        if enabled {
            self.undo.push(self.rope.clone());
        }
        self.undo_marking = enabled;
        Ok(())
    }

    fn mark_clean(&mut self) -> Result<()> {
        self.modified = false;
        Ok(())
    }
}
