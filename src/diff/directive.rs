//! Summary lines: `<old><a|c|d><new>`.

use super::span::LineSpan;
use crate::error::{FmtspliceError, Result};
use std::fmt;

/// What a directive does to the old text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffKind {
    /// Insert new lines after an old line (`a`).
    Append,
    /// Replace old lines with new lines (`c`).
    Change,
    /// Remove old lines (`d`).
    Delete,
}

impl DiffKind {
    /// Map an operator byte to its kind.
    pub fn from_op(op: u8) -> Option<DiffKind> {
        match op {
            b'a' => Some(DiffKind::Append),
            b'c' => Some(DiffKind::Change),
            b'd' => Some(DiffKind::Delete),
            _ => None,
        }
    }

    /// The operator character used in summaries.
    pub fn op(self) -> char {
        match self {
            DiffKind::Append => 'a',
            DiffKind::Change => 'c',
            DiffKind::Delete => 'd',
        }
    }
}

/// One edit derived from a summary line.
///
/// `old` is numbered against the original text, `new` against the
/// reformatted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffDirective {
    /// Operation kind.
    pub kind: DiffKind,
    /// Lines of the original text.
    pub old: LineSpan,
    /// Lines of the reformatted text.
    pub new: LineSpan,
}

impl fmt::Display for DiffDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.old, self.kind.op(), self.new)
    }
}

/// Returns true for lines that belong to a hunk body rather than its header.
pub fn is_detail_line(line: &str) -> bool {
    matches!(line.as_bytes().first(), Some(b'<' | b'-' | b'>' | b'\\'))
}

/// Parse one summary line.
///
/// The first `a`, `c` or `d` splits the old span from the new span.
/// A literal `0` (`0a1`, `1,2d0`) is a real position, not the `{0,0}`
/// parse-failure sentinel, so edits at the top of the file are applied.
///
/// # Returns
/// * `Ok(Some(directive))` - a usable directive
/// * `Ok(None)` - a span could not be parsed; the directive is skipped
/// * `Err(FmtspliceError::DiffParse)` - no operator on the line
pub fn parse_directive(line: &str) -> Result<Option<DiffDirective>> {
    let Some((at, kind)) = line
        .bytes()
        .enumerate()
        .find_map(|(i, b)| DiffKind::from_op(b).map(|kind| (i, kind)))
    else {
        return Err(FmtspliceError::DiffParse {
            line: line.to_string(),
        });
    };

    let old = LineSpan::parse(&line[..at]);
    let new = LineSpan::parse(&line[at + 1..]);
    match (old, new) {
        (Some(old), Some(new)) => Ok(Some(DiffDirective { kind, old, new })),
        _ => Ok(None),
    }
}

/// The directives of one diff summary, in the order the diff tool emitted them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffSet {
    directives: Vec<DiffDirective>,
}

impl DiffSet {
    /// Parse a whole summary, skipping blank and detail lines.
    ///
    /// Fails on the first line that has no operator.
    pub fn parse(summary: &str) -> Result<DiffSet> {
        let mut directives = Vec::new();
        for line in summary.lines() {
            if line.is_empty() || is_detail_line(line) {
                continue;
            }
            if let Some(directive) = parse_directive(line)? {
                directives.push(directive);
            }
        }
        Ok(Self { directives })
    }

    /// Borrow the directives in emission order.
    pub fn directives(&self) -> &[DiffDirective] {
        &self.directives
    }

    /// Number of directives.
    pub fn len(&self) -> usize {
        self.directives.len()
    }

    /// Returns true when there is nothing to replay.
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Directives sorted by descending old start line.
    ///
    /// Applying them in this order keeps every pending directive's line
    /// numbers valid.
    pub fn in_replay_order(&self) -> Vec<DiffDirective> {
        let mut ordered: Vec<DiffDirective> = self.directives.iter().rev().copied().collect();
        ordered.sort_by_key(|d| std::cmp::Reverse(d.old.start));
        ordered
    }
}
