//! Line spans: `N` or `N,M`.

use std::fmt;

/// A 1-based inclusive range of line numbers.
///
/// `{0, 0}` doubles as the "no span" sentinel returned for unparseable text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineSpan {
    /// First line of the span.
    pub start: usize,
    /// Last line of the span (inclusive).
    pub end: usize,
}

impl LineSpan {
    /// The sentinel for "no span".
    pub const ZERO: LineSpan = LineSpan { start: 0, end: 0 };

    /// Create a span covering `start..=end`.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A span covering the single line `line`.
    pub fn line(line: usize) -> Self {
        Self {
            start: line,
            end: line,
        }
    }

    /// Returns true for the `{0, 0}` sentinel.
    pub fn is_zero(&self) -> bool {
        self.start == 0 && self.end == 0
    }

    /// Number of lines covered.
    pub fn len(&self) -> usize {
        if self.end < self.start {
            0
        } else {
            self.end - self.start + 1
        }
    }

    /// Returns true when the span covers no lines.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parse `"N"` or `"N,M"`, logging and returning `None` on failure.
    ///
    /// Unlike [`parse_span`], this keeps a literal `0` (which classic diff
    /// uses for "before the first line") distinct from a parse failure.
    pub fn parse(text: &str) -> Option<LineSpan> {
        let parsed = match text.split_once(',') {
            None => text.parse::<usize>().ok().map(LineSpan::line),
            Some((start, end)) => match (start.parse::<usize>(), end.parse::<usize>()) {
                (Ok(start), Ok(end)) => Some(LineSpan::new(start, end)),
                _ => None,
            },
        };
        if parsed.is_none() {
            log::warn!("cannot parse span {:?}", text);
        }
        parsed
    }
}

impl fmt::Display for LineSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{},{}", self.start, self.end)
        }
    }
}

/// Parse a span, returning [`LineSpan::ZERO`] when the text is malformed.
///
/// Never fails: the caller decides whether a zero span means "skip".
pub fn parse_span(text: &str) -> LineSpan {
    LineSpan::parse(text).unwrap_or(LineSpan::ZERO)
}
