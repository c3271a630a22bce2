//! Classic line-oriented diff summaries.
//!
//! This module understands the output of `diff` in its default ("normal")
//! format: summary lines such as `12,14c10,11`, `5a6,7` or `20,22d19`,
//! each followed by detail lines that start with `<`, `-`, `>` or `\`.
//! Only the summary lines carry information needed to replay an edit; the
//! replacement text itself is taken from the reformatted content by line
//! number.

mod directive;
mod lines;
mod span;

pub use directive::{is_detail_line, parse_directive, DiffDirective, DiffKind, DiffSet};
pub use lines::find_lines;
pub use span::{parse_span, LineSpan};
