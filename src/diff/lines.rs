//! Byte-exact line extraction.

/// Return lines `start..=end` (1-based) of `text`, newlines included.
///
/// Lines end at `\n` only; trailing content without a final newline still
/// counts as a line. Spans past the end clamp to what exists.
pub fn find_lines(text: &[u8], start: usize, end: usize) -> &[u8] {
    let mut start = start.saturating_sub(1);
    let mut end = end;
    let mut i = 0;

    while i < text.len() && start > 0 {
        if text[i] == b'\n' {
            start -= 1;
            end = end.saturating_sub(1);
        }
        i += 1;
    }
    let start_byte = i;

    while i < text.len() && end > 0 {
        if text[i] == b'\n' {
            end -= 1;
        }
        i += 1;
    }

    &text[start_byte..i]
}
