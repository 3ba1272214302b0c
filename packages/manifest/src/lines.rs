//! Line tokenizer.
//!
//! Every later stage addresses the manifest by line index, so the tokenizer
//! never drops a line: blank lines stay in place as empty strings. Only
//! leading and trailing whitespace (including a stray `\r`) is removed.

/// Splits `text` into trimmed lines, preserving blank lines and order.
///
/// Empty input yields an empty sequence.
#[must_use]
pub fn tokenize(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n').map(str::trim).collect()
}

/// Returns the index of the first line at or after `from` that contains
/// `needle`.
#[must_use]
pub fn find_from(lines: &[&str], from: usize, needle: &str) -> Option<usize> {
    lines
        .iter()
        .enumerate()
        .skip(from)
        .find_map(|(i, line)| line.contains(needle).then_some(i))
}

/// Exclusive end index of a window of `len` lines starting at `from`,
/// clamped to the end of `lines`.
#[must_use]
pub fn window_end(lines: &[&str], from: usize, len: usize) -> usize {
    from.saturating_add(len).min(lines.len())
}
