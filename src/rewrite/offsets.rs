//! Source positions: parser `(line, column)` to byte offsets, and quote-aware spans.

use crate::parser::is_quote_char;

/// Byte offset of the first character of every line in a source string.
///
/// Parser locations are 1-based lines and 1-based columns counted in
/// characters; `offset` turns them into byte offsets usable for slicing.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut line_starts = vec![0]; // Line 1 starts at offset 0
        for (i, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            source,
            line_starts,
        }
    }

    /// Convert a 1-based `(line, column)` to an absolute byte offset.
    ///
    /// Line 0 or a line past the end maps to 0. A column past the end of the
    /// line maps to the end of that line.
    pub fn offset(&self, line: u64, column: u64) -> usize {
        if line == 0 || line as usize > self.line_starts.len() {
            return 0;
        }
        let line_idx = (line - 1) as usize;
        let line_start = self.line_starts[line_idx];
        let line_end = self
            .line_starts
            .get(line_idx + 1)
            .map(|next| next - 1)
            .unwrap_or(self.source.len());
        let line_text = &self.source[line_start..line_end];

        let chars_in = column.saturating_sub(1) as usize;
        let within = line_text
            .char_indices()
            .nth(chars_in)
            .map(|(i, _)| i)
            .unwrap_or(line_text.len());
        line_start + within
    }
}

/// Span of a reference whose first character is at `start`.
///
/// When `source[start]` opens a delimited identifier the span covers both
/// quote characters: `start..start + text.len() + 2`; otherwise
/// `start..start + text.len()`. The end is clamped to the source length and
/// `None` is returned when no non-empty span remains.
pub fn adjust_for_quotes(source: &str, start: usize, text: &str) -> Option<(usize, usize)> {
    let first = source.get(start..)?.chars().next()?;
    let width = if is_quote_char(first) {
        text.len() + 2
    } else {
        text.len()
    };
    let end = (start + width).min(source.len());
    (start < end).then_some((start, end))
}
