//! Byte spans into a scanned text buffer.
//!
//! Pragmas never own their text: they carry spans into the buffer they were
//! scanned from, and resolve them to `&str` on demand.

use std::fmt;

/// Where a span starts, as 1-based line and character column.
///
/// Displays as `line:column`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open byte range `start..end` into a text buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Byte length of the span.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve the span against the buffer it was taken from.
    pub fn slice<'t>(&self, text: &'t str) -> &'t str {
        &text[self.start..self.end]
    }

    /// Shrink the span so that it excludes leading and trailing whitespace.
    pub fn trim(self, text: &str) -> Span {
        let slice = self.slice(text);
        let leading = slice.len() - slice.trim_start().len();
        let trailing = slice.len() - slice.trim_end().len();
        if leading == slice.len() {
            return Span::new(self.start, self.start);
        }
        Span::new(self.start + leading, self.end - trailing)
    }

    /// Line and column of the span start. `\r\n` and lone `\r` each end one
    /// line, matching what the pragma scanner treats as a line break.
    pub fn position(&self, text: &str) -> Position {
        let head = &text[..self.start.min(text.len())];
        let mut position = Position { line: 1, column: 1 };
        let mut chars = head.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\r' if chars.peek() == Some(&'\n') => {}
                '\n' | '\r' => position = Position { line: position.line + 1, column: 1 },
                _ => position.column += 1,
            }
        }
        position
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(text: &str, offset: usize) -> String {
        Span::new(offset, offset).position(text).to_string()
    }

    #[test]
    fn test_position_counts_lines_and_chars() {
        let text = "hello\nwörld";

        assert_eq!(at(text, 0), "1:1");
        assert_eq!(at(text, 5), "1:6");
        assert_eq!(at(text, 6), "2:1");
        assert_eq!(at(text, text.len()), "2:6");
    }

    #[test]
    fn test_position_line_breaks() {
        let text = "a\r\nb\rc\n";

        assert_eq!(at(text, 3), "2:1");
        assert_eq!(at(text, 5), "3:1");
        assert_eq!(at(text, text.len()), "4:1");
        assert_eq!(at("", 0), "1:1");
    }

    #[test]
    fn test_span_trim() {
        let source = "--@query  Name  \n";
        let span = Span::new(8, 16).trim(source);

        assert_eq!(span, Span::new(10, 14));
        assert_eq!(span.slice(source), "Name");
    }

    #[test]
    fn test_span_trim_blank() {
        let source = "a   \n  b";
        let span = Span::new(1, 7).trim(source);

        assert!(span.is_empty());
        assert_eq!(span.start, 1);
    }
}
