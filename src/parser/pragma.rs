//! Pragma marker scanning.
//!
//! A pragma is a directive comment that starts either a line (`--@name meta`)
//! or an inline block (`/*@ name meta @*/`). The scanner walks the text once,
//! tracking block comments, line comments, quoted strings and `[bracketed]`
//! identifiers, so markers that are commented out or quoted are never reported.
//!
//! ```text
//! --@version 1.2
//! --@query GetUser(@id int)
//! select * from Users where Id = @id;
//! /*@ execute Touch(@id int) @*/ update Users set Seen = 1 where Id = @id;
//! ```

use super::span::{Position, Span};

/// Line marker; only recognized at the start of a line.
pub const MARKER: &str = "--@";
/// Inline block marker opener; may appear mid-line.
pub const ALT_MARKER: &str = "/*@";
/// Inline block marker terminator.
pub const ALT_MARKER_END: &str = "@*/";

/// Directive name of the version pragma.
pub const VERSION: &str = "version";

/// The form a pragma marker was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    /// `--@name meta` at the start of a line.
    Line,
    /// `/*@ name meta @*/` anywhere outside a comment.
    Block,
}

impl MarkerKind {
    /// Length of the opening marker in bytes.
    pub fn width(&self) -> usize {
        match self {
            MarkerKind::Line => MARKER.len(),
            MarkerKind::Block => ALT_MARKER.len(),
        }
    }
}

/// A scanned pragma: directive name, declaration meta and governed body.
///
/// Only valid against the text it was scanned from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pragma<'t> {
    text: &'t str,
    /// Marker form.
    pub marker: MarkerKind,
    /// Byte offset of the marker.
    pub start: usize,
    /// Directive name, e.g. `query`.
    pub name_span: Span,
    /// Declaration text after the name, trimmed.
    pub meta_span: Span,
    /// Text up to the next marker, trimmed.
    pub body_span: Span,
}

impl<'t> Pragma<'t> {
    pub fn name(&self) -> &'t str {
        self.name_span.slice(self.text)
    }

    pub fn meta(&self) -> &'t str {
        self.meta_span.slice(self.text)
    }

    pub fn body(&self) -> &'t str {
        self.body_span.slice(self.text)
    }

    /// Whether this is a `version` directive.
    pub fn is_version(&self) -> bool {
        self.name().eq_ignore_ascii_case(VERSION)
    }

    /// Line and column of the marker.
    pub fn position(&self) -> Position {
        Span::new(self.start, self.start).position(self.text)
    }
}

/// Iterator over the pragmas of a text, in document order.
#[derive(Debug, Clone)]
pub struct PragmaScanner<'t> {
    text: &'t str,
    pending: Option<(usize, MarkerKind)>,
}

impl<'t> PragmaScanner<'t> {
    pub fn new(text: &'t str) -> Self {
        Self {
            text,
            pending: find_marker(text, 0),
        }
    }
}

/// Scan `text` for pragmas.
pub fn scan_pragmas(text: &str) -> PragmaScanner<'_> {
    PragmaScanner::new(text)
}

impl<'t> Iterator for PragmaScanner<'t> {
    type Item = Pragma<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let text = self.text;

        loop {
            let (start, marker) = self.pending.take()?;
            let after = start + marker.width();

            let (meta_end, body_start) = match marker {
                MarkerKind::Line => {
                    let end = line_end(text.as_bytes(), after);
                    (end, end)
                }
                MarkerKind::Block => match text[after..].find(ALT_MARKER_END) {
                    Some(end) => (after + end, after + end + ALT_MARKER_END.len()),
                    None => {
                        // unterminated inline marker
                        self.pending = find_marker(text, after);
                        continue;
                    }
                },
            };

            self.pending = find_marker(text, body_start);

            let name_span = directive_name(text, Span::new(after, meta_end));
            if name_span.is_empty() {
                continue;
            }

            let body_end = self.pending.map_or(text.len(), |(next, _)| next);

            return Some(Pragma {
                text,
                marker,
                start,
                name_span,
                meta_span: Span::new(name_span.end, meta_end).trim(text),
                body_span: Span::new(body_start, body_end).trim(text),
            });
        }
    }
}

/// Find the next pragma marker at or after `from`.
///
/// Markers inside block comments (nestable), line comments or quoted strings
/// are skipped. Quote characters inside a `[bracketed]` identifier do not
/// open a string. An unterminated block comment hides everything after it.
pub fn find_marker(text: &str, from: usize) -> Option<(usize, MarkerKind)> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = from;

    while i < bytes.len() {
        let b = bytes[i];

        if let Some(q) = quote {
            if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }

        let rest = &bytes[i..];

        if depth > 0 {
            if rest.starts_with(b"/*") {
                depth += 1;
                i += 2;
            } else if rest.starts_with(b"*/") {
                depth -= 1;
                i += 2;
            } else {
                i += 1;
            }
            continue;
        }

        if rest.starts_with(MARKER.as_bytes()) && at_line_start(bytes, i) {
            return Some((i, MarkerKind::Line));
        }
        if rest.starts_with(ALT_MARKER.as_bytes()) {
            return Some((i, MarkerKind::Block));
        }

        if rest.starts_with(b"--") {
            i = line_end(bytes, i);
        } else if rest.starts_with(b"/*") {
            depth = 1;
            i += 2;
        } else if b == b'[' {
            i = bracket_end(bytes, i).map_or(i + 1, |end| end + 1);
        } else {
            if b == b'\'' || b == b'"' {
                quote = Some(b);
            }
            i += 1;
        }
    }

    None
}

/// Index of the `]` closing the bracketed identifier opened at `open`.
///
/// `]]` is an escaped bracket. Identifiers do not span lines, so a `[` with
/// no closing bracket on its line is an ordinary character.
fn bracket_end(bytes: &[u8], open: usize) -> Option<usize> {
    let mut i = open + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' | b'\r' => return None,
            b']' if bytes.get(i + 1) == Some(&b']') => i += 2,
            b']' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

fn at_line_start(bytes: &[u8], index: usize) -> bool {
    index == 0 || matches!(bytes[index - 1], b'\n' | b'\r')
}

fn line_end(bytes: &[u8], from: usize) -> usize {
    bytes[from..]
        .iter()
        .position(|&b| b == b'\n' || b == b'\r')
        .map_or(bytes.len(), |end| from + end)
}

/// The directive name: first run of non-blank characters in `header`.
fn directive_name(text: &str, header: Span) -> Span {
    let bytes = text.as_bytes();
    let mut start = header.start;
    while start < header.end && matches!(bytes[start], b' ' | b'\t') {
        start += 1;
    }
    let mut end = start;
    while end < header.end && !bytes[end].is_ascii_whitespace() {
        end += 1;
    }
    Span::new(start, end)
}
