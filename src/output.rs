//! Terminal output for the scriptmap CLI.
//!
//! Status lines go to stderr as a right-aligned verb followed by a message,
//! coloured only when stderr is a terminal. Stdout carries script text and
//! JSON reports.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

use crate::script::Script;

/// Verb column width.
const VERB_WIDTH: usize = 12;

/// Colour of a status verb or an inline fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Work done, or about to be done.
    Done,
    /// Something found or declared.
    Note,
    /// Something missing or suspicious.
    Warn,
    /// Secondary detail.
    Faint,
}

impl Tone {
    fn sgr(self) -> &'static str {
        match self {
            Tone::Done => "32",
            Tone::Note => "36",
            Tone::Warn => "33",
            Tone::Faint => "2",
        }
    }
}

/// Writes status lines to stderr.
#[derive(Debug, Clone, Copy)]
pub struct Printer {
    color: bool,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

impl Printer {
    pub fn new() -> Self {
        Self {
            color: io::stderr().is_terminal(),
        }
    }

    /// A step in progress, e.g. `    Scanning ./sql`.
    pub fn status(&self, verb: &str, message: &str) {
        self.emit(Tone::Done, verb, message);
    }

    /// The outcome of a command.
    pub fn success(&self, verb: &str, message: &str) {
        self.emit(Tone::Done, verb, message);
    }

    pub fn info(&self, verb: &str, message: &str) {
        self.emit(Tone::Note, verb, message);
    }

    pub fn warning(&self, verb: &str, message: &str) {
        self.emit(Tone::Warn, verb, message);
    }

    /// A message under the previous one, with an empty verb column.
    pub fn detail(&self, message: &str) {
        self.emit(Tone::Faint, "", message);
    }

    /// One script as its directive and signature.
    pub fn script(&self, script: &Script) {
        self.info(script.kind.directive(), &script.signature());
    }

    pub fn dim(&self, text: &str) -> String {
        self.paint(Tone::Faint, text)
    }

    pub fn cyan(&self, text: &str) -> String {
        self.paint(Tone::Note, text)
    }

    fn paint(&self, tone: Tone, text: &str) -> String {
        if self.color {
            format!("\x1b[{}m{}\x1b[0m", tone.sgr(), text)
        } else {
            text.to_string()
        }
    }

    fn line(&self, tone: Tone, verb: &str, message: &str) -> String {
        let verb = format!("{verb:>VERB_WIDTH$}");
        if self.color && !verb.trim().is_empty() {
            format!("\x1b[1;{}m{}\x1b[0m {}", tone.sgr(), verb, message)
        } else {
            format!("{} {}", verb, message)
        }
    }

    fn emit(&self, tone: Tone, verb: &str, message: &str) {
        let _ = writeln!(io::stderr().lock(), "{}", self.line(tone, verb, message));
    }
}

/// `count(1, "script")` is "1 script", `count(3, "script")` is "3 scripts".
pub fn count(n: usize, noun: &str) -> String {
    match n {
        1 => format!("1 {noun}"),
        _ => format!("{n} {noun}s"),
    }
}

/// `path` relative to the working directory when it lies below it.
pub fn display_path(path: &Path) -> String {
    let cwd = std::env::current_dir().ok();
    match cwd.as_deref().and_then(|cwd| path.strip_prefix(cwd).ok()) {
        Some(relative) if relative.as_os_str().is_empty() => ".".to_string(),
        Some(relative) => relative.display().to_string(),
        None => path.display().to_string(),
    }
}
