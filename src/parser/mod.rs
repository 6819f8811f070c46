//! Parser modules for pragma-annotated script files.
//!
//! A script file is plain SQL interleaved with pragma comments. Each pragma
//! names a directive and carries a declaration ("meta"); the text after it,
//! up to the next pragma, is its body.
//!
//! # Document Structure
//!
//! - Anything before the first pragma is ignored
//! - `--@query Name(@p int) : bit` declares a script named `Name`
//! - `--@version 1.2` stamps the file with a version
//! - Any other directive is kept as custom pragma metadata
//!
//! # Usage
//!
//! ```ignore
//! use scriptmap::parser::scan_pragmas;
//!
//! let source = std::fs::read_to_string("Scripts.sql")?;
//! for pragma in scan_pragmas(&source) {
//!     println!("{} {}", pragma.name(), pragma.meta());
//! }
//! ```

pub mod cursor;
pub mod meta;
pub mod pragma;
pub mod span;

// Re-export main entry points
pub use meta::{tokenize_meta, MetaToken, MetaTokenKind, MetaTokens};
pub use pragma::{find_marker, scan_pragmas, MarkerKind, Pragma, PragmaScanner};
pub use span::{Position, Span};
