//! scriptmap - named SQL scripts from pragma-annotated files
//!
//! A library for loading SQL scripts declared with `--@` pragma comments into
//! an immutable, case-insensitive index, plus a command-line tool for
//! inspecting script files.

pub mod cli;
pub mod discovery;
pub mod error;
pub mod index;
pub mod logging;
pub mod output;
pub mod parser;
pub mod script;

pub use discovery::{
    discover, load, EmbeddedResources, Environment, LoadOptions, Loader, Manifest, Package,
    ResolutionContext, ResourceProvider, TextDecoder, Utf8Decoder,
};
pub use error::{Result, ScriptError};
pub use index::{ScriptIndex, ScriptVersion};
pub use script::{DataType, Parameter, Script, ScriptKind, SemanticType};
