use miette::Diagnostic;
use thiserror::Error;

use crate::index::ScriptVersion;

/// Main error type for scriptmap operations
#[derive(Error, Diagnostic, Debug)]
pub enum ScriptError {
    #[error("IO error: {0}")]
    #[diagnostic(code(scriptmap::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(scriptmap::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(scriptmap::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Script version {found} is older than the expected {expected}")]
    #[diagnostic(
        code(scriptmap::version),
        help("The script resources are missing or outdated; deploy a newer script file")
    )]
    VersionMismatch {
        expected: ScriptVersion,
        found: ScriptVersion,
    },

    #[error("No scripts found: {message}")]
    #[diagnostic(code(scriptmap::not_found))]
    NotFound {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Build error: {message}")]
    #[diagnostic(code(scriptmap::build))]
    Build {
        message: String,
        #[help]
        help: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, ScriptError>;
