//! Check command implementation.
//!
//! Loads scripts with a minimum version, as an application would at startup.

use std::path::PathBuf;

use clap::Args;

use crate::discovery::load;
use crate::error::{Result, ScriptError};
use crate::index::ScriptVersion;
use crate::output::{count, Printer};

/// Fail unless the scripts are at least a given version
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Script file, path or wildcard pattern
    pub file: String,

    /// Minimum acceptable version (default: the manifest's min_version)
    #[arg(long)]
    pub min_version: Option<ScriptVersion>,

    /// Project directory holding scriptmap.yaml
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
}

pub fn run(args: CheckArgs, printer: &Printer) -> Result<()> {
    let mut options = super::load_options(&args.root, Some(&args.file))?;
    if args.min_version.is_some() {
        options.expected_version = args.min_version;
    }

    let expected = options.expected_version.ok_or_else(|| ScriptError::Parse {
        message: "no minimum version to check against".to_string(),
        help: Some("Pass --min-version or set min_version in scriptmap.yaml".to_string()),
    })?;

    let index = load(&options)?;

    printer.success(
        "Checked",
        &format!(
            "{} at version {} {}",
            count(index.len(), "script"),
            index.version(),
            printer.dim(&format!("(>= {})", expected))
        ),
    );
    Ok(())
}
