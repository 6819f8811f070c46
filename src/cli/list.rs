//! List command implementation.
//!
//! Loads scripts and prints an inventory, or JSON on stdout.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::discovery::load;
use crate::error::{Result, ScriptError};
use crate::index::{ScriptIndex, ScriptVersion};
use crate::output::{count, Printer};
use crate::script::Script;

/// List loaded scripts
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Script file, path or wildcard pattern (default: manifest or default names)
    pub file: Option<String>,

    /// Project directory holding scriptmap.yaml
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Print JSON to stdout
    #[arg(long)]
    pub json: bool,

    /// Collect and show custom pragmas
    #[arg(long)]
    pub pragmas: bool,
}

/// Machine-readable view of an index.
#[derive(Debug, Serialize)]
struct Report<'a> {
    sources: Vec<&'a str>,
    version: ScriptVersion,
    scripts: Vec<&'a Script>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pragmas: BTreeMap<&'a str, &'a [String]>,
}

impl<'a> Report<'a> {
    fn new(index: &'a ScriptIndex) -> Self {
        Self {
            sources: index.sources().collect(),
            version: index.version(),
            scripts: index.sorted_scripts(),
            pragmas: index
                .pragma_names()
                .into_iter()
                .map(|name| (name, index.pragmas(name)))
                .collect(),
        }
    }
}

pub fn run(args: ListArgs, printer: &Printer) -> Result<()> {
    let mut options = super::load_options(&args.root, args.file.as_deref())?;
    options.collects_pragmas |= args.pragmas;

    let index = load(&options)?;

    if args.json {
        let json = serde_json::to_string_pretty(&Report::new(&index)).map_err(|e| {
            ScriptError::Build {
                message: format!("Failed to serialize scripts: {}", e),
                help: None,
            }
        })?;
        println!("{}", json);
        return Ok(());
    }

    if index.is_empty() {
        printer.warning("Empty", "no scripts found");
        return Ok(());
    }

    print_inventory(&index, printer);
    if args.pragmas {
        print_pragmas(&index, printer);
    }

    Ok(())
}

fn print_inventory(index: &ScriptIndex, printer: &Printer) {
    for source in index.sources() {
        printer.status("Loaded", &printer.cyan(source));
    }

    for script in index.sorted_scripts() {
        printer.script(script);
    }

    printer.success(
        "Found",
        &format!(
            "{} {}",
            count(index.len(), "script"),
            printer.dim(&format!("(version {})", index.version()))
        ),
    );
}

fn print_pragmas(index: &ScriptIndex, printer: &Printer) {
    for name in index.pragma_names() {
        let mut values = index.pragmas(name).iter();
        if let Some(first) = values.next() {
            printer.info(name, first);
        }
        for value in values {
            printer.detail(value);
        }
    }
}
