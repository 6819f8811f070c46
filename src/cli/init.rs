//! Init command implementation.
//!
//! Generates a `scriptmap.yaml` manifest from the script files found in a
//! project directory.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use walkdir::WalkDir;

use crate::discovery::{ParsedSource, MANIFEST_FILENAME, SCRIPT_EXTENSION};
use crate::error::{Result, ScriptError};
use crate::index::ScriptVersion;
use crate::output::{count, display_path, Printer};

/// Initialize a scriptmap project by generating a scriptmap.yaml manifest
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to scan (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing scriptmap.yaml
    #[arg(long)]
    pub force: bool,
}

/// What a scan of the project turned up.
#[derive(Debug, Default)]
struct Survey {
    files: usize,
    directories: BTreeSet<String>,
    version: Option<ScriptVersion>,
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<()> {
    let manifest_path = args.path.join(MANIFEST_FILENAME);

    if manifest_path.exists() && !args.force {
        return Err(ScriptError::Build {
            message: format!("{} already exists", MANIFEST_FILENAME),
            help: Some("Use --force to overwrite".to_string()),
        });
    }

    printer.status("Scanning", &display_path(&args.path));
    let survey = survey(&args.path);

    // Build YAML manually for clean formatting
    let mut yaml = String::new();
    yaml.push_str("# Script file name or wildcard pattern\n");
    yaml.push_str("scripts: \"*.sql\"\n");

    if let Some(version) = survey.version {
        yaml.push_str(&format!("min_version: \"{}\"\n", version));
    }
    yaml.push_str("collect_pragmas: false\n");

    if !survey.directories.is_empty() {
        yaml.push_str("directories:\n");
        for dir in &survey.directories {
            yaml.push_str(&format!("  - \"{}\"\n", dir));
        }
    }

    fs::write(&manifest_path, &yaml).map_err(|e| ScriptError::Io {
        path: manifest_path.clone(),
        message: format!("Failed to write manifest: {}", e),
    })?;

    if !survey.directories.is_empty() {
        let dirs: Vec<&str> = survey.directories.iter().map(|s| s.as_str()).collect();
        printer.info("Discovered", &dirs.join(", "));
    }

    printer.success(
        "Created",
        &format!(
            "{} ({} found)",
            MANIFEST_FILENAME,
            count(survey.files, "script file")
        ),
    );

    Ok(())
}

/// Find script files below `root` that declare at least one script.
fn survey(root: &Path) -> Survey {
    let mut survey = Survey::default();

    let files = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(SCRIPT_EXTENSION))
        });

    for entry in files {
        let Ok(text) = fs::read_to_string(entry.path()) else {
            continue;
        };
        let parsed = ParsedSource::parse(&text);
        if parsed.scripts.is_empty() {
            continue;
        }

        survey.files += 1;
        survey.version = survey.version.max(parsed.version);

        if let Some(parent) = entry.path().parent() {
            let relative = parent.strip_prefix(root).unwrap_or(parent);
            if relative != Path::new("") {
                survey.directories.insert(format!("{}/", relative.display()));
            }
        }
    }

    survey
}
