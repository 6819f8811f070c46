//! Script discovery and loading.
//!
//! Scripts are looked up in one or more resolution contexts (packages, then
//! the running process), either by exact file name or by wildcard pattern.
//! A project may pin these choices in a `scriptmap.yaml` manifest.
//!
//! # Example
//!
//! ```ignore
//! use scriptmap::discovery::{load, LoadOptions};
//!
//! let index = load(&LoadOptions::new().with_file_name("Queries.sql"))?;
//! println!("{} scripts from {}", index.len(), index.source());
//! ```

pub mod glob;
mod loader;
mod manifest;
mod sources;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::index::ScriptIndex;

pub use loader::{LoadOptions, Loader, ParsedSource, DEFAULT_FILE_NAME, SCRIPT_EXTENSION};
pub use manifest::Manifest;
pub use sources::{
    EmbeddedResources, Environment, Package, ResolutionContext, ResourceProvider, TextDecoder,
    Utf8Decoder,
};

/// The name of the manifest file.
pub const MANIFEST_FILENAME: &str = "scriptmap.yaml";

/// Load scripts from every context in `options`, then check the version.
///
/// Fails only when `expected_version` is set and the loaded scripts are
/// older.
pub fn load(options: &LoadOptions) -> Result<ScriptIndex> {
    let environment = options.environment.clone().unwrap_or_else(Environment::detect);
    let mut loader = Loader::new()
        .with_environment(environment)
        .with_file_name(options.file_name.clone())
        .collecting_pragmas(options.collects_pragmas);

    for context in options.resolution_order() {
        loader.set_context(context);
        loader.try_load_scripts();
    }

    let index = loader.get_script_map();
    debug!(scripts = index.len(), version = %index.version(), "scripts loaded");

    if let Some(expected) = options.expected_version {
        index.check_version(expected)?;
    }
    Ok(index)
}

/// A project's manifest, if it has one.
#[derive(Debug)]
pub struct Project {
    /// The project root directory.
    pub root: PathBuf,

    /// The loaded manifest (default if no scriptmap.yaml found).
    pub manifest: Manifest,

    /// Whether a scriptmap.yaml manifest was found.
    pub has_manifest: bool,
}

impl Project {
    /// Load options described by the manifest.
    pub fn load_options(&self) -> LoadOptions {
        self.manifest.load_options(&self.root)
    }
}

/// Look for a `scriptmap.yaml` manifest in a project directory.
pub fn discover(root: impl AsRef<Path>) -> Result<Project> {
    let root = root.as_ref().to_path_buf();

    let manifest_path = root.join(MANIFEST_FILENAME);
    let (manifest, has_manifest) = if manifest_path.exists() {
        (Manifest::load(&manifest_path)?, true)
    } else {
        (Manifest::default(), false)
    };

    Ok(Project {
        root,
        manifest,
        has_manifest,
    })
}
