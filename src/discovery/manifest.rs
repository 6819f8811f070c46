//! Project manifest (scriptmap.yaml) parsing.
//!
//! The manifest records how a project's scripts are loaded: which file name
//! or pattern to look for, the minimum acceptable version, and extra
//! directories probed before the process context.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScriptError};
use crate::index::ScriptVersion;

use super::loader::LoadOptions;
use super::sources::Package;

/// Project manifest loaded from scriptmap.yaml.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Script file name or wildcard pattern; default names when unset.
    pub scripts: Option<String>,

    /// Loads fail when the scripts are older than this.
    pub min_version: Option<ScriptVersion>,

    /// Keep custom pragmas in the loaded index.
    pub collect_pragmas: bool,

    /// Directories probed before the process context, relative to the
    /// manifest.
    pub directories: Vec<PathBuf>,
}

impl Manifest {
    /// Load manifest from a scriptmap.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ScriptError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read manifest: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse manifest from YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| ScriptError::Parse {
            message: format!("Invalid manifest: {}", e),
            help: Some("Check scriptmap.yaml syntax".to_string()),
        })
    }

    /// Build load options, resolving directories against `root`.
    ///
    /// Each directory becomes a package named after its last component.
    pub fn load_options(&self, root: &Path) -> LoadOptions {
        let mut options = LoadOptions::new().collecting_pragmas(self.collect_pragmas);
        options.file_name = self.scripts.clone();
        options.expected_version = self.min_version;

        for directory in &self.directories {
            let directory = root.join(directory);
            let name = directory
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "scripts".to_string());
            options = options.with_package(Package::new(name).with_directory(directory));
        }

        options
    }
}
