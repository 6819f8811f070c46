//! Script loader - resolves sources and merges their scripts.
//!
//! A loader is run once per resolution context. Each run looks for script
//! sources by name (exact mode) or by pattern (wildcard mode) and merges
//! every source that declares at least one script. Scripts are keyed by name
//! without regard to case, so a later source replaces an earlier script with
//! the same name.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::index::{index_key, ScriptIndex, ScriptVersion};
use crate::parser::scan_pragmas;
use crate::script::{declares_script, Script};

use super::glob::{self, common_prefix_len, has_wildcard};
use super::sources::{
    Environment, Package, ResolutionContext, ResourceProvider, TextDecoder, Utf8Decoder,
};

/// Name probed last when no file name is configured.
pub const DEFAULT_FILE_NAME: &str = "Scripts.sql";

/// Extension of script files.
pub const SCRIPT_EXTENSION: &str = "sql";

const SCRIPTS_SUFFIX: &str = ".Scripts.sql";
const RESOURCE_SEPARATORS: &[char] = &['.', '/', '\\'];

/// Options for a complete load.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// File name, path or wildcard pattern; default names when `None`.
    pub file_name: Option<String>,
    /// Minimum acceptable version of the loaded scripts.
    pub expected_version: Option<ScriptVersion>,
    /// Keep custom pragmas in the index.
    pub collects_pragmas: bool,
    /// Contexts to resolve, in order.
    pub contexts: Vec<ResolutionContext>,
    /// Process facts; detected when `None`.
    pub environment: Option<Environment>,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn with_expected_version(mut self, version: ScriptVersion) -> Self {
        self.expected_version = Some(version);
        self
    }

    pub fn collecting_pragmas(mut self, collects: bool) -> Self {
        self.collects_pragmas = collects;
        self
    }

    /// Resolve a package before the process context.
    pub fn with_package(mut self, package: Package) -> Self {
        self.contexts.push(ResolutionContext::Package(package));
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Contexts in resolution order.
    ///
    /// The process context runs last unless it is listed explicitly.
    pub fn resolution_order(&self) -> Vec<ResolutionContext> {
        let mut contexts = self.contexts.clone();
        if !contexts
            .iter()
            .any(|context| matches!(context, ResolutionContext::Process))
        {
            contexts.push(ResolutionContext::Process);
        }
        contexts
    }
}

/// What one source text declares.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParsedSource {
    /// Scripts in document order, duplicates included.
    pub scripts: Vec<Script>,
    /// Highest parseable `version` directive.
    pub version: Option<ScriptVersion>,
    /// Custom pragmas as `(name, meta)`, in document order.
    pub pragmas: Vec<(String, String)>,
}

impl ParsedSource {
    pub fn parse(text: &str) -> Self {
        let mut parsed = Self::default();

        for pragma in scan_pragmas(text) {
            if pragma.is_version() {
                match pragma.meta().parse::<ScriptVersion>() {
                    Ok(version) => parsed.version = parsed.version.max(Some(version)),
                    Err(err) => debug!(at = %pragma.position(), %err, "ignoring version pragma"),
                }
            } else if declares_script(pragma.name()) {
                match Script::from_pragma(&pragma) {
                    Some(script) => {
                        trace!(at = %pragma.position(), kind = %script.kind, name = %script.name, "script");
                        parsed.scripts.push(script);
                    }
                    None => debug!(at = %pragma.position(), directive = pragma.name(), "pragma declares no script"),
                }
            } else {
                trace!(at = %pragma.position(), directive = pragma.name(), "custom pragma");
                parsed
                    .pragmas
                    .push((pragma.name().to_string(), pragma.meta().to_string()));
            }
        }

        parsed
    }
}

/// Accumulates scripts across sources and resolution contexts.
#[derive(Debug)]
pub struct Loader {
    file_name: Option<String>,
    collects_pragmas: bool,
    package: Option<Package>,
    environment: Environment,
    decoder: Box<dyn TextDecoder>,

    scripts: HashMap<String, Script>,
    sources: Vec<String>,
    version: ScriptVersion,
    pragmas: Vec<(String, String)>,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

impl Loader {
    /// Create a loader for the process context of the running executable.
    pub fn new() -> Self {
        Self {
            file_name: None,
            collects_pragmas: false,
            package: None,
            environment: Environment::detect(),
            decoder: Box::new(Utf8Decoder),
            scripts: HashMap::new(),
            sources: Vec::new(),
            version: ScriptVersion::default(),
            pragmas: Vec::new(),
        }
    }

    pub fn with_file_name(mut self, file_name: Option<String>) -> Self {
        self.file_name = file_name;
        self
    }

    pub fn collecting_pragmas(mut self, collects: bool) -> Self {
        self.collects_pragmas = collects;
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_decoder(mut self, decoder: impl TextDecoder + 'static) -> Self {
        self.decoder = Box::new(decoder);
        self
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn set_file_name(&mut self, file_name: Option<String>) {
        self.file_name = file_name;
    }

    pub fn collects_pragmas(&self) -> bool {
        self.collects_pragmas
    }

    pub fn set_collects_pragmas(&mut self, collects: bool) {
        self.collects_pragmas = collects;
    }

    /// Set the package to resolve; `None` selects the process context.
    pub fn set_package(&mut self, package: Option<Package>) {
        self.package = package;
    }

    pub fn set_context(&mut self, context: ResolutionContext) {
        self.package = match context {
            ResolutionContext::Package(package) => Some(package),
            ResolutionContext::Process => None,
        };
    }

    /// Load scripts for the current context.
    ///
    /// Returns whether at least one source contributed.
    pub fn try_load_scripts(&mut self) -> bool {
        let loaded = match self.file_name.clone() {
            Some(pattern) if has_wildcard(&pattern) => self.load_matching(&pattern),
            _ => {
                let mut loaded = 0;
                for candidate in self.candidate_names() {
                    if self.load_candidate(&candidate) {
                        loaded += 1;
                    }
                }
                loaded
            }
        };

        debug!(
            context = self.context_name(),
            sources = loaded,
            "script lookup finished"
        );
        loaded > 0
    }

    /// Merge an in-memory source.
    ///
    /// Returns the number of scripts it declares; a source without scripts
    /// leaves the loader unchanged.
    pub fn load_text(&mut self, label: &str, text: &str) -> usize {
        let parsed = ParsedSource::parse(text);
        let count = parsed.scripts.len();
        debug!(source = label, count, "parsed script source");

        if count == 0 {
            return 0;
        }

        for script in parsed.scripts {
            self.scripts.insert(index_key(&script.name), script);
        }
        if !self.sources.iter().any(|source| source == label) {
            self.sources.push(label.to_string());
        }
        if let Some(version) = parsed.version {
            self.version = self.version.max(version);
        }
        if self.collects_pragmas {
            self.pragmas.extend(parsed.pragmas);
        }

        count
    }

    /// Freeze the loaded scripts into an index.
    pub fn get_script_map(&self) -> ScriptIndex {
        if self.scripts.is_empty() {
            return ScriptIndex::empty();
        }

        let mut pragmas: HashMap<String, Vec<String>> = HashMap::new();
        for (name, meta) in &self.pragmas {
            pragmas.entry(index_key(name)).or_default().push(meta.clone());
        }

        ScriptIndex::new(
            self.scripts.clone(),
            self.sources.join("\n"),
            self.version,
            pragmas,
        )
    }

    fn context_name(&self) -> &str {
        self.package
            .as_ref()
            .map_or("process", |package| package.name.as_str())
    }

    /// File names to probe in exact mode, most specific first.
    fn candidate_names(&self) -> Vec<String> {
        if let Some(name) = self.file_name.as_deref().filter(|name| !name.trim().is_empty()) {
            return vec![name.to_string()];
        }

        let mut names = Vec::new();
        let mut push_stem = |stem: &str| {
            if !stem.trim().is_empty() {
                names.push(format!("{}.{}", stem, SCRIPT_EXTENSION));
                names.push(format!("{}{}", stem, SCRIPTS_SUFFIX));
            }
        };

        if let Some(stem) = self.environment.process_stem() {
            push_stem(&stem);
        }
        if let Some(package) = &self.package {
            push_stem(&package.name);
            if let Some(stem) = package.file_stem.as_deref().filter(|s| !s.trim().is_empty()) {
                names.push(format!("{}.{}", stem, SCRIPT_EXTENSION));
            }
        }
        names.push(DEFAULT_FILE_NAME.to_string());

        let mut seen = HashSet::new();
        names.retain(|name| seen.insert(name.to_lowercase()));
        names
    }

    /// Try the locations for one name, stopping at the first that contributes.
    fn load_candidate(&mut self, name: &str) -> bool {
        let path = Path::new(name);
        if path.is_absolute() {
            return self.load_file(path);
        }

        if let Some(resources) = self.resources() {
            let found = resources
                .resource_names()
                .into_iter()
                .find(|resource| ends_with_ignore_case(resource, name));
            if let Some(resource) = found {
                trace!(resource = resource.as_str(), "probing resource");
                if let Some(bytes) = resources.open_resource(&resource) {
                    if self.load_bytes(&resource, &bytes) {
                        return true;
                    }
                }
            }
        }

        for dir in self.search_dirs() {
            let path = dir.join(name);
            trace!(path = %path.display(), "probing file");
            if path.is_file() && self.load_file(&path) {
                return true;
            }
        }

        false
    }

    /// Merge every resource and file matching a pattern.
    fn load_matching(&mut self, pattern: &str) -> usize {
        let (directory, file_pattern) = split_pattern(pattern);
        let mut loaded = 0;

        let dirs = match directory {
            Some(directory) => vec![directory],
            None => {
                if let Some(resources) = self.resources() {
                    let names = resources.resource_names();
                    let prefix = resource_prefix_len(&names);
                    for name in &names {
                        if !glob::matches(file_pattern, &name[prefix..]) {
                            continue;
                        }
                        if let Some(bytes) = resources.open_resource(name) {
                            if self.load_bytes(name, &bytes) {
                                loaded += 1;
                            }
                        }
                    }
                }

                let mut dirs = self.search_dirs();
                dirs.reverse();
                dirs
            }
        };

        for dir in dirs {
            for path in matching_files(&dir, file_pattern) {
                if self.load_file(&path) {
                    loaded += 1;
                }
            }
        }

        loaded
    }

    fn resources(&self) -> Option<Arc<dyn ResourceProvider>> {
        self.package
            .as_ref()
            .and_then(|package| package.resources().cloned())
    }

    /// Directories probed in exact mode, in order.
    fn search_dirs(&self) -> Vec<PathBuf> {
        let env = &self.environment;
        let dirs = match &self.package {
            Some(package) => [
                package.directory.clone(),
                env.local_data_for(&package.name),
            ],
            None => [
                env.process_dir().map(Path::to_path_buf),
                env.process_stem().and_then(|stem| env.local_data_for(&stem)),
            ],
        };
        dirs.into_iter().flatten().collect()
    }

    fn load_file(&mut self, path: &Path) -> bool {
        match fs::read(path) {
            Ok(bytes) => self.load_bytes(&path.display().to_string(), &bytes),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "skipping unreadable file");
                false
            }
        }
    }

    fn load_bytes(&mut self, label: &str, bytes: &[u8]) -> bool {
        let text = self.decoder.decode(bytes);
        if text.trim().is_empty() {
            trace!(source = label, "skipping blank source");
            return false;
        }
        self.load_text(label, &text) > 0
    }
}

/// Split a pattern into an explicit directory and a file name pattern.
fn split_pattern(pattern: &str) -> (Option<PathBuf>, &str) {
    match pattern.rfind(&['/', '\\'][..]) {
        Some(sep) if !has_wildcard(&pattern[..sep]) => {
            let dir = if sep == 0 { "/" } else { &pattern[..sep] };
            (Some(PathBuf::from(dir)), &pattern[sep + 1..])
        }
        _ => (None, pattern),
    }
}

/// Length of the namespace prefix shared by all resource names.
fn resource_prefix_len(names: &[String]) -> usize {
    let len = common_prefix_len(names);
    names
        .first()
        .and_then(|name| name[..len].rfind(RESOURCE_SEPARATORS))
        .map_or(0, |sep| sep + 1)
}

/// Files directly inside `dir` whose names match, sorted by name.
fn matching_files(dir: &Path, pattern: &str) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }

    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter(|entry| glob::matches(pattern, &entry.file_name().to_string_lossy()))
        .map(|entry| entry.into_path())
        .collect()
}

fn ends_with_ignore_case(text: &str, suffix: &str) -> bool {
    text.len() >= suffix.len()
        && text.is_char_boundary(text.len() - suffix.len())
        && text[text.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}
