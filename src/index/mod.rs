//! The loaded script index.
//!
//! An index is immutable once produced by the loader. Lookups are
//! case-insensitive and a missing name yields an empty string rather than an
//! error, so callers can treat an absent script as "nothing to run".
//!
//! # Example
//!
//! ```ignore
//! use scriptmap::discovery::Loader;
//!
//! let mut loader = Loader::new();
//! loader.load_text("inline", "--@query Users\nselect * from Users;");
//!
//! let index = loader.get_script_map();
//! assert_eq!(index.get("users"), "select * from Users;");
//! ```

pub mod version;

use std::collections::HashMap;

use crate::error::{Result, ScriptError};
use crate::script::Script;

pub use version::{ParseVersionError, ScriptVersion};

/// Normalize a script or pragma name into an index key.
pub(crate) fn index_key(name: &str) -> String {
    name.to_lowercase()
}

/// Scripts loaded from one or more sources.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptIndex {
    scripts: HashMap<String, Script>,
    /// Newline-separated labels of the sources that contributed.
    source: String,
    version: ScriptVersion,
    pragmas: HashMap<String, Vec<String>>,
}

impl ScriptIndex {
    /// An index with no scripts, no source and the zero version.
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(
        scripts: HashMap<String, Script>,
        source: String,
        version: ScriptVersion,
        pragmas: HashMap<String, Vec<String>>,
    ) -> Self {
        Self {
            scripts,
            source,
            version,
            pragmas,
        }
    }

    /// Get the SQL text of a script, or `""` when there is no such script.
    pub fn get(&self, name: &str) -> &str {
        self.find(name).map(|script| script.text.as_str()).unwrap_or("")
    }

    /// Find a script by name (case-insensitive).
    pub fn find(&self, name: &str) -> Option<&Script> {
        self.scripts.get(&index_key(name))
    }

    /// Check whether a script exists.
    pub fn contains(&self, name: &str) -> bool {
        self.scripts.contains_key(&index_key(name))
    }

    /// Get the number of scripts.
    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    /// Highest version declared by a contributing source.
    pub fn version(&self) -> ScriptVersion {
        self.version
    }

    /// Labels of the contributing sources, newline-separated.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Labels of the contributing sources, in load order.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.source.lines()
    }

    /// Meta values of a custom pragma, in load order.
    ///
    /// Empty unless the loader was collecting pragmas.
    pub fn pragmas(&self, name: &str) -> &[String] {
        self.pragmas
            .get(&index_key(name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Names of all collected pragmas, lowercased and sorted.
    pub fn pragma_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.pragmas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Get all scripts, in no particular order.
    pub fn scripts(&self) -> impl Iterator<Item = &Script> {
        self.scripts.values()
    }

    /// Get all script names, as declared, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scripts.values().map(|script| script.name.as_str())
    }

    /// Get all scripts sorted by name.
    pub fn sorted_scripts(&self) -> Vec<&Script> {
        let mut scripts: Vec<_> = self.scripts.values().collect();
        scripts.sort_by_key(|script| index_key(&script.name));
        scripts
    }

    /// Fail unless the index is at least `expected`.
    pub fn check_version(&self, expected: ScriptVersion) -> Result<()> {
        if self.version < expected {
            return Err(ScriptError::VersionMismatch {
                expected,
                found: self.version,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::ScriptKind;

    fn index() -> ScriptIndex {
        let mut scripts = HashMap::new();
        for (name, text) in [("GetUsers", "select * from Users;"), ("Purge", "delete from Log;")] {
            scripts.insert(index_key(name), Script::new(name, text, ScriptKind::Query));
        }
        let mut pragmas = HashMap::new();
        pragmas.insert("import".to_string(), vec!["System".to_string(), "System.Data".to_string()]);

        ScriptIndex::new(scripts, "a.sql\nb.sql".to_string(), "1.2".parse().unwrap(), pragmas)
    }

    #[test]
    fn test_empty() {
        let index = ScriptIndex::empty();

        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert_eq!(index.source(), "");
        assert!(index.version().is_zero());
        assert_eq!(index.get("anything"), "");
    }

    #[test]
    fn test_lookup_ignores_case() {
        let index = index();

        assert_eq!(index.get("getusers"), "select * from Users;");
        assert_eq!(index.get("GETUSERS"), "select * from Users;");
        assert_eq!(index.find("purge").map(|s| s.name.as_str()), Some("Purge"));
        assert!(index.contains("PuRgE"));
    }

    #[test]
    fn test_missing_name_is_empty_text() {
        let index = index();

        assert_eq!(index.get("Nope"), "");
        assert!(index.find("Nope").is_none());
    }

    #[test]
    fn test_sources() {
        let index = index();

        assert_eq!(index.sources().collect::<Vec<_>>(), vec!["a.sql", "b.sql"]);
    }

    #[test]
    fn test_pragmas() {
        let index = index();

        assert_eq!(index.pragmas("IMPORT"), ["System", "System.Data"]);
        assert!(index.pragmas("using").is_empty());
        assert_eq!(index.pragma_names(), vec!["import"]);
    }

    #[test]
    fn test_sorted_scripts() {
        let names: Vec<_> = index().sorted_scripts().iter().map(|s| s.name.clone()).collect();

        assert_eq!(names, vec!["GetUsers", "Purge"]);
    }

    #[test]
    fn test_check_version() {
        let index = index();

        assert!(index.check_version("1.0".parse().unwrap()).is_ok());
        assert!(index.check_version("1.2".parse().unwrap()).is_ok());

        let err = index.check_version("2.0".parse().unwrap()).unwrap_err();
        assert!(matches!(err, ScriptError::VersionMismatch { .. }));
    }

    #[test]
    fn test_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ScriptIndex>();
    }
}
