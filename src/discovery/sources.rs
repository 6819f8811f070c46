//! Where script sources come from.
//!
//! A load runs in one or more resolution contexts. A [`Package`] context
//! probes the package's embedded resources and directories; the process
//! context probes the directory of the running executable. Both fall back to
//! a per-name folder under the user's local data directory.

use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A read-only set of named, embedded byte streams.
pub trait ResourceProvider: fmt::Debug + Send + Sync {
    /// Names of all resources, in a stable order.
    fn resource_names(&self) -> Vec<String>;

    /// Open a resource by its exact name.
    fn open_resource(&self, name: &str) -> Option<Vec<u8>>;
}

/// Resources held in memory, typically from `include_bytes!`.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedResources {
    entries: Vec<(String, Cow<'static, [u8]>)>,
}

impl EmbeddedResources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource, replacing any with the same name.
    pub fn with(mut self, name: impl Into<String>, bytes: impl Into<Cow<'static, [u8]>>) -> Self {
        self.insert(name, bytes);
        self
    }

    /// Add a resource, replacing any with the same name.
    pub fn insert(&mut self, name: impl Into<String>, bytes: impl Into<Cow<'static, [u8]>>) {
        let name = name.into();
        let bytes = bytes.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = bytes,
            None => self.entries.push((name, bytes)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResourceProvider for EmbeddedResources {
    fn resource_names(&self) -> Vec<String> {
        self.entries.iter().map(|(name, _)| name.clone()).collect()
    }

    fn open_resource(&self, name: &str) -> Option<Vec<u8>> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, bytes)| bytes.to_vec())
    }
}

/// A named unit of code that may carry script resources and files.
#[derive(Debug, Clone)]
pub struct Package {
    /// Package name; also names its local data folder.
    pub name: String,
    /// Directory the package was loaded from.
    pub directory: Option<PathBuf>,
    /// File stem of the package binary, when it differs from the name.
    pub file_stem: Option<String>,
    resources: Option<Arc<dyn ResourceProvider>>,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            directory: None,
            file_stem: None,
            resources: None,
        }
    }

    /// Set the package location from the path of its binary.
    pub fn with_location(mut self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        self.directory = path.parent().map(Path::to_path_buf);
        self.file_stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned());
        self
    }

    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    pub fn with_resources(mut self, resources: impl ResourceProvider + 'static) -> Self {
        self.resources = Some(Arc::new(resources));
        self
    }

    /// Get the embedded resources, if any.
    pub fn resources(&self) -> Option<&Arc<dyn ResourceProvider>> {
        self.resources.as_ref()
    }
}

/// Facts about the running process that drive default lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    /// Path of the running executable.
    pub process_path: Option<PathBuf>,
    /// The user's local application data directory.
    pub local_data_dir: Option<PathBuf>,
}

impl Environment {
    /// Detect the environment of the current process.
    pub fn detect() -> Self {
        Self {
            process_path: std::env::current_exe().ok(),
            local_data_dir: dirs::data_local_dir(),
        }
    }

    /// Directory containing the executable.
    pub fn process_dir(&self) -> Option<&Path> {
        self.process_path.as_deref().and_then(Path::parent)
    }

    /// File name of the executable without its extension.
    pub fn process_stem(&self) -> Option<String> {
        self.process_path
            .as_deref()
            .and_then(Path::file_stem)
            .map(|stem| stem.to_string_lossy().into_owned())
    }

    /// `<local data>/<name>`.
    pub fn local_data_for(&self, name: &str) -> Option<PathBuf> {
        self.local_data_dir.as_ref().map(|dir| dir.join(name))
    }
}

/// One place a load looks for scripts.
#[derive(Debug, Clone)]
pub enum ResolutionContext {
    Package(Package),
    /// The running process.
    Process,
}

/// Turns raw source bytes into text.
pub trait TextDecoder: fmt::Debug + Send + Sync {
    fn decode(&self, bytes: &[u8]) -> String;
}

/// UTF-8 decoding with byte-order-mark detection.
///
/// A UTF-16 BOM switches to UTF-16; invalid sequences decode lossily.
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8Decoder;

impl TextDecoder for Utf8Decoder {
    fn decode(&self, bytes: &[u8]) -> String {
        match bytes {
            [0xEF, 0xBB, 0xBF, rest @ ..] => String::from_utf8_lossy(rest).into_owned(),
            [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
            [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
            _ => String::from_utf8_lossy(bytes).into_owned(),
        }
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_resources() {
        let resources = EmbeddedResources::new()
            .with("App.Scripts.sql", &b"--@query A\nselect 1;"[..])
            .with("App.Other.sql", b"x".to_vec());

        assert_eq!(resources.len(), 2);
        assert_eq!(resources.resource_names(), vec!["App.Scripts.sql", "App.Other.sql"]);
        assert_eq!(resources.open_resource("App.Other.sql"), Some(b"x".to_vec()));
        assert_eq!(resources.open_resource("app.other.sql"), None);
    }

    #[test]
    fn test_embedded_resources_replace() {
        let resources = EmbeddedResources::new()
            .with("a", b"1".to_vec())
            .with("a", b"2".to_vec());

        assert_eq!(resources.len(), 1);
        assert_eq!(resources.open_resource("a"), Some(b"2".to_vec()));
    }

    #[test]
    fn test_package_location() {
        let package = Package::new("App").with_location("/opt/app/App.Core.dll");

        assert_eq!(package.directory, Some(PathBuf::from("/opt/app")));
        assert_eq!(package.file_stem.as_deref(), Some("App.Core"));
        assert!(package.resources().is_none());
    }

    #[test]
    fn test_environment_paths() {
        let env = Environment {
            process_path: Some(PathBuf::from("/opt/app/tool.exe")),
            local_data_dir: Some(PathBuf::from("/home/me/.local/share")),
        };

        assert_eq!(env.process_dir(), Some(Path::new("/opt/app")));
        assert_eq!(env.process_stem().as_deref(), Some("tool"));
        assert_eq!(env.local_data_for("tool"), Some(PathBuf::from("/home/me/.local/share/tool")));
        assert_eq!(Environment::default().process_stem(), None);
    }

    #[test]
    fn test_decode_utf8() {
        assert_eq!(Utf8Decoder.decode("héllo".as_bytes()), "héllo");
        assert_eq!(Utf8Decoder.decode(b"\xEF\xBB\xBFselect 1"), "select 1");
        assert_eq!(Utf8Decoder.decode(b"a\xFFb"), "a\u{FFFD}b");
    }

    #[test]
    fn test_decode_utf16() {
        let mut le = vec![0xFF, 0xFE];
        le.extend("--@query A".encode_utf16().flat_map(u16::to_le_bytes));
        assert_eq!(Utf8Decoder.decode(&le), "--@query A");

        let mut be = vec![0xFE, 0xFF];
        be.extend("select é".encode_utf16().flat_map(u16::to_be_bytes));
        assert_eq!(Utf8Decoder.decode(&be), "select é");
    }
}
