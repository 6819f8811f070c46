//! Dotted script versions (`major.minor[.build[.revision]]`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A script file version.
///
/// Missing components order before present ones, so `1.0 < 1.0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScriptVersion {
    pub major: u32,
    pub minor: u32,
    pub build: Option<u32>,
    pub revision: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid version '{0}': expected major.minor[.build[.revision]]")]
pub struct ParseVersionError(String);

impl ScriptVersion {
    pub fn new(major: u32, minor: u32) -> Self {
        Self {
            major,
            minor,
            build: None,
            revision: None,
        }
    }

    pub fn with_build(mut self, build: u32) -> Self {
        self.build = Some(build);
        self
    }

    pub fn with_revision(mut self, revision: u32) -> Self {
        if self.build.is_none() {
            self.build = Some(0);
        }
        self.revision = Some(revision);
        self
    }

    /// Whether this is the zero version of an empty index.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

impl FromStr for ScriptVersion {
    type Err = ParseVersionError;

    /// Parse one to four dot-separated numbers; a lone number means `major.0`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseVersionError(s.to_string());

        let parts = s
            .trim()
            .split('.')
            .map(|part| part.trim().parse::<u32>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;

        match parts.as_slice() {
            [major] => Ok(Self::new(*major, 0)),
            [major, minor] => Ok(Self::new(*major, *minor)),
            [major, minor, build] => Ok(Self::new(*major, *minor).with_build(*build)),
            [major, minor, build, revision] => Ok(Self::new(*major, *minor)
                .with_build(*build)
                .with_revision(*revision)),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for ScriptVersion {
    type Error = ParseVersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ScriptVersion> for String {
    fn from(version: ScriptVersion) -> Self {
        version.to_string()
    }
}

impl fmt::Display for ScriptVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if let Some(build) = self.build {
            write!(f, ".{}", build)?;
            if let Some(revision) = self.revision {
                write!(f, ".{}", revision)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> ScriptVersion {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_components() {
        assert_eq!(v("1.2"), ScriptVersion::new(1, 2));
        assert_eq!(v("1.0.1"), ScriptVersion::new(1, 0).with_build(1));
        assert_eq!(v(" 3.5.7.9 "), ScriptVersion::new(3, 5).with_build(7).with_revision(9));
        assert_eq!(v("2"), ScriptVersion::new(2, 0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<ScriptVersion>().is_err());
        assert!("1.x".parse::<ScriptVersion>().is_err());
        assert!("1..2".parse::<ScriptVersion>().is_err());
        assert!("-1.0".parse::<ScriptVersion>().is_err());
        assert!("1.2.3.4.5".parse::<ScriptVersion>().is_err());
    }

    #[test]
    fn test_ordering() {
        assert!(v("0.5") < v("1.0"));
        assert!(v("1.0") < v("1.0.0"));
        assert!(v("1.0.1") < v("1.2"));
        assert!(v("1.10") > v("1.9"));
        assert_eq!([v("1.0"), v("0.5"), v("1.2")].into_iter().max(), Some(v("1.2")));
    }

    #[test]
    fn test_display() {
        insta::assert_snapshot!(v("1.0.1").to_string(), @"1.0.1");
        assert_eq!(v("4.2.0.1").to_string(), "4.2.0.1");
        assert_eq!(ScriptVersion::default().to_string(), "0.0");
    }

    #[test]
    fn test_zero() {
        assert!(ScriptVersion::default().is_zero());
        assert!(!v("0.1").is_zero());
    }
}
