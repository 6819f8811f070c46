//! Parameter and return type declarations.
//!
//! Type names follow SQL Server spelling and map onto a small set of portable
//! semantic types. Anything unknown, or written in `[brackets]`, is kept as a
//! custom type name.

use std::fmt;

use serde::Serialize;

use crate::parser::cursor::{index_of_any_unquoted, index_of_unclosed};

/// Portable scalar data types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SemanticType {
    Boolean,
    Byte,
    Int16,
    Int32,
    Int64,
    Single,
    Double,
    Decimal,
    Currency,
    AnsiString,
    AnsiStringFixedLength,
    String,
    StringFixedLength,
    Date,
    DateTime,
    DateTime2,
    DateTimeOffset,
    Time,
    Binary,
    Guid,
    Xml,
    Object,
}

/// Known type names and the semantic type each one maps to.
pub const TYPE_NAMES: &[(&str, SemanticType)] = &[
    ("bigint", SemanticType::Int64),
    ("binary", SemanticType::Binary),
    ("bit", SemanticType::Boolean),
    ("char", SemanticType::AnsiStringFixedLength),
    ("date", SemanticType::Date),
    ("datetime", SemanticType::DateTime),
    ("datetime2", SemanticType::DateTime2),
    ("datetimeoffset", SemanticType::DateTimeOffset),
    ("decimal", SemanticType::Decimal),
    ("float", SemanticType::Double),
    ("image", SemanticType::Binary),
    ("int", SemanticType::Int32),
    ("money", SemanticType::Currency),
    ("nchar", SemanticType::StringFixedLength),
    ("ntext", SemanticType::String),
    ("numeric", SemanticType::Decimal),
    ("nvarchar", SemanticType::String),
    ("real", SemanticType::Single),
    ("rowversion", SemanticType::Binary),
    ("smalldatetime", SemanticType::DateTime),
    ("smallint", SemanticType::Int16),
    ("smallmoney", SemanticType::Currency),
    ("sql_variant", SemanticType::Object),
    ("text", SemanticType::AnsiString),
    ("time", SemanticType::Time),
    ("timestamp", SemanticType::Binary),
    ("tinyint", SemanticType::Byte),
    ("uniqueidentifier", SemanticType::Guid),
    ("varbinary", SemanticType::Binary),
    ("varchar", SemanticType::AnsiString),
    ("xml", SemanticType::Xml),
];

impl SemanticType {
    /// Look up a bare type name (case-insensitive).
    pub fn from_type_name(name: &str) -> Option<Self> {
        TYPE_NAMES
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(name))
            .map(|(_, ty)| *ty)
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A resolved type declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataType {
    pub kind: SemanticType,
    /// Declared length, e.g. `50` in `nvarchar(50)`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    /// Name of a type outside the known table; `kind` is `Object` then.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_type: Option<String>,
}

impl DataType {
    pub fn new(kind: SemanticType) -> Self {
        Self {
            kind,
            size: None,
            custom_type: None,
        }
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn custom(name: impl Into<String>) -> Self {
        Self {
            kind: SemanticType::Object,
            size: None,
            custom_type: Some(name.into()),
        }
    }

    /// Resolve a type declaration such as `nvarchar(50)` or `[UserRow]`.
    ///
    /// `default` applies when no type name is present. An unparseable size
    /// is left unspecified.
    pub fn resolve(text: &str, default: SemanticType) -> Self {
        let mut name = text.trim();
        let mut size = None;

        if let Some(sep) = index_of_unclosed(name, '(', '[', ']').filter(|&sep| sep > 0) {
            let inner = name[sep + 1..].trim().trim_end_matches(')').trim();
            size = inner.parse().ok();
            name = name[..sep].trim_end();
        }

        if name.is_empty() {
            return Self { size, ..Self::new(default) };
        }

        let bracketed = name.starts_with('[') || name.ends_with(']');
        match SemanticType::from_type_name(name).filter(|_| !bracketed) {
            Some(kind) => Self { size, ..Self::new(kind) },
            None => {
                let custom = name.trim_start_matches('[').trim_end_matches(']').trim();
                Self {
                    kind: SemanticType::Object,
                    size,
                    custom_type: (!custom.is_empty()).then(|| custom.to_string()),
                }
            }
        }
    }

    /// Parse a return type declaration.
    ///
    /// Returns `None` (implicit) when the text resolves to a plain `Object`.
    pub fn parse_return_type(text: &str) -> Option<Self> {
        if text.trim().is_empty() {
            return None;
        }
        let data_type = Self::resolve(text, SemanticType::Object);
        (data_type.kind != SemanticType::Object || data_type.custom_type.is_some()).then_some(data_type)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.custom_type {
            Some(custom) => write!(f, "[{}]", custom)?,
            None => write!(f, "{}", self.kind)?,
        }
        if let Some(size) = self.size {
            write!(f, "({})", size)?;
        }
        Ok(())
    }
}

/// A declared script parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    /// Name without the `@` sigil.
    pub name: String,
    #[serde(flatten)]
    pub data_type: DataType,
}

const BLANKS: &[char] = &[' ', '\t', '\r', '\n'];

impl Parameter {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }

    /// Parse a parameter declaration such as `@name nvarchar(50)`.
    ///
    /// Without a type the parameter is a Unicode string. Returns `None` when
    /// the name token is a single character or empty after the `@` sigil.
    pub fn parse(segment: &str) -> Option<Self> {
        let segment = segment.trim();

        let (name, data_type) = match index_of_any_unquoted(segment, BLANKS, '"') {
            Some(mid) if mid > 0 => (
                &segment[..mid],
                DataType::resolve(&segment[mid..], SemanticType::String),
            ),
            _ => (segment, DataType::new(SemanticType::String)),
        };

        if name.chars().count() < 2 {
            return None;
        }
        let name = name.trim_start_matches('@');
        if name.is_empty() {
            return None;
        }

        Some(Self::new(name, data_type))
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{} {}", self.name, self.data_type)
    }
}
