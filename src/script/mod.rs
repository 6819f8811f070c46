//! Parsed scripts.
//!
//! A script is the body of a `script`, `query*` or `execute*` pragma together
//! with the declaration parsed from its meta:
//!
//! ```text
//! --@query-first GetUser(@id int) : [User]
//! select * from Users where Id = @id;
//! ```

pub mod kind;
pub mod types;

use serde::Serialize;

use crate::parser::{tokenize_meta, MetaTokenKind, Pragma};

pub use kind::{declares_script, ScriptKind};
pub use types::{DataType, Parameter, SemanticType, TYPE_NAMES};

/// A named SQL script with its declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Script {
    /// Script name, compared case-insensitively.
    pub name: String,
    /// SQL text (pragma body, trimmed).
    pub text: String,
    pub kind: ScriptKind,
    pub parameters: Vec<Parameter>,
    /// Declared return type; `None` when implicit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<DataType>,
}

impl Script {
    /// Create a script with no parameters and an implicit return type.
    pub fn new(name: impl Into<String>, text: impl Into<String>, kind: ScriptKind) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            kind,
            parameters: Vec::new(),
            return_type: None,
        }
    }

    /// Build a script from a pragma.
    ///
    /// Returns `None` when the directive does not declare a script or the
    /// meta carries no script name. Unusable parameters are dropped.
    pub fn from_pragma(pragma: &Pragma<'_>) -> Option<Self> {
        if !declares_script(pragma.name()) {
            return None;
        }

        let mut name = "";
        let mut parameters = Vec::new();
        let mut return_type = None;

        for token in tokenize_meta(pragma.meta()) {
            match token.kind {
                MetaTokenKind::ScriptName => name = token.text,
                MetaTokenKind::Parameter => parameters.extend(Parameter::parse(token.text)),
                MetaTokenKind::ReturnType => return_type = DataType::parse_return_type(token.text),
            }
        }

        if name.trim().is_empty() {
            return None;
        }

        Some(Self {
            name: name.to_string(),
            text: pragma.body().to_string(),
            kind: ScriptKind::classify(pragma.name(), pragma.body()),
            parameters,
            return_type,
        })
    }

    /// Whether a return type was declared explicitly.
    pub fn has_return_type(&self) -> bool {
        self.return_type.is_some()
    }

    /// Render the declaration, e.g. `GetUser(@id Int32) : [User]`.
    pub fn signature(&self) -> String {
        let parameters: Vec<String> = self.parameters.iter().map(ToString::to_string).collect();
        let mut signature = format!("{}({})", self.name, parameters.join(", "));
        if let Some(return_type) = &self.return_type {
            signature.push_str(&format!(" : {}", return_type));
        }
        signature
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::scan_pragmas;
    use pretty_assertions::assert_eq;

    fn parse_first(text: &str) -> Option<Script> {
        scan_pragmas(text).next().and_then(|p| Script::from_pragma(&p))
    }

    #[test]
    fn test_full_declaration() {
        let script = parse_first(
            "--@query-first GetUser(@id int, @email varchar(200)) : [User]\nselect * from Users where Id = @id;",
        )
        .unwrap();

        assert_eq!(
            script,
            Script {
                name: "GetUser".to_string(),
                text: "select * from Users where Id = @id;".to_string(),
                kind: ScriptKind::QueryFirst,
                parameters: vec![
                    Parameter::new("id", DataType::new(SemanticType::Int32)),
                    Parameter::new("email", DataType::new(SemanticType::AnsiString).with_size(200)),
                ],
                return_type: Some(DataType::custom("User")),
            }
        );
        assert!(script.has_return_type());
    }

    #[test]
    fn test_kind_per_directive() {
        let cases = [
            ("--@script \"MyScript\"\rSELECT 1;", ScriptKind::Query),
            ("--@script Cleanup\rDELETE FROM Log;", ScriptKind::Execute),
            ("--@execute \"MyExecute\"\rEXEC MyProc;", ScriptKind::Execute),
            ("--@execute-reader \"MyReader\"\rSELECT * FROM T;", ScriptKind::ExecuteReader),
            ("--@execute-scalar \"MyScalar\"\rSELECT COUNT(*) FROM T;", ScriptKind::ExecuteScalar),
            ("--@query \"MyQuery\"\rSELECT * FROM T;", ScriptKind::Query),
            ("--@query-first \"MyFirst\"\rSELECT * FROM T;", ScriptKind::QueryFirst),
            ("--@query-first-default \"MyFirstDefault\"\rSELECT * FROM T;", ScriptKind::QueryFirstOrDefault),
            ("--@query-single \"MySingle\"\rSELECT * FROM T;", ScriptKind::QuerySingle),
            ("--@query-single-default \"MySingleDefault\"\rSELECT * FROM T;", ScriptKind::QuerySingleOrDefault),
            ("--@query-multiple \"MyMultiple\"\rSELECT * FROM T;", ScriptKind::QueryMultiple),
            ("--@query-unbuffered \"MyUnbuffered\"\rSELECT * FROM T;", ScriptKind::QueryUnbuffered),
        ];

        for (text, kind) in cases {
            let script = parse_first(text).unwrap();
            assert_eq!(script.kind, kind, "{}", text);
        }
    }

    #[test]
    fn test_quoted_name_unwrapped() {
        let script = parse_first("--@query \"Name Space\"(@a int)\nselect @a;").unwrap();

        assert_eq!(script.name, "Name Space");
        assert_eq!(script.parameters.len(), 1);
    }

    #[test]
    fn test_non_script_directive_rejected() {
        assert_eq!(parse_first("--@invalid \"InvalidScript\"\nInvalid SQL;"), None);
        assert_eq!(parse_first("--@version 1.0\n"), None);
    }

    #[test]
    fn test_missing_name_rejected() {
        assert_eq!(parse_first("--@query\nselect 1;"), None);
        assert_eq!(parse_first("--@query (@a int)\nselect 1;"), None);
    }

    #[test]
    fn test_bad_parameters_dropped() {
        let script = parse_first("--@execute Touch(@id int, x, @when datetime2)\nupdate T set X = 1;").unwrap();

        let names: Vec<_> = script.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["id", "when"]);
    }

    #[test]
    fn test_implicit_return_type() {
        let script = parse_first("--@query-single Any : sql_variant\nselect 1;").unwrap();

        assert!(!script.has_return_type());
    }

    #[test]
    fn test_signature() {
        let script = parse_first("--@query-first GetUser(@id int, @name nvarchar(50)) : [User]\nselect 1;").unwrap();
        insta::assert_snapshot!(script.signature(), @"GetUser(@id Int32, @name String(50)) : [User]");

        let bare = Script::new("Purge", "delete from Log;", ScriptKind::Execute);
        assert_eq!(bare.signature(), "Purge()");
    }

    #[test]
    fn test_multiline_block_declaration() {
        let text = "/*@ execute-scalar Multiline(\n    @a int,\n    @b bigint,\n    @c nvarchar(10)\n) : int @*/\nselect 1;";
        let script = parse_first(text).unwrap();

        assert_eq!(script.name, "Multiline");
        assert_eq!(script.kind, ScriptKind::ExecuteScalar);
        assert_eq!(script.text, "select 1;");
        assert_eq!(script.parameters.len(), 3);
        assert_eq!(script.return_type, Some(DataType::new(SemanticType::Int32)));
    }
}
