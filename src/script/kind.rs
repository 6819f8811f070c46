//! Script kinds and directive classification.

use std::fmt;

use serde::Serialize;

/// The kind of database call a script is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ScriptKind {
    /// Any call; resolved from the body text when a script is parsed.
    #[default]
    Generic,
    Execute,
    ExecuteReader,
    ExecuteScalar,
    Query,
    QueryFirst,
    QueryFirstOrDefault,
    QuerySingle,
    QuerySingleOrDefault,
    QueryMultiple,
    QueryUnbuffered,
    QueryText,
    QueryJson,
}

/// Directive that declares a script without naming its kind.
pub const SCRIPT_DIRECTIVE: &str = "script";

const QUERY_PREFIX: &str = "query";
const EXECUTE_PREFIX: &str = "execute";

impl ScriptKind {
    /// All kinds, in declaration order.
    pub const ALL: [ScriptKind; 13] = [
        ScriptKind::Generic,
        ScriptKind::Execute,
        ScriptKind::ExecuteReader,
        ScriptKind::ExecuteScalar,
        ScriptKind::Query,
        ScriptKind::QueryFirst,
        ScriptKind::QueryFirstOrDefault,
        ScriptKind::QuerySingle,
        ScriptKind::QuerySingleOrDefault,
        ScriptKind::QueryMultiple,
        ScriptKind::QueryUnbuffered,
        ScriptKind::QueryText,
        ScriptKind::QueryJson,
    ];

    /// Look up a directive name (case-insensitive). Unknown names are `Generic`.
    pub fn from_directive(directive: &str) -> Self {
        ScriptKind::ALL
            .into_iter()
            .find(|kind| kind.directive().eq_ignore_ascii_case(directive))
            .unwrap_or(ScriptKind::Generic)
    }

    /// The directive name that declares this kind.
    pub fn directive(&self) -> &'static str {
        match self {
            ScriptKind::Generic => SCRIPT_DIRECTIVE,
            ScriptKind::Execute => "execute",
            ScriptKind::ExecuteReader => "execute-reader",
            ScriptKind::ExecuteScalar => "execute-scalar",
            ScriptKind::Query => "query",
            ScriptKind::QueryFirst => "query-first",
            ScriptKind::QueryFirstOrDefault => "query-first-default",
            ScriptKind::QuerySingle => "query-single",
            ScriptKind::QuerySingleOrDefault => "query-single-default",
            ScriptKind::QueryMultiple => "query-multiple",
            ScriptKind::QueryUnbuffered => "query-unbuffered",
            ScriptKind::QueryText => "query-text",
            ScriptKind::QueryJson => "query-json",
        }
    }

    /// Classify a script from its directive and body.
    ///
    /// A `Generic` directive becomes `Query` when the body starts with
    /// `select` or `with`, and `Execute` otherwise.
    pub fn classify(directive: &str, body: &str) -> Self {
        match ScriptKind::from_directive(directive) {
            ScriptKind::Generic => {
                let body = body.trim_start();
                if starts_with_keyword(body, "select") || starts_with_keyword(body, "with") {
                    ScriptKind::Query
                } else {
                    ScriptKind::Execute
                }
            }
            kind => kind,
        }
    }
}

impl fmt::Display for ScriptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.directive())
    }
}

/// Whether a directive declares a script (`script`, `query*`, `execute*`).
pub fn declares_script(directive: &str) -> bool {
    directive.eq_ignore_ascii_case(SCRIPT_DIRECTIVE)
        || starts_with_ignore_case(directive, QUERY_PREFIX)
        || starts_with_ignore_case(directive, EXECUTE_PREFIX)
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn starts_with_keyword(text: &str, keyword: &str) -> bool {
    starts_with_ignore_case(text, keyword)
        && text[keyword.len()..].starts_with(|c: char| c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_directives() {
        assert_eq!(ScriptKind::from_directive("execute"), ScriptKind::Execute);
        assert_eq!(ScriptKind::from_directive("execute-reader"), ScriptKind::ExecuteReader);
        assert_eq!(ScriptKind::from_directive("execute-scalar"), ScriptKind::ExecuteScalar);
        assert_eq!(ScriptKind::from_directive("query"), ScriptKind::Query);
        assert_eq!(ScriptKind::from_directive("query-first"), ScriptKind::QueryFirst);
        assert_eq!(ScriptKind::from_directive("query-first-default"), ScriptKind::QueryFirstOrDefault);
        assert_eq!(ScriptKind::from_directive("query-single"), ScriptKind::QuerySingle);
        assert_eq!(ScriptKind::from_directive("query-single-default"), ScriptKind::QuerySingleOrDefault);
        assert_eq!(ScriptKind::from_directive("query-multiple"), ScriptKind::QueryMultiple);
        assert_eq!(ScriptKind::from_directive("query-unbuffered"), ScriptKind::QueryUnbuffered);
        assert_eq!(ScriptKind::from_directive("query-text"), ScriptKind::QueryText);
        assert_eq!(ScriptKind::from_directive("query-json"), ScriptKind::QueryJson);
    }

    #[test]
    fn test_directive_lookup_ignores_case() {
        assert_eq!(ScriptKind::from_directive("QUERY-First"), ScriptKind::QueryFirst);
        assert_eq!(ScriptKind::from_directive("Execute"), ScriptKind::Execute);
    }

    #[test]
    fn test_unknown_directive_is_generic() {
        assert_eq!(ScriptKind::from_directive("query-everything"), ScriptKind::Generic);
        assert_eq!(ScriptKind::from_directive("script"), ScriptKind::Generic);
    }

    #[test]
    fn test_directive_round_trip() {
        for kind in ScriptKind::ALL {
            assert_eq!(ScriptKind::from_directive(kind.directive()), kind);
        }
    }

    #[test]
    fn test_generic_classified_by_body() {
        assert_eq!(ScriptKind::classify("script", "SELECT 1;"), ScriptKind::Query);
        assert_eq!(ScriptKind::classify("script", "  with x as (select 1) select * from x"), ScriptKind::Query);
        assert_eq!(ScriptKind::classify("script", "select\n*\nfrom T"), ScriptKind::Query);
        assert_eq!(ScriptKind::classify("script", "EXEC MyProc;"), ScriptKind::Execute);
        assert_eq!(ScriptKind::classify("script", "selection;"), ScriptKind::Execute);
        assert_eq!(ScriptKind::classify("script", ""), ScriptKind::Execute);
        assert_eq!(ScriptKind::classify("query-other", "select 1"), ScriptKind::Query);
    }

    #[test]
    fn test_explicit_kind_wins_over_body() {
        assert_eq!(ScriptKind::classify("execute", "select 1;"), ScriptKind::Execute);
        assert_eq!(ScriptKind::classify("query-json", "update T set X = 1"), ScriptKind::QueryJson);
    }

    #[test]
    fn test_declares_script() {
        assert!(declares_script("script"));
        assert!(declares_script("Query"));
        assert!(declares_script("query-single-default"));
        assert!(declares_script("EXECUTE-scalar"));
        assert!(!declares_script("version"));
        assert!(!declares_script("import"));
        assert!(!declares_script("scripts"));
        assert!(!declares_script("que"));
    }
}
