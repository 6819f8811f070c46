//! Declaration meta tokenizer.
//!
//! The meta of a script pragma declares the script name, an optional
//! parameter list and an optional return type:
//!
//! ```text
//! GetUsers(@active bit, @name nvarchar(50)) : [UserRow]
//! "Name With Spaces"
//! Count: int
//! ```

use super::cursor::{index_of_any_unclosed, index_of_any_unquoted};

const NAME_SEPARATORS: &[char] = &[' ', '\t', '\r', '\n', '(', ':'];
const PARAM_SEPARATORS: &[char] = &[',', ')'];

/// What a meta token stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaTokenKind {
    ScriptName,
    Parameter,
    ReturnType,
}

/// A slice of meta text tagged with its role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetaToken<'a> {
    pub kind: MetaTokenKind,
    pub text: &'a str,
}

impl<'a> MetaToken<'a> {
    fn new(kind: MetaTokenKind, text: &'a str) -> Self {
        Self { kind, text }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Name,
    ParameterList,
    Parameters,
    ReturnType,
    Done,
}

/// Iterator over the tokens of a declaration meta.
///
/// Yields at most one name, then zero or more parameters, then at most one
/// return type. An empty name ends the sequence.
#[derive(Debug, Clone)]
pub struct MetaTokens<'a> {
    rest: &'a str,
    phase: Phase,
}

/// Tokenize a declaration meta.
pub fn tokenize_meta(meta: &str) -> MetaTokens<'_> {
    MetaTokens {
        rest: meta.trim(),
        phase: Phase::Name,
    }
}

impl<'a> Iterator for MetaTokens<'a> {
    type Item = MetaToken<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.phase {
                Phase::Name => {
                    let (name, rest) = split_name(self.rest);
                    if name.is_empty() {
                        self.phase = Phase::Done;
                        return None;
                    }
                    self.rest = rest.trim_start();
                    self.phase = Phase::ParameterList;
                    return Some(MetaToken::new(MetaTokenKind::ScriptName, name));
                }
                Phase::ParameterList => match self.rest.strip_prefix('(') {
                    Some(list) => {
                        self.rest = list;
                        self.phase = Phase::Parameters;
                    }
                    None => self.phase = Phase::ReturnType,
                },
                Phase::Parameters => {
                    let rest = self.rest;
                    match index_of_any_unclosed(rest, PARAM_SEPARATORS, '(', ')') {
                        Some(end) if end > 0 => {
                            let rest_after = &rest[end..];
                            self.rest = rest_after.strip_prefix(',').unwrap_or(rest_after);
                            return Some(MetaToken::new(MetaTokenKind::Parameter, rest[..end].trim()));
                        }
                        _ => self.phase = Phase::ReturnType,
                    }
                }
                Phase::ReturnType => {
                    self.phase = Phase::Done;
                    let returns = self
                        .rest
                        .split_once(':')
                        .map(|(_, returns)| returns.trim())
                        .unwrap_or_default();
                    self.rest = "";
                    if !returns.is_empty() {
                        return Some(MetaToken::new(MetaTokenKind::ReturnType, returns));
                    }
                }
                Phase::Done => return None,
            }
        }
    }
}

/// Split the script name off the front of `meta`.
///
/// A name starting with `"` runs to the closing quote; an empty quoted name
/// (`""`) is not treated as quoted.
fn split_name(meta: &str) -> (&str, &str) {
    if let Some(quoted) = meta.strip_prefix('"') {
        if let Some(close) = quoted.find('"') {
            if close > 0 {
                return (&quoted[..close], &quoted[close + 1..]);
            }
        }
    }

    match index_of_any_unquoted(meta, NAME_SEPARATORS, '"') {
        Some(end) => (&meta[..end], &meta[end..]),
        None => (meta, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use MetaTokenKind::*;

    fn tokens(meta: &str) -> Vec<(MetaTokenKind, &str)> {
        tokenize_meta(meta).map(|t| (t.kind, t.text)).collect()
    }

    #[test]
    fn test_name_only() {
        assert_eq!(tokens("GetUser"), vec![(ScriptName, "GetUser")]);
        assert_eq!(tokens("  GetUser  "), vec![(ScriptName, "GetUser")]);
    }

    #[test]
    fn test_empty_meta() {
        assert!(tokens("").is_empty());
        assert!(tokens("   ").is_empty());
    }

    #[test]
    fn test_missing_name() {
        assert!(tokens("(@a int)").is_empty());
        assert!(tokens(": int").is_empty());
    }

    #[test]
    fn test_full_declaration() {
        assert_eq!(
            tokens("GetUser(@id int, @name nvarchar(50)) : bit"),
            vec![
                (ScriptName, "GetUser"),
                (Parameter, "@id int"),
                (Parameter, "@name nvarchar(50)"),
                (ReturnType, "bit"),
            ]
        );
    }

    #[test]
    fn test_space_before_parameters() {
        assert_eq!(
            tokens("GetUser (@id int)"),
            vec![(ScriptName, "GetUser"), (Parameter, "@id int")]
        );
    }

    #[test]
    fn test_quoted_name() {
        assert_eq!(
            tokens(r#""Name Space"(@a int)"#),
            vec![(ScriptName, "Name Space"), (Parameter, "@a int")]
        );
        assert_eq!(tokens(r#""Quoted""#), vec![(ScriptName, "Quoted")]);
    }

    #[test]
    fn test_return_type_without_parameters() {
        assert_eq!(
            tokens("Count: int"),
            vec![(ScriptName, "Count"), (ReturnType, "int")]
        );
        assert_eq!(
            tokens("Count : [dbo].[Total]"),
            vec![(ScriptName, "Count"), (ReturnType, "[dbo].[Total]")]
        );
    }

    #[test]
    fn test_empty_parameter_list() {
        assert_eq!(tokens("Touch()"), vec![(ScriptName, "Touch")]);
        assert_eq!(tokens("Touch():"), vec![(ScriptName, "Touch")]);
    }

    #[test]
    fn test_multiline_parameters() {
        assert_eq!(
            tokens("Multiline(\n  @a int,\n  @b varchar(10)\n)"),
            vec![
                (ScriptName, "Multiline"),
                (Parameter, "@a int"),
                (Parameter, "@b varchar(10)"),
            ]
        );
    }

    #[test]
    fn test_unterminated_parameter_list() {
        assert_eq!(
            tokens("Broken(@a int, @b int"),
            vec![(ScriptName, "Broken"), (Parameter, "@a int")]
        );
    }
}
