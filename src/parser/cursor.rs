//! Quote- and bracket-aware character search.
//!
//! These helpers find the first occurrence of a target character that is not
//! hidden inside a quoted run or an open bracket pair. Offsets are byte
//! offsets; every target and delimiter is expected to be ASCII.

/// Find the first `value` that is not inside a `quote`-delimited run.
///
/// Every `quote` toggles the quoted state, so an unterminated quote hides
/// the rest of the text.
pub fn index_of_unquoted(text: &str, value: char, quote: char) -> Option<usize> {
    index_of_any_unquoted(text, &[value], quote)
}

/// Find the first of `values` that is not inside a `quote`-delimited run.
pub fn index_of_any_unquoted(text: &str, values: &[char], quote: char) -> Option<usize> {
    let mut quoted = false;
    for (index, ch) in text.char_indices() {
        if ch == quote {
            quoted = !quoted;
        }
        if !quoted && values.contains(&ch) {
            return Some(index);
        }
    }
    None
}

/// Find the first `value` outside any `opener`/`closer` pair.
///
/// The depth never goes below zero: a `closer` at depth zero is an ordinary
/// character and is itself a candidate match.
pub fn index_of_unclosed(text: &str, value: char, opener: char, closer: char) -> Option<usize> {
    index_of_any_unclosed(text, &[value], opener, closer)
}

/// Find the first of `values` outside any `opener`/`closer` pair.
pub fn index_of_any_unclosed(
    text: &str,
    values: &[char],
    opener: char,
    closer: char,
) -> Option<usize> {
    let mut depth = 0usize;
    for (index, ch) in text.char_indices() {
        if ch == opener {
            depth += 1;
        } else if ch == closer && depth > 0 {
            depth -= 1;
        } else if depth == 0 && values.contains(&ch) {
            return Some(index);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unquoted_skips_quoted_run() {
        assert_eq!(index_of_unquoted(r#""a b" c"#, ' ', '"'), Some(5));
        assert_eq!(index_of_unquoted("a b", ' ', '"'), Some(1));
    }

    #[test]
    fn test_unquoted_unterminated_hides_rest() {
        assert_eq!(index_of_unquoted(r#"x "a b c"#, 'c', '"'), None);
    }

    #[test]
    fn test_unquoted_empty() {
        assert_eq!(index_of_unquoted("", ' ', '"'), None);
    }

    #[test]
    fn test_any_unquoted() {
        assert_eq!(index_of_any_unquoted("Name(@a int)", &[' ', '(', ':'], '"'), Some(4));
        assert_eq!(index_of_any_unquoted(r#""N (x)": int"#, &[' ', '(', ':'], '"'), Some(7));
    }

    #[test]
    fn test_unclosed_skips_nested_pairs() {
        assert_eq!(index_of_unclosed("nvarchar(10)", '(', '[', ']'), Some(8));
        assert_eq!(index_of_unclosed("[my(type)](5)", '(', '[', ']'), Some(10));
    }

    #[test]
    fn test_unclosed_closer_before_opener() {
        // A leading closer does not push the depth negative.
        assert_eq!(index_of_unclosed("]a,b", ',', '[', ']'), Some(2));
    }

    #[test]
    fn test_unclosed_unterminated_hides_rest() {
        assert_eq!(index_of_unclosed("(a,b", ',', '(', ')'), None);
    }

    #[test]
    fn test_any_unclosed_closer_is_candidate() {
        let params = "@a nvarchar(10), @b int)";
        assert_eq!(index_of_any_unclosed(params, &[',', ')'], '(', ')'), Some(15));
        assert_eq!(index_of_any_unclosed("@b int)", &[',', ')'], '(', ')'), Some(6));
    }
}
