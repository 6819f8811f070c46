//! Wildcard matching for script file names.
//!
//! `*` matches any run of characters (path separators included) and `?`
//! matches exactly one, even right after a `*`. Matching ignores case.

const WILDCARDS: &[char] = &['*', '?'];

/// Check whether a name contains wildcard characters.
pub fn has_wildcard(name: &str) -> bool {
    name.contains(WILDCARDS)
}

/// Match a name against a wildcard pattern.
///
/// A pattern without wildcards matches only the same name, ignoring case.
pub fn matches(pattern: &str, name: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let name: Vec<char> = name.chars().collect();

    let (mut p, mut n) = (0, 0);
    // Pattern index after the last star, and the name index it resumes from.
    let mut backtrack: Option<(usize, usize)> = None;

    while n < name.len() {
        if pattern.get(p) == Some(&'*') {
            while pattern.get(p) == Some(&'*') {
                p += 1;
            }
            if p == pattern.len() {
                return true;
            }
            backtrack = Some((p, n));
        } else if pattern
            .get(p)
            .is_some_and(|&c| c == '?' || eq_ignore_case(c, name[n]))
        {
            p += 1;
            n += 1;
        } else if let Some((star_p, star_n)) = backtrack {
            p = star_p;
            n = star_n + 1;
            backtrack = Some((star_p, n));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}

/// Length in bytes of the prefix shared by all names.
///
/// Zero for fewer than two names. The result is always a char boundary.
pub fn common_prefix_len<S: AsRef<str>>(names: &[S]) -> usize {
    let [first, rest @ ..] = names else {
        return 0;
    };
    if rest.is_empty() {
        return 0;
    }

    let first = first.as_ref();
    let mut len = first.len();
    for name in rest {
        let shared = first
            .bytes()
            .zip(name.as_ref().bytes())
            .take_while(|(a, b)| a == b)
            .count();
        len = len.min(shared);
    }

    while !first.is_char_boundary(len) {
        len -= 1;
    }
    len
}

fn eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}
