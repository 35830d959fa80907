//! Shell-style name patterns for [`FilesystemExt::glob_children`](crate::FilesystemExt::glob_children).
//!
//! | Pattern | Matches |
//! |---------|---------|
//! | `*` | everything |
//! | `?` | any single character |
//! | `[seq]` | any character in `seq` |
//! | `[!seq]` | any character not in `seq` |
//!
//! An unterminated `[` matches itself. Patterns are compiled to an anchored
//! [`regex::Regex`].

use regex::Regex;

use crate::FsError;

/// A compiled name pattern.
///
/// # Examples
///
/// ```rust
/// use filesystems::Glob;
///
/// let glob = Glob::new("b[!ae]?").unwrap();
/// assert!(glob.is_match("bob"));
/// assert!(!glob.is_match("bab"));
/// ```
#[derive(Debug, Clone)]
pub struct Glob {
    pattern: String,
    regex: Regex,
}

impl Glob {
    /// Compile a pattern.
    ///
    /// # Errors
    ///
    /// - [`FsError::InvalidGlob`] if a bracket expression is malformed (e.g. `[z-a]`)
    pub fn new(pattern: &str) -> Result<Self, FsError> {
        let translated = format!("(?s)^{}$", translate(pattern));
        let regex = Regex::new(&translated).map_err(|e| FsError::InvalidGlob {
            pattern: pattern.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            pattern: pattern.to_owned(),
            regex,
        })
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Whether `name` matches the whole pattern.
    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

fn translate(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        i += 1;
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '[' => match bracket_end(&chars, i) {
                Some(end) => {
                    out.push_str(&bracket(&chars[i..end]));
                    i = end + 1;
                }
                None => out.push_str(r"\["),
            },
            other => out.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }

    out
}

/// Index of the `]` closing a bracket expression whose body starts at `start`.
fn bracket_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start;
    if chars.get(j) == Some(&'!') {
        j += 1;
    }
    // A leading `]` is part of the set.
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    chars[j.min(chars.len())..]
        .iter()
        .position(|&c| c == ']')
        .map(|offset| j + offset)
}

fn bracket(body: &[char]) -> String {
    let (negated, body) = match body.split_first() {
        Some(('!', rest)) => (true, rest),
        _ => (false, body),
    };

    let mut out = String::from(if negated { "[^" } else { "[" });
    let last = body.len().saturating_sub(1);
    for (k, &c) in body.iter().enumerate() {
        let is_range = c == '-' && k != 0 && k != last;
        if is_range {
            out.push('-');
        } else if is_class_special(c) {
            out.push('\\');
            out.push(c);
        } else {
            out.push(c);
        }
    }
    out.push(']');
    out
}

/// Characters with a meaning inside a regex character class.
fn is_class_special(c: char) -> bool {
    matches!(c, '\\' | '[' | ']' | '^' | '-' | '&' | '~')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(pattern: &str, name: &str) -> bool {
        Glob::new(pattern).unwrap().is_match(name)
    }

    #[test]
    fn star_matches_anything() {
        assert!(matches("*", ""));
        assert!(matches("*", "anything.txt"));
        assert!(matches("b*", "bob"));
        assert!(!matches("b*", "alice"));
    }

    #[test]
    fn question_mark_matches_one_character() {
        assert!(matches("b?b", "bob"));
        assert!(!matches("b?b", "bb"));
        assert!(!matches("b?", "bob"));
    }

    #[test]
    fn bracket_sets_and_ranges() {
        assert!(matches("[ab]ob", "bob"));
        assert!(!matches("[ab]ob", "rob"));
        assert!(matches("[a-c]ob", "bob"));
        assert!(matches("[!a]ob", "bob"));
        assert!(!matches("[!b]ob", "bob"));
    }

    #[test]
    fn bracket_with_leading_close_is_a_member() {
        assert!(matches("[]]x", "]x"));
        assert!(matches("[!]]x", "ax"));
    }

    #[test]
    fn unterminated_bracket_is_literal() {
        assert!(matches("[ab", "[ab"));
        assert!(!matches("[ab", "a"));
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        assert!(matches("a.b", "a.b"));
        assert!(!matches("a.b", "axb"));
        assert!(matches("(x)+", "(x)+"));
        assert!(matches("[&~]", "&"));
    }

    #[test]
    fn bracket_members_need_no_escaping() {
        assert!(matches("[<>]x", "<x"));
        assert!(matches("[<>]x", ">x"));
        assert!(!matches("[<>]x", "=x"));
        assert!(matches("[!<>]x", "=x"));
        assert!(matches("[.*+?(){}|$@#%=:;,\"'`/]", "{"));
        assert!(matches("[\\^]", "\\"));
        assert!(matches("[a^]", "^"));
        assert!(matches("[[]", "["));
    }

    #[test]
    fn reversed_range_is_rejected() {
        let err = Glob::new("[z-a]").unwrap_err();
        assert!(matches!(err, FsError::InvalidGlob { ref pattern, .. } if pattern == "[z-a]"));
    }

    #[test]
    fn as_str_returns_pattern() {
        assert_eq!(Glob::new("*.rs").unwrap().as_str(), "*.rs");
    }
}
