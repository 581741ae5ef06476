//! Pattern rules for syntax highlighting
//!
//! A rule pairs a compiled regex with the token type it produces. Rules are
//! confined to a single line; nothing is carried over to the next one.

use regex::Regex;
use tracing::warn;

use super::tokens::TokenType;

/// A single-line pattern rule
pub struct PatternRule {
    /// Name for debugging
    pub name: String,
    /// Compiled regex pattern
    pub pattern: Regex,
    /// Token type to assign to matches
    pub token_type: TokenType,
    /// Tie-break when two rules match at the same position (higher wins)
    pub priority: i32,
}

impl PatternRule {
    /// Create a new pattern rule; an invalid pattern yields `None`
    pub fn new(name: &str, pattern: &str, token_type: TokenType, priority: i32) -> Option<Self> {
        match Regex::new(pattern) {
            Ok(regex) => Some(Self {
                name: name.to_string(),
                pattern: regex,
                token_type,
                priority,
            }),
            Err(e) => {
                warn!(rule = name, token = token_type.name(), error = %e, "skipping invalid highlight pattern");
                None
            }
        }
    }

    /// Find the first non-empty match at or after `start`.
    ///
    /// Searches the whole line so that `\b` sees the character before `start`.
    pub fn find_at(&self, text: &str, start: usize) -> Option<(usize, usize)> {
        if start > text.len() {
            return None;
        }
        let mut from = start;
        while from <= text.len() {
            let m = self.pattern.find_at(text, from)?;
            if m.end() > m.start() {
                return Some((m.start(), m.end()));
            }
            // Empty match: step past it on a char boundary
            from = match text[m.start()..].chars().next() {
                Some(ch) => m.start() + ch.len_utf8(),
                None => return None,
            };
        }
        None
    }

    /// Iterate all non-overlapping, non-empty matches in the line
    pub fn find_all<'a>(&'a self, text: &'a str) -> impl Iterator<Item = (usize, usize)> + 'a {
        self.pattern
            .find_iter(text)
            .filter(|m| m.end() > m.start())
            .map(|m| (m.start(), m.end()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_rule() {
        let rule = PatternRule::new("number", r"\b[0-9]+\b", TokenType::Number, 50).unwrap();
        assert_eq!(rule.find_at("abc 123 def", 0), Some((4, 7)));
        assert_eq!(rule.find_at("no numbers", 0), None);
    }

    #[test]
    fn test_find_at_respects_word_boundary_before_start() {
        let rule = PatternRule::new("number", r"\b[0-9]+\b", TokenType::Number, 50).unwrap();
        // Starting mid-identifier must not turn the tail of "abc123" into a number
        assert_eq!(rule.find_at("abc123 7", 3), Some((7, 8)));
    }

    #[test]
    fn test_invalid_pattern_is_skipped() {
        assert!(PatternRule::new("broken", r"(unclosed", TokenType::String, 1).is_none());
    }

    #[test]
    fn test_find_all() {
        let rule = PatternRule::new("string", r#""[^"]*"|'[^']*'"#, TokenType::String, 90).unwrap();
        let found: Vec<_> = rule.find_all(r#"a = "x" + 'y'"#).collect();
        assert_eq!(found, vec![(4, 7), (10, 13)]);
    }
}
