//! Token types for syntax highlighting
//!
//! The lexical categories recognized in a line and their visual styles.

use super::style::{Color, Style};

/// Semantic token types for syntax highlighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    /// Reserved keywords (if, def, return, ...)
    Keyword,
    /// Built-in function and type names (print, str, len, ...)
    Builtin,
    /// Line comments (`#` to end of line)
    Comment,
    /// Whole-word integer literals
    Number,
    /// Single- or double-quoted string literals
    String,
}

impl TokenType {
    /// Get the default style for this token type
    pub fn default_style(&self) -> Style {
        match self {
            TokenType::Keyword => Style::fg(Color::rgb(0x00, 0x00, 0xFF)).with_bold(),
            TokenType::Builtin => Style::fg(Color::rgb(0x2B, 0x91, 0xAF)),
            TokenType::Comment => Style::fg(Color::rgb(0x00, 0x80, 0x00)).with_italic(),
            TokenType::Number => Style::fg(Color::rgb(0x09, 0x86, 0x58)),
            TokenType::String => Style::fg(Color::rgb(0xA3, 0x15, 0x15)),
        }
    }

    /// Get a human-readable name for this token type
    pub fn name(&self) -> &'static str {
        match self {
            TokenType::Keyword => "Keyword",
            TokenType::Builtin => "Builtin",
            TokenType::Comment => "Comment",
            TokenType::Number => "Number",
            TokenType::String => "String",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_styles_are_distinct() {
        let all = [
            TokenType::Keyword,
            TokenType::Builtin,
            TokenType::Comment,
            TokenType::Number,
            TokenType::String,
        ];
        for (i, a) in all.iter().enumerate() {
            assert!(!a.default_style().is_default(), "{} is unstyled", a.name());
            for b in &all[i + 1..] {
                assert_ne!(a.default_style(), b.default_style());
            }
        }
    }

    #[test]
    fn test_weight_and_slant() {
        assert!(TokenType::Keyword.default_style().bold);
        assert!(TokenType::Comment.default_style().italic);
        assert!(!TokenType::Builtin.default_style().bold);
    }
}
