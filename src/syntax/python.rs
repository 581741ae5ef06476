//! Python language definition

use tracing::debug;

use super::language::LanguageDefinition;
use super::rules::PatternRule;
use super::tokens::TokenType;

const KEYWORDS: &str = r"\b(False|None|True|and|as|assert|async|await|break|class|continue|def|del|elif|else|except|finally|for|from|global|if|import|in|is|lambda|nonlocal|not|or|pass|raise|return|try|while|with|yield)\b";

const BUILTINS: &str = r"\b(abs|all|any|ascii|bin|bool|bytearray|bytes|callable|chr|classmethod|compile|complex|dict|dir|divmod|enumerate|eval|exec|filter|float|format|frozenset|getattr|globals|hasattr|hash|help|hex|id|input|int|isinstance|issubclass|iter|len|list|locals|map|max|memoryview|min|next|object|oct|open|ord|pow|print|property|range|repr|reversed|round|set|setattr|slice|sorted|staticmethod|str|sum|super|tuple|type|vars|zip)\b";

/// Create the Python language definition.
///
/// Scan order: keywords, built-ins, comments, integers, strings. The
/// priorities only matter to the lexer when two rules match at the same
/// position.
pub fn python_language() -> LanguageDefinition {
    let mut lang = LanguageDefinition::new("Python");

    let rules = [
        ("keyword", KEYWORDS, TokenType::Keyword, 80),
        ("builtin", BUILTINS, TokenType::Builtin, 70),
        ("comment", r"#.*", TokenType::Comment, 100),
        ("integer", r"\b[0-9]+\b", TokenType::Number, 60),
        // Up to the next matching quote; no escapes, no multi-line
        ("string", r#""[^"]*"|'[^']*'"#, TokenType::String, 90),
    ];
    for (name, pattern, token_type, priority) in rules {
        if let Some(rule) = PatternRule::new(name, pattern, token_type, priority) {
            lang.add_pattern(rule);
        }
    }

    debug!(
        language = %lang.name,
        rules = ?lang.patterns.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
        "built highlight rules"
    );
    lang
}
