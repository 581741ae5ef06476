//! Syntax highlighting
//!
//! Rule-based, line-at-a-time tokenizing:
//! - `rules`: regex pattern rules
//! - `language`: ordered rule lists and the two highlight modes
//! - `cache`: per-block span cache keyed by block identity

mod cache;
mod language;
mod python;
mod rules;
mod style;
mod tokens;

pub use cache::HighlightCache;
pub use language::{HighlightMode, LanguageDefinition};
pub use python::python_language;
pub use style::{Color, Span, Style};
#[cfg(test)]
pub use tokens::TokenType;
