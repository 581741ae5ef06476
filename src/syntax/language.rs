//! Language definitions for syntax highlighting
//!
//! A `LanguageDefinition` holds the ordered rule list for one language and
//! turns a single line of text into styled spans.

use super::rules::PatternRule;
use super::style::{Span, Style};

/// How overlapping rule matches are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HighlightMode {
    /// Single left-to-right pass; token classes never overlap.
    /// Earliest match wins, ties go to the higher priority rule.
    #[default]
    Lexer,
    /// Every rule paints all of its matches in scan order and the last
    /// writer wins on overlapping bytes.
    Overlay,
}

impl HighlightMode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "lexer" => Some(HighlightMode::Lexer),
            "overlay" => Some(HighlightMode::Overlay),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            HighlightMode::Lexer => "lexer",
            HighlightMode::Overlay => "overlay",
        }
    }

    /// The other mode
    pub fn toggled(self) -> Self {
        match self {
            HighlightMode::Lexer => HighlightMode::Overlay,
            HighlightMode::Overlay => HighlightMode::Lexer,
        }
    }
}

/// A complete language definition for syntax highlighting
pub struct LanguageDefinition {
    /// Language name (e.g., "Python")
    pub name: String,
    /// Rules in scan order
    pub patterns: Vec<PatternRule>,
}

impl LanguageDefinition {
    /// Create a new empty language definition
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            patterns: Vec::new(),
        }
    }

    /// Append a pattern rule to the end of the scan order
    pub fn add_pattern(&mut self, rule: PatternRule) {
        self.patterns.push(rule);
    }

    /// Highlight a single line of text.
    ///
    /// Spans are sorted by start, never overlap, and depend only on `text`
    /// and `mode`.
    pub fn highlight_block(&self, text: &str, mode: HighlightMode) -> Vec<Span> {
        match mode {
            HighlightMode::Lexer => self.lex(text),
            HighlightMode::Overlay => self.overlay(text),
        }
    }

    fn lex(&self, text: &str) -> Vec<Span> {
        let mut spans = Vec::new();
        let mut pos = 0;
        // Next match of each rule at or after `pos`; a rule is only searched
        // again once `pos` has passed the start of its pending match, so the
        // line is scanned a bounded number of times per rule.
        let mut pending: Vec<Option<(usize, usize)>> =
            self.patterns.iter().map(|rule| rule.find_at(text, 0)).collect();

        while pos < text.len() {
            let mut best: Option<(usize, usize, &PatternRule)> = None;
            for (rule, next) in self.patterns.iter().zip(pending.iter_mut()) {
                if matches!(*next, Some((start, _)) if start < pos) {
                    *next = rule.find_at(text, pos);
                }
                let Some((start, end)) = *next else {
                    continue;
                };
                let better = match best {
                    None => true,
                    Some((best_start, _, best_rule)) => {
                        start < best_start || (start == best_start && rule.priority > best_rule.priority)
                    }
                };
                if better {
                    best = Some((start, end, rule));
                }
            }

            match best {
                Some((start, end, rule)) => {
                    spans.push(Span::new(start, end, rule.token_type.default_style()));
                    pos = end;
                }
                None => break,
            }
        }

        spans
    }

    fn overlay(&self, text: &str) -> Vec<Span> {
        let mut formats: Vec<Option<Style>> = vec![None; text.len()];
        for rule in &self.patterns {
            let style = rule.token_type.default_style();
            for (start, end) in rule.find_all(text) {
                formats[start..end].fill(Some(style));
            }
        }
        coalesce(&formats)
    }
}

/// Merge runs of equal per-byte formats into spans
fn coalesce(formats: &[Option<Style>]) -> Vec<Span> {
    let mut spans: Vec<Span> = Vec::new();
    for (idx, format) in formats.iter().enumerate() {
        let Some(style) = format else { continue };
        match spans.last_mut() {
            Some(last) if last.end == idx && last.style == *style => last.end = idx + 1,
            _ => spans.push(Span::new(idx, idx + 1, *style)),
        }
    }
    spans
}
