//! Per-block highlight cache
//!
//! Spans are keyed by block identity and tagged with the block revision, so a
//! block is only re-tokenized when it is newly displayed or its text changed.

use std::collections::{HashMap, HashSet};

use tracing::trace;

use super::language::{HighlightMode, LanguageDefinition};
use super::style::Span;
use crate::line::{BlockId, Line};

struct CacheEntry {
    revision: u64,
    spans: Vec<Span>,
}

/// Highlighting cache for one buffer
pub struct HighlightCache {
    mode: HighlightMode,
    entries: HashMap<BlockId, CacheEntry>,
    /// Number of blocks tokenized since creation
    scans: usize,
}

impl HighlightCache {
    /// Create a new empty cache
    pub fn new(mode: HighlightMode) -> Self {
        Self {
            mode,
            entries: HashMap::new(),
            scans: 0,
        }
    }

    pub fn mode(&self) -> HighlightMode {
        self.mode
    }

    /// Switch mode; every block is re-tokenized on next use
    pub fn set_mode(&mut self, mode: HighlightMode) {
        if mode != self.mode {
            self.mode = mode;
            self.entries.clear();
        }
    }

    /// Spans for a line, re-tokenizing only if the line changed
    pub fn spans_for(&mut self, lang: &LanguageDefinition, line: &Line) -> &[Span] {
        let mode = self.mode;
        let entry = self.entries.entry(line.id()).or_insert_with(|| CacheEntry {
            revision: u64::MAX,
            spans: Vec::new(),
        });
        if entry.revision != line.revision() {
            trace!(block = line.id().0, revision = line.revision(), "re-tokenizing block");
            entry.spans = lang.highlight_block(line.text(), mode);
            entry.revision = line.revision();
            self.scans += 1;
        }
        &entry.spans
    }

    /// Drop entries for blocks no longer in the buffer
    pub fn retain_blocks(&mut self, lines: &[Line]) {
        let live: HashSet<BlockId> = lines.iter().map(Line::id).collect();
        self.entries.retain(|id, _| live.contains(id));
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn scans(&self) -> usize {
        self.scans
    }
}
