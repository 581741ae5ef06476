//! Current-line marker

use crate::state::{Cursor, EditorState};
use crate::syntax::{Color, Style};

/// Background of the line holding the cursor
pub const CURRENT_LINE_COLOR: Color = Color::rgb(232, 242, 254);

/// A non-interactive overlay drawn on top of normal text, distinct from the
/// user's own selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraSelection {
    pub line: usize,
    pub anchor: Cursor,
    pub position: Cursor,
    pub style: Style,
    /// Extend the background across the whole viewport width
    pub full_width: bool,
}

impl ExtraSelection {
    /// No text is actually selected
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.position
    }
}

/// The extra selections after a cursor move: one full-width background on
/// the cursor's line, or none when the surface is read-only.
pub fn highlight_current_line(state: &EditorState, color: Color) -> Vec<ExtraSelection> {
    if state.is_read_only() {
        return Vec::new();
    }
    let cursor = state.cursor();
    vec![ExtraSelection {
        line: cursor.line,
        anchor: cursor,
        position: cursor,
        style: Style::bg(color),
        full_width: true,
    }]
}
