//! Editor state - everything the decoration layer needs to know about the
//! editing surface, as a plain value.

use crate::buffer::TextBuffer;
use crate::decoration::{FontMetrics, Rect};

/// Cursor position (line index, byte offset within line)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub line: usize,
    pub col: usize,
}

/// Text buffer handle plus cursor, scroll and viewport geometry
#[derive(Debug)]
pub struct EditorState {
    buffer: TextBuffer,
    cursor: Cursor,
    /// Distance from the top of the document to the top of the viewport
    scroll_y: i32,
    /// Columns hidden on the left (wrapping is disabled)
    scroll_x: usize,
    read_only: bool,
    /// Whole editing surface, gutter included
    contents: Rect,
    /// Left inset reserved for the gutter
    left_margin: i32,
}

impl EditorState {
    pub fn new(buffer: TextBuffer, width: i32, height: i32) -> Self {
        Self {
            buffer,
            cursor: Cursor::default(),
            scroll_y: 0,
            scroll_x: 0,
            read_only: false,
            contents: Rect::new(0, 0, width.max(0), height.max(0)),
            left_margin: 0,
        }
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut TextBuffer {
        &mut self.buffer
    }

    pub fn line_count(&self) -> usize {
        self.buffer.line_count()
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Move the cursor, clamping to the buffer. A column inside a
    /// multi-byte character snaps back to the start of that character.
    pub fn set_cursor(&mut self, line: usize, col: usize) {
        let line = line.min(self.buffer.line_count().saturating_sub(1));
        let text = self.buffer.line(line).map_or("", |l| l.text());
        let mut col = col.min(text.len());
        while !text.is_char_boundary(col) {
            col -= 1;
        }
        self.cursor = Cursor { line, col };
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    #[cfg(test)]
    pub fn scroll_y(&self) -> i32 {
        self.scroll_y
    }

    pub fn scroll_x(&self) -> usize {
        self.scroll_x
    }

    /// Whole surface rectangle (gutter plus viewport)
    pub fn contents_rect(&self) -> Rect {
        self.contents
    }

    /// The editable viewport, to the right of the gutter
    pub fn viewport(&self) -> Rect {
        Rect::new(
            self.left_margin,
            0,
            (self.contents.width - self.left_margin).max(0),
            self.contents.height,
        )
    }

    /// Reserve `left` units for the gutter
    pub fn set_viewport_margins(&mut self, left: i32) {
        self.left_margin = left.max(0);
    }

    pub fn resize(&mut self, width: i32, height: i32) {
        self.contents = Rect::new(0, 0, width.max(0), height.max(0));
    }

    /// Height of one block; wrapping is disabled so every block is one line tall
    pub fn block_height(&self, metrics: &dyn FontMetrics, _idx: usize) -> i32 {
        metrics.line_height()
    }

    /// Top of a block in viewport coordinates
    pub fn block_top(&self, metrics: &dyn FontMetrics, idx: usize) -> i32 {
        let above: i32 = (0..idx).map(|i| self.block_height(metrics, i)).sum();
        above - self.scroll_y
    }

    /// First block whose extent reaches into the viewport
    pub fn first_visible_block(&self, metrics: &dyn FontMetrics) -> usize {
        let mut top = 0;
        for idx in 0..self.line_count() {
            let bottom = top + self.block_height(metrics, idx);
            if bottom > self.scroll_y {
                return idx;
            }
            top = bottom;
        }
        self.line_count().saturating_sub(1)
    }

    /// Number of whole lines that fit in the viewport
    pub fn visible_lines(&self, metrics: &dyn FontMetrics) -> usize {
        let lh = metrics.line_height().max(1);
        (self.contents.height / lh).max(1) as usize
    }

    fn max_scroll(&self, metrics: &dyn FontMetrics) -> i32 {
        let lh = metrics.line_height();
        (self.line_count().saturating_sub(1) as i32 * lh).max(0)
    }

    /// Set the vertical scroll offset; returns how far the content moved
    /// (negative when it moved up)
    pub fn scroll_to(&mut self, metrics: &dyn FontMetrics, scroll_y: i32) -> i32 {
        let clamped = scroll_y.clamp(0, self.max_scroll(metrics));
        let dy = self.scroll_y - clamped;
        self.scroll_y = clamped;
        dy
    }

    /// Scroll by whole lines (positive scrolls towards the end)
    pub fn scroll_lines(&mut self, metrics: &dyn FontMetrics, lines: i32) -> i32 {
        let target = self.scroll_y + lines * metrics.line_height();
        self.scroll_to(metrics, target)
    }

    /// Scroll so the cursor line is fully visible; returns the content delta
    pub fn ensure_cursor_visible(&mut self, metrics: &dyn FontMetrics) -> i32 {
        let line = self.cursor.line;
        let top = self.block_top(metrics, line);
        let bottom = top + self.block_height(metrics, line);
        let height = self.contents.height;
        if top < 0 {
            self.scroll_to(metrics, self.scroll_y + top)
        } else if bottom > height {
            self.scroll_to(metrics, self.scroll_y + bottom - height)
        } else {
            0
        }
    }

    /// Keep the cursor column inside `text_cols` columns
    pub fn ensure_cursor_column_visible(&mut self, text_cols: usize, tab_width: usize) {
        let col = self
            .buffer
            .line(self.cursor.line)
            .map_or(0, |l| l.byte_to_col(self.cursor.col, tab_width));
        if col < self.scroll_x {
            self.scroll_x = col;
        } else if text_cols > 0 && col >= self.scroll_x + text_cols {
            self.scroll_x = col + 1 - text_cols;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoration::CellMetrics;

    fn state(lines: usize, height: i32) -> EditorState {
        let text: Vec<String> = (0..lines).map(|i| format!("line {i}")).collect();
        EditorState::new(TextBuffer::from_text(&text.join("\n")), 40, height)
    }

    #[test]
    fn test_viewport_margins() {
        let mut s = state(3, 10);
        s.set_viewport_margins(4);
        assert_eq!(s.viewport(), Rect::new(4, 0, 36, 10));
        assert_eq!(s.contents_rect(), Rect::new(0, 0, 40, 10));
    }

    #[test]
    fn test_scroll_clamps_and_reports_delta() {
        let m = CellMetrics;
        let mut s = state(20, 5);
        assert_eq!(s.scroll_lines(&m, 3), -3);
        assert_eq!(s.first_visible_block(&m), 3);
        assert_eq!(s.block_top(&m, 3), 0);
        assert_eq!(s.scroll_lines(&m, -10), 3);
        assert_eq!(s.scroll_y(), 0);
        assert_eq!(s.scroll_lines(&m, 100), -19);
    }

    #[test]
    fn test_ensure_cursor_visible() {
        let m = CellMetrics;
        let mut s = state(20, 5);
        s.set_cursor(7, 0);
        assert_eq!(s.ensure_cursor_visible(&m), -3);
        assert_eq!(s.first_visible_block(&m), 3);
        s.set_cursor(1, 0);
        assert_eq!(s.ensure_cursor_visible(&m), 2);
        assert_eq!(s.ensure_cursor_visible(&m), 0);
    }

    #[test]
    fn test_set_cursor_clamps() {
        let mut s = state(2, 5);
        s.set_cursor(9, 99);
        assert_eq!(s.cursor(), Cursor { line: 1, col: 6 });
    }

    #[test]
    fn test_set_cursor_snaps_to_char_boundary() {
        let mut s = EditorState::new(TextBuffer::from_text("ab\néé"), 10, 5);
        s.set_cursor(1, 1);
        assert_eq!(s.cursor(), Cursor { line: 1, col: 0 });
        s.set_cursor(1, 3);
        assert_eq!(s.cursor(), Cursor { line: 1, col: 2 });
        s.set_cursor(1, 4);
        assert_eq!(s.cursor(), Cursor { line: 1, col: 4 });
    }

    #[test]
    fn test_horizontal_scroll() {
        let mut s = EditorState::new(TextBuffer::from_text("abcdefghij"), 10, 1);
        s.set_cursor(0, 8);
        s.ensure_cursor_column_visible(4, 4);
        assert_eq!(s.scroll_x(), 5);
        s.set_cursor(0, 2);
        s.ensure_cursor_column_visible(4, 4);
        assert_eq!(s.scroll_x(), 2);
    }
}
