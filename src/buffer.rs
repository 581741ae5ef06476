//! Text buffer - an ordered sequence of blocks with stable identities

use crate::line::{BlockId, Line};

/// What a single edit did to the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EditEffect {
    /// First line whose text changed (None if the edit was a no-op)
    pub first_line: Option<usize>,
    /// Whether the number of lines changed
    pub line_count_changed: bool,
}

impl EditEffect {
    fn line(idx: usize) -> Self {
        Self {
            first_line: Some(idx),
            line_count_changed: false,
        }
    }

    fn structural(idx: usize) -> Self {
        Self {
            first_line: Some(idx),
            line_count_changed: true,
        }
    }

    #[cfg(test)]
    pub fn is_noop(&self) -> bool {
        self.first_line.is_none()
    }
}

/// A buffer containing lines of text
#[derive(Debug)]
pub struct TextBuffer {
    /// Lines of text (never empty)
    lines: Vec<Line>,
    /// Next identity to hand out
    next_id: u64,
    /// Whether buffer has unsaved changes
    modified: bool,
}

impl TextBuffer {
    /// Create a buffer from text; `\r\n` and `\n` both end a line
    pub fn from_text(text: &str) -> Self {
        let mut buffer = Self {
            lines: Vec::new(),
            next_id: 0,
            modified: false,
        };
        for part in text.split('\n') {
            let part = part.strip_suffix('\r').unwrap_or(part);
            let id = buffer.allocate_id();
            buffer.lines.push(Line::new(id, part));
        }
        buffer
    }

    fn allocate_id(&mut self) -> BlockId {
        let id = BlockId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Get number of lines
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Get a line by index
    pub fn line(&self, idx: usize) -> Option<&Line> {
        self.lines.get(idx)
    }

    /// Get all lines
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Check if buffer is modified
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Mark buffer as modified or saved
    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    /// Insert a string (without newlines) at position
    pub fn insert_str(&mut self, line_idx: usize, byte_pos: usize, s: &str) -> EditEffect {
        match self.lines.get_mut(line_idx) {
            Some(line) if !s.is_empty() => {
                line.insert_str(byte_pos, s);
                self.modified = true;
                EditEffect::line(line_idx)
            }
            _ => EditEffect::default(),
        }
    }

    /// Insert a newline, splitting the current line.
    /// The upper half keeps its identity; the lower half gets a new one.
    pub fn insert_newline(&mut self, line_idx: usize, byte_pos: usize) -> EditEffect {
        if line_idx >= self.lines.len() {
            return EditEffect::default();
        }
        let remainder = self.lines[line_idx].split_off(byte_pos);
        let id = self.allocate_id();
        self.lines.insert(line_idx + 1, Line::new(id, remainder));
        self.modified = true;
        EditEffect::structural(line_idx)
    }

    /// Delete the character at position, joining with the next line at end of line
    pub fn delete_forward(&mut self, line_idx: usize, byte_pos: usize) -> EditEffect {
        let Some(line) = self.lines.get_mut(line_idx) else {
            return EditEffect::default();
        };
        if byte_pos < line.len() {
            let end = line.next_boundary(byte_pos);
            line.delete_range(byte_pos, end);
            self.modified = true;
            EditEffect::line(line_idx)
        } else if line_idx + 1 < self.lines.len() {
            self.join_line(line_idx);
            EditEffect::structural(line_idx)
        } else {
            EditEffect::default()
        }
    }

    /// Delete backward (backspace). Returns the effect and the new cursor position.
    pub fn delete_backward(&mut self, line_idx: usize, byte_pos: usize) -> (EditEffect, (usize, usize)) {
        let Some(line) = self.lines.get_mut(line_idx) else {
            return (EditEffect::default(), (line_idx, byte_pos));
        };
        if byte_pos > 0 {
            let start = line.prev_boundary(byte_pos);
            line.delete_range(start, byte_pos);
            self.modified = true;
            (EditEffect::line(line_idx), (line_idx, start))
        } else if line_idx > 0 {
            let join_pos = self.lines[line_idx - 1].len();
            self.join_line(line_idx - 1);
            (EditEffect::structural(line_idx - 1), (line_idx - 1, join_pos))
        } else {
            (EditEffect::default(), (line_idx, byte_pos))
        }
    }

    /// Join a line with the next one; the upper line keeps its identity
    fn join_line(&mut self, line_idx: usize) {
        if line_idx + 1 < self.lines.len() {
            let next = self.lines.remove(line_idx + 1);
            self.lines[line_idx].append_str(next.text());
            self.modified = true;
        }
    }

    /// Buffer contents joined with `\n`
    pub fn to_text(&self) -> String {
        let texts: Vec<&str> = self.lines.iter().map(Line::text).collect();
        texts.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_always_has_a_line() {
        assert_eq!(TextBuffer::from_text("").line_count(), 1);
        let buffer = TextBuffer::from_text("a\r\nb\n");
        assert_eq!(buffer.line_count(), 3);
        assert_eq!(buffer.line(0).unwrap().text(), "a");
        assert_eq!(buffer.line(2).unwrap().text(), "");
    }

    #[test]
    fn test_split_keeps_upper_identity() {
        let mut buffer = TextBuffer::from_text("x = 1\ny = 2");
        let upper = buffer.line(0).unwrap().id();
        let lower = buffer.line(1).unwrap().id();

        let effect = buffer.insert_newline(0, 1);
        assert!(effect.line_count_changed);
        assert_eq!(buffer.line_count(), 3);
        assert_eq!(buffer.line(0).unwrap().id(), upper);
        assert_eq!(buffer.line(2).unwrap().id(), lower);

        let fresh = buffer.line(1).unwrap().id();
        assert_ne!(fresh, upper);
        assert_ne!(fresh, lower);
        assert_eq!(buffer.line(1).unwrap().text(), " = 1");
    }

    #[test]
    fn test_backspace_joins_lines() {
        let mut buffer = TextBuffer::from_text("ab\ncd");
        let upper = buffer.line(0).unwrap().id();
        let (effect, cursor) = buffer.delete_backward(1, 0);
        assert!(effect.line_count_changed);
        assert_eq!(cursor, (0, 2));
        assert_eq!(buffer.to_text(), "abcd");
        assert_eq!(buffer.line(0).unwrap().id(), upper);
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut buffer = TextBuffer::from_text("abc");
        let (effect, cursor) = buffer.delete_backward(0, 0);
        assert!(effect.is_noop());
        assert_eq!(cursor, (0, 0));
        assert!(!buffer.is_modified());
    }

    #[test]
    fn test_delete_forward() {
        let mut buffer = TextBuffer::from_text("é\nz");
        let effect = buffer.delete_forward(0, 0);
        assert!(!effect.line_count_changed);
        assert_eq!(buffer.line(0).unwrap().text(), "");
        let effect = buffer.delete_forward(0, 0);
        assert!(effect.line_count_changed);
        assert_eq!(buffer.to_text(), "z");
        assert!(buffer.delete_forward(0, 1).is_noop());
    }

    #[test]
    fn test_round_trip_text() {
        let text = "def f():\n    return 1\n";
        assert_eq!(TextBuffer::from_text(text).to_text(), text);
    }
}
