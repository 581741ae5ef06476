//! Line (block) representation and text operations

use unicode_width::UnicodeWidthChar;

/// Stable identity of a block across edits to other blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u64);

/// A single line of text in a buffer
#[derive(Debug, Clone)]
pub struct Line {
    /// Identity used by the highlight cache
    id: BlockId,
    /// Bumped on every change to `text`
    revision: u64,
    /// The text content (without trailing newline)
    text: String,
}

impl Line {
    /// Create a line with the given identity and content
    pub fn new(id: BlockId, text: impl Into<String>) -> Self {
        Self {
            id,
            revision: 0,
            text: text.into(),
        }
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Get the text content
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the length in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    /// Insert a string at byte position
    pub fn insert_str(&mut self, byte_pos: usize, s: &str) {
        self.text.insert_str(byte_pos, s);
        self.touch();
    }

    /// Delete a range of bytes and return the deleted text
    pub fn delete_range(&mut self, start: usize, end: usize) -> String {
        let deleted: String = self.text[start..end].to_string();
        self.text.replace_range(start..end, "");
        self.touch();
        deleted
    }

    /// Split the line at byte position, returning the remainder text
    pub fn split_off(&mut self, byte_pos: usize) -> String {
        let remainder = self.text.split_off(byte_pos);
        self.touch();
        remainder
    }

    /// Append text to this line
    pub fn append_str(&mut self, s: &str) {
        self.text.push_str(s);
        self.touch();
    }

    /// Byte offset of the character boundary before `byte_pos`
    pub fn prev_boundary(&self, byte_pos: usize) -> usize {
        self.text[..byte_pos.min(self.text.len())]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    /// Byte offset of the character boundary after `byte_pos`
    pub fn next_boundary(&self, byte_pos: usize) -> usize {
        match self.text.get(byte_pos..).and_then(|s| s.chars().next()) {
            Some(ch) => byte_pos + ch.len_utf8(),
            None => self.text.len(),
        }
    }

    /// Display column of a byte position, expanding tabs to `tab_width` stops
    pub fn byte_to_col(&self, byte_pos: usize, tab_width: usize) -> usize {
        let mut col = 0;
        for (idx, ch) in self.text.char_indices() {
            if idx >= byte_pos {
                break;
            }
            col += char_width(ch, col, tab_width);
        }
        col
    }

    /// Byte position for a display column (clamped to the line end)
    pub fn col_to_byte(&self, col: usize, tab_width: usize) -> usize {
        let mut current = 0;
        for (idx, ch) in self.text.char_indices() {
            let w = char_width(ch, current, tab_width);
            if current + w > col {
                return idx;
            }
            current += w;
        }
        self.text.len()
    }
}

/// Display width of `ch` when drawn at display column `col`
pub fn char_width(ch: char, col: usize, tab_width: usize) -> usize {
    if ch == '\t' {
        let tab = tab_width.max(1);
        tab - (col % tab)
    } else {
        UnicodeWidthChar::width(ch).unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revision_bumps_on_edit() {
        let mut line = Line::new(BlockId(7), "print");
        assert_eq!(line.revision(), 0);
        line.insert_str(5, "(");
        line.append_str(")");
        assert_eq!(line.text(), "print()");
        assert_eq!(line.revision(), 2);
        assert_eq!(line.id(), BlockId(7));
    }

    #[test]
    fn test_split_and_delete() {
        let mut line = Line::new(BlockId(1), "Hello World");
        let rest = line.split_off(6);
        assert_eq!(line.text(), "Hello ");
        assert_eq!(rest, "World");
        assert_eq!(line.delete_range(0, 1), "H");
        assert_eq!(line.text(), "ello ");
    }

    #[test]
    fn test_boundaries_utf8() {
        let line = Line::new(BlockId(1), "café!");
        // 'é' occupies bytes 3..5
        assert_eq!(line.next_boundary(3), 5);
        assert_eq!(line.prev_boundary(5), 3);
        assert_eq!(line.next_boundary(6), 6);
        assert_eq!(line.prev_boundary(0), 0);
    }

    #[test]
    fn test_tab_columns() {
        let line = Line::new(BlockId(1), "\tx = 1");
        assert_eq!(line.byte_to_col(1, 4), 4);
        assert_eq!(line.byte_to_col(2, 4), 5);
        assert_eq!(line.col_to_byte(4, 4), 1);
        assert_eq!(line.col_to_byte(2, 4), 0);
        assert_eq!(line.col_to_byte(100, 4), line.len());
    }
}
