//! Geometry and glyph metrics shared by the decoration layer

use unicode_width::UnicodeWidthChar;

/// Integer rectangle; `right()` and `bottom()` are exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Whether `other` lies entirely inside this rectangle
    pub fn contains(&self, other: &Rect) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }

    /// Whether the vertical extents overlap
    pub fn intersects_rows(&self, top: i32, bottom: i32) -> bool {
        top < self.bottom() && bottom > self.top()
    }

    pub fn translated(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// Glyph measurements of the active font
pub trait FontMetrics {
    /// Horizontal advance of a single character
    fn advance(&self, ch: char) -> i32;

    /// Height of one text line
    fn line_height(&self) -> i32;

    /// Horizontal advance of a string
    fn text_width(&self, text: &str) -> i32 {
        text.chars().map(|ch| self.advance(ch)).sum()
    }
}

/// Terminal metrics: one cell per column, one row per line
#[derive(Debug, Clone, Copy, Default)]
pub struct CellMetrics;

impl FontMetrics for CellMetrics {
    fn advance(&self, ch: char) -> i32 {
        UnicodeWidthChar::width(ch).unwrap_or(1) as i32
    }

    fn line_height(&self) -> i32 {
        1
    }
}
