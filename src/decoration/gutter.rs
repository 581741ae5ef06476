//! Line-number gutter
//!
//! The gutter sits left of the viewport. Its width follows the number of
//! digits in the line count, and its painted labels follow scrolling by
//! being shifted rather than repainted.

use tracing::debug;

use super::metrics::{FontMetrics, Rect};
use crate::state::EditorState;
use crate::syntax::Color;

/// Gutter colors and spacing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GutterStyle {
    /// Fixed part of the gutter width
    pub margin: i32,
    /// Gap between the right edge of a number and the viewport
    pub right_padding: i32,
    pub background: Color,
    pub foreground: Color,
}

impl Default for GutterStyle {
    fn default() -> Self {
        Self {
            margin: 10,
            right_padding: 4,
            background: Color::rgb(245, 245, 245),
            foreground: Color::rgb(120, 120, 120),
        }
    }
}

/// One painted line number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GutterLabel {
    /// 1-based line number
    pub line_number: usize,
    /// Area the number is aligned in, in gutter coordinates
    pub rect: Rect,
    /// Left edge of the right-aligned text
    pub text_x: i32,
}

impl GutterLabel {
    pub fn text(&self) -> String {
        self.line_number.to_string()
    }
}

/// What `Gutter::on_viewport_change` did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GutterUpdate {
    /// Amount the existing labels were shifted
    pub scrolled_by: i32,
    /// Band that was repainted
    pub repainted: Option<Rect>,
    /// Whether the width was recomputed to a new value
    pub width_changed: bool,
}

/// Number of decimal digits in `n` (at least 1)
pub fn digit_count(n: usize) -> u32 {
    n.max(1).ilog10() + 1
}

/// `margin + width('9') * digits(max(1, line_count))`
pub fn compute_gutter_width(line_count: usize, metrics: &dyn FontMetrics, margin: i32) -> i32 {
    margin + metrics.advance('9') * digit_count(line_count) as i32
}

/// Labels for every block whose extent intersects `region`.
///
/// Block tops come from cumulative block heights starting at the first
/// visible block.
pub fn paint_gutter(
    state: &EditorState,
    metrics: &dyn FontMetrics,
    width: i32,
    style: &GutterStyle,
    region: Rect,
) -> Vec<GutterLabel> {
    let mut labels = Vec::new();
    let count = state.line_count();
    let right = (width - style.right_padding).max(0);

    let mut block = state.first_visible_block(metrics);
    let mut top = state.block_top(metrics, block);
    let mut bottom = top + state.block_height(metrics, block);

    while block < count && top < region.bottom() {
        if bottom > region.top() {
            let text_x = (right - metrics.text_width(&(block + 1).to_string())).max(0);
            labels.push(GutterLabel {
                line_number: block + 1,
                rect: Rect::new(0, top, right, metrics.line_height()),
                text_x,
            });
        }
        block += 1;
        top = bottom;
        bottom = top + state.block_height(metrics, block);
    }

    labels
}

/// The gutter widget: current width plus the labels painted so far
#[derive(Debug, Clone)]
pub struct Gutter {
    style: GutterStyle,
    width: i32,
    labels: Vec<GutterLabel>,
}

impl Gutter {
    pub fn new(style: GutterStyle) -> Self {
        Self {
            style,
            width: 0,
            labels: Vec::new(),
        }
    }

    /// Size the gutter for `state` and paint it from scratch
    pub fn attach(&mut self, state: &mut EditorState, metrics: &dyn FontMetrics) {
        self.update_width(state, metrics);
        self.repaint_all(state, metrics);
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    /// Painted labels, ordered top to bottom
    #[cfg(test)]
    pub fn labels(&self) -> &[GutterLabel] {
        &self.labels
    }

    /// Label whose rows cover `y`
    pub fn label_at(&self, y: i32) -> Option<&GutterLabel> {
        let idx = self.labels.partition_point(|l| l.rect.bottom() <= y);
        self.labels.get(idx).filter(|l| l.rect.top() <= y)
    }

    /// Recompute the width and apply it as the viewport's left inset.
    /// Returns true if the width changed.
    pub fn update_width(&mut self, state: &mut EditorState, metrics: &dyn FontMetrics) -> bool {
        let width = compute_gutter_width(state.line_count(), metrics, self.style.margin);
        state.set_viewport_margins(width);
        if width == self.width {
            return false;
        }
        debug!(old = self.width, new = width, lines = state.line_count(), "gutter width changed");
        self.width = width;
        // Right alignment depends on the width
        self.repaint_all(state, metrics);
        true
    }

    /// Line insertion or deletion
    pub fn on_block_count_changed(&mut self, state: &mut EditorState, metrics: &dyn FontMetrics) -> bool {
        self.update_width(state, metrics)
    }

    /// Viewport scrolled by `dy` or the area `dirty` (viewport coordinates) changed.
    ///
    /// A scroll shifts the painted labels and repaints only the strip that
    /// scrolled into view; otherwise only the band covered by `dirty` is
    /// repainted. A `dirty` area covering the whole viewport also re-checks
    /// the width.
    pub fn on_viewport_change(
        &mut self,
        state: &mut EditorState,
        metrics: &dyn FontMetrics,
        dy: i32,
        dirty: Rect,
    ) -> GutterUpdate {
        let height = state.contents_rect().height;
        let mut update = GutterUpdate::default();

        if dy != 0 {
            self.shift(dy, height);
            let exposed = if dy < 0 {
                Rect::new(0, height + dy, self.width, -dy)
            } else {
                Rect::new(0, 0, self.width, dy)
            };
            let exposed = clip_rows(exposed, height);
            self.repaint(state, metrics, exposed);
            update.scrolled_by = dy;
            update.repainted = Some(exposed);
        } else {
            let band = clip_rows(Rect::new(0, dirty.y, self.width, dirty.height), height);
            self.repaint(state, metrics, band);
            update.repainted = Some(band);
        }

        let viewport = state.viewport();
        let local = Rect::new(0, 0, viewport.width, viewport.height);
        if dirty.contains(&local) {
            update.width_changed = self.update_width(state, metrics);
        }

        update
    }

    fn shift(&mut self, dy: i32, height: i32) {
        for label in &mut self.labels {
            label.rect = label.rect.translated(0, dy);
        }
        self.labels
            .retain(|l| l.rect.bottom() > 0 && l.rect.top() < height);
    }

    /// Repaint the labels intersecting `region`
    pub fn repaint(&mut self, state: &EditorState, metrics: &dyn FontMetrics, region: Rect) {
        if region.is_empty() {
            return;
        }
        self.labels
            .retain(|l| !region.intersects_rows(l.rect.top(), l.rect.bottom()));
        self.labels
            .extend(paint_gutter(state, metrics, self.width, &self.style, region));
        self.labels.sort_by_key(|l| l.rect.y);
    }

    fn repaint_all(&mut self, state: &EditorState, metrics: &dyn FontMetrics) {
        self.labels.clear();
        let height = state.contents_rect().height;
        self.repaint(state, metrics, Rect::new(0, 0, self.width, height));
    }
}

fn clip_rows(rect: Rect, height: i32) -> Rect {
    let top = rect.top().max(0);
    let bottom = rect.bottom().min(height);
    Rect::new(rect.x, top, rect.width, (bottom - top).max(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::TextBuffer;
    use crate::decoration::CellMetrics;

    /// Pixel metrics: 8 wide digits, 16 high lines
    struct FixedMetrics;

    impl FontMetrics for FixedMetrics {
        fn advance(&self, _ch: char) -> i32 {
            8
        }

        fn line_height(&self) -> i32 {
            16
        }
    }

    fn state(lines: usize, width: i32, height: i32) -> EditorState {
        let text = vec!["pass"; lines].join("\n");
        EditorState::new(TextBuffer::from_text(&text), width, height)
    }

    fn assert_labels_match_blocks(gutter: &Gutter, state: &EditorState, metrics: &dyn FontMetrics) {
        for label in gutter.labels() {
            assert!(label.rect.height > 0);
            assert_eq!(
                label.rect.top(),
                state.block_top(metrics, label.line_number - 1),
                "line {} painted at the wrong row",
                label.line_number
            );
        }
    }

    #[test]
    fn test_digit_count() {
        assert_eq!(digit_count(0), 1);
        assert_eq!(digit_count(1), 1);
        assert_eq!(digit_count(9), 1);
        assert_eq!(digit_count(10), 2);
        assert_eq!(digit_count(999), 3);
        assert_eq!(digit_count(1000), 4);
    }

    #[test]
    fn test_width_formula_and_monotonic() {
        let m = FixedMetrics;
        let mut previous = 0;
        for n in 1..=12_000 {
            let w = compute_gutter_width(n, &m, 10);
            assert_eq!(w, 10 + 8 * digit_count(n) as i32);
            assert!(w >= previous);
            previous = w;
        }
        assert_eq!(compute_gutter_width(0, &m, 10), compute_gutter_width(1, &m, 10));
    }

    #[test]
    fn test_attach_sets_viewport_margin() {
        let m = FixedMetrics;
        let mut s = state(120, 400, 160);
        let mut gutter = Gutter::new(GutterStyle::default());
        gutter.attach(&mut s, &m);
        assert_eq!(gutter.width(), 10 + 8 * 3);
        assert_eq!(s.viewport().left(), gutter.width());
        assert_eq!(gutter.labels().len(), 10);
        assert_labels_match_blocks(&gutter, &s, &m);
    }

    #[test]
    fn test_labels_right_aligned_with_padding() {
        let m = FixedMetrics;
        let mut s = state(12, 400, 320);
        let mut gutter = Gutter::new(GutterStyle::default());
        gutter.attach(&mut s, &m);
        // width = 10 + 16, right edge at 26 - 4
        let first = &gutter.labels()[0];
        assert_eq!(first.rect.right(), 22);
        assert_eq!(first.text_x, 22 - 8);
        let twelfth = gutter.labels().iter().find(|l| l.line_number == 12).unwrap();
        assert_eq!(twelfth.text_x, 22 - 16);
    }

    #[test]
    fn test_paint_only_intersecting_blocks() {
        let m = FixedMetrics;
        let s = state(50, 400, 160);
        let labels = paint_gutter(&s, &m, 30, &GutterStyle::default(), Rect::new(0, 20, 30, 20));
        let numbers: Vec<_> = labels.iter().map(|l| l.line_number).collect();
        // rows 20..40 touch lines 2 (16..32) and 3 (32..48)
        assert_eq!(numbers, vec![2, 3]);
    }

    #[test]
    fn test_width_grows_with_line_count() {
        let m = CellMetrics;
        let mut s = state(9, 40, 20);
        let mut gutter = Gutter::new(GutterStyle { margin: 1, right_padding: 1, ..Default::default() });
        gutter.attach(&mut s, &m);
        assert_eq!(gutter.width(), 2);

        s.buffer_mut().insert_newline(8, 4);
        assert!(gutter.on_block_count_changed(&mut s, &m));
        assert_eq!(gutter.width(), 3);
        assert_eq!(s.viewport(), Rect::new(3, 0, 37, 20));
        assert!(!gutter.on_block_count_changed(&mut s, &m));
    }

    #[test]
    fn test_scroll_never_relabels() {
        let m = FixedMetrics;
        let mut s = state(200, 400, 160);
        let mut gutter = Gutter::new(GutterStyle::default());
        gutter.attach(&mut s, &m);
        let visible = s.viewport();
        let full = Rect::new(0, 0, visible.width, visible.height);

        for lines in [3, 1, -2, 7, -9, 40] {
            let dy = s.scroll_lines(&m, lines);
            let update = gutter.on_viewport_change(&mut s, &m, dy, full);
            assert_eq!(update.scrolled_by, dy);
            assert_labels_match_blocks(&gutter, &s, &m);

            // Every row is covered by exactly one label
            for row in (0..160).step_by(16) {
                let covering = gutter
                    .labels()
                    .iter()
                    .filter(|l| l.rect.top() <= row && row < l.rect.bottom())
                    .count();
                assert_eq!(covering, 1, "row {row} after scrolling {lines}");
            }
        }
    }

    #[test]
    fn test_scroll_repaints_only_exposed_strip() {
        let m = CellMetrics;
        let mut s = state(100, 40, 10);
        let mut gutter = Gutter::new(GutterStyle { margin: 1, right_padding: 1, ..Default::default() });
        gutter.attach(&mut s, &m);
        let dy = s.scroll_lines(&m, 2);
        let update = gutter.on_viewport_change(&mut s, &m, dy, Rect::new(0, 0, 1, 1));
        assert_eq!(update.repainted, Some(Rect::new(0, 8, gutter.width(), 2)));
        assert_eq!(gutter.label_at(0).map(|l| l.line_number), Some(3));
        assert_eq!(gutter.label_at(9).map(|l| l.line_number), Some(12));
    }

    #[test]
    fn test_dirty_band_repaint_drops_deleted_lines() {
        let m = CellMetrics;
        let mut s = state(5, 40, 10);
        let mut gutter = Gutter::new(GutterStyle { margin: 1, right_padding: 1, ..Default::default() });
        gutter.attach(&mut s, &m);
        assert_eq!(gutter.labels().len(), 5);

        s.buffer_mut().delete_backward(4, 0);
        let update = gutter.on_viewport_change(&mut s, &m, 0, Rect::new(0, 3, 30, 7));
        assert_eq!(update.repainted, Some(Rect::new(0, 3, 2, 7)));
        assert!(!update.width_changed);
        let numbers: Vec<_> = gutter.labels().iter().map(|l| l.line_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_full_dirty_rect_rechecks_width() {
        let m = CellMetrics;
        let mut s = state(9, 40, 10);
        let mut gutter = Gutter::new(GutterStyle { margin: 1, right_padding: 1, ..Default::default() });
        gutter.attach(&mut s, &m);
        // A line arrives without a line-count notification
        s.buffer_mut().insert_newline(0, 0);
        let viewport = s.viewport();
        let update = gutter.on_viewport_change(&mut s, &m, 0, Rect::new(0, 0, viewport.width, viewport.height));
        assert!(update.width_changed);
        assert_eq!(gutter.width(), 3);
    }
}
