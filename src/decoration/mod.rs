//! Editor decorations: the line-number gutter and the current-line marker
//!
//! Everything here is a function of an `EditorState` and the active font's
//! metrics; nothing depends on a particular UI toolkit.

mod current_line;
mod gutter;
mod metrics;

pub use current_line::{highlight_current_line, ExtraSelection, CURRENT_LINE_COLOR};
pub use gutter::{Gutter, GutterStyle};
pub use metrics::{CellMetrics, FontMetrics, Rect};
