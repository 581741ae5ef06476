//! Editor - the host surface
//!
//! Owns the `EditorState`, applies user actions to it and forwards the
//! resulting notifications (line count, dirty rows, scroll, cursor) to the
//! gutter, the current-line marker and the highlight cache.

use crossterm::event::Event;
use tracing::{debug, info, trace, warn};

use crate::buffer::{EditEffect, TextBuffer};
use crate::config::Config;
use crate::decoration::{
    highlight_current_line, CellMetrics, ExtraSelection, Gutter, GutterStyle, Rect,
    CURRENT_LINE_COLOR,
};
use crate::error::Result;
use crate::input::{translate_key, Action};
use crate::render::{self, gutter_cell, layout_row, Frame, Row};
use crate::save::{self, SaveRequest};
use crate::state::EditorState;
use crate::syntax::{python_language, HighlightCache, LanguageDefinition};
use crate::terminal::Terminal;

/// The editing surface and everything decorating it
pub struct Editor {
    state: EditorState,
    metrics: CellMetrics,
    language: LanguageDefinition,
    cache: HighlightCache,
    /// None when line numbers are switched off
    gutter: Option<Gutter>,
    selections: Vec<ExtraSelection>,
    gutter_style: GutterStyle,
    target: SaveRequest,
    tab_width: usize,
    message: Option<String>,
    /// Ctrl-Q was pressed once with unsaved changes
    quit_armed: bool,
    running: bool,
}

impl Editor {
    /// Create an editor of `cols` x `rows` cells (the last row is the status line)
    pub fn new(config: &Config, target: SaveRequest, text: &str, cols: usize, rows: usize) -> Self {
        let buffer = TextBuffer::from_text(text);
        let text_rows = rows.saturating_sub(1).max(1);
        let mut state = EditorState::new(buffer, cells(cols), cells(text_rows));
        let metrics = CellMetrics;

        let gutter_style = GutterStyle {
            margin: config.gutter_margin,
            right_padding: config.gutter_padding,
            ..GutterStyle::default()
        };
        let gutter = if config.show_line_numbers {
            let mut gutter = Gutter::new(gutter_style);
            gutter.attach(&mut state, &metrics);
            Some(gutter)
        } else {
            None
        };

        let selections = highlight_current_line(&state, CURRENT_LINE_COLOR);
        debug!(mode = config.highlight_mode.name(), lines = state.line_count(), "editor created");

        Self {
            state,
            metrics,
            language: python_language(),
            cache: HighlightCache::new(config.highlight_mode),
            gutter,
            selections,
            gutter_style,
            target,
            tab_width: config.tab_width,
            message: None,
            quit_armed: false,
            running: true,
        }
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.state.set_read_only(read_only);
        self.selections = highlight_current_line(&self.state, CURRENT_LINE_COLOR);
    }

    /// Place the cursor (used before the first frame)
    pub fn move_cursor_to(&mut self, line: usize, col: usize) {
        self.state.set_cursor(line, col);
        self.after_cursor_move();
    }

    /// Main loop: draw, wait for input, apply it
    pub fn run(&mut self, terminal: &mut Terminal) -> Result<()> {
        while self.running {
            let frame = self.frame();
            render::draw_frame(terminal.out(), &frame)?;

            match terminal.read_event()? {
                Event::Key(key) => {
                    if let Some(action) = translate_key(key) {
                        self.apply(action);
                    }
                }
                Event::Resize(cols, rows) => self.resize(cols, rows),
                _ => {}
            }
        }
        Ok(())
    }

    /// Apply a single action
    pub fn apply(&mut self, action: Action) {
        if action != Action::Quit {
            self.quit_armed = false;
        }
        self.message = None;

        match action {
            Action::Insert(ch) => self.insert_text(&ch.to_string()),
            Action::Tab => self.insert_text(&" ".repeat(self.tab_width)),
            Action::Newline => {
                if self.refuse_if_read_only() {
                    return;
                }
                let cur = self.state.cursor();
                let effect = self.state.buffer_mut().insert_newline(cur.line, cur.col);
                self.after_edit(effect);
                self.state.set_cursor(cur.line + 1, 0);
                self.after_cursor_move();
            }
            Action::Backspace => {
                if self.refuse_if_read_only() {
                    return;
                }
                let cur = self.state.cursor();
                let (effect, (line, col)) = self.state.buffer_mut().delete_backward(cur.line, cur.col);
                self.after_edit(effect);
                self.state.set_cursor(line, col);
                self.after_cursor_move();
            }
            Action::Delete => {
                if self.refuse_if_read_only() {
                    return;
                }
                let cur = self.state.cursor();
                let effect = self.state.buffer_mut().delete_forward(cur.line, cur.col);
                self.after_edit(effect);
                self.after_cursor_move();
            }
            Action::Left => self.move_horizontal(false),
            Action::Right => self.move_horizontal(true),
            Action::Up => self.move_vertical(-1),
            Action::Down => self.move_vertical(1),
            Action::Home => {
                let line = self.state.cursor().line;
                self.move_cursor_to(line, 0);
            }
            Action::End => {
                let line = self.state.cursor().line;
                self.move_cursor_to(line, usize::MAX);
            }
            Action::PageUp => self.page(-1),
            Action::PageDown => self.page(1),
            Action::Save => self.save(),
            Action::ToggleReadOnly => {
                let read_only = !self.state.is_read_only();
                self.set_read_only(read_only);
                self.message = Some(if read_only { "Read-only" } else { "Editable" }.to_string());
            }
            Action::ToggleHighlightMode => {
                let mode = self.cache.mode().toggled();
                self.cache.set_mode(mode);
                debug!(mode = mode.name(), "highlight mode switched");
                self.message = Some(format!("Highlight mode: {}", mode.name()));
            }
            Action::Quit => {
                if self.state.buffer().is_modified() && !self.quit_armed {
                    self.quit_armed = true;
                    self.message = Some("Unsaved changes; press C-q again to quit".to_string());
                } else {
                    self.running = false;
                }
            }
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        let text_rows = rows.saturating_sub(1).max(1);
        self.state.resize(i32::from(cols), i32::from(text_rows));
        if let Some(gutter) = &mut self.gutter {
            gutter.attach(&mut self.state, &self.metrics);
        }
        self.after_cursor_move();
    }

    fn refuse_if_read_only(&mut self) -> bool {
        if self.state.is_read_only() {
            self.message = Some("Buffer is read-only".to_string());
            true
        } else {
            false
        }
    }

    fn insert_text(&mut self, text: &str) {
        if self.refuse_if_read_only() {
            return;
        }
        let cur = self.state.cursor();
        let effect = self.state.buffer_mut().insert_str(cur.line, cur.col, text);
        self.after_edit(effect);
        self.state.set_cursor(cur.line, cur.col + text.len());
        self.after_cursor_move();
    }

    fn move_horizontal(&mut self, forward: bool) {
        let cur = self.state.cursor();
        let Some(line) = self.state.buffer().line(cur.line) else {
            return;
        };
        let (line_idx, col) = if forward {
            if cur.col < line.len() {
                (cur.line, line.next_boundary(cur.col))
            } else if cur.line + 1 < self.state.line_count() {
                (cur.line + 1, 0)
            } else {
                return;
            }
        } else if cur.col > 0 {
            (cur.line, line.prev_boundary(cur.col))
        } else if cur.line > 0 {
            let prev_len = self.state.buffer().line(cur.line - 1).map_or(0, |l| l.len());
            (cur.line - 1, prev_len)
        } else {
            return;
        };
        self.move_cursor_to(line_idx, col);
    }

    fn move_vertical(&mut self, delta: isize) {
        let cur = self.state.cursor();
        let target = cur.line.saturating_add_signed(delta);
        if target >= self.state.line_count() || target == cur.line {
            return;
        }
        self.move_to_line_keeping_column(target);
    }

    /// Move to `target`, keeping the display column (not the byte offset)
    fn move_to_line_keeping_column(&mut self, target: usize) {
        let cur = self.state.cursor();
        let buffer = self.state.buffer();
        let target = target.min(buffer.line_count().saturating_sub(1));
        let display_col = buffer.line(cur.line).map_or(0, |l| l.byte_to_col(cur.col, self.tab_width));
        let col = buffer
            .line(target)
            .map_or(0, |l| l.col_to_byte(display_col, self.tab_width));
        self.move_cursor_to(target, col);
    }

    fn page(&mut self, direction: isize) {
        let page = self.state.visible_lines(&self.metrics).saturating_sub(1).max(1);
        let dy = self.state.scroll_lines(&self.metrics, direction as i32 * page as i32);
        self.notify_scroll(dy);
        let target = self.state.cursor().line.saturating_add_signed(direction * page as isize);
        self.move_to_line_keeping_column(target);
    }

    fn save(&mut self) {
        let text = self.state.buffer().to_text();
        match save::save(&self.target, &text) {
            Ok(saved) => {
                self.state.buffer_mut().set_modified(false);
                self.message = Some(format!("File created: {}", saved.path.display()));
            }
            Err(e) => {
                warn!(error = %e, "save failed");
                self.message = Some(format!("Could not save file: {e}"));
            }
        }
    }

    /// Content changed: update the gutter width on line-count changes and
    /// repaint the affected rows
    fn after_edit(&mut self, effect: EditEffect) {
        let Some(first_line) = effect.first_line else {
            return;
        };
        if effect.line_count_changed {
            self.cache.retain_blocks(self.state.buffer().lines());
        }
        let Some(gutter) = &mut self.gutter else {
            return;
        };
        if effect.line_count_changed {
            gutter.on_block_count_changed(&mut self.state, &self.metrics);
        }

        let height = self.state.contents_rect().height;
        let top = self.state.block_top(&self.metrics, first_line);
        let rows = if effect.line_count_changed {
            height - top
        } else {
            self.state.block_height(&self.metrics, first_line)
        };
        let width = self.state.viewport().width;
        let update = gutter.on_viewport_change(&mut self.state, &self.metrics, 0, Rect::new(0, top, width, rows));
        trace!(repainted = ?update.repainted, width_changed = update.width_changed, "gutter band repainted");
    }

    fn notify_scroll(&mut self, dy: i32) {
        if dy == 0 {
            return;
        }
        if let Some(gutter) = &mut self.gutter {
            let viewport = self.state.viewport();
            let full = Rect::new(0, 0, viewport.width, viewport.height);
            let update = gutter.on_viewport_change(&mut self.state, &self.metrics, dy, full);
            trace!(scrolled_by = update.scrolled_by, repainted = ?update.repainted, "gutter scrolled");
        }
    }

    /// Cursor moved: keep it in view and move the current-line marker
    fn after_cursor_move(&mut self) {
        let dy = self.state.ensure_cursor_visible(&self.metrics);
        self.notify_scroll(dy);
        let text_cols = self.state.viewport().width.max(1) as usize;
        self.state.ensure_cursor_column_visible(text_cols, self.tab_width);
        self.selections = highlight_current_line(&self.state, CURRENT_LINE_COLOR);
    }

    fn status_line(&self) -> String {
        if let Some(msg) = &self.message {
            return msg.clone();
        }
        let cur = self.state.cursor();
        let target = self
            .target
            .target_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|e| e.to_string());
        let modified = if self.state.buffer().is_modified() { "**" } else { "--" };
        let ro = if self.state.is_read_only() { " [RO]" } else { "" };
        format!(
            "{modified} pymaker: {target}  L{} C{}  {}{ro}  C-s save  C-q quit",
            cur.line + 1,
            cur.col + 1,
            self.cache.mode().name(),
        )
    }

    /// Build the data for the next screen
    pub fn frame(&mut self) -> Frame {
        let height = self.state.contents_rect().height.max(0) as usize;
        let first = self.state.first_visible_block(&self.metrics);
        let gutter_width = self.gutter.as_ref().map_or(0, |g| g.width()).max(0) as usize;
        let text_cols = self.state.viewport().width.max(0) as usize;
        let scroll_x = self.state.scroll_x();

        let mut rows = Vec::with_capacity(height);
        for row_idx in 0..height {
            let line_idx = first + row_idx;
            let gutter = self.gutter.as_ref().map(|g| match g.label_at(row_idx as i32) {
                Some(label) => gutter_cell(&label.text(), label.text_x.max(0) as usize, gutter_width),
                None => " ".repeat(gutter_width),
            });

            let Some(line) = self.state.buffer().line(line_idx) else {
                rows.push(Row { gutter, runs: Vec::new(), fill: None });
                continue;
            };

            let fill = self
                .selections
                .iter()
                .find(|s| s.full_width && s.is_collapsed() && s.line == line_idx)
                .map(|s| s.style.bg);
            let spans = self.cache.spans_for(&self.language, line);
            let runs = layout_row(line, spans, scroll_x, text_cols, self.tab_width, fill);
            rows.push(Row { gutter, runs, fill });
        }

        let cur = self.state.cursor();
        let cursor_col = self
            .state
            .buffer()
            .line(cur.line)
            .map_or(0, |l| l.byte_to_col(cur.col, self.tab_width));
        let screen_col = gutter_width + cursor_col.saturating_sub(scroll_x);
        let screen_row = self.state.block_top(&self.metrics, cur.line).max(0);

        Frame {
            width: screen_u16(self.state.contents_rect().width.max(0) as usize),
            rows,
            gutter_style: self.gutter_style,
            status: self.status_line(),
            cursor: (screen_u16(screen_col), screen_u16(screen_row as usize)),
        }
    }
}

fn cells(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

fn screen_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// A frame holding every line of `text`, sized so nothing is clipped
fn listing_frame(config: &Config, text: &str, cursor_line: Option<usize>) -> Frame {
    let line_count = text.split('\n').count();
    let cell_width = config.tab_width.max(2);
    let longest = text.split('\n').map(|l| l.chars().count() * cell_width).max().unwrap_or(0);

    let target = SaveRequest::from_config(config);
    let mut editor = Editor::new(config, target, text, longest + 16, line_count + 1);
    match cursor_line {
        Some(line) => editor.move_cursor_to(line.saturating_sub(1), 0),
        None => editor.set_read_only(true),
    }
    editor.frame()
}

/// Print a decorated listing of `text` without entering raw mode
pub fn print_listing(config: &Config, text: &str, cursor_line: Option<usize>) -> Result<()> {
    let frame = listing_frame(config, text, cursor_line);
    let mut stdout = std::io::stdout();
    render::print_listing(&mut stdout, &frame.rows, &frame.gutter_style)?;
    info!(lines = frame.rows.len(), "printed listing");
    Ok(())
}
