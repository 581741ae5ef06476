//! Frame layout and drawing
//!
//! The editor builds a `Frame` of plain data (gutter text, styled runs and
//! row backgrounds); the functions here turn it into crossterm commands on
//! any writer.

use std::io::Write;

use crossterm::{
    cursor, queue,
    style::{self, Attribute, Print, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};

use crate::decoration::GutterStyle;
use crate::error::Result;
use crate::line::{char_width, Line};
use crate::syntax::{Color, Span, Style};

/// A run of text drawn with one style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledRun {
    pub text: String,
    pub style: Style,
}

/// One screen row
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    /// Gutter cell text, already padded to the gutter width
    pub gutter: Option<String>,
    pub runs: Vec<StyledRun>,
    /// Background extended across the full row (current-line marker)
    pub fill: Option<Color>,
}

#[cfg(test)]
impl Row {
    /// Text of the row without styling
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// Everything needed to draw one screen
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u16,
    pub rows: Vec<Row>,
    pub gutter_style: GutterStyle,
    pub status: String,
    /// Screen position of the text cursor (column, row)
    pub cursor: (u16, u16),
}

/// Lay out the visible part of a line.
///
/// Tabs are expanded, `scroll_x` columns are skipped and at most `max_cols`
/// columns are kept. `fill` becomes the background of cells without one.
/// `spans` must be sorted and non-overlapping.
pub fn layout_row(
    line: &Line,
    spans: &[Span],
    scroll_x: usize,
    max_cols: usize,
    tab_width: usize,
    fill: Option<Color>,
) -> Vec<StyledRun> {
    let mut runs: Vec<StyledRun> = Vec::new();
    let mut col = 0;
    let end_col = scroll_x.saturating_add(max_cols);
    let mut span_idx = 0;

    for (byte, ch) in line.text().char_indices() {
        let width = char_width(ch, col, tab_width);
        let start = col;
        col += width;
        if col <= scroll_x {
            continue;
        }
        if col > end_col {
            break;
        }

        while spans.get(span_idx).is_some_and(|s| s.end <= byte) {
            span_idx += 1;
        }
        let mut cell_style = spans
            .get(span_idx)
            .filter(|s| s.contains(byte))
            .map(|s| s.style)
            .unwrap_or_default();
        if let Some(bg) = fill {
            if cell_style.bg == Color::Default {
                cell_style = cell_style.with_bg(bg);
            }
        }

        let visible = if ch == '\t' || start < scroll_x {
            // Partially scrolled wide chars and tabs become blanks
            " ".repeat(col - start.max(scroll_x))
        } else {
            ch.to_string()
        };

        match runs.last_mut() {
            Some(run) if run.style == cell_style => run.text.push_str(&visible),
            _ => runs.push(StyledRun {
                text: visible,
                style: cell_style,
            }),
        }
    }

    runs
}

/// Gutter cell text: `text` starting at `text_x`, padded to `width`
pub fn gutter_cell(text: &str, text_x: usize, width: usize) -> String {
    let mut cell = " ".repeat(text_x);
    cell.push_str(text);
    while cell.len() < width {
        cell.push(' ');
    }
    cell
}

fn to_crossterm(color: Color) -> Option<style::Color> {
    match color {
        Color::Default => None,
        Color::Rgb(r, g, b) => Some(style::Color::Rgb { r, g, b }),
    }
}

fn apply_style<W: Write>(out: &mut W, style: &Style) -> Result<()> {
    if style.is_default() {
        return Ok(());
    }
    if let Some(fg) = to_crossterm(style.fg) {
        queue!(out, SetForegroundColor(fg))?;
    }
    if let Some(bg) = to_crossterm(style.bg) {
        queue!(out, SetBackgroundColor(bg))?;
    }
    if style.bold {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    if style.italic {
        queue!(out, SetAttribute(Attribute::Italic))?;
    }
    Ok(())
}

fn reset<W: Write>(out: &mut W) -> Result<()> {
    queue!(out, SetAttribute(Attribute::Reset), style::ResetColor)?;
    Ok(())
}

/// Draw gutter and text of a row at the current position; returns the
/// number of columns written
fn write_row<W: Write>(out: &mut W, row: &Row, gutter: &GutterStyle) -> Result<usize> {
    let mut written = 0;

    if let Some(cell) = &row.gutter {
        apply_style(out, &Style::fg(gutter.foreground).with_bg(gutter.background))?;
        queue!(out, Print(cell))?;
        reset(out)?;
        written += cell.chars().count();
    }

    for run in &row.runs {
        apply_style(out, &run.style)?;
        queue!(out, Print(&run.text))?;
        reset(out)?;
        written += run
            .text
            .chars()
            .map(|ch| unicode_width::UnicodeWidthChar::width(ch).unwrap_or(1))
            .sum::<usize>();
    }

    Ok(written)
}

/// Draw a full screen: text rows, status line, then the cursor
pub fn draw_frame<W: Write>(out: &mut W, frame: &Frame) -> Result<()> {
    queue!(out, cursor::Hide)?;

    for (idx, row) in frame.rows.iter().enumerate() {
        queue!(out, cursor::MoveTo(0, idx as u16))?;
        let written = write_row(out, row, &frame.gutter_style)?;
        if let Some(fill) = row.fill {
            let remaining = (frame.width as usize).saturating_sub(written);
            apply_style(out, &Style::bg(fill))?;
            queue!(out, Print(" ".repeat(remaining)))?;
            reset(out)?;
        } else {
            queue!(out, terminal::Clear(ClearType::UntilNewLine))?;
        }
    }

    let status_row = frame.rows.len() as u16;
    queue!(
        out,
        cursor::MoveTo(0, status_row),
        SetAttribute(Attribute::Reverse),
        Print(truncate(&frame.status, frame.width as usize)),
        terminal::Clear(ClearType::UntilNewLine),
        SetAttribute(Attribute::Reset),
    )?;

    queue!(out, cursor::MoveTo(frame.cursor.0, frame.cursor.1), cursor::Show)?;
    out.flush()?;
    Ok(())
}

/// Print rows one per line, for non-interactive output
pub fn print_listing<W: Write>(out: &mut W, rows: &[Row], gutter: &GutterStyle) -> Result<()> {
    for row in rows {
        write_row(out, row, gutter)?;
        queue!(out, Print("\n"))?;
    }
    out.flush()?;
    Ok(())
}

fn truncate(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(1);
        if width + w > max_width {
            break;
        }
        result.push(ch);
        width += w;
    }
    result
}
