//! The drawing surface the layout engine draws against.
//!
//! Coordinates are millimetres from the top-left corner of the page; `y` is the
//! text baseline. Pages are numbered from 1. A surface starts with one blank page.

use serde::Serialize;
use thiserror::Error;

use super::font_metrics::{text_width_mm, FontSpec};

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("page {page} out of range (document has {count} pages)")]
    PageOutOfRange { page: usize, count: usize },

    #[error("non-finite coordinate ({x}, {y})")]
    InvalidCoordinate { x: f32, y: f32 },

    #[error("invalid rectangle size {w}x{h}")]
    InvalidRect { w: f32, h: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RectStyle {
    Fill,
    Stroke,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    pub fn gray(level: u8) -> Self {
        Rgb(level, level, level)
    }
}

pub trait Surface {
    /// Page width and height in mm.
    fn page_size(&self) -> (f32, f32);
    fn page_count(&self) -> usize;
    /// 1-based index of the page currently receiving drawing calls.
    fn current_page(&self) -> usize;
    /// Appends a blank page and makes it current.
    fn add_page(&mut self);
    fn set_page(&mut self, page: usize) -> Result<(), SurfaceError>;

    fn font(&self) -> FontSpec;
    fn set_font(&mut self, font: FontSpec);
    fn set_text_color(&mut self, color: Rgb);
    fn set_fill_color(&mut self, color: Rgb);
    fn set_draw_color(&mut self, color: Rgb);
    fn set_line_width(&mut self, width: f32);

    /// Places one line of text. For `Center` and `Right`, `x` is the anchor.
    fn text(&mut self, s: &str, x: f32, y: f32, align: Align) -> Result<(), SurfaceError>;
    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, style: RectStyle)
        -> Result<(), SurfaceError>;

    /// Rendered width of `s` at the current font, in mm.
    fn text_width(&self, s: &str) -> f32 {
        text_width_mm(&self.font(), s)
    }

    /// Wraps `s` into lines no wider than `max_width` at the current font.
    fn split_text_to_size(&self, s: &str, max_width: f32) -> Vec<String> {
        wrap_text(&self.font(), s, max_width)
    }

    /// Places `lines` one below the other, `step` mm apart, starting at `y`.
    fn text_lines(
        &mut self,
        lines: &[String],
        x: f32,
        y: f32,
        step: f32,
        align: Align,
    ) -> Result<(), SurfaceError> {
        for (i, line) in lines.iter().enumerate() {
            self.text(line, x, y + i as f32 * step, align)?;
        }
        Ok(())
    }
}

/// Greedy word wrap. Explicit newlines start a new line; a single word wider
/// than `max_width` is broken between characters. Always returns at least one line.
pub fn wrap_text(font: &FontSpec, s: &str, max_width: f32) -> Vec<String> {
    let space_w = text_width_mm(font, " ");
    let mut lines = Vec::new();

    for paragraph in s.split('\n') {
        let mut current = String::new();
        let mut current_w = 0.0_f32;

        for word in paragraph.split_whitespace() {
            let word_w = text_width_mm(font, word);

            if current.is_empty() {
                if word_w <= max_width {
                    current.push_str(word);
                    current_w = word_w;
                } else {
                    let mut pieces = break_word(font, word, max_width);
                    let last = pieces.pop().unwrap_or_default();
                    lines.extend(pieces);
                    current_w = text_width_mm(font, &last);
                    current = last;
                }
                continue;
            }

            if current_w + space_w + word_w <= max_width {
                current.push(' ');
                current.push_str(word);
                current_w += space_w + word_w;
            } else {
                lines.push(std::mem::take(&mut current));
                if word_w <= max_width {
                    current.push_str(word);
                    current_w = word_w;
                } else {
                    let mut pieces = break_word(font, word, max_width);
                    let last = pieces.pop().unwrap_or_default();
                    lines.extend(pieces);
                    current_w = text_width_mm(font, &last);
                    current = last;
                }
            }
        }

        lines.push(current);
    }

    lines
}

fn break_word(font: &FontSpec, word: &str, max_width: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut current_w = 0.0_f32;

    for c in word.chars() {
        let mut buf = [0u8; 4];
        let char_w = text_width_mm(font, c.encode_utf8(&mut buf));
        if !current.is_empty() && current_w + char_w > max_width {
            pieces.push(std::mem::take(&mut current));
            current_w = 0.0;
        }
        current.push(c);
        current_w += char_w;
    }
    pieces.push(current);
    pieces
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
