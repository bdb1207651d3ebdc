//! In-memory display-list surface. Records every draw call per page so the
//! result can be inspected in tests or serialised by `pdf::write_pdf`.

use super::font_metrics::FontSpec;
use super::surface::{Align, RectStyle, Rgb, Surface, SurfaceError};

/// A4 portrait, in mm.
pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// `x` is the resolved left edge; alignment has already been applied.
    Text {
        text: String,
        x: f32,
        y: f32,
        font: FontSpec,
        color: Rgb,
    },
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        style: RectStyle,
        fill: Rgb,
        stroke: Rgb,
        line_width: f32,
    },
}

#[derive(Debug, Clone, Default)]
pub struct CanvasPage {
    pub ops: Vec<DrawOp>,
}

#[derive(Debug, Clone)]
pub struct Canvas {
    width: f32,
    height: f32,
    pages: Vec<CanvasPage>,
    current: usize,
    font: FontSpec,
    text_color: Rgb,
    fill_color: Rgb,
    draw_color: Rgb,
    line_width: f32,
    title: Option<String>,
}

impl Canvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            pages: vec![CanvasPage::default()],
            current: 0,
            font: FontSpec::default(),
            text_color: Rgb::BLACK,
            fill_color: Rgb::BLACK,
            draw_color: Rgb::BLACK,
            line_width: 0.2,
            title: None,
        }
    }

    pub fn a4() -> Self {
        Self::new(A4_WIDTH_MM, A4_HEIGHT_MM)
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn pages(&self) -> &[CanvasPage] {
        &self.pages
    }

    /// All text placed on a 1-based page, in drawing order.
    #[cfg(test)]
    pub fn page_texts(&self, page: usize) -> Vec<&str> {
        self.pages
            .get(page.wrapping_sub(1))
            .map(|p| {
                p.ops
                    .iter()
                    .filter_map(|op| match op {
                        DrawOp::Text { text, .. } => Some(text.as_str()),
                        DrawOp::Rect { .. } => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Finds the first text op equal to `needle`, returning its page and op.
    #[cfg(test)]
    pub fn find_text(&self, needle: &str) -> Option<(usize, &DrawOp)> {
        self.pages.iter().enumerate().find_map(|(i, p)| {
            p.ops
                .iter()
                .find(|op| matches!(op, DrawOp::Text { text, .. } if text == needle))
                .map(|op| (i + 1, op))
        })
    }

    fn check_point(x: f32, y: f32) -> Result<(), SurfaceError> {
        if x.is_finite() && y.is_finite() {
            Ok(())
        } else {
            Err(SurfaceError::InvalidCoordinate { x, y })
        }
    }

    fn push(&mut self, op: DrawOp) {
        self.pages[self.current].ops.push(op);
    }
}

impl Surface for Canvas {
    fn page_size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn current_page(&self) -> usize {
        self.current + 1
    }

    fn add_page(&mut self) {
        self.pages.push(CanvasPage::default());
        self.current = self.pages.len() - 1;
    }

    fn set_page(&mut self, page: usize) -> Result<(), SurfaceError> {
        if page == 0 || page > self.pages.len() {
            return Err(SurfaceError::PageOutOfRange {
                page,
                count: self.pages.len(),
            });
        }
        self.current = page - 1;
        Ok(())
    }

    fn font(&self) -> FontSpec {
        self.font
    }

    fn set_font(&mut self, font: FontSpec) {
        self.font = font;
    }

    fn set_text_color(&mut self, color: Rgb) {
        self.text_color = color;
    }

    fn set_fill_color(&mut self, color: Rgb) {
        self.fill_color = color;
    }

    fn set_draw_color(&mut self, color: Rgb) {
        self.draw_color = color;
    }

    fn set_line_width(&mut self, width: f32) {
        self.line_width = width;
    }

    fn text(&mut self, s: &str, x: f32, y: f32, align: Align) -> Result<(), SurfaceError> {
        Self::check_point(x, y)?;
        let left = match align {
            Align::Left => x,
            Align::Center => x - self.text_width(s) / 2.0,
            Align::Right => x - self.text_width(s),
        };
        let op = DrawOp::Text {
            text: s.to_string(),
            x: left,
            y,
            font: self.font,
            color: self.text_color,
        };
        self.push(op);
        Ok(())
    }

    fn rect(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        style: RectStyle,
    ) -> Result<(), SurfaceError> {
        Self::check_point(x, y)?;
        if !(w.is_finite() && h.is_finite()) || w < 0.0 || h < 0.0 {
            return Err(SurfaceError::InvalidRect { w, h });
        }
        let op = DrawOp::Rect {
            x,
            y,
            w,
            h,
            style,
            fill: self.fill_color,
            stroke: self.draw_color,
            line_width: self.line_width,
        };
        self.push(op);
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
