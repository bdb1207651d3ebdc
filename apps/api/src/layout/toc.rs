//! Table of contents: a pre-pass over the block sequence collecting level-1 and
//! level-2 headings, then a rendering pass with dot leaders.
//!
//! Page numbers are estimates, not measured positions: each entry's page is the
//! first content page plus the characters preceding it divided by
//! `CHARS_PER_PAGE`. Exact numbers would need a second full render.

use serde::Serialize;

use super::cursor::{Flow, PageCursor, PageGeometry};
use super::font_metrics::{FontSpec, FontStyle};
use super::surface::{Align, Surface, SurfaceError};
use crate::document::headings::SectionCounter;
use crate::document::Block;

pub const CHARS_PER_PAGE: usize = 2500;

const TITLE_GAP: f32 = 15.0;
const ENTRY_STEP: f32 = 7.0;
const ENTRY_SPACE: f32 = 8.0;
const SUB_INDENT: f32 = 10.0;
const DOT_STEP: f32 = 3.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub level: u8,
    /// `2.` for sections, `2.1` for subsections.
    pub number: String,
    pub title: String,
    /// Characters of content in all blocks before this heading.
    pub chars_before: usize,
}

impl TocEntry {
    pub fn label(&self) -> String {
        format!("{} {}", self.number, self.title)
    }

    pub fn estimated_page(&self, first_content_page: usize) -> usize {
        first_content_page + self.chars_before / CHARS_PER_PAGE
    }
}

pub fn collect_toc_entries(blocks: &[Block]) -> Vec<TocEntry> {
    let mut counter = SectionCounter::default();
    let mut entries = Vec::new();
    let mut chars_before = 0usize;

    for block in blocks {
        if let Block::Heading { level, text } = block {
            let numbered = match level {
                1 => Some(counter.next_section(text)),
                2 => Some(counter.next_subsection(text)),
                _ => None,
            };
            if let Some(numbered) = numbered {
                // "2. METHODS" / "2.1 Data": split the number back off the label.
                let (number, title) = numbered
                    .split_once(' ')
                    .map(|(n, t)| (n.to_string(), t.to_string()))
                    .unwrap_or_else(|| (numbered.clone(), String::new()));
                entries.push(TocEntry {
                    level: *level,
                    number,
                    title,
                    chars_before,
                });
            }
        }
        chars_before += block.char_len();
    }

    entries
}

/// Pages the TOC will occupy, following the same break rule as `draw_toc`.
pub fn toc_page_span(entry_count: usize, geometry: &PageGeometry) -> usize {
    let mut pages = 1;
    let mut y = geometry.margins.top + TITLE_GAP;
    for _ in 0..entry_count {
        if y + ENTRY_SPACE > geometry.bottom_limit() {
            pages += 1;
            y = geometry.margins.top;
        }
        y += ENTRY_STEP;
    }
    pages
}

/// Draws the TOC starting at the cursor, then starts a new page for content.
pub fn draw_toc(
    surface: &mut dyn Surface,
    cursor: &mut PageCursor,
    entries: &[TocEntry],
    first_content_page: usize,
) -> Result<(), SurfaceError> {
    let geometry = *cursor.geometry();
    let right_edge = geometry.width - geometry.margins.right;

    surface.set_font(FontSpec::times(FontStyle::Bold, 16.0));
    surface.text(
        "TABLE OF CONTENTS",
        geometry.width / 2.0,
        cursor.y,
        Align::Center,
    )?;
    cursor.advance(TITLE_GAP);

    for entry in entries {
        cursor.ensure_space(surface, ENTRY_SPACE);

        let indent = if entry.level == 1 { 0.0 } else { SUB_INDENT };
        let label = entry.label();
        let page_label = entry.estimated_page(first_content_page).to_string();
        let x = geometry.margins.left + indent;

        let style = if entry.level == 1 {
            FontStyle::Bold
        } else {
            FontStyle::Normal
        };
        surface.set_font(FontSpec::times(style, 11.0));
        let label_width = surface.text_width(&label);
        surface.text(&label, x, cursor.y, Align::Left)?;

        surface.set_font(FontSpec::times(FontStyle::Normal, 11.0));
        surface.text(&page_label, right_edge, cursor.y, Align::Right)?;

        let dots_end = right_edge - surface.text_width(&page_label) - 5.0;
        let mut dot_x = x + label_width + 5.0;
        while dot_x < dots_end {
            surface.text(".", dot_x, cursor.y, Align::Left)?;
            dot_x += DOT_STEP;
        }

        cursor.advance(ENTRY_STEP);
    }

    cursor.new_page(surface);
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
