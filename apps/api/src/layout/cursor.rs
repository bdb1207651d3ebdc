//! Vertical cursors for the two flow modes.
//!
//! Both implement `Flow`, so block placement code is written once and the
//! page/column break policy lives here. Cursor state is explicit and owned by
//! the caller; nothing is captured implicitly.

use serde::Serialize;

use super::surface::Surface;
use crate::structure::{ColumnConfig, Margins};

/// Space kept clear above the bottom margin for the page footer.
pub const FOOTER_RESERVE_MM: f32 = 15.0;

/// Page dimensions and the printable frame derived from the margins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margins: Margins,
}

impl PageGeometry {
    pub fn new(width: f32, height: f32, margins: Margins) -> Self {
        Self {
            width,
            height,
            margins,
        }
    }

    pub fn content_width(&self) -> f32 {
        self.width - self.margins.left - self.margins.right
    }

    /// Lowest baseline content may reach before a break.
    pub fn bottom_limit(&self) -> f32 {
        self.height - self.margins.bottom - FOOTER_RESERVE_MM
    }
}

pub trait Flow {
    /// Left edge of the region currently receiving content.
    fn x(&self) -> f32;
    fn width(&self) -> f32;
    fn y(&self) -> f32;
    fn set_y(&mut self, y: f32);
    /// Highest y content starts at in a fresh region.
    fn top(&self) -> f32;
    /// Lowest y content may reach in the current region.
    fn bottom_limit(&self) -> f32;

    fn advance(&mut self, dy: f32) {
        let y = self.y() + dy;
        self.set_y(y);
    }

    /// Makes sure `needed` mm fit below the cursor, moving to fresh space if not.
    /// A cursor still at the top of its region never moves, since fresh space
    /// would be no taller. Returns true when a new page was started.
    fn ensure_space(&mut self, surface: &mut dyn Surface, needed: f32) -> bool;
}

// ────────────────────────────────────────────────────────────────────────────
// Single column
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageCursor {
    pub y: f32,
    pub page: usize,
    geometry: PageGeometry,
}

impl PageCursor {
    /// A cursor at the top margin of `page`.
    pub fn new(geometry: PageGeometry, page: usize) -> Self {
        Self {
            y: geometry.margins.top,
            page,
            geometry,
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Starts a new page unconditionally.
    pub fn new_page(&mut self, surface: &mut dyn Surface) {
        surface.add_page();
        self.page += 1;
        self.y = self.geometry.margins.top;
    }
}

impl Flow for PageCursor {
    fn x(&self) -> f32 {
        self.geometry.margins.left
    }

    fn width(&self) -> f32 {
        self.geometry.content_width()
    }

    fn y(&self) -> f32 {
        self.y
    }

    fn set_y(&mut self, y: f32) {
        self.y = y;
    }

    fn top(&self) -> f32 {
        self.geometry.margins.top
    }

    fn bottom_limit(&self) -> f32 {
        self.geometry.bottom_limit()
    }

    fn ensure_space(&mut self, surface: &mut dyn Surface, needed: f32) -> bool {
        if self.y > self.top() && self.y + needed > self.geometry.bottom_limit() {
            self.new_page(surface);
            return true;
        }
        false
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Two columns
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Column {
    Left,
    Right,
}

/// Two independent cursors with exactly one active column.
///
/// Overflowing the left column moves to the right column of the same page;
/// overflowing the right column starts a new page with both cursors at the top.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnState {
    pub active: Column,
    pub left_y: f32,
    pub right_y: f32,
    pub page: usize,
    columns: ColumnConfig,
    geometry: PageGeometry,
}

impl ColumnState {
    pub fn new(geometry: PageGeometry, columns: ColumnConfig, start_y: f32, page: usize) -> Self {
        Self {
            active: Column::Left,
            left_y: start_y,
            right_y: start_y,
            page,
            columns,
            geometry,
        }
    }

    fn fits(&self, y: f32, needed: f32) -> bool {
        y + needed <= self.geometry.bottom_limit()
    }
}

impl Flow for ColumnState {
    fn x(&self) -> f32 {
        match self.active {
            Column::Left => self.columns.left_column_x,
            Column::Right => self.columns.right_column_x,
        }
    }

    fn width(&self) -> f32 {
        self.columns.column_width
    }

    fn y(&self) -> f32 {
        match self.active {
            Column::Left => self.left_y,
            Column::Right => self.right_y,
        }
    }

    fn set_y(&mut self, y: f32) {
        match self.active {
            Column::Left => self.left_y = y,
            Column::Right => self.right_y = y,
        }
    }

    fn top(&self) -> f32 {
        self.geometry.margins.top
    }

    fn bottom_limit(&self) -> f32 {
        self.geometry.bottom_limit()
    }

    fn ensure_space(&mut self, surface: &mut dyn Surface, needed: f32) -> bool {
        if self.y() <= self.top() || self.fits(self.y(), needed) {
            return false;
        }
        if self.active == Column::Left {
            self.active = Column::Right;
            if self.fits(self.right_y, needed) {
                return false;
            }
        }
        surface.add_page();
        self.page += 1;
        self.active = Column::Left;
        self.left_y = self.geometry.margins.top;
        self.right_y = self.geometry.margins.top;
        true
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
