//! Conversions between grid units and page pixels.
//!
//! Grid coordinates are whole columns and rows inside the page's content
//! area (the page minus its margins). Pixel boxes returned by
//! [`GridGeometry::grid_to_pixel`] are relative to the content area's top-left
//! corner; [`GridGeometry::grid_to_page_pixel`] adds the margins back.

use crate::format::PageFormat;
use crate::settings::GridSettings;
use kurbo::{Point, Rect, Size, Vec2};

/// A signed offset in grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridDelta {
    pub columns: i64,
    pub rows: i64,
}

/// A grid cell address. May be negative for points left of or above the
/// content area; callers clamp before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridCell {
    pub column: i64,
    pub row: i64,
}

/// Grid metrics for one page format under the current settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    page_size: Size,
    columns: u32,
    row_height: f64,
    margin_top: f64,
    margin_right: f64,
    margin_bottom: f64,
    margin_left: f64,
}

impl GridGeometry {
    pub fn new(format: PageFormat, settings: &GridSettings) -> Self {
        Self {
            page_size: format.size(),
            columns: settings.columns.max(1),
            row_height: settings.row_height,
            margin_top: settings.margin_top,
            margin_right: settings.margin_right,
            margin_bottom: settings.margin_bottom,
            margin_left: settings.margin_left,
        }
    }

    pub fn page_size(&self) -> Size {
        self.page_size
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn row_height(&self) -> f64 {
        self.row_height
    }

    pub fn content_width(&self) -> f64 {
        self.page_size.width - self.margin_left - self.margin_right
    }

    pub fn content_height(&self) -> f64 {
        self.page_size.height - self.margin_top - self.margin_bottom
    }

    /// The content area in page pixels.
    pub fn content_rect(&self) -> Rect {
        Rect::from_origin_size(
            (self.margin_left, self.margin_top),
            (self.content_width(), self.content_height()),
        )
    }

    pub fn column_width(&self) -> f64 {
        self.content_width() / f64::from(self.columns)
    }

    /// Pixel box of a grid rectangle, relative to the content area.
    pub fn grid_to_pixel(&self, x: u32, y: u32, width: u32, height: u32) -> Rect {
        let column_width = self.column_width();
        Rect::from_origin_size(
            (f64::from(x) * column_width, f64::from(y) * self.row_height),
            (
                f64::from(width) * column_width,
                f64::from(height) * self.row_height,
            ),
        )
    }

    /// Pixel box of a grid rectangle in page coordinates.
    pub fn grid_to_page_pixel(&self, x: u32, y: u32, width: u32, height: u32) -> Rect {
        self.grid_to_pixel(x, y, width, height) + Vec2::new(self.margin_left, self.margin_top)
    }

    /// Convert a pixel offset into whole cells.
    ///
    /// Rounds to the nearest cell with ties away from zero, so a block only
    /// moves once the pointer passes half a cell.
    pub fn pixel_delta_to_grid_delta(&self, delta: Vec2) -> GridDelta {
        GridDelta {
            columns: (delta.x / self.column_width()).round() as i64,
            rows: (delta.y / self.row_height).round() as i64,
        }
    }

    /// The cell under a page-space point.
    pub fn pixel_point_to_grid_cell(&self, point: Point) -> GridCell {
        GridCell {
            column: ((point.x - self.margin_left) / self.column_width()).floor() as i64,
            row: ((point.y - self.margin_top) / self.row_height).floor() as i64,
        }
    }
}
