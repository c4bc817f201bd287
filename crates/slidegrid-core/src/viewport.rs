//! Zoom and pan transform between page pixels and screen pixels.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// View transform of the canvas.
///
/// The pan offset is in screen pixels and is divided by the zoom before the
/// scale is applied, so panning by N screen pixels always moves the page by
/// N screen pixels whatever the zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub zoom: f64,
    pub pan: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
        }
    }
}

impl Viewport {
    pub fn new(zoom: f64, pan: Vec2) -> Self {
        Self { zoom, pan }
    }

    /// `scale(zoom) · translate(pan / zoom)`, mapping page to screen.
    pub fn transform(&self) -> Affine {
        Affine::scale(self.zoom) * Affine::translate(self.pan / self.zoom)
    }

    /// Maps screen to page.
    pub fn inverse_transform(&self) -> Affine {
        Affine::translate(-self.pan / self.zoom) * Affine::scale(1.0 / self.zoom)
    }

    pub fn page_to_screen(&self, page_point: Point) -> Point {
        self.transform() * page_point
    }

    pub fn screen_to_page(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a screen-space movement into page pixels.
    pub fn screen_delta_to_page(&self, delta: Vec2) -> Vec2 {
        delta / self.zoom
    }

    pub fn is_identity(&self) -> bool {
        (self.zoom - 1.0).abs() < f64::EPSILON && self.pan == Vec2::ZERO
    }
}
