//! Coordinate systems of the page.
//!
//! Three systems are in play:
//!
//! - **Screen**: y grows downward, origin at the component's top-left.
//! - **Cartesian**: y grows upward, origin at the page origin `O`. All
//!   solvers run here, so the page occupies `x ∈ [0, w]`, `y ∈ [-h, 0]`.
//! - **View-scaled**: screen coordinates multiplied by per-axis scale factors
//!   that map the component onto the drawing surface (bitmap pixels).

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use crate::consts::MAX_DRAG_X_RATIO;
use crate::geom::{FloatRange, Line, Point};

/// Page placement and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Page origin `O` in screen coordinates.
    pub origin: Point,
    pub width: f64,
    pub height: f64,
    /// Surface pixels per screen pixel, horizontally.
    pub scale_x: f64,
    /// Surface pixels per screen pixel, vertically.
    pub scale_y: f64,
}

impl Viewport {
    /// A viewport at the screen origin with a 1:1 surface.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { origin: Point::ZERO, width, height, scale_x: 1.0, scale_y: 1.0 }
    }

    /// Same page, drawn onto a surface of the given pixel size.
    #[must_use]
    pub fn with_surface(self, surface_width: f64, surface_height: f64) -> Self {
        let scale_x = if self.width > 0.0 { surface_width / self.width } else { 1.0 };
        let scale_y = if self.height > 0.0 { surface_height / self.height } else { 1.0 };
        Self { scale_x, scale_y, ..self }
    }

    /// Size of the drawing surface in its own pixels.
    #[must_use]
    pub fn surface_size(&self) -> (f64, f64) {
        (self.width * self.scale_x, self.height * self.scale_y)
    }

    /// The viewport of the drawing surface itself: origin zero, unit scale.
    #[must_use]
    pub fn surface(&self) -> Viewport {
        let (w, h) = self.surface_size();
        Viewport::new(w, h)
    }

    /// Far corner `C` of the page in screen coordinates.
    #[must_use]
    pub fn corner(&self) -> Point {
        Point::new(self.origin.x + self.width, self.origin.y + self.height)
    }

    // --- Conversions ---

    #[must_use]
    pub fn to_cartesian(&self, p: Point) -> Point {
        (p - self.origin).flip_y()
    }

    #[must_use]
    pub fn to_screen(&self, p: Point) -> Point {
        Point::new(self.origin.x + p.x, self.origin.y - p.y)
    }

    #[must_use]
    pub fn to_view(&self, p: Point) -> Point {
        Point::new(p.x * self.scale_x, p.y * self.scale_y)
    }

    #[must_use]
    pub fn from_view(&self, p: Point) -> Point {
        Point::new(p.x / self.scale_x, p.y / self.scale_y)
    }

    // --- Reference geometry ---

    /// Horizontal line through the middle of the page, in screen coordinates.
    /// Upside-down curls are computed mirrored about it.
    #[must_use]
    pub fn mid_line(&self) -> Line {
        Line::horizontal(self.origin.y + 0.5 * self.height)
    }

    /// Horizontal band, in screen x, where gestures may start and continue.
    #[must_use]
    pub fn drag_band(&self) -> FloatRange {
        FloatRange::new(self.origin.x, self.origin.x + self.width * (1.0 - MAX_DRAG_X_RATIO))
    }
}
