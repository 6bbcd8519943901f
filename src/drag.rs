//! Drag events and the compass-direction classifier.
//!
//! Classification runs in the Cartesian system (y up). A drag is labelled
//! either relative to the axes through its origin, or relative to a
//! reference line, in which case "right" means "along the line toward
//! larger x" and "up" means "across the line toward its upper side".

#[cfg(test)]
#[path = "drag_test.rs"]
mod drag_test;

use std::cmp::Ordering::{self, Equal, Greater, Less};

use crate::geom::{Line, Point};
use crate::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragDirection {
    Right,
    RightUp,
    Up,
    LeftUp,
    Left,
    LeftDown,
    Down,
    RightDown,
    Static,
}

impl DragDirection {
    #[must_use]
    pub fn is_in(self, set: &[DragDirection]) -> bool {
        set.contains(&self)
    }
}

/// One step of a drag: the previous point and the current one.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragEvent {
    pub origin: Point,
    pub current: Point,
}

impl DragEvent {
    #[must_use]
    pub fn new(origin: Point, current: Point) -> Self {
        Self { origin, current }
    }

    #[must_use]
    pub fn delta(&self) -> Point {
        self.current - self.origin
    }

    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_unmoved(&self) -> bool {
        self.current.x == self.origin.x && self.current.y == self.origin.y
    }

    #[must_use]
    pub fn to_cartesian(&self, vp: &Viewport) -> DragEvent {
        DragEvent::new(vp.to_cartesian(self.origin), vp.to_cartesian(self.current))
    }

    #[must_use]
    pub fn reflect_about(&self, line: &Line) -> DragEvent {
        DragEvent::new(self.origin.reflect_about(line), self.current.reflect_about(line))
    }

    /// Direction by the signs of dx and dy.
    #[must_use]
    pub fn direction_from_origin(&self) -> DragDirection {
        let d = self.delta();
        match (d.x.partial_cmp(&0.0), d.y.partial_cmp(&0.0)) {
            (Some(Greater), Some(Equal)) => DragDirection::Right,
            (Some(Greater), Some(Greater)) => DragDirection::RightUp,
            (Some(Equal), Some(Greater)) => DragDirection::Up,
            (Some(Less), Some(Greater)) => DragDirection::LeftUp,
            (Some(Less), Some(Equal)) => DragDirection::Left,
            (Some(Less), Some(Less)) => DragDirection::LeftDown,
            (Some(Equal), Some(Less)) => DragDirection::Down,
            (Some(Greater), Some(Less)) => DragDirection::RightDown,
            _ => DragDirection::Static,
        }
    }

    /// Direction relative to `line`, judged from two auxiliary lines through
    /// the drag origin: one parallel to `line`, one perpendicular.
    ///
    /// Horizontal and vertical reference lines fall back to
    /// [`DragEvent::direction_from_origin`]. A NaN slope is `Static`.
    #[must_use]
    pub fn direction_to_line(&self, line: &Line) -> DragDirection {
        let k = line.k;
        if k.is_nan() {
            return DragDirection::Static;
        }
        if k == 0.0 || k.is_infinite() {
            return self.direction_from_origin();
        }

        let parallel = Line::with_slope(k, self.origin);
        let perpendicular = Line::with_slope(-1.0 / k, self.origin);
        let p = self.current;
        let (Some(along), Some(across)) = (side(p, &parallel), side(p, &perpendicular)) else {
            return DragDirection::Static;
        };

        // For a falling reference line the perpendicular rises, so "right"
        // sits below it instead of above.
        let across = if k > 0.0 { across } else { across.reverse() };

        match (along, across) {
            (Equal, Greater) => DragDirection::Right,
            (Greater, Greater) => DragDirection::RightUp,
            (Greater, Equal) => DragDirection::Up,
            (Greater, Less) => DragDirection::LeftUp,
            (Equal, Less) => DragDirection::Left,
            (Less, Less) => DragDirection::LeftDown,
            (Less, Equal) => DragDirection::Down,
            (Less, Greater) => DragDirection::RightDown,
            (Equal, Equal) => DragDirection::Static,
        }
    }
}

/// `Greater` above the line, `Less` below, `Equal` on it, `None` when the
/// comparison involves NaN.
fn side(p: Point, line: &Line) -> Option<Ordering> {
    if p.is_above(line) {
        Some(Greater)
    } else if p.is_below(line) {
        Some(Less)
    } else if p.is_on(line) {
        Some(Equal)
    } else {
        None
    }
}
