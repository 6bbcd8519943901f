//! Geometric primitives: points, slope-intercept lines, float ranges and a
//! quadratic solver.
//!
//! Everything here is a pure value type. Transforms return new values and
//! never mutate in place. Degenerate inputs (vertical lines, parallel lines,
//! empty ranges) follow IEEE-754 semantics and yield infinities or NaN rather
//! than panicking; callers decide whether a non-finite result discards a frame.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use std::f64::consts::PI;
use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// A point in screen, Cartesian, or view-scaled space.
///
/// Which system a point lives in is a property of the caller, not the value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Midpoint between `self` and `other`.
    #[must_use]
    pub fn midpoint(self, other: Point) -> Point {
        Point::new(0.5 * (self.x + other.x), 0.5 * (self.y + other.y))
    }

    /// The point with its y axis flipped (`y ↦ -y`).
    #[must_use]
    pub fn flip_y(self) -> Point {
        Point::new(self.x, -self.y)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Perpendicular distance to a line.
    #[must_use]
    pub fn distance_to_line(self, line: &Line) -> f64 {
        (line.k * self.x - self.y + line.b).abs() / (1.0 + line.k * line.k).sqrt()
    }

    /// Strictly below `line` in the line's own y orientation.
    #[must_use]
    pub fn is_below(self, line: &Line) -> bool {
        line.y_at(self.x) > self.y
    }

    /// Strictly above `line` in the line's own y orientation.
    #[must_use]
    pub fn is_above(self, line: &Line) -> bool {
        line.y_at(self.x) < self.y
    }

    /// Exactly on `line`. Float equality is intended: the classifier uses
    /// it to detect motion that lies precisely along an axis.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_on(self, line: &Line) -> bool {
        line.y_at(self.x) == self.y
    }

    /// Mirror image of this point across `line`.
    #[must_use]
    pub fn reflect_about(self, line: &Line) -> Point {
        let Line { k, b } = *line;
        if k == 0.0 {
            return Point::new(self.x, 2.0 * b - self.y);
        }
        let offset = k * self.x - self.y + b;
        let denom = k * k + 1.0;
        Point::new(self.x - 2.0 * k * offset / denom, self.y + 2.0 * offset / denom)
    }

    /// Move `distance` along a line of slope `k` passing through this point.
    ///
    /// Positive distances move toward smaller x (screen space). For a line
    /// without a finite slope the point moves straight down by `distance`.
    #[must_use]
    pub fn extend_along(self, k: f64, distance: f64) -> Point {
        if !k.is_finite() {
            return Point::new(self.x, self.y + distance);
        }
        let x = self.x - distance / (1.0 + k * k).sqrt();
        Point::new(x, self.y + k * (x - self.x))
    }

    /// Both coordinates are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// This point, or [`Point::ZERO`] if either coordinate is non-finite.
    #[must_use]
    pub fn or_zero(self) -> Point {
        if self.is_finite() { self } else { Point::ZERO }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// A line `y = k·x + b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    /// Slope. Infinite for vertical lines, NaN when built from coincident points.
    pub k: f64,
    /// Intercept on the y axis.
    pub b: f64,
}

impl Line {
    #[must_use]
    pub fn new(k: f64, b: f64) -> Self {
        Self { k, b }
    }

    /// Line through two points.
    #[must_use]
    pub fn through(m: Point, n: Point) -> Line {
        let k = (n.y - m.y) / (n.x - m.x);
        Line { k, b: m.y - k * m.x }
    }

    /// Line with slope `k` through `p`.
    #[must_use]
    pub fn with_slope(k: f64, p: Point) -> Line {
        Line { k, b: p.y - k * p.x }
    }

    /// Horizontal line at height `y`.
    #[must_use]
    pub fn horizontal(y: f64) -> Line {
        Line { k: 0.0, b: y }
    }

    /// Intersection with `other`. Parallel lines produce a non-finite point.
    #[must_use]
    pub fn intersect(&self, other: &Line) -> Point {
        let x = (other.b - self.b) / (self.k - other.k);
        Point::new(x, self.k * x + self.b)
    }

    #[must_use]
    pub fn y_at(&self, x: f64) -> f64 {
        self.k * x + self.b
    }

    #[must_use]
    pub fn x_at(&self, y: f64) -> f64 {
        (y - self.b) / self.k
    }

    /// Inclination angle in `[0, π)`, measured in a y-up system.
    #[must_use]
    pub fn theta(&self) -> f64 {
        theta_of(self.k)
    }
}

/// Inclination angle of slope `k`, shifted into `[0, π)`.
#[must_use]
pub fn theta_of(k: f64) -> f64 {
    let angle = k.atan();
    if angle < 0.0 { PI + angle } else { angle }
}

/// Slope for an inclination angle in radians.
#[must_use]
pub fn slope_for(theta: f64) -> f64 {
    theta.tan()
}

/// A closed interval that may run in either direction (`start > end` is fine).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatRange {
    pub start: f64,
    pub end: f64,
}

impl FloatRange {
    #[must_use]
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Clamp `value` into the range regardless of its direction.
    ///
    /// A NaN value passes through unchanged.
    #[must_use]
    pub fn constrain(&self, value: f64) -> f64 {
        let (start, end) = (self.start, self.end);
        if start <= end && end <= value {
            end
        } else if value <= start && start <= end {
            start
        } else if value <= end && end <= start {
            end
        } else if end <= start && start <= value {
            start
        } else {
            value
        }
    }

    /// Map `value` from this range onto `target`, linearly and unclamped.
    #[must_use]
    pub fn linear_map(&self, value: f64, target: FloatRange) -> f64 {
        target.start + (target.end - target.start) * (value - self.start) / (self.end - self.start)
    }

    /// Map `value` onto `target`, saturating at the target's endpoints when
    /// `value` falls outside this range.
    #[must_use]
    pub fn linear_map_clamped(&self, value: f64, target: FloatRange) -> f64 {
        let (start, end) = (self.start, self.end);
        if start <= end && end <= value {
            target.end
        } else if value <= start && start <= end {
            target.start
        } else if value <= end && end <= start {
            target.end
        } else if end <= start && start <= value {
            target.start
        } else {
            self.linear_map(value, target)
        }
    }

    /// Whether `value` lies in the range, in either direction.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.start <= value && value <= self.end) || (self.end <= value && value <= self.start)
    }
}

/// `a·x² + b·x + c = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadratic {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Quadratic {
    #[must_use]
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    /// Both real roots, `(-b + √Δ) / 2a` first.
    ///
    /// Returns `None` when the discriminant is negative or NaN, or when
    /// `a == 0` (not a quadratic).
    #[must_use]
    pub fn solve(&self) -> Option<(f64, f64)> {
        if self.a == 0.0 {
            return None;
        }
        let delta = self.b * self.b - 4.0 * self.a * self.c;
        if delta.is_nan() || delta < 0.0 {
            return None;
        }
        let root = delta.sqrt();
        Some(((-self.b + root) / (2.0 * self.a), (-self.b - root) / (2.0 * self.a)))
    }
}
