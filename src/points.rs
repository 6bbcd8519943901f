//! The fifteen-point curl polygon.
//!
//! ```text
//!   O ───────────── B          O  page origin (top-left)
//!   │               │          C  far corner being curled
//!   │        H      │          H  C after the fold
//!   │      ╱  ╲     │          E, F fold line on the bottom and right edges
//!   │    I      J   │          W, Z where the curl meets the edges
//!   │  U  M   N  V  T          S, T support line offset from WZ
//!   A ─ W ─ S ─ E ─ C          I, J, U, V, M, N flap boundary
//! ```
//!
//! Every conversion maps all fifteen points at once, so a polygon is never
//! observed half in one coordinate system and half in another.

#[cfg(test)]
#[path = "points_test.rs"]
mod points_test;

use crate::geom::{Line, Point};
use crate::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AllPoints {
    pub o: Point,
    pub a: Point,
    pub b: Point,
    pub c: Point,
    pub h: Point,
    pub i: Point,
    pub j: Point,
    pub m: Point,
    pub n: Point,
    pub s: Point,
    pub t: Point,
    pub u: Point,
    pub v: Point,
    pub w: Point,
    pub z: Point,
}

impl AllPoints {
    /// Apply `f` to every point.
    #[must_use]
    pub fn map(self, f: impl Fn(Point) -> Point) -> AllPoints {
        AllPoints {
            o: f(self.o),
            a: f(self.a),
            b: f(self.b),
            c: f(self.c),
            h: f(self.h),
            i: f(self.i),
            j: f(self.j),
            m: f(self.m),
            n: f(self.n),
            s: f(self.s),
            t: f(self.t),
            u: f(self.u),
            v: f(self.v),
            w: f(self.w),
            z: f(self.z),
        }
    }

    #[must_use]
    pub fn to_cartesian(self, vp: &Viewport) -> AllPoints {
        self.map(|p| vp.to_cartesian(p))
    }

    #[must_use]
    pub fn to_screen(self, vp: &Viewport) -> AllPoints {
        self.map(|p| vp.to_screen(p))
    }

    #[must_use]
    pub fn to_view(self, vp: &Viewport) -> AllPoints {
        self.map(|p| vp.to_view(p))
    }

    #[must_use]
    pub fn reflect_about(self, line: &Line) -> AllPoints {
        self.map(|p| p.reflect_about(line))
    }

    /// False while the polygon is still the all-origin default, before any
    /// solver has produced a frame.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_solved(&self) -> bool {
        self.c.x != self.o.x
    }

    /// Every coordinate is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        [
            self.o, self.a, self.b, self.c, self.h, self.i, self.j, self.m, self.n, self.s, self.t,
            self.u, self.v, self.w, self.z,
        ]
        .iter()
        .all(|p| p.is_finite())
    }
}
