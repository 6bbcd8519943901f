//! Per-regime polygon solvers.
//!
//! All solvers work in the Cartesian system with the page origin `O` at
//! `(0, 0)`, so the page spans `x ∈ [0, C.x]` and `y ∈ [C.y, 0]` with
//! `C.y < 0`. The fold is built around `f`, the fixed distance between the
//! touch point and the bottom edge along the right edge, which keeps the
//! flap's right side from stretching as the finger moves.
//!
//! Each solver returns the full [`AllPoints`] polygon in Cartesian space plus
//! the scalars its regime's transitions need.

#[cfg(test)]
#[path = "solver_test.rs"]
mod solver_test;

use std::f64::consts::PI;

use crate::consts::{MIN_THETA, MIN_WX_RATIO, TIGHT_MIN_WE_RATIO};
use crate::geom::{FloatRange, Line, Point, slope_for};
use crate::points::AllPoints;

/// Page frame shared by every solver: `O`, `A`, `B`, `C`.
fn frame(c: Point) -> AllPoints {
    AllPoints { o: Point::ZERO, a: Point::new(0.0, c.y), b: Point::new(c.x, 0.0), c, ..AllPoints::default() }
}

/// Slope of the fold-parallel lines for touch point `r`.
fn touch_slope(c: Point, r: Point, f: f64) -> f64 {
    (c.x - r.x) / (r.y - (c.y + f))
}

/// `W.x` the loose regime would produce for touch point `r`.
#[must_use]
pub fn loose_wx(c: Point, r: Point, f: f64) -> f64 {
    Line::with_slope(touch_slope(c, r, f), r).x_at(c.y)
}

/// The remaining flap points once `W`, `Z`, `E`, `F`, `H` and the `WZ`
/// support line are known. `S` and `T` sit halfway between the `WZ` line and
/// the fold line; `M` and `N` halfway between `S`/`T` and where the flap
/// edges cross the `ST` line.
struct Flap {
    s: Point,
    t: Point,
    i: Point,
    j: Point,
    u: Point,
    v: Point,
    m: Point,
    n: Point,
}

fn flap(k: f64, wz: &Line, s_base: Point, t_base: Point, e: Point, fp: Point, h: Point) -> Flap {
    let s = s_base.midpoint(e);
    let t = t_base.midpoint(fp);
    let l_he = Line::through(h, e);
    let l_hf = Line::through(h, fp);
    let l_st = Line::with_slope(k, s);
    let u = l_he.intersect(&l_st);
    let v = l_hf.intersect(&l_st);
    Flap { s, t, i: l_he.intersect(wz), j: l_hf.intersect(wz), u, v, m: u.midpoint(s), n: t.midpoint(v) }
}

/// Reflection of `c` through its foot on the fold line `l_ef`.
fn fold_corner(c: Point, l_ch: &Line, l_ef: &Line) -> Point {
    let p = l_ef.intersect(l_ch);
    p * 2.0 - c
}

// =============================================================================
// LOOSE
// =============================================================================

/// Unconstrained curl: the fold follows the finger.
///
/// `blend > 0` pulls `W` left of the touch line's foot so the transition into
/// the width-clamped regime is gradual. Returns the fold angle θ.
#[must_use]
pub fn loose(c: Point, r: Point, f: f64, blend: f64) -> (f64, AllPoints) {
    let rf = Point::new(c.x, c.y + f);
    let k = touch_slope(c, r, f);

    let touch = Line::with_slope(k, r);
    let foot = Point::new(touch.x_at(c.y), c.y);
    let foot_right = Point::new(c.x, touch.y_at(c.x));

    let l_ef = Line::with_slope(k, r.midpoint(rf));
    let e = Point::new(l_ef.x_at(c.y), c.y);
    let fp = Point::new(c.x, l_ef.y_at(c.x));

    let l_ch = Line::with_slope(-1.0 / k, c);
    let h = fold_corner(c, &l_ch, &l_ef);
    let theta = l_ch.theta();

    let mut fl = flap(k, &touch, foot, foot_right, e, fp, h);
    fl.j = r;

    let w = if blend > 0.0 {
        let ratio = FloatRange::new(0.0, blend);
        let by_foot = FloatRange::new(MIN_WX_RATIO * c.x, c.x).linear_map_clamped(foot.x, ratio);
        let by_theta = FloatRange::new(MIN_THETA, PI).linear_map_clamped(theta, ratio);
        Point::new(foot.x - by_foot * by_theta * (e.x - fl.s.x), c.y)
    } else {
        foot
    };
    let z = Point::new(c.x, Line::with_slope(k, w).y_at(c.x));

    let points = AllPoints {
        h,
        i: fl.i,
        j: fl.j,
        m: fl.m,
        n: fl.n,
        s: fl.s,
        t: fl.t,
        u: fl.u,
        v: fl.v,
        w,
        z,
        ..frame(c)
    };
    (theta, points)
}

// =============================================================================
// WIDTH-CLAMPED
// =============================================================================

/// `W` pinned at its minimum x. Returns θ and the flap width `E.x − W.x`.
#[must_use]
pub fn width_min(c: Point, r: Point, f: f64) -> (f64, f64, AllPoints) {
    let rf = Point::new(c.x, c.y + f);
    let k = touch_slope(c, r, f);

    let w = Point::new(MIN_WX_RATIO * c.x, c.y);
    let z = Point::new(c.x, k * (c.x - w.x) + c.y);
    let l_wz = Line::with_slope(k, w);

    let l_ef = Line::with_slope(k, r.midpoint(rf));
    let e = Point::new(l_ef.x_at(c.y), c.y);
    let fp = Point::new(c.x, l_ef.y_at(c.x));

    let l_ch = Line::with_slope(-1.0 / k, c);
    let h = fold_corner(c, &l_ch, &l_ef);

    let fl = flap(k, &l_wz, w, z, e, fp, h);
    let points = AllPoints {
        h,
        i: fl.i,
        j: fl.j,
        m: fl.m,
        n: fl.n,
        s: fl.s,
        t: fl.t,
        u: fl.u,
        v: fl.v,
        w,
        z,
        ..frame(c)
    };
    (l_ch.theta(), e.x - w.x, points)
}

// =============================================================================
// ANGLE-CLAMPED
// =============================================================================

/// Fold angle pinned at [`MIN_THETA`]. Returns the flap width `E.x − W.x`.
#[must_use]
pub fn theta_min(c: Point, r: Point, f: f64) -> (f64, AllPoints) {
    let min_wx = MIN_WX_RATIO * c.x;
    let min_we = TIGHT_MIN_WE_RATIO * c.x;
    let free_wx = loose_wx(c, r, f);

    let l_ch = Line::with_slope(slope_for(MIN_THETA), c);
    let k = -1.0 / l_ch.k;

    // G: where the fixed-angle CH line crosses the right edge, shifted to R's height.
    let g = Point::new(c.x, r.y + l_ch.k * (c.x - r.x));
    let e = Point::new(Line::with_slope(k, r.midpoint(g)).x_at(c.y), c.y);
    let fp = Point::new(c.x, k * (c.x - e.x) + c.y);
    let l_ef = Line::with_slope(k, e);
    let h = fold_corner(c, &l_ch, &l_ef);

    let finger_out = h.distance_to(r) > f || r.distance_to_line(&Line::horizontal(c.y)) > f;
    let target_wx = if finger_out {
        r.x - (r.y - c.y) / k
    } else if free_wx >= min_wx {
        free_wx
    } else {
        min_wx
    };
    let we = min_we.max(e.x - target_wx);
    let w = Point::new((e.x - we).max(min_wx), c.y);

    let l_wz = Line::with_slope(k, w);
    let z = Point::new(c.x, l_wz.y_at(c.x));

    let fl = flap(k, &l_wz, w, z, e, fp, h);
    let points = AllPoints {
        h,
        i: fl.i,
        j: fl.j,
        m: fl.m,
        n: fl.n,
        s: fl.s,
        t: fl.t,
        u: fl.u,
        v: fl.v,
        w,
        z,
        ..frame(c)
    };
    (e.x - w.x, points)
}

// =============================================================================
// TIGHT
// =============================================================================

/// Angle and width both pinned: a fixed shape anchored at `C`, turned by θ.
///
/// Returns the `HF` edge line, which the tight transitions test against.
#[must_use]
pub fn tight(c: Point, theta: f64) -> (Line, AllPoints) {
    let k_ch = slope_for(theta);
    let k = -1.0 / k_ch;
    let min_we = TIGHT_MIN_WE_RATIO * c.x;

    let w = Point::new(MIN_WX_RATIO * c.x, c.y);
    let z = Point::new(c.x, c.y + k * (c.x - w.x));
    let e = Point::new(w.x + min_we, c.y);

    let l_ch = Line::with_slope(k_ch, c);
    let l_wz = Line::with_slope(k, w);
    let l_ef = Line::with_slope(k, e);
    let fp = Point::new(c.x, l_ef.y_at(c.x));
    let h = fold_corner(c, &l_ch, &l_ef);

    let fl = flap(k, &l_wz, w, z, e, fp, h);
    let points = AllPoints {
        h,
        i: fl.i,
        j: fl.j,
        m: fl.m,
        n: fl.n,
        s: fl.s,
        t: fl.t,
        u: fl.u,
        v: fl.v,
        w,
        z,
        ..frame(c)
    };
    (Line::through(fp, h), points)
}
