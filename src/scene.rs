//! Fill outlines, shadow shapes and gradient controls for one frame.
//!
//! The builder works on the display polygon in surface screen space (y
//! down), already mirrored when the curl is upside-down. It produces plain
//! path data; [`crate::render`] replays it on a canvas.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use crate::config::Rgba;
use crate::consts::{
    LUSTRE_COLOR, LUSTRE_DISTANCE_MAX, LUSTRE_DISTANCE_MIN, LUSTRE_END_SHADOW_WIDTH_MAX,
    LUSTRE_END_SHADOW_WIDTH_MIN, SHADOW_PART3_TO_1_RATIO, SHADOW_THRESHOLD, SHADOW3_COLOR,
    SHADOW3_VERTICAL_THRESHOLD, SHADOW12_COLOR, TIGHT_MIN_WE_RATIO, TRANSPARENT,
};
use crate::geom::{FloatRange, Line, Point};
use crate::mesh::MeshEdges;
use crate::points::AllPoints;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathEl {
    MoveTo(Point),
    LineTo(Point),
    QuadTo(Point, Point),
    /// Circular arc starting a new subpath at the arc's start point.
    /// Angles in degrees, clockwise in screen space.
    Arc { center: Point, radius: f64, start_deg: f64, sweep_deg: f64 },
    Close,
}

/// A closed outline as a sequence of path elements.
pub type Outline = Vec<PathEl>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipOp {
    /// Draw only outside the clip outline.
    Difference,
    /// Draw only inside the clip outline.
    Intersect,
}

/// Which fill outline a shadow is clipped against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipTarget {
    NextPage,
    PageBack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clip {
    pub op: ClipOp,
    pub against: ClipTarget,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Linear { start: Point, end: Point, from: Rgba, to: Rgba },
    Radial { center: Point, radius: f64, from: Rgba, to: Rgba },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shadow {
    pub outline: Outline,
    pub clip: Option<Clip>,
    pub paint: Paint,
}

/// Everything needed to draw one frame except the textures.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Visible part of the current page's front.
    pub front: Outline,
    /// The curled flap (current page's back).
    pub back: Outline,
    /// Region where the next page shows through.
    pub next: Outline,
    pub shadow1: Shadow,
    pub shadow2: Shadow,
    pub shadow3: Shadow,
    pub shadow4: Shadow,
    pub lustre_end: Shadow,
    pub lustre_start: Shadow,
    /// Gradient axes for shadow 1, shadow 2, shadow 3, lustre end and
    /// lustre start. Non-finite points are replaced by the origin.
    pub controls: [(Point, Point); 5],
    /// Width of shadows 1 and 2, also the radius of shadow 4.
    pub shadow12_width: f64,
}

// =============================================================================
// BUILDER
// =============================================================================

fn connect(path: &mut Outline, edge: &[Point], reversed: bool) {
    if reversed {
        path.extend(edge.iter().rev().map(|p| PathEl::LineTo(*p)));
    } else {
        path.extend(edge.iter().map(|p| PathEl::LineTo(*p)));
    }
}

/// A point offset from `s` along the bottom edge by `distance` measured
/// perpendicular to the `ST` line, and its partner on the right edge.
fn offset_pair(s: Point, distance: f64, k_st: f64, c: Point, o: Point) -> (Point, Point) {
    if k_st.is_finite() {
        let shifted = Point::new(s.x + distance / (1.0 - 1.0 / (1.0 + k_st * k_st)).sqrt(), c.y);
        (shifted, Point::new(c.x, Line::with_slope(k_st, shifted).y_at(c.x)))
    } else {
        let shifted = Point::new(s.x + distance, c.y);
        (shifted, Point::new(shifted.x, o.y))
    }
}

fn collapsed(o: Point) -> Outline {
    vec![PathEl::MoveTo(o), PathEl::Close]
}

/// Build the scene for `p` (display polygon) and the mesh boundary `edges`.
#[must_use]
pub fn build(p: &AllPoints, edges: &MeshEdges, upside_down: bool) -> Scene {
    let AllPoints { o, a, b, c, h, i, j, m, n, s, t, u, v, w, z } = *p;

    let mut front = vec![PathEl::MoveTo(w)];
    connect(&mut front, &edges.wsm, false);
    front.extend([PathEl::LineTo(m), PathEl::LineTo(n)]);
    connect(&mut front, &edges.ztn, !upside_down);
    front.extend([PathEl::LineTo(z), PathEl::LineTo(b), PathEl::LineTo(o), PathEl::LineTo(a), PathEl::LineTo(w)]);

    let mut back = vec![PathEl::MoveTo(m), PathEl::LineTo(n)];
    connect(&mut back, &edges.nvj, upside_down);
    back.push(PathEl::LineTo(h));
    connect(&mut back, &edges.mui, true);
    back.push(PathEl::LineTo(m));

    let mut next = vec![PathEl::MoveTo(c), PathEl::LineTo(w)];
    connect(&mut next, &edges.wsm, false);
    next.extend([PathEl::LineTo(m), PathEl::LineTo(n)]);
    connect(&mut next, &edges.ztn, !upside_down);
    next.extend([PathEl::LineTo(z), PathEl::LineTo(c)]);

    // Shadow widths grow with the flap width, reaching the thresholds at
    // the tight regime's minimum width.
    let l_hf = Line::through(j, h);
    let l_he = Line::through(h, i);
    let we = (s.x - w.x) * 2.0;
    let we_range = FloatRange::new(0.0, TIGHT_MIN_WE_RATIO * (c.x - o.x));
    let shadow12_width = we_range.linear_map(we, FloatRange::new(0.0, SHADOW_THRESHOLD));
    let shadow3_width = shadow12_width * SHADOW_PART3_TO_1_RATIO;

    let h1 = h.extend_along(l_hf.k, shadow12_width);
    let i1 = i.extend_along(l_hf.k, shadow12_width);
    let u1 = u.extend_along(l_hf.k, shadow12_width);
    let h2 = h.extend_along(l_he.k, shadow12_width);
    let j1 = j.extend_along(l_he.k, shadow12_width);
    let v1 = v.extend_along(l_he.k, shadow12_width);

    let l_st = Line::through(s, t);
    let (s1, t1) = offset_pair(s, shadow3_width, l_st.k, c, o);

    let shadow1 = vec![
        PathEl::MoveTo(h2),
        PathEl::LineTo(j1),
        PathEl::QuadTo(v1, n),
        PathEl::QuadTo(v, j),
        PathEl::LineTo(h),
        PathEl::Close,
    ];

    let (start_deg, sweep_deg) = if upside_down {
        (l_hf.theta().to_degrees() + 180.0, -90.0)
    } else {
        (l_hf.theta().to_degrees(), 90.0)
    };
    let shadow4 = vec![
        PathEl::MoveTo(h1),
        PathEl::Arc { center: h, radius: shadow12_width, start_deg, sweep_deg },
        PathEl::LineTo(h),
        PathEl::Close,
    ];

    let shadow2 = vec![
        PathEl::MoveTo(h),
        PathEl::LineTo(h1),
        PathEl::LineTo(i1),
        PathEl::QuadTo(u1, m),
        PathEl::QuadTo(u, i),
        PathEl::Close,
    ];

    // Near-vertical ST lines push T1 far off the page; draw a band instead.
    let page_h = (c.y - o.y).abs();
    let mut shadow3 = vec![PathEl::MoveTo(w), PathEl::LineTo(s1)];
    if ((t1.y - o.y) / (c.y - o.y)).abs() > SHADOW3_VERTICAL_THRESHOLD {
        shadow3.push(PathEl::LineTo(Point::new(s1.x, page_h - s1.y)));
        shadow3.push(PathEl::LineTo(Point::new(w.x, page_h - w.y)));
    } else {
        shadow3.push(PathEl::LineTo(t1));
        shadow3.push(PathEl::LineTo(z));
    }
    shadow3.push(PathEl::Close);

    // Start and end bands share one distance.
    let lustre_dist = we_range
        .linear_map(we, FloatRange::new(0.0, LUSTRE_DISTANCE_MIN))
        .min(LUSTRE_DISTANCE_MAX);
    let lustre_end_width = we_range
        .linear_map(we, FloatRange::new(0.0, LUSTRE_END_SHADOW_WIDTH_MIN))
        .min(LUSTRE_END_SHADOW_WIDTH_MAX);

    let (s4, t4) = offset_pair(s, -lustre_dist, l_st.k, c, o);
    let (s2, t2) = offset_pair(s4, -lustre_dist, l_st.k, c, o);
    let (s3, t3) = offset_pair(s2, -lustre_end_width, l_st.k, c, o);

    // An undefined distance (degenerate `ST`) still draws the lustre.
    let room = h.distance_to_line(&l_st);
    let lustre_fits = room.is_nan() || lustre_dist + lustre_end_width <= room;
    let (lustre_end, lustre_start) = if lustre_fits {
        (
            vec![PathEl::MoveTo(s2), PathEl::LineTo(t2), PathEl::LineTo(t3), PathEl::LineTo(s3), PathEl::Close],
            vec![PathEl::MoveTo(s), PathEl::LineTo(t), PathEl::LineTo(t4), PathEl::LineTo(s4), PathEl::Close],
        )
    } else {
        (collapsed(o), collapsed(o))
    };

    let l_kl = Line::with_slope(l_st.k, w);
    let l_s1t1 = Line::with_slope(l_st.k, s1);
    let l_hc = Line::through(h, c);
    let controls = [
        (h.or_zero(), h2.or_zero()),
        (h.or_zero(), h1.or_zero()),
        (l_kl.intersect(&l_hc).or_zero(), l_s1t1.intersect(&l_hc).or_zero()),
        (
            Line::with_slope(l_st.k, s2).intersect(&l_hc).or_zero(),
            Line::with_slope(l_st.k, s3).intersect(&l_hc).or_zero(),
        ),
        (l_st.intersect(&l_hc).or_zero(), Line::with_slope(l_st.k, s4).intersect(&l_hc).or_zero()),
    ];

    let linear = |pair: (Point, Point), from: Rgba, to: Rgba| Paint::Linear { start: pair.0, end: pair.1, from, to };
    let back_clip = Some(Clip { op: ClipOp::Intersect, against: ClipTarget::PageBack });

    Scene {
        front,
        back,
        next,
        shadow1: Shadow { outline: shadow1, clip: None, paint: linear(controls[0], SHADOW12_COLOR, TRANSPARENT) },
        shadow2: Shadow {
            outline: shadow2,
            clip: Some(Clip { op: ClipOp::Difference, against: ClipTarget::NextPage }),
            paint: linear(controls[1], SHADOW12_COLOR, TRANSPARENT),
        },
        shadow3: Shadow { outline: shadow3, clip: None, paint: linear(controls[2], SHADOW3_COLOR, TRANSPARENT) },
        shadow4: Shadow {
            outline: shadow4,
            clip: None,
            paint: Paint::Radial { center: controls[0].0, radius: shadow12_width, from: SHADOW12_COLOR, to: TRANSPARENT },
        },
        lustre_end: Shadow {
            outline: lustre_end,
            clip: if lustre_fits { back_clip } else { None },
            paint: linear(controls[3], LUSTRE_COLOR, TRANSPARENT),
        },
        lustre_start: Shadow {
            outline: lustre_start,
            clip: if lustre_fits { back_clip } else { None },
            paint: linear(controls[4], LUSTRE_COLOR, LUSTRE_COLOR),
        },
        controls,
        shadow12_width,
    }
}
