//! Distortion mesh that bends the curled page's texture around the fold.
//!
//! The page texture is covered by a regular grid. Every vertex that lies on
//! the curled side of the `WZ` line is pushed along the `C → H` direction as
//! if the paper were wrapped around a cylinder of radius `r` (the distance
//! from `N` to `WZ`). Vertices on the grid's right column and bottom row
//! (top row when upside-down) are also collected into four boundary lists,
//! which the fill outlines follow so the page edge matches the warped
//! texture.

#[cfg(test)]
#[path = "mesh_test.rs"]
mod mesh_test;

use std::f64::consts::PI;

use crate::geom::{FloatRange, Line, Point};
use crate::points::AllPoints;
use crate::viewport::Viewport;

/// Warped boundary vertices, each in grid order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshEdges {
    /// Right column between `Jr` and `F`.
    pub nvj: Vec<Point>,
    /// Right column between `F` and `Z`.
    pub ztn: Vec<Point>,
    /// Bottom row between `E` and `W`.
    pub wsm: Vec<Point>,
    /// Bottom row between `Ir` and `E`.
    pub mui: Vec<Point>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub cols: usize,
    pub rows: usize,
    /// Undistorted grid, the texture coordinates of `vertices`.
    pub source: Vec<Point>,
    /// `(cols + 1) · (rows + 1)` vertices, row-major, in surface pixels.
    pub vertices: Vec<Point>,
    pub edges: MeshEdges,
}

impl Mesh {
    /// The curl produced no right-edge vertices: the flap is vertical or
    /// the polygon is degenerate, and the frame should not be used.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.edges.nvj.is_empty()
    }

    /// Vertex indices of two triangles per grid cell.
    #[must_use]
    pub fn triangles(&self) -> Vec<[usize; 3]> {
        let stride = self.cols + 1;
        if self.vertices.len() < stride * (self.rows + 1) {
            return vec![];
        }
        let mut tris = Vec::with_capacity(2 * self.cols * self.rows);
        for row in 0..self.rows {
            for col in 0..self.cols {
                let top_left = row * stride + col;
                let bottom_left = top_left + stride;
                tris.push([top_left, top_left + 1, bottom_left]);
                tris.push([top_left + 1, bottom_left + 1, bottom_left]);
            }
        }
        tris
    }
}

/// Affine transform `[a, b, c, d, e, f]` (canvas `transform` order) that
/// maps the `src` triangle onto `dst`. `None` for a degenerate source.
#[must_use]
pub fn affine(src: [Point; 3], dst: [Point; 3]) -> Option<[f64; 6]> {
    let (s1, s2) = (src[1] - src[0], src[2] - src[0]);
    let (d1, d2) = (dst[1] - dst[0], dst[2] - dst[0]);
    let det = s1.x * s2.y - s2.x * s1.y;
    if det.abs() < f64::EPSILON || !det.is_finite() {
        return None;
    }

    let a = (d1.x * s2.y - d2.x * s1.y) / det;
    let c = (d2.x * s1.x - d1.x * s2.x) / det;
    let b = (d1.y * s2.y - d2.y * s1.y) / det;
    let d = (d2.y * s1.x - d1.y * s2.x) / det;
    let e = dst[0].x - a * src[0].x - c * src[0].y;
    let f = dst[0].y - b * src[0].x - d * src[0].y;
    Some([a, b, c, d, e, f])
}

/// Undistorted grid positions for a `width × height` surface.
#[must_use]
pub fn grid(width: f64, height: f64, interval: u32) -> (usize, usize, Vec<Point>) {
    let interval = f64::from(interval.max(1));
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let (cols, rows) = ((width / interval).max(1.0) as usize, (height / interval).max(1.0) as usize);

    let mut vertices = Vec::with_capacity((cols + 1) * (rows + 1));
    for i in 0..=rows {
        #[allow(clippy::cast_precision_loss)]
        let y = height * i as f64 / rows as f64;
        for j in 0..=cols {
            #[allow(clippy::cast_precision_loss)]
            let x = width * j as f64 / cols as f64;
            vertices.push(Point::new(x, y));
        }
    }
    (cols, rows, vertices)
}

/// Warp the grid for a polygon given in the surface's Cartesian system.
///
/// `surface` describes the drawing surface (origin and pixel size); the
/// returned vertices and edges are in its screen space.
#[must_use]
pub fn build(points: &AllPoints, surface: &Viewport, interval: u32, upside_down: bool) -> Mesh {
    let AllPoints { c, h, i, j, n, w, z, .. } = *points;

    let k_ch = Line::through(c, h).k;
    let l_wz = Line::with_slope(-1.0 / k_ch, w);
    let jr = Point::new(c.x, j.y + k_ch * (c.x - j.x));
    let ir = Point::new(Line::with_slope(l_wz.k, jr).x_at(c.y), c.y);
    let f = Point::new(c.x, Line::through(j, h).y_at(c.x));
    let e = Point::new(Line::through(i, h).x_at(c.y), c.y);

    let r = n.distance_to_line(&l_wz);
    let delta = r * PI / j.distance_to(jr);
    let k_push = Line::through(surface.to_screen(c), surface.to_screen(h)).k;

    let nvj_range = FloatRange::new(jr.y, f.y);
    let ztn_range = FloatRange::new(f.y, z.y);
    let wsm_range = FloatRange::new(e.x, w.x);
    let mui_range = FloatRange::new(ir.x, e.x);

    let (cols, rows, source) = grid(surface.width, surface.height, interval);
    let mut vertices = source.clone();
    let stride = cols + 1;
    let mut edges = MeshEdges::default();

    for (idx, vertex) in vertices.iter_mut().enumerate() {
        let g = surface.to_cartesian(*vertex);
        let curled = if upside_down { g.is_above(&l_wz) } else { g.is_below(&l_wz) };
        if !curled {
            continue;
        }

        let d = g.distance_to_line(&l_wz);
        let q = vertex.extend_along(k_push, d - r * (d * delta / r).sin());

        if (idx + 1) % stride == 0 {
            if nvj_range.contains(g.y) {
                edges.nvj.push(q);
            } else if ztn_range.contains(g.y) {
                edges.ztn.push(q);
            }
        } else if (!upside_down && idx >= stride * rows) || (upside_down && idx < stride) {
            if wsm_range.contains(g.x) {
                edges.wsm.push(q);
            } else if mui_range.contains(g.x) {
                edges.mui.push(q);
            }
        }

        *vertex = q;
    }

    Mesh { cols, rows, source, vertices, edges }
}
