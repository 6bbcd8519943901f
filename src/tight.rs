//! θ updates while the tight regime is being dragged.
//!
//! In the tight regime the flap shape is fixed, so the finger steers only
//! the fold angle. Each drag move (not each frame) nudges θ toward
//! [`MIN_THETA`] by an amount that depends on the move's direction. Drag
//! deltas are taken in screen space; directions are classified in Cartesian
//! space.

#[cfg(test)]
#[path = "tight_test.rs"]
mod tight_test;

use crate::consts::{
    MIN_THETA, MIN_WX_RATIO, TIGHT_DRAG_RIGHT_DISTANCE_RATIO, TIGHT_DRAG_UP_THETA_RATE,
    TIGHT_MIN_WE_RATIO,
};
use crate::drag::{DragDirection, DragEvent};
use crate::geom::{FloatRange, Line, Point, Quadratic, theta_of};
use crate::viewport::Viewport;

/// New θ after the screen-space drag step `event`.
#[must_use]
pub fn drag_theta(vp: &Viewport, f: f64, theta: f64, event: &DragEvent) -> f64 {
    let delta = event.delta();
    let finger_x = event.current.x - vp.origin.x;
    match event.to_cartesian(vp).direction_from_origin() {
        DragDirection::Right => theta + right_delta(theta, finger_x, delta.x, vp.width),
        DragDirection::Up => theta + up_delta(theta, delta.y),
        DragDirection::RightUp => {
            let right = right_delta(theta, finger_x, delta.x, vp.width);
            let up = up_delta(theta, delta.y);
            let y_to_x = -delta.y / delta.x;
            theta + y_to_x / (1.0 + y_to_x) * up + 1.0 / (1.0 + y_to_x) * right
        }
        DragDirection::LeftDown
        | DragDirection::Down
        | DragDirection::Left
        | DragDirection::LeftUp
        | DragDirection::RightDown => theta + back_delta(vp, f, theta, event),
        DragDirection::Static => theta,
    }
}

/// Range θ may move through: from the current value down to the minimum.
fn toward_min(theta: f64) -> FloatRange {
    FloatRange::new(theta.max(MIN_THETA), MIN_THETA)
}

#[must_use]
pub fn up_delta(theta: f64, dy: f64) -> f64 {
    let range = toward_min(theta);
    let next = range.constrain((dy * TIGHT_DRAG_UP_THETA_RATE).to_radians() + theta);
    next - theta
}

/// `finger_x` is measured from the page's left edge.
#[must_use]
pub fn right_delta(theta: f64, finger_x: f64, dx: f64, width: f64) -> f64 {
    let drag = FloatRange::new(finger_x - dx, width * (1.0 - TIGHT_DRAG_RIGHT_DISTANCE_RATIO));
    let range = toward_min(theta);
    let next = range.constrain(drag.linear_map(finger_x, range));
    next - theta
}

/// Point `Rc` where the finger's drag line meets the circle of radius `f`
/// swept by the pinned flap, in Cartesian space. `None` when the line
/// misses the circle.
#[must_use]
pub fn back_contact(vp: &Viewport, f: f64, event: &DragEvent) -> Option<Point> {
    let c = vp.to_cartesian(vp.corner());
    let w = Point::new(MIN_WX_RATIO * vp.width, c.y);
    let e = Point::new(w.x + TIGHT_MIN_WE_RATIO * c.x, c.y);
    let delta = event.delta();

    if delta.x == 0.0 {
        let q = event.current.x - vp.origin.x;
        let eq = Quadratic::new(1.0, -2.0 * c.y, c.y * c.y - f * f - (c.x - q) * (c.x + q - 2.0 * e.x));
        let (r0, r1) = eq.solve()?;
        return Some(Point::new(q, r0.abs().max(r1.abs())));
    }

    let touch = Line::with_slope(-delta.y / delta.x, vp.to_cartesian(event.current));
    let (m, n) = (touch.k, touch.b);
    let eq = Quadratic::new(
        1.0 + m * m,
        2.0 * (m * n - m * c.y - e.x),
        n * n + c.y * c.y - f * f - 2.0 * n * c.y - c.x * c.x + 2.0 * c.x * e.x,
    );
    let (r0, r1) = eq.solve()?;
    let x = r0.max(r1);
    Some(Point::new(x, m * x + n))
}

/// θ delta for drags that pull the flap back open.
///
/// The distance travelled from the drag origin is mapped onto the range
/// between the current θ and the θ the flap would have at the contact point.
/// Zero when there is no contact or that θ is below the minimum.
#[must_use]
pub fn back_delta(vp: &Viewport, f: f64, theta: f64, event: &DragEvent) -> f64 {
    let Some(rc) = back_contact(vp, f, event) else {
        return 0.0;
    };
    let c = vp.to_cartesian(vp.corner());
    let e_x = MIN_WX_RATIO * vp.width + TIGHT_MIN_WE_RATIO * c.x;

    let final_k = (rc.y - c.y + f) / (rc.x + c.x - 2.0 * e_x);
    let final_theta = theta_of(-1.0 / final_k);
    if final_theta.is_nan() || final_theta < MIN_THETA {
        return 0.0;
    }

    let range = FloatRange::new(theta.min(final_theta), final_theta);
    let origin = vp.to_cartesian(event.origin);
    let finger = FloatRange::new(0.0, origin.distance_to(rc));
    let travelled = vp.to_cartesian(event.current).distance_to(origin);
    let next = range.constrain(finger.linear_map_clamped(travelled, range));
    next - theta
}
