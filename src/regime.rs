//! Curl regimes and the per-frame transition policy.
//!
//! Exactly one regime is active at a time. Each frame the active regime's
//! solver runs against the latest drag step, then checks its exit
//! conditions. A regime switch discards that frame: [`Simulation::step`]
//! returns `None` and the caller draws the previous polygon again, so the
//! new regime always starts from a fresh solve.
//!
//! Switching has no hysteresis; which way the finger is moving (relative to
//! the flap's `HF` edge) decides whether a threshold crossing counts.

#[cfg(test)]
#[path = "regime_test.rs"]
mod regime_test;

use tracing::debug;

use crate::consts::{MIN_THETA, MIN_WX_RATIO, TIGHT_MIN_WE_RATIO};
use crate::drag::DragDirection::{self, *};
use crate::drag::DragEvent;
use crate::flow::FlowState;
use crate::geom::{Line, Point};
use crate::points::AllPoints;
use crate::solver;
use crate::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Regime {
    /// Fold follows the finger freely.
    #[default]
    Loose,
    /// `W` pinned at its minimum x.
    WidthMin,
    /// Fold angle pinned at [`MIN_THETA`].
    ThetaMin,
    /// Angle and width both pinned; θ is steered by drag moves.
    Tight,
}

/// What one regime decided for a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// Stay and draw these points (screen space).
    Stay(AllPoints),
    /// Move to another regime, optionally replacing the cached θ.
    Switch { to: Regime, theta: Option<f64> },
    /// The curl crossed its own fold: mirror about the page's mid line.
    Flip,
    /// Nothing usable this frame.
    Skip,
}

/// Regime plus the scalars that persist across frames.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Simulation {
    pub regime: Regime,
    /// Cached fold angle. Meaningful in `ThetaMin` and `Tight`.
    pub theta: f64,
    /// Fixed distance between the touch point and the bottom edge.
    pub f: f64,
    /// The curl is computed mirrored about the mid line (finger dragged the
    /// top corner).
    pub upside_down: bool,
}

impl Simulation {
    /// Mirror a screen-space drag into the system the solvers run in.
    #[must_use]
    pub fn orient(&self, event: DragEvent, vp: &Viewport) -> DragEvent {
        if self.upside_down { event.reflect_about(&vp.mid_line()) } else { event }
    }

    /// Mirror solver output back for display.
    #[must_use]
    pub fn display(&self, points: AllPoints, vp: &Viewport) -> AllPoints {
        if self.upside_down { points.reflect_about(&vp.mid_line()) } else { points }
    }

    /// Solve one frame for the screen-space drag step `event`.
    ///
    /// Returns the polygon in (unmirrored) screen space, or `None` when the
    /// frame was discarded.
    pub fn step(&mut self, event: DragEvent, vp: &Viewport, flow: FlowState, blend: f64) -> Option<AllPoints> {
        let event = self.orient(event, vp);
        let transition = match self.regime {
            Regime::Loose => self.loose(&event, vp, flow, blend),
            Regime::WidthMin => self.width_min(&event, vp),
            Regime::ThetaMin => self.theta_min(&event, vp),
            Regime::Tight => self.tight(&event, vp),
        };

        match transition {
            Transition::Stay(points) => Some(points),
            Transition::Switch { to, theta } => {
                if let Some(theta) = theta {
                    self.theta = theta;
                }
                debug!(from = ?self.regime, to = ?to, theta = self.theta, "regime switch");
                self.regime = to;
                None
            }
            Transition::Flip => {
                self.upside_down = !self.upside_down;
                self.f = vp.height - self.f;
                debug!(upside_down = self.upside_down, f = self.f, "curl flipped");
                None
            }
            Transition::Skip => None,
        }
    }

    fn loose(&self, event: &DragEvent, vp: &Viewport, flow: FlowState, blend: f64) -> Transition {
        let c = corner(vp);
        let cart = event.to_cartesian(vp);
        let (theta, points) = solver::loose(c, cart.origin, self.f, blend);

        let direction = cart.direction_to_line(&Line::through(points.h, cart.origin));
        let k_jh = Line::through(points.j, points.h).k;
        if direction == Static || k_jh.is_nan() {
            return Transition::Skip;
        }

        if matches!(flow, FlowState::EnteringAnimation | FlowState::Draggable) {
            if k_jh <= 0.0 && cart.direction_from_origin().is_in(&[Down, RightDown, LeftDown, Left, Right]) {
                return Transition::Flip;
            }
            if points.w.x < MIN_WX_RATIO * c.x && direction.is_in(&[Up, RightUp, LeftUp, LeftDown]) {
                return Transition::Switch { to: Regime::WidthMin, theta: Some(theta) };
            }
            if theta < MIN_THETA && direction.is_in(&[Up, RightUp, Right, RightDown]) {
                return Transition::Switch { to: Regime::ThetaMin, theta: Some(MIN_THETA) };
            }
        }

        Transition::Stay(points.to_screen(vp))
    }

    fn width_min(&self, event: &DragEvent, vp: &Viewport) -> Transition {
        let c = corner(vp);
        let cart = event.to_cartesian(vp);
        let (theta, we, points) = solver::width_min(c, cart.origin, self.f);
        let free_wx = solver::loose_wx(c, cart.current, self.f);
        let direction = direction_to_hf(&cart, points.h);

        if we < TIGHT_MIN_WE_RATIO * c.x && direction.is_in(&[Up, RightUp, Right, LeftUp]) {
            return Transition::Switch { to: Regime::Tight, theta: Some(MIN_THETA.max(theta)) };
        }
        if free_wx >= MIN_WX_RATIO * c.x && direction.is_in(&[LeftDown, Down, RightDown, Left]) {
            return Transition::Switch { to: Regime::Loose, theta: Some(MIN_THETA.max(theta)) };
        }
        if theta < MIN_THETA && direction.is_in(&[Right, Up, RightUp, RightDown]) {
            return Transition::Switch { to: Regime::ThetaMin, theta: Some(MIN_THETA) };
        }

        Transition::Stay(points.to_screen(vp))
    }

    fn theta_min(&self, event: &DragEvent, vp: &Viewport) -> Transition {
        let c = corner(vp);
        let min_wx = MIN_WX_RATIO * c.x;
        let min_we = TIGHT_MIN_WE_RATIO * c.x;
        let cart = event.to_cartesian(vp);
        let (we, points) = solver::theta_min(c, cart.origin, self.f);
        let direction = direction_to_hf(&cart, points.h);
        let locked = points.h.distance_to(cart.origin) < self.f;

        if points.w.x <= min_wx && we <= min_we && direction.is_in(&[RightUp, LeftUp, Up, Right]) {
            return Transition::Switch { to: Regime::Tight, theta: Some(MIN_THETA) };
        }
        if locked && points.w.x > min_wx && direction.is_in(&[Left, LeftDown, RightDown, Down, LeftUp]) {
            return Transition::Switch { to: Regime::Loose, theta: Some(MIN_THETA) };
        }
        if locked && points.w.x <= min_wx && direction.is_in(&[LeftDown, Left, LeftUp]) {
            return Transition::Switch { to: Regime::WidthMin, theta: Some(MIN_THETA) };
        }

        Transition::Stay(points.to_screen(vp))
    }

    fn tight(&self, event: &DragEvent, vp: &Viewport) -> Transition {
        let c = corner(vp);
        let cart = event.to_cartesian(vp);
        let (l_hf, points) = solver::tight(c, self.theta);
        let direction = cart.direction_to_line(&l_hf);
        let touch = cart.current;

        if touch.is_below(&l_hf) && direction.is_in(&[RightDown, Down, LeftDown]) {
            let to = if touch.distance_to(points.h) >= self.f { Regime::ThetaMin } else { Regime::WidthMin };
            return Transition::Switch { to, theta: None };
        }

        Transition::Stay(points.to_screen(vp))
    }
}

/// Far corner `C` in Cartesian space.
fn corner(vp: &Viewport) -> Point {
    vp.to_cartesian(vp.corner())
}

/// Direction of a Cartesian drag relative to the line from `H` to its origin.
fn direction_to_hf(cart: &DragEvent, h: Point) -> DragDirection {
    cart.direction_to_line(&Line::through(h, cart.origin))
}
