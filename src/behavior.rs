//! Pluggable gesture policies.
//!
//! The host may override how taps, drag starts and drag releases are
//! interpreted. Each policy is a trait with a default implementation used
//! when the host supplies none. Closures with the matching signature
//! implement the traits directly.

#[cfg(test)]
#[path = "behavior_test.rs"]
mod behavior_test;

use crate::geom::Point;

/// Area the gesture policies judge touches against, in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left_top: Point,
    pub right_bottom: Point,
}

impl Bounds {
    #[must_use]
    pub fn mid_x(&self) -> f64 {
        0.5 * (self.left_top.x + self.right_bottom.x)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapResponse {
    Forward,
    Backward,
    Ignore,
}

/// How a finished drag leaves the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitDecision {
    /// The exit animation runs off the left edge (the page turns over)
    /// rather than back to the right.
    pub exits_left: bool,
    /// Turn to report once the exit finishes. `None` reports nothing.
    pub forward: Option<bool>,
}

/// Decides what a tap does.
pub trait TapBehavior {
    fn on_tap(&self, bounds: &Bounds, touch: Point) -> TapResponse;
}

/// Classifies a drag once it has moved far enough to engage.
///
/// `Some(true)` means the drag runs right to left (toward the next page).
/// `None` interrupts the gesture: it is ignored until the finger lifts.
pub trait DragResponse {
    fn on_drag(&self, bounds: &Bounds, start: Point, current: Point) -> Option<bool>;
}

/// Decides the exit animation and turn outcome when the finger lifts.
pub trait DragExit {
    fn on_release(&self, bounds: &Bounds, start: Point, last: Point, right_to_left: bool) -> ExitDecision;
}

impl<F: Fn(&Bounds, Point) -> TapResponse> TapBehavior for F {
    fn on_tap(&self, bounds: &Bounds, touch: Point) -> TapResponse {
        self(bounds, touch)
    }
}

impl<F: Fn(&Bounds, Point, Point) -> Option<bool>> DragResponse for F {
    fn on_drag(&self, bounds: &Bounds, start: Point, current: Point) -> Option<bool> {
        self(bounds, start, current)
    }
}

impl<F: Fn(&Bounds, Point, Point, bool) -> ExitDecision> DragExit for F {
    fn on_release(&self, bounds: &Bounds, start: Point, last: Point, right_to_left: bool) -> ExitDecision {
        self(bounds, start, last, right_to_left)
    }
}

// =============================================================================
// DEFAULTS
// =============================================================================

/// Right half turns forward, left half backward.
#[must_use]
pub fn default_tap(bounds: &Bounds, touch: Point) -> TapResponse {
    if touch.x < bounds.mid_x() { TapResponse::Backward } else { TapResponse::Forward }
}

/// Right to left when the finger moved left of where it started.
#[must_use]
pub fn default_drag(_bounds: &Bounds, start: Point, current: Point) -> Option<bool> {
    Some(current.x < start.x)
}

/// Released on the right half: the page falls back, which undoes a
/// left-to-right drag (a backward turn). Released on the left half: the
/// page turns over, completing a right-to-left drag (a forward turn).
#[must_use]
pub fn default_exit(bounds: &Bounds, _start: Point, last: Point, right_to_left: bool) -> ExitDecision {
    let at_right = last.x > bounds.mid_x();
    let forward = match (at_right, right_to_left) {
        (true, false) => Some(false),
        (false, true) => Some(true),
        _ => None,
    };
    ExitDecision { exits_left: !at_right, forward }
}

/// Host overrides; `None` fields fall back to the defaults above.
#[derive(Default)]
pub struct Behaviors {
    pub tap: Option<Box<dyn TapBehavior>>,
    pub drag: Option<Box<dyn DragResponse>>,
    pub exit: Option<Box<dyn DragExit>>,
}

impl Behaviors {
    #[must_use]
    pub fn tap(&self, bounds: &Bounds, touch: Point) -> TapResponse {
        match &self.tap {
            Some(b) => b.on_tap(bounds, touch),
            None => default_tap(bounds, touch),
        }
    }

    #[must_use]
    pub fn drag(&self, bounds: &Bounds, start: Point, current: Point) -> Option<bool> {
        match &self.drag {
            Some(b) => b.on_drag(bounds, start, current),
            None => default_drag(bounds, start, current),
        }
    }

    #[must_use]
    pub fn exit(&self, bounds: &Bounds, start: Point, last: Point, right_to_left: bool) -> ExitDecision {
        match &self.exit {
            Some(b) => b.on_release(bounds, start, last, right_to_left),
            None => default_exit(bounds, start, last, right_to_left),
        }
    }
}

impl std::fmt::Debug for Behaviors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Behaviors")
            .field("tap", &self.tap.is_some())
            .field("drag", &self.drag.is_some())
            .field("exit", &self.exit.is_some())
            .finish()
    }
}
