//! Gesture flow states and the linear tweens that drive animations.

#[cfg(test)]
#[path = "flow_test.rs"]
mod flow_test;

use crate::drag::DragEvent;
use crate::geom::Point;

/// Where the widget is in the lifecycle of one page turn.
///
/// ```text
/// Idle ──drag engages──▶ EnteringAnimation ──done──▶ Draggable
///   ▲                        │ lift                     │ lift
///   │                        ▼                          ▼
///   └──done── ExitingAnimation ◀──next frame── ExitPending
/// ```
///
/// Taps go straight from `Idle` to `ExitingAnimation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowState {
    #[default]
    Idle,
    EnteringAnimation,
    Draggable,
    ExitingAnimation,
    ExitPending,
}

impl FlowState {
    /// A tween is running.
    #[must_use]
    pub fn is_animating(self) -> bool {
        matches!(self, Self::EnteringAnimation | Self::ExitingAnimation)
    }
}

/// A linear tween clocked by host timestamps in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tween {
    pub start_ms: f64,
    pub duration_ms: f64,
}

impl Tween {
    #[must_use]
    pub fn new(start_ms: f64, duration_ms: f64) -> Self {
        Self { start_ms, duration_ms }
    }

    /// Progress in `[0, 1]`. A zero duration completes immediately.
    #[must_use]
    pub fn ratio(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn is_finished(&self, now_ms: f64) -> bool {
        self.ratio(now_ms) >= 1.0
    }
}

/// A touch point travelling from `path.origin` to `path.current`.
///
/// Each [`Animation::advance`] yields a drag step from the previously
/// reported point to the new one, so solvers see the animation exactly like
/// a finger drag.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Animation {
    pub path: DragEvent,
    pub last: Point,
    pub tween: Tween,
}

impl Animation {
    /// Starts from `path.origin`.
    #[must_use]
    pub fn new(path: DragEvent, start_ms: f64, duration_ms: f64) -> Self {
        Self { path, last: path.origin, tween: Tween::new(start_ms, duration_ms) }
    }

    /// Point at progress `ratio`.
    #[must_use]
    pub fn point_at(&self, ratio: f64) -> Point {
        self.path.origin + self.path.delta() * ratio
    }

    /// Move to `ratio` and return the step since the previous call.
    pub fn advance(&mut self, ratio: f64) -> DragEvent {
        let next = self.point_at(ratio);
        let step = DragEvent::new(self.last, next);
        self.last = next;
        step
    }
}
