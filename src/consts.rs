//! Shared numeric constants for the page-curl crate.

use crate::config::Rgba;

// ── Regime thresholds ───────────────────────────────────────────

/// Smallest fold-line inclination (137°) before the angle is clamped.
pub const MIN_THETA: f64 = 137.0 * std::f64::consts::PI / 180.0;

/// Minimum flap width `E.x − W.x` as a fraction of the page width.
pub const TIGHT_MIN_WE_RATIO: f64 = 1.0 / 8.0;

/// Minimum `W.x` as a fraction of the page width.
pub const MIN_WX_RATIO: f64 = 1.0 / 25.0;

/// Degrees of θ per pixel of upward drag in the tight regime.
pub const TIGHT_DRAG_UP_THETA_RATE: f64 = 0.1;

/// Right-margin fraction that a rightward tight drag maps onto.
pub const TIGHT_DRAG_RIGHT_DISTANCE_RATIO: f64 = 1.0 / 40.0;

// ── Gestures ────────────────────────────────────────────────────

/// Gestures must start in `[0, width · (1 − MAX_DRAG_X_RATIO)]`.
pub const MAX_DRAG_X_RATIO: f64 = 1.0 / 40.0;

/// Taps closer than `height · TAP_Y_DELTA_RATIO` to the top are ignored.
pub const TAP_Y_DELTA_RATIO: f64 = 1.0 / 170.0;

/// Time a drag must be held before it engages the curl.
pub const ANIM_START_TIMEOUT_MS: f64 = 75.0;

// ── Animation ───────────────────────────────────────────────────

pub const ANIM_ENTER_DURATION_MS: f64 = 100.0;

pub const ANIM_EXIT_DURATION_MS: f64 = 100.0;

// ── Shadows ─────────────────────────────────────────────────────

/// Full width of shadows 1 and 2 once the flap has narrowed to its minimum.
pub const SHADOW_THRESHOLD: f64 = 22.0;

/// Shadow 3 is this much wider than shadows 1 and 2.
pub const SHADOW_PART3_TO_1_RATIO: f64 = 1.5;

/// Above this `|T1.y / C.y|` ratio shadow 3 is drawn as a rectangle.
pub const SHADOW3_VERTICAL_THRESHOLD: f64 = 50.0;

pub const LUSTRE_DISTANCE_MIN: f64 = 6.0;
pub const LUSTRE_DISTANCE_MAX: f64 = 9.0;
pub const LUSTRE_END_SHADOW_WIDTH_MIN: f64 = 16.0;
pub const LUSTRE_END_SHADOW_WIDTH_MAX: f64 = 24.0;

pub const SHADOW12_COLOR: Rgba = Rgba::black(0.3);
pub const SHADOW3_COLOR: Rgba = Rgba::black(0.65);
pub const LUSTRE_COLOR: Rgba = Rgba::black(0.02);
pub const TRANSPARENT: Rgba = Rgba::black(0.0);

// ── Mesh ────────────────────────────────────────────────────────

/// Default spacing of the distortion grid, in surface pixels.
pub const DEFAULT_MESH_INTERVAL: u32 = 25;
