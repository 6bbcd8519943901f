//! Widget configuration, deserialised from JSON by the host.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_MESH_INTERVAL;

// =============================================================================
// TYPES
// =============================================================================

/// Straight (non-premultiplied) RGBA colour with alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Black at the given opacity.
    #[must_use]
    pub const fn black(a: f64) -> Self {
        Self { r: 0, g: 0, b: 0, a }
    }

    /// CSS `rgba(...)` string for canvas fill styles and gradient stops.
    #[must_use]
    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::new(255, 255, 255, 1.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("mesh interval must be positive")]
    ZeroMeshInterval,
    #[error("loose edge blend must be finite and non-negative: {0}")]
    InvalidEdgeBlend(f64),
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Host-tunable options. Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurlConfig {
    /// Fill colour of the page front and back.
    pub page_color: Rgba,
    /// Ignore all gestures and taps.
    pub disabled: bool,
    /// Spacing of the distortion grid, in surface pixels.
    pub mesh_interval: u32,
    /// Upper bound of the `W` pull-back ratio in the loose regime.
    ///
    /// When positive, `W` is moved left of the touch line's foot `K` by
    /// `ratio(K.x) · ratio(θ) · (E.x − S.x)`, each ratio mapped linearly from
    /// `[min W.x, C.x]` and `[MIN_THETA, π]` onto `[0, loose_edge_blend]`.
    /// The flap then narrows gradually before the width-clamped regime
    /// takes over. `0` (the default) keeps `W` at `K`.
    pub loose_edge_blend: f64,
}

impl Default for CurlConfig {
    fn default() -> Self {
        Self {
            page_color: Rgba::default(),
            disabled: false,
            mesh_interval: DEFAULT_MESH_INTERVAL,
            loose_edge_blend: 0.0,
        }
    }
}

// =============================================================================
// PARSING
// =============================================================================

impl CurlConfig {
    /// Parse and validate a JSON config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed input and the validation
    /// errors of [`CurlConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: CurlConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero mesh interval or a negative or non-finite
    /// edge blend.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mesh_interval == 0 {
            return Err(ConfigError::ZeroMeshInterval);
        }
        if !self.loose_edge_blend.is_finite() || self.loose_edge_blend < 0.0 {
            return Err(ConfigError::InvalidEdgeBlend(self.loose_edge_blend));
        }
        Ok(())
    }
}
