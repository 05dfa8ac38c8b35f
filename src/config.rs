//! Editor configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::str::FromStr;

use crate::consts::{
    DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, HISTORY_LIMIT, MIN_OBJECT_SIZE, NUDGE_STEP, NUDGE_STEP_COARSE,
    SNAP_THRESHOLD,
};

pub const ENV_HISTORY_LIMIT: &str = "SIGN_BUILDER_HISTORY_LIMIT";
pub const ENV_SNAP_THRESHOLD: &str = "SIGN_BUILDER_SNAP_THRESHOLD";
pub const ENV_CANVAS_WIDTH: &str = "SIGN_BUILDER_CANVAS_WIDTH";
pub const ENV_CANVAS_HEIGHT: &str = "SIGN_BUILDER_CANVAS_HEIGHT";

/// Errors produced while reading configuration overrides.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    /// An override was present but not a number.
    #[error("config parse failed: {var}={value:?}")]
    Parse { var: &'static str, value: String },

    /// An override parsed but is outside the accepted range.
    #[error("config value out of range: {var} {reason}")]
    OutOfRange { var: &'static str, reason: &'static str },
}

/// Tunables for one editing session.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Maximum retained history snapshots; at least 1.
    pub history_limit: usize,
    /// Inclusive snap distance in inches.
    pub snap_threshold: f64,
    pub min_object_size: f64,
    /// Initial canvas width in inches.
    pub canvas_width: f64,
    /// Initial canvas height in inches.
    pub canvas_height: f64,
    pub nudge_step: f64,
    pub nudge_step_coarse: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: HISTORY_LIMIT,
            snap_threshold: SNAP_THRESHOLD,
            min_object_size: MIN_OBJECT_SIZE,
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            nudge_step: NUDGE_STEP,
            nudge_step_coarse: NUDGE_STEP_COARSE,
        }
    }
}

impl EditorConfig {
    /// Build config from process environment variables.
    ///
    /// Optional:
    /// - `SIGN_BUILDER_HISTORY_LIMIT`: default 50, must be >= 1
    /// - `SIGN_BUILDER_SNAP_THRESHOLD`: default 0.5, must be >= 0
    /// - `SIGN_BUILDER_CANVAS_WIDTH`: default 24, must be > 0
    /// - `SIGN_BUILDER_CANVAS_HEIGHT`: default 18, must be > 0
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var_os(key).map(|v| v.to_string_lossy().into_owned()))
    }

    /// Build config from an arbitrary key lookup. Absent keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let history_limit: usize = parse_or(&lookup, ENV_HISTORY_LIMIT, defaults.history_limit)?;
        if history_limit < 1 {
            return Err(ConfigError::OutOfRange { var: ENV_HISTORY_LIMIT, reason: "must be at least 1" });
        }

        let snap_threshold: f64 = parse_or(&lookup, ENV_SNAP_THRESHOLD, defaults.snap_threshold)?;
        if !(snap_threshold >= 0.0 && snap_threshold.is_finite()) {
            return Err(ConfigError::OutOfRange { var: ENV_SNAP_THRESHOLD, reason: "must be a finite value >= 0" });
        }

        let canvas_width = positive(parse_or(&lookup, ENV_CANVAS_WIDTH, defaults.canvas_width)?, ENV_CANVAS_WIDTH)?;
        let canvas_height =
            positive(parse_or(&lookup, ENV_CANVAS_HEIGHT, defaults.canvas_height)?, ENV_CANVAS_HEIGHT)?;

        Ok(Self { history_limit, snap_threshold, canvas_width, canvas_height, ..defaults })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::Parse { var, value: raw }),
    }
}

fn positive(value: f64, var: &'static str) -> Result<f64, ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::OutOfRange { var, reason: "must be a finite value > 0" })
    }
}
