//! Configuration structures
//!
//! Loading lives in `cadence-infra::config`; this module only defines the
//! shapes and their defaults.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_GRID_END_MINUTES, DEFAULT_GRID_START_MINUTES, DEFAULT_HOUR_HEIGHT_PX,
    DEFAULT_SNAP_MINUTES, MINUTES_PER_DAY, MINUTES_PER_HOUR, MIN_BLOCK_MINUTES,
};
use crate::errors::{CadenceError, Result};
use crate::types::time::quantize;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub grid: GridConfig,
    pub logging: LoggingConfig,
}

/// Database configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: "cadence.db".to_string(), pool_size: 8 }
    }
}

/// Editable grid geometry shared by the edit controller and the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// First editable minute of the day (default 06:00).
    pub start_minutes: i32,
    /// Last editable minute of the day (default 22:00).
    pub end_minutes: i32,
    /// Quantum for create, move and resize.
    pub snap_minutes: i32,
    /// Rendered height of one hour.
    pub hour_height_px: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            start_minutes: DEFAULT_GRID_START_MINUTES,
            end_minutes: DEFAULT_GRID_END_MINUTES,
            snap_minutes: DEFAULT_SNAP_MINUTES,
            hour_height_px: DEFAULT_HOUR_HEIGHT_PX,
        }
    }
}

impl GridConfig {
    /// Reject grids the controller cannot work with.
    ///
    /// # Errors
    /// Returns `CadenceError::Config` if the span is inverted, leaves the day,
    /// is too short for one block, or is not aligned to the quantum.
    pub fn validate(&self) -> Result<()> {
        if self.snap_minutes <= 0 {
            return Err(CadenceError::Config(format!(
                "snap_minutes must be positive, got {}",
                self.snap_minutes
            )));
        }
        if self.start_minutes < 0 || self.end_minutes > MINUTES_PER_DAY {
            return Err(CadenceError::Config(format!(
                "grid {}..{} leaves the day",
                self.start_minutes, self.end_minutes
            )));
        }
        if self.end_minutes - self.start_minutes < MIN_BLOCK_MINUTES {
            return Err(CadenceError::Config(format!(
                "grid {}..{} cannot hold a {MIN_BLOCK_MINUTES} minute block",
                self.start_minutes, self.end_minutes
            )));
        }
        if self.start_minutes % self.snap_minutes != 0 || self.end_minutes % self.snap_minutes != 0 {
            return Err(CadenceError::Config(format!(
                "grid bounds must be multiples of {} minutes",
                self.snap_minutes
            )));
        }
        if !self.hour_height_px.is_finite() || self.hour_height_px <= 0.0 {
            return Err(CadenceError::Config(format!(
                "hour_height_px must be positive, got {}",
                self.hour_height_px
            )));
        }
        Ok(())
    }

    /// Round to the nearest quantum (ties up), then clamp into the grid.
    pub fn snap(&self, minutes: i32) -> i32 {
        quantize(minutes, self.snap_minutes).clamp(self.start_minutes, self.end_minutes)
    }

    /// Linear pixel to minute mapping, unsnapped.
    ///
    /// The offset from the grid start is bounded to one day either way, so
    /// any pointer position (including infinite or NaN) maps to a finite minute.
    pub fn px_to_minutes(&self, y_px: f64) -> i32 {
        self.start_minutes.saturating_add(self.px_to_offset_minutes(y_px))
    }

    /// Pointer travel in whole minutes, bounded to one day either way.
    pub fn px_to_offset_minutes(&self, dy_px: f64) -> i32 {
        let bound = f64::from(MINUTES_PER_DAY);
        let offset = (dy_px * f64::from(MINUTES_PER_HOUR) / self.hour_height_px).round();
        // NaN survives the clamp and `as` maps it to zero.
        offset.clamp(-bound, bound) as i32
    }

    /// Inverse of [`Self::px_to_minutes`], for placing blocks on the grid.
    pub fn minutes_to_px(&self, minutes: i32) -> f64 {
        f64::from(minutes - self.start_minutes) * self.hour_height_px / f64::from(MINUTES_PER_HOUR)
    }

    /// Snapped minute under a pointer offset.
    pub fn snap_px(&self, y_px: f64) -> i32 {
        self.snap(self.px_to_minutes(y_px))
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}
