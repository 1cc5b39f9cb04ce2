//! Availability constants
//!
//! Centralized location for the numeric policy shared by the model, the
//! validation engine and the edit controller.

// Day model invariants
/// Most blocks a single day may hold.
pub const MAX_BLOCKS_PER_DAY: usize = 5;
/// Shortest allowed block, also the smallest drag result.
pub const MIN_BLOCK_MINUTES: i32 = 15;

// Wall-clock range
pub const MINUTES_PER_HOUR: i32 = 60;
/// Also the largest valid end bound (24:00).
pub const MINUTES_PER_DAY: i32 = 1440;
pub const DAYS_PER_WEEK: usize = 7;

// Editable grid defaults (06:00 - 22:00, quarter-hour quantum)
pub const DEFAULT_GRID_START_MINUTES: i32 = 360;
pub const DEFAULT_GRID_END_MINUTES: i32 = 1320;
pub const DEFAULT_SNAP_MINUTES: i32 = 15;
/// Rendered pixels per hour row.
pub const DEFAULT_HOUR_HEIGHT_PX: f64 = 48.0;

// Storage defaults
/// Zone assumed for instructors that never set one.
pub const DEFAULT_TIMEZONE: &str = "UTC";
