//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! Whatever the source, the grid is validated before the config is returned.
//!
//! ## Environment Variables
//! - `CADENCE_DB_PATH`: Database file path (required)
//! - `CADENCE_DB_POOL_SIZE`: Connection pool size (required)
//! - `CADENCE_GRID_START`: First editable minute of the day
//! - `CADENCE_GRID_END`: Last editable minute of the day
//! - `CADENCE_SNAP_MINUTES`: Drag quantum in minutes
//! - `CADENCE_HOUR_HEIGHT_PX`: Rendered height of one grid hour
//! - `CADENCE_LOG_LEVEL`: Default log filter
//! - `CADENCE_LOG_JSON`: Whether to log JSON lines (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./cadence.json` or `./cadence.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use cadence_domain::{CadenceError, Config, DatabaseConfig, GridConfig, LoggingConfig, Result};

const FILE_NAMES: [&str; 4] = ["config.json", "config.toml", "cadence.json", "cadence.toml"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `CadenceError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - The grid geometry is invalid
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// The database variables are required; grid and logging variables fall
/// back to their defaults when unset.
///
/// # Errors
/// Returns `CadenceError::Config` if required variables are missing
/// or any variable has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let path = env_var("CADENCE_DB_PATH")?;
    let pool_size = env_parse("CADENCE_DB_POOL_SIZE", "pool size")?;

    let defaults = GridConfig::default();
    let grid = GridConfig {
        start_minutes: env_parse_or("CADENCE_GRID_START", "grid start", defaults.start_minutes)?,
        end_minutes: env_parse_or("CADENCE_GRID_END", "grid end", defaults.end_minutes)?,
        snap_minutes: env_parse_or("CADENCE_SNAP_MINUTES", "snap minutes", defaults.snap_minutes)?,
        hour_height_px: env_parse_or(
            "CADENCE_HOUR_HEIGHT_PX",
            "hour height",
            defaults.hour_height_px,
        )?,
    };
    grid.validate()?;

    let logging = LoggingConfig {
        level: std::env::var("CADENCE_LOG_LEVEL").unwrap_or_else(|_| LoggingConfig::default().level),
        json: env_bool("CADENCE_LOG_JSON", false),
    };

    Ok(Config { database: DatabaseConfig { path, pool_size }, grid, logging })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `CadenceError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - The grid geometry is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(CadenceError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            CadenceError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| CadenceError::Config(format!("Failed to read config file: {}", e)))?;

    let config = parse_config(&contents, &config_path)?;
    config.grid.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| CadenceError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| CadenceError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(CadenceError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }
    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf))
    {
        roots.push(exe_dir);
    }

    roots.iter().flat_map(|root| candidates_under(root)).find(|path| path.exists())
}

/// Candidate files under `root`: local names first, then up to two parents.
fn candidates_under(root: &Path) -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = FILE_NAMES.iter().map(|name| root.join(name)).collect();
    for up in ["..", "../.."] {
        candidates.push(root.join(up).join("config.json"));
        candidates.push(root.join(up).join("config.toml"));
    }
    candidates
}

/// Get required environment variable
///
/// # Errors
/// Returns `CadenceError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        CadenceError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Parse a required environment variable.
fn env_parse<T>(key: &str, what: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_var(key)?
        .trim()
        .parse::<T>()
        .map_err(|e| CadenceError::Config(format!("Invalid {}: {}", what, e)))
}

/// Parse an optional environment variable, using `default` when unset.
fn env_parse_or<T>(key: &str, what: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(_) => env_parse(key, what),
        Err(_) => Ok(default),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
