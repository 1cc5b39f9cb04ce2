//! # Cadence Domain
//!
//! Weekly availability model for Cadence.
//!
//! This crate contains:
//! - Wall-clock time primitives (`TimeOfDay`, `TimeInterval`)
//! - Day and week availability aggregates
//! - The validation engine guarding every write
//! - Error types, constants and configuration structures
//!
//! ## Architecture
//! - No dependencies on other Cadence crates
//! - No I/O, no async, no timezone handling
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
pub use validation::{validate_block_set, validate_candidate};
