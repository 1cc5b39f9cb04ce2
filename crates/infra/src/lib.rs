//! # Cadence Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The SQLite availability gateway and membership access policy
//! - An in-memory gateway for embedding and tests
//! - Configuration loading from environment and files
//! - Tracing subscriber setup
//!
//! ## Architecture
//! - Implements traits defined in `cadence-core`
//! - Depends on `cadence-domain` and `cadence-core`
//! - Contains all "impure" code (I/O, blocking database work)

pub mod config;
pub mod database;
pub mod errors;
pub mod observability;

// Re-export commonly used items
pub use database::*;
pub use errors::InfraError;
pub use observability::init_tracing;
