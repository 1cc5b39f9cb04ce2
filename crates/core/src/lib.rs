//! # Cadence Core
//!
//! Editing and persistence flow for weekly availability - no infrastructure
//! dependencies.
//!
//! This crate contains:
//! - The interactive edit controller (drag state machine)
//! - Port interfaces (traits) for persistence and access control
//! - The availability service with its optimistic ledger
//! - Expansion of the recurring week into UTC occurrences
//!
//! ## Architecture Principles
//! - Only depends on `cadence-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits

pub mod availability;
pub mod editor;
pub mod schedule;

// Re-export specific items to avoid ambiguity
pub use availability::ports::{AccessPolicy, AvailabilityGateway};
pub use availability::{AvailabilityLedger, AvailabilityService, CommitReport, CommitStatus};
pub use editor::{DragMode, DragPreview, Edge, EditController, EditOutcome, PointerTarget};
pub use schedule::{expand_occurrences, parse_timezone, Occurrence};
