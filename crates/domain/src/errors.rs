//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{MAX_BLOCKS_PER_DAY, MIN_BLOCK_MINUTES};

/// A single broken invariant found while validating one day's block list.
///
/// Indices refer to the order in which the candidate blocks were supplied,
/// not to the sorted order of the resulting day.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    #[error("a day holds at most {} availability blocks", MAX_BLOCKS_PER_DAY)]
    TooManyBlocks,

    #[error("block {index} is shorter than {} minutes", MIN_BLOCK_MINUTES)]
    BlockTooShort { index: usize },

    #[error("block {index} must end after it starts")]
    InvalidRange { index: usize },

    #[error("blocks {index_a} and {index_b} overlap")]
    Overlap { index_a: usize, index_b: usize },
}

/// Main error type for Cadence
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum CadenceError {
    #[error("Invalid time format: {0} (expected HH:MM)")]
    InvalidFormat(String),

    #[error("Availability rejected: {0}")]
    Violation(#[from] Violation),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Changes not saved: {0}")]
    PersistenceFailure(String),

    #[error("Not allowed: {0}")]
    Unauthorized(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CadenceError {
    /// Stable label suitable for structured logging fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::InvalidFormat(_) => "invalid_format",
            Self::Violation(Violation::TooManyBlocks) => "too_many_blocks",
            Self::Violation(Violation::BlockTooShort { .. }) => "block_too_short",
            Self::Violation(Violation::InvalidRange { .. }) => "invalid_range",
            Self::Violation(Violation::Overlap { .. }) => "overlap",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::PersistenceFailure(_) => "persistence_failure",
            Self::Unauthorized(_) => "unauthorized",
            Self::Config(_) => "config",
            Self::NotFound(_) => "not_found",
            Self::Internal(_) => "internal",
        }
    }

    /// Whether the failure came from the gateway and may succeed on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::PersistenceFailure(_))
    }

    /// The invariant violation carried by this error, if any.
    pub fn violation(&self) -> Option<Violation> {
        match self {
            Self::Violation(violation) => Some(*violation),
            _ => None,
        }
    }
}

/// Result type alias for Cadence operations
pub type Result<T> = std::result::Result<T, CadenceError>;
