//! Input and output vocabulary of the edit controller

use cadence_domain::{impl_label_conversions, DayAvailability, TimeInterval, Violation, Weekday};
use serde::{Deserialize, Serialize};

/// What a drag is doing to its block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragMode {
    Create,
    Move,
    ResizeStart,
    ResizeEnd,
}

impl_label_conversions!(DragMode {
    Create => "create",
    Move => "move",
    ResizeStart => "resize_start",
    ResizeEnd => "resize_end",
});

/// Which edge of a rendered block was grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Top,
    Bottom,
}

/// Hit-test result for a pointer press, in sorted block order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum PointerTarget {
    EmptyCell,
    BlockBody(usize),
    BlockEdge(usize, Edge),
}

/// What the renderer draws while a drag is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragPreview {
    pub mode: DragMode,
    pub day: Weekday,
    pub interval: TimeInterval,
    /// Set when releasing here would be rejected.
    pub conflict: Option<Violation>,
}

impl DragPreview {
    pub const fn is_conflicting(&self) -> bool {
        self.conflict.is_some()
    }
}

/// Result of releasing the pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Changed days to persist, in write order.
    Committed(Vec<DayAvailability>),
    /// The drop broke a day invariant. Nothing changed.
    Rejected { day: Weekday, violation: Violation },
    /// The block ended where it started.
    Unchanged,
    /// There was no drag to finish.
    Idle,
}

impl EditOutcome {
    /// Days a committed drop writes, in write order. Empty otherwise.
    pub fn changed_days(&self) -> Vec<Weekday> {
        match self {
            Self::Committed(days) => days.iter().map(DayAvailability::day_of_week).collect(),
            _ => Vec::new(),
        }
    }
}
