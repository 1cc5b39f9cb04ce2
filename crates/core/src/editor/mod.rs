//! Interactive editing of a week on a vertical time grid
//!
//! Input is abstract (pointer down/move/up in grid pixels), so the same
//! controller serves mouse, touch and keyboard-driven front ends.

pub mod controller;
pub mod types;

pub use controller::{DragSession, EditController, EditState};
pub use types::{DragMode, DragPreview, Edge, EditOutcome, PointerTarget};
