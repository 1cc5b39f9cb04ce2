//! Domain types and models

pub mod availability;
pub mod instructor;
pub mod time;
pub mod weekday;
pub mod wire;

pub use availability::{copy_day, replace_day, DayAvailability, WeeklyAvailability};
pub use instructor::{ActorCapability, ActorId, EditContext, InstructorId};
pub use time::{TimeInterval, TimeOfDay};
pub use weekday::Weekday;
pub use wire::{BlockRecord, StoredSchedule, WireBlock};
