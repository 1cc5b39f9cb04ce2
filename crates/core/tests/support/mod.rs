//! Shared test helpers for `cadence-core` integration tests.
//!
//! These helpers provide reusable fixtures and lightweight mocks so that
//! service tests can focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod gateways;

use cadence_domain::{
    ActorCapability, ActorId, EditContext, InstructorId, TimeInterval, Weekday,
    WeeklyAvailability,
};

pub const INSTRUCTOR: &str = "mem_violin_3";

pub fn iv(start: i32, end: i32) -> TimeInterval {
    TimeInterval::from_minutes(start, end).expect("valid interval")
}

pub fn owner_context() -> EditContext {
    EditContext::new(InstructorId::new(INSTRUCTOR), ActorId::new("usr_3"), ActorCapability::Owner)
}

pub fn viewer_context() -> EditContext {
    EditContext::new(
        InstructorId::new(INSTRUCTOR),
        ActorId::new("usr_parent_9"),
        ActorCapability::ViewOnly,
    )
}

/// Week with the given days filled in, everything else empty.
pub fn week_with(days: &[(Weekday, Vec<TimeInterval>)]) -> WeeklyAvailability {
    let mut week = WeeklyAvailability::new(InstructorId::new(INSTRUCTOR));
    for (day, blocks) in days {
        week.replace_day(*day, blocks.clone()).expect("valid day");
    }
    week
}
