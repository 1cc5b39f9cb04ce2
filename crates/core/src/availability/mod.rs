//! Availability persistence flow: ports, optimistic ledger and service

pub mod ledger;
pub mod ports;
pub mod service;

pub use ledger::{AvailabilityLedger, CommitReport, CommitStatus};
pub use ports::{AccessPolicy, AvailabilityGateway};
pub use service::AvailabilityService;
