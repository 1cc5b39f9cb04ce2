//! Database implementations

pub mod access_policy;
pub mod availability_repository;
pub mod manager;
pub mod memory;

pub use access_policy::*;
pub use availability_repository::*;
pub use manager::*;
pub use memory::*;
