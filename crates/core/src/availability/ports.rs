//! Port interfaces for availability persistence and access control
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use async_trait::async_trait;
use cadence_domain::{
    ActorCapability, ActorId, DayAvailability, InstructorId, Result, StoredSchedule,
};

/// Trait for loading and storing an instructor's weekly availability
#[async_trait]
pub trait AvailabilityGateway: Send + Sync {
    /// Load every stored block plus the instructor's timezone.
    ///
    /// An instructor with nothing stored yet gets an empty schedule.
    async fn load_week(&self, instructor: &InstructorId) -> Result<StoredSchedule>;

    /// Atomically replace one day's blocks.
    ///
    /// Failures must surface as `CadenceError::PersistenceFailure`.
    async fn replace_day(&self, instructor: &InstructorId, day: &DayAvailability) -> Result<()>;
}

/// Trait for resolving what an actor may do with an instructor's hours
#[async_trait]
pub trait AccessPolicy: Send + Sync {
    /// Resolve the actor's capability for this instructor.
    async fn resolve_capability(
        &self,
        actor: &ActorId,
        instructor: &InstructorId,
    ) -> Result<ActorCapability>;

    /// Whether the actor may edit this instructor's availability.
    async fn can_edit(&self, actor: &ActorId, instructor: &InstructorId) -> Result<bool> {
        Ok(self.resolve_capability(actor, instructor).await?.can_edit())
    }
}
