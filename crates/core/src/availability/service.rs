//! Availability service - core business logic
//!
//! Every mutating entry point takes an explicit [`EditContext`] and the
//! caller's [`AvailabilityLedger`]. Structural checks happen before anything
//! is applied; only gateway failures are reported through [`CommitReport`].

use std::sync::Arc;

use cadence_domain::{
    copy_day, ActorId, CadenceError, DayAvailability, EditContext, InstructorId, Result,
    TimeInterval, Weekday, WeeklyAvailability, WireBlock,
};
use tracing::{debug, info, warn};

use super::ledger::{AvailabilityLedger, CommitReport, CommitStatus};
use super::ports::{AccessPolicy, AvailabilityGateway};
use crate::editor::EditOutcome;

/// Availability service
pub struct AvailabilityService {
    gateway: Arc<dyn AvailabilityGateway>,
    policy: Arc<dyn AccessPolicy>,
}

impl AvailabilityService {
    /// Create a new availability service
    pub fn new(gateway: Arc<dyn AvailabilityGateway>, policy: Arc<dyn AccessPolicy>) -> Self {
        Self { gateway, policy }
    }

    /// Resolve the actor's capability once, up front.
    pub async fn resolve_context(
        &self,
        actor: ActorId,
        instructor: InstructorId,
    ) -> Result<EditContext> {
        let capability = self.policy.resolve_capability(&actor, &instructor).await?;
        debug!(actor = %actor, instructor = %instructor, capability = %capability, "edit context resolved");
        Ok(EditContext::new(instructor, actor, capability))
    }

    /// Load the instructor's week into a fresh ledger.
    ///
    /// Reading is allowed for every capability.
    pub async fn open(&self, context: &EditContext) -> Result<AvailabilityLedger> {
        let stored = self.gateway.load_week(&context.instructor_id).await?;
        if stored.instructor_id != context.instructor_id {
            return Err(CadenceError::Internal(format!(
                "gateway returned schedule for {} when asked for {}",
                stored.instructor_id, context.instructor_id
            )));
        }
        let week = WeeklyAvailability::from_records(stored.instructor_id, &stored.blocks)?;
        Ok(AvailabilityLedger::new(week, stored.timezone))
    }

    /// Apply validated days locally, then write them in order.
    ///
    /// A failed write rolls the whole ledger back to the last confirmed
    /// state. Days already written by this commit are rewritten with their
    /// previous content, so a half-finished cross-day move never leaves the
    /// block on both days. A day whose restore also fails is reported as
    /// stranded and stays confirmed with the new content.
    ///
    /// # Errors
    /// `Unauthorized` or `InvalidArgument` before anything is applied.
    /// Gateway failures are not errors here; see [`CommitStatus`].
    pub async fn commit(
        &self,
        context: &EditContext,
        ledger: &mut AvailabilityLedger,
        days: Vec<DayAvailability>,
    ) -> Result<CommitReport> {
        authorize(context, ledger)?;
        if days.is_empty() {
            return Ok(CommitReport::nothing_to_do());
        }

        let weekdays: Vec<Weekday> = days.iter().map(DayAvailability::day_of_week).collect();
        let previous: Vec<DayAvailability> =
            weekdays.iter().map(|weekday| ledger.confirmed().day(*weekday).clone()).collect();
        ledger.apply_local(&days);

        for (position, day) in days.iter().enumerate() {
            if let Err(error) = self.gateway.replace_day(&context.instructor_id, day).await {
                warn!(
                    instructor = %context.instructor_id,
                    day = %day.day_of_week(),
                    error = %error,
                    label = error.label(),
                    "availability write failed, rolling back"
                );
                let stranded = self.restore(context, ledger, &previous[..position]).await;
                ledger.roll_back();
                let status = if stranded.is_empty() {
                    CommitStatus::RolledBack { error }
                } else {
                    CommitStatus::PartiallyApplied { error, stranded }
                };
                return Ok(CommitReport { days: weekdays, applied_locally: true, status });
            }
            ledger.confirm(day);
        }

        info!(
            instructor = %context.instructor_id,
            actor = %context.actor_id,
            days = ?weekdays,
            "availability committed"
        );
        Ok(CommitReport { days: weekdays, applied_locally: true, status: CommitStatus::Confirmed })
    }

    /// Rewrite days this commit already stored, newest first. Returns the
    /// days whose previous content could not be written back.
    async fn restore(
        &self,
        context: &EditContext,
        ledger: &mut AvailabilityLedger,
        written: &[DayAvailability],
    ) -> Vec<Weekday> {
        let mut stranded = Vec::new();
        for day in written.iter().rev() {
            match self.gateway.replace_day(&context.instructor_id, day).await {
                Ok(()) => ledger.confirm(day),
                Err(error) => {
                    warn!(
                        instructor = %context.instructor_id,
                        day = %day.day_of_week(),
                        error = %error,
                        "availability restore failed"
                    );
                    stranded.push(day.day_of_week());
                }
            }
        }
        stranded
    }

    /// Persist whatever the edit controller produced on pointer up.
    ///
    /// Returns `None` when there was nothing to write, including rejected
    /// drops, which leave the ledger untouched.
    pub async fn apply_edit(
        &self,
        context: &EditContext,
        ledger: &mut AvailabilityLedger,
        outcome: EditOutcome,
    ) -> Result<Option<CommitReport>> {
        match outcome {
            EditOutcome::Committed(days) => self.commit(context, ledger, days).await.map(Some),
            EditOutcome::Rejected { day, violation } => {
                warn!(
                    instructor = %context.instructor_id,
                    day = %day,
                    violation = %violation,
                    "edit rejected"
                );
                Ok(None)
            }
            EditOutcome::Unchanged | EditOutcome::Idle => Ok(None),
        }
    }

    /// Replace one day's blocks wholesale.
    pub async fn replace_day(
        &self,
        context: &EditContext,
        ledger: &mut AvailabilityLedger,
        day: Weekday,
        blocks: Vec<TimeInterval>,
    ) -> Result<CommitReport> {
        authorize(context, ledger)?;
        let replaced = ledger.current().day(day).replace(blocks)?;
        self.commit(context, ledger, vec![replaced]).await
    }

    /// Replace one day from wire blocks, parsing at the boundary.
    pub async fn replace_day_from_wire(
        &self,
        context: &EditContext,
        ledger: &mut AvailabilityLedger,
        day: Weekday,
        blocks: &[WireBlock],
    ) -> Result<CommitReport> {
        let intervals = blocks.iter().map(WireBlock::to_interval).collect::<Result<Vec<_>>>()?;
        self.replace_day(context, ledger, day, intervals).await
    }

    /// Remove the block at `index` (sorted order) from `day`.
    pub async fn delete_block(
        &self,
        context: &EditContext,
        ledger: &mut AvailabilityLedger,
        day: Weekday,
        index: usize,
    ) -> Result<CommitReport> {
        authorize(context, ledger)?;
        let trimmed = ledger.current().day(day).without_block(index)?;
        self.commit(context, ledger, vec![trimmed]).await
    }

    pub async fn clear_day(
        &self,
        context: &EditContext,
        ledger: &mut AvailabilityLedger,
        day: Weekday,
    ) -> Result<CommitReport> {
        let cleared = ledger.current().day(day).cleared();
        self.commit(context, ledger, vec![cleared]).await
    }

    /// Overwrite Monday through Friday with `source`'s blocks.
    pub async fn copy_to_weekdays(
        &self,
        context: &EditContext,
        ledger: &mut AvailabilityLedger,
        source: Weekday,
    ) -> Result<CommitReport> {
        self.copy(context, ledger, source, &Weekday::WORKWEEK).await
    }

    /// Overwrite `target` with `source`'s blocks.
    pub async fn copy_to_day(
        &self,
        context: &EditContext,
        ledger: &mut AvailabilityLedger,
        source: Weekday,
        target: Weekday,
    ) -> Result<CommitReport> {
        self.copy(context, ledger, source, &[target]).await
    }

    async fn copy(
        &self,
        context: &EditContext,
        ledger: &mut AvailabilityLedger,
        source: Weekday,
        targets: &[Weekday],
    ) -> Result<CommitReport> {
        authorize(context, ledger)?;
        let copies = copy_day(ledger.current().day(source), targets)?;
        self.commit(context, ledger, copies.into_values().collect()).await
    }
}

fn authorize(context: &EditContext, ledger: &AvailabilityLedger) -> Result<()> {
    if !context.can_edit() {
        return Err(CadenceError::Unauthorized(format!(
            "{} may not edit availability of {}",
            context.actor_id, context.instructor_id
        )));
    }
    if ledger.instructor_id() != &context.instructor_id {
        return Err(CadenceError::InvalidArgument(format!(
            "ledger belongs to {}, context to {}",
            ledger.instructor_id(),
            context.instructor_id
        )));
    }
    Ok(())
}
