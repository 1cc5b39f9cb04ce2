//! Optimistic local copy of one instructor's week
//!
//! Holds two versions of the week: what the gateway last confirmed and what
//! the user currently sees. Edits land in the local version first; a failed
//! write resets it to the confirmed one.

use cadence_domain::{CadenceError, DayAvailability, InstructorId, Weekday, WeeklyAvailability};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityLedger {
    confirmed: WeeklyAvailability,
    local: WeeklyAvailability,
    timezone: String,
}

impl AvailabilityLedger {
    pub fn new(week: WeeklyAvailability, timezone: impl Into<String>) -> Self {
        Self { confirmed: week.clone(), local: week, timezone: timezone.into() }
    }

    pub fn instructor_id(&self) -> &InstructorId {
        self.local.instructor_id()
    }

    /// The week as the user sees it, including unconfirmed edits.
    pub fn current(&self) -> &WeeklyAvailability {
        &self.local
    }

    /// The last state the gateway acknowledged.
    pub fn confirmed(&self) -> &WeeklyAvailability {
        &self.confirmed
    }

    /// IANA zone the wall-clock blocks are interpreted in.
    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    pub fn has_pending(&self) -> bool {
        self.local != self.confirmed
    }

    pub(crate) fn apply_local(&mut self, days: &[DayAvailability]) {
        for day in days {
            self.local.set_day(day.clone());
        }
    }

    pub(crate) fn confirm(&mut self, day: &DayAvailability) {
        self.confirmed.set_day(day.clone());
    }

    pub(crate) fn roll_back(&mut self) {
        self.local = self.confirmed.clone();
    }
}

/// How a commit ended at the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitStatus {
    Confirmed,
    /// The write failed and the ledger was reset to the confirmed state.
    RolledBack { error: CadenceError },
    /// The write failed and some days already written could not be restored.
    /// Those days keep the new content, both stored and confirmed.
    PartiallyApplied { error: CadenceError, stranded: Vec<Weekday> },
}

/// Outcome of one commit, reported to the caller after the gateway answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReport {
    pub days: Vec<Weekday>,
    pub applied_locally: bool,
    pub status: CommitStatus,
}

impl CommitReport {
    pub(crate) const fn nothing_to_do() -> Self {
        Self { days: Vec::new(), applied_locally: false, status: CommitStatus::Confirmed }
    }

    pub const fn is_confirmed(&self) -> bool {
        matches!(self.status, CommitStatus::Confirmed)
    }

    pub const fn error(&self) -> Option<&CadenceError> {
        match &self.status {
            CommitStatus::RolledBack { error }
            | CommitStatus::PartiallyApplied { error, .. } => Some(error),
            CommitStatus::Confirmed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use cadence_domain::TimeInterval;

    use super::*;

    fn ledger() -> AvailabilityLedger {
        AvailabilityLedger::new(WeeklyAvailability::new(InstructorId::new("mem_1")), "UTC")
    }

    #[test]
    fn local_edits_are_pending_until_confirmed() {
        let mut ledger = ledger();
        let day = DayAvailability::new(
            Weekday::Monday,
            vec![TimeInterval::from_minutes(540, 600).unwrap()],
        )
        .unwrap();

        ledger.apply_local(std::slice::from_ref(&day));
        assert!(ledger.has_pending());
        assert!(ledger.confirmed().day(Weekday::Monday).is_empty());

        ledger.confirm(&day);
        assert!(!ledger.has_pending());
    }

    #[test]
    fn roll_back_restores_confirmed_week() {
        let mut ledger = ledger();
        let day = DayAvailability::new(
            Weekday::Friday,
            vec![TimeInterval::from_minutes(600, 660).unwrap()],
        )
        .unwrap();
        ledger.apply_local(&[day]);
        ledger.roll_back();
        assert_eq!(ledger.current(), ledger.confirmed());
        assert_eq!(ledger.timezone(), "UTC");
    }
}
