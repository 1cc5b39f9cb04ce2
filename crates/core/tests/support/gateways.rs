//! Mock gateway implementations for testing
//!
//! In-memory mocks for the availability ports. Writes are recorded so tests
//! can assert on what reached the gateway and in which order.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cadence_core::{AccessPolicy, AvailabilityGateway};
use cadence_domain::{
    ActorCapability, ActorId, BlockRecord, CadenceError, DayAvailability, InstructorId,
    Result as DomainResult, StoredSchedule, Weekday, WeeklyAvailability,
};

/// In-memory mock for `AvailabilityGateway`.
///
/// Holds one schedule and can be told to fail writes for specific days.
#[derive(Default, Clone)]
pub struct MockAvailabilityGateway {
    records: Arc<Mutex<Vec<BlockRecord>>>,
    timezone: Arc<Mutex<String>>,
    writes: Arc<Mutex<Vec<Weekday>>>,
    failing_days: Arc<Mutex<HashSet<Weekday>>>,
    single_write_days: Arc<Mutex<HashSet<Weekday>>>,
}

impl MockAvailabilityGateway {
    /// Create a new mock seeded with the provided week.
    pub fn seeded(week: &WeeklyAvailability, timezone: &str) -> Self {
        let gateway = Self::default();
        *gateway.records.lock().unwrap() = week.to_records();
        *gateway.timezone.lock().unwrap() = timezone.to_string();
        gateway
    }

    /// Make every write to `day` fail with a persistence error.
    pub fn fail_writes_for(&self, day: Weekday) {
        self.failing_days.lock().unwrap().insert(day);
    }

    /// Accept the first write to `day`, then fail every later one.
    pub fn fail_rewrites_for(&self, day: Weekday) {
        self.single_write_days.lock().unwrap().insert(day);
    }

    /// Days written so far, in call order.
    pub fn writes(&self) -> Vec<Weekday> {
        self.writes.lock().unwrap().clone()
    }

    pub fn stored_records(&self) -> Vec<BlockRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl AvailabilityGateway for MockAvailabilityGateway {
    async fn load_week(&self, instructor: &InstructorId) -> DomainResult<StoredSchedule> {
        let timezone = self.timezone.lock().unwrap().clone();
        Ok(StoredSchedule {
            instructor_id: instructor.clone(),
            timezone: if timezone.is_empty() { "UTC".to_string() } else { timezone },
            blocks: self.stored_records(),
        })
    }

    async fn replace_day(
        &self,
        _instructor: &InstructorId,
        day: &DayAvailability,
    ) -> DomainResult<()> {
        let weekday = day.day_of_week();
        let rewrite = {
            let mut writes = self.writes.lock().unwrap();
            let seen = writes.contains(&weekday);
            writes.push(weekday);
            seen
        };
        let single_write = self.single_write_days.lock().unwrap().contains(&weekday);
        if self.failing_days.lock().unwrap().contains(&weekday) || (rewrite && single_write) {
            return Err(CadenceError::PersistenceFailure(format!("write for {weekday} refused")));
        }

        let mut records = self.records.lock().unwrap();
        records.retain(|record| record.day_of_week != weekday);
        records.extend(day.blocks().iter().map(|block| BlockRecord::new(weekday, *block)));
        Ok(())
    }
}

/// Fixed capability table for `AccessPolicy`.
#[derive(Default, Clone)]
pub struct MockAccessPolicy {
    grants: Arc<Mutex<HashMap<String, ActorCapability>>>,
}

impl MockAccessPolicy {
    pub fn with_grant(self, actor: &str, capability: ActorCapability) -> Self {
        self.grants.lock().unwrap().insert(actor.to_string(), capability);
        self
    }
}

#[async_trait]
impl AccessPolicy for MockAccessPolicy {
    async fn resolve_capability(
        &self,
        actor: &ActorId,
        _instructor: &InstructorId,
    ) -> DomainResult<ActorCapability> {
        Ok(self
            .grants
            .lock()
            .unwrap()
            .get(actor.as_str())
            .copied()
            .unwrap_or(ActorCapability::ViewOnly))
    }
}
