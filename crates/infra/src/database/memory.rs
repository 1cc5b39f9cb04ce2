//! In-memory implementation of the `AvailabilityGateway` port.
//!
//! Useful for embedding and tests where no database file is wanted. State is
//! lost when the gateway is dropped.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use cadence_core::{parse_timezone, AvailabilityGateway};
use cadence_domain::constants::DEFAULT_TIMEZONE;
use cadence_domain::{
    BlockRecord, DayAvailability, InstructorId, Result, StoredSchedule, TimeInterval, Weekday,
};
use tracing::warn;

#[derive(Debug, Clone, Default)]
struct Entry {
    timezone: Option<String>,
    days: BTreeMap<Weekday, Vec<TimeInterval>>,
}

/// Availability gateway that keeps every schedule in a map.
#[derive(Debug, Default)]
pub struct InMemoryAvailabilityGateway {
    entries: Mutex<HashMap<InstructorId, Entry>>,
}

impl InMemoryAvailabilityGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the IANA zone for `instructor`.
    pub fn set_timezone(&self, instructor: &InstructorId, timezone: &str) -> Result<()> {
        parse_timezone(timezone)?;
        self.lock().entry(instructor.clone()).or_default().timezone = Some(timezone.to_owned());
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<InstructorId, Entry>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poison_err) => {
                warn!("availability map mutex poisoned, recovering");
                poison_err.into_inner()
            }
        }
    }
}

#[async_trait]
impl AvailabilityGateway for InMemoryAvailabilityGateway {
    async fn load_week(&self, instructor: &InstructorId) -> Result<StoredSchedule> {
        let entries = self.lock();
        let entry = entries.get(instructor).cloned().unwrap_or_default();

        let blocks = entry
            .days
            .iter()
            .flat_map(|(day, blocks)| blocks.iter().map(|block| BlockRecord::new(*day, *block)))
            .collect();

        Ok(StoredSchedule {
            instructor_id: instructor.clone(),
            timezone: entry.timezone.unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
            blocks,
        })
    }

    async fn replace_day(&self, instructor: &InstructorId, day: &DayAvailability) -> Result<()> {
        let mut entries = self.lock();
        let entry = entries.entry(instructor.clone()).or_default();
        if day.is_empty() {
            entry.days.remove(&day.day_of_week());
        } else {
            entry.days.insert(day.day_of_week(), day.blocks().to_vec());
        }
        Ok(())
    }
}
