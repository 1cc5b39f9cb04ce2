//! Wire and storage shapes for availability blocks
//!
//! Times cross the boundary as `"HH:MM"` strings and are converted to integer
//! minutes here, and only here.

use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

use super::instructor::InstructorId;
use super::time::TimeInterval;
use super::weekday::Weekday;
use crate::errors::Result;

/// One block as exchanged with clients: `{ "startTime": "09:00", "endTime": "10:30" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct WireBlock {
    pub start_time: String,
    pub end_time: String,
}

impl WireBlock {
    /// Parse both bounds. Range validity is left to the validation engine.
    pub fn to_interval(&self) -> Result<TimeInterval> {
        TimeInterval::parse(&self.start_time, &self.end_time)
    }
}

impl From<TimeInterval> for WireBlock {
    fn from(interval: TimeInterval) -> Self {
        Self { start_time: interval.start.format(), end_time: interval.end.format() }
    }
}

/// One stored row: a wire block tagged with its weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct BlockRecord {
    #[cfg_attr(feature = "ts-gen", ts(type = "number"))]
    pub day_of_week: Weekday,
    pub start_time: String,
    pub end_time: String,
}

impl BlockRecord {
    pub fn new(day_of_week: Weekday, interval: TimeInterval) -> Self {
        Self {
            day_of_week,
            start_time: interval.start.format(),
            end_time: interval.end.format(),
        }
    }

    pub fn to_interval(&self) -> Result<TimeInterval> {
        TimeInterval::parse(&self.start_time, &self.end_time)
    }
}

/// Everything the persistence gateway returns for one instructor.
///
/// The timezone is an opaque IANA name at this layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSchedule {
    pub instructor_id: InstructorId,
    pub timezone: String,
    pub blocks: Vec<BlockRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_block_uses_camel_case_strings() {
        let block = WireBlock::from(TimeInterval::from_minutes(540, 630).unwrap());
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json, serde_json::json!({ "startTime": "09:00", "endTime": "10:30" }));
    }

    #[test]
    fn block_record_parses_strictly() {
        let record = BlockRecord {
            day_of_week: Weekday::Monday,
            start_time: "9:00".into(),
            end_time: "10:00".into(),
        };
        assert!(record.to_interval().is_err());
    }

    #[test]
    fn end_of_day_bound_survives_storage() {
        let record = BlockRecord::new(Weekday::Friday, TimeInterval::from_minutes(1380, 1440).unwrap());
        assert_eq!(record.end_time, "24:00");
        assert_eq!(record.to_interval().unwrap(), TimeInterval::from_minutes(1380, 1440).unwrap());

        let start_at_24 =
            BlockRecord { day_of_week: Weekday::Friday, start_time: "24:00".into(), end_time: "24:00".into() };
        assert!(start_at_24.to_interval().is_err());
    }

    #[test]
    fn block_record_round_trips_through_json() {
        let record = BlockRecord::new(Weekday::Wednesday, TimeInterval::from_minutes(600, 660).unwrap());
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"dayOfWeek":3,"startTime":"10:00","endTime":"11:00"}"#);
        let back: BlockRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_interval().unwrap(), TimeInterval::from_minutes(600, 660).unwrap());
    }
}
