//! Day and week availability aggregates
//!
//! A [`DayAvailability`] can only be obtained through a validating
//! constructor, so holding one is proof that its blocks are sorted,
//! non-overlapping, at least 15 minutes long and at most five in number.
//! [`WeeklyAvailability`] always carries all seven days.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::instructor::InstructorId;
use super::time::{TimeInterval, TimeOfDay};
use super::weekday::Weekday;
use super::wire::BlockRecord;
use crate::constants::DAYS_PER_WEEK;
use crate::errors::{CadenceError, Result, Violation};
use crate::validation::{has_room_for_another, validate_block_set};

/// One weekday's validated block list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDay", rename_all = "camelCase")]
pub struct DayAvailability {
    day_of_week: Weekday,
    blocks: Vec<TimeInterval>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDay {
    day_of_week: Weekday,
    #[serde(default)]
    blocks: Vec<TimeInterval>,
}

impl TryFrom<RawDay> for DayAvailability {
    type Error = Violation;

    fn try_from(raw: RawDay) -> std::result::Result<Self, Self::Error> {
        Self::new(raw.day_of_week, raw.blocks)
    }
}

impl DayAvailability {
    /// A day with no blocks.
    pub const fn empty(day_of_week: Weekday) -> Self {
        Self { day_of_week, blocks: Vec::new() }
    }

    /// Validate `blocks` and store them sorted by start.
    pub fn new(
        day_of_week: Weekday,
        mut blocks: Vec<TimeInterval>,
    ) -> std::result::Result<Self, Violation> {
        validate_block_set(&blocks)?;
        blocks.sort_by_key(|block| block.start);
        Ok(Self { day_of_week, blocks })
    }

    pub const fn day_of_week(&self) -> Weekday {
        self.day_of_week
    }

    /// Blocks sorted by start.
    pub fn blocks(&self) -> &[TimeInterval] {
        &self.blocks
    }

    /// Number of blocks, never more than five.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Whether another block could be added without exceeding the limit.
    pub fn has_room(&self) -> bool {
        has_room_for_another(self.blocks.len())
    }

    /// Whether `minute` falls inside any block.
    pub fn contains(&self, minute: TimeOfDay) -> bool {
        self.blocks.iter().any(|block| block.contains(minute))
    }

    /// Sum of block durations.
    pub fn total_minutes(&self) -> i32 {
        self.blocks.iter().map(|block| block.duration_minutes()).sum()
    }

    /// Same as [`replace_day`].
    pub fn replace(&self, blocks: Vec<TimeInterval>) -> std::result::Result<Self, Violation> {
        replace_day(self, blocks)
    }

    /// This day with the block at `index` (sorted order) removed.
    pub fn without_block(&self, index: usize) -> Result<Self> {
        if index >= self.blocks.len() {
            return Err(CadenceError::InvalidArgument(format!(
                "{} has no block at index {index}",
                self.day_of_week
            )));
        }
        let mut blocks = self.blocks.clone();
        blocks.remove(index);
        Ok(replace_day(self, blocks)?)
    }

    /// This day with `interval` added.
    pub fn with_block(&self, interval: TimeInterval) -> std::result::Result<Self, Violation> {
        let mut blocks = self.blocks.clone();
        blocks.push(interval);
        replace_day(self, blocks)
    }

    /// This day with every block removed.
    pub fn cleared(&self) -> Self {
        Self::empty(self.day_of_week)
    }

    /// Consume the day, keeping the sorted blocks.
    pub fn into_blocks(self) -> Vec<TimeInterval> {
        self.blocks
    }
}

/// Replace all blocks of `day`, validating the whole new list.
///
/// The only block-mutating primitive. Every helper above goes through it.
pub fn replace_day(
    day: &DayAvailability,
    blocks: Vec<TimeInterval>,
) -> std::result::Result<DayAvailability, Violation> {
    DayAvailability::new(day.day_of_week, blocks)
}

/// Clone `source`'s blocks into each of `targets`, overwriting them.
///
/// Duplicate targets collapse. Refuses an empty target set and a target
/// set that names the source day.
pub fn copy_day(
    source: &DayAvailability,
    targets: &[Weekday],
) -> Result<BTreeMap<Weekday, DayAvailability>> {
    if targets.is_empty() {
        return Err(CadenceError::InvalidArgument("no target days to copy to".to_string()));
    }
    if targets.contains(&source.day_of_week) {
        return Err(CadenceError::InvalidArgument(format!(
            "cannot copy {} onto itself",
            source.day_of_week
        )));
    }

    Ok(targets
        .iter()
        .map(|&target| {
            (target, DayAvailability { day_of_week: target, blocks: source.blocks.clone() })
        })
        .collect())
}

/// An instructor's recurring week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWeek", rename_all = "camelCase")]
pub struct WeeklyAvailability {
    instructor_id: InstructorId,
    days: [DayAvailability; DAYS_PER_WEEK],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawWeek {
    instructor_id: InstructorId,
    #[serde(default)]
    days: Vec<DayAvailability>,
}

impl TryFrom<RawWeek> for WeeklyAvailability {
    type Error = CadenceError;

    fn try_from(raw: RawWeek) -> Result<Self> {
        let mut week = Self::new(raw.instructor_id);
        let mut seen = [false; DAYS_PER_WEEK];
        for day in raw.days {
            let index = day.day_of_week.index();
            if seen[index] {
                return Err(CadenceError::InvalidArgument(format!(
                    "{} appears more than once",
                    day.day_of_week
                )));
            }
            seen[index] = true;
            week.days[index] = day;
        }
        Ok(week)
    }
}

impl WeeklyAvailability {
    /// A week with all seven days empty.
    pub fn new(instructor_id: InstructorId) -> Self {
        Self {
            instructor_id,
            days: std::array::from_fn(|index| DayAvailability::empty(Weekday::ALL[index])),
        }
    }

    /// Group raw gateway rows into a week.
    ///
    /// Times are parsed here; each day is then validated as a whole, so a
    /// corrupt stored day surfaces as a violation instead of being repaired.
    pub fn from_records(instructor_id: InstructorId, records: &[BlockRecord]) -> Result<Self> {
        let mut grouped: [Vec<TimeInterval>; DAYS_PER_WEEK] = Default::default();
        for record in records {
            grouped[record.day_of_week.index()].push(record.to_interval()?);
        }

        let mut week = Self::new(instructor_id);
        for (slot, blocks) in week.days.iter_mut().zip(grouped) {
            if !blocks.is_empty() {
                *slot = DayAvailability::new(slot.day_of_week, blocks)?;
            }
        }
        Ok(week)
    }

    /// Flatten to rows, Sunday first, each day in start order.
    pub fn to_records(&self) -> Vec<BlockRecord> {
        self.days
            .iter()
            .flat_map(|day| day.blocks.iter().map(|block| BlockRecord::new(day.day_of_week, *block)))
            .collect()
    }

    /// Membership the week belongs to.
    pub fn instructor_id(&self) -> &InstructorId {
        &self.instructor_id
    }

    /// One day of the week. Always present, possibly empty.
    pub fn day(&self, day: Weekday) -> &DayAvailability {
        &self.days[day.index()]
    }

    /// All seven days, Sunday first.
    pub fn days(&self) -> &[DayAvailability; DAYS_PER_WEEK] {
        &self.days
    }

    /// Swap in an already validated day.
    pub fn set_day(&mut self, day: DayAvailability) {
        let index = day.day_of_week.index();
        self.days[index] = day;
    }

    /// Validate and replace one day. On rejection the week is untouched.
    pub fn replace_day(
        &mut self,
        day: Weekday,
        blocks: Vec<TimeInterval>,
    ) -> std::result::Result<&DayAvailability, Violation> {
        let replaced = replace_day(self.day(day), blocks)?;
        self.set_day(replaced);
        Ok(self.day(day))
    }

    /// Remove every block from `day`.
    pub fn clear_day(&mut self, day: Weekday) -> &DayAvailability {
        self.set_day(DayAvailability::empty(day));
        self.day(day)
    }

    /// Overwrite `targets` with `source`'s blocks; returns the written days.
    pub fn copy_day(&mut self, source: Weekday, targets: &[Weekday]) -> Result<Vec<DayAvailability>> {
        let copies = copy_day(self.day(source), targets)?;
        let written: Vec<DayAvailability> = copies.into_values().collect();
        for day in &written {
            self.set_day(day.clone());
        }
        Ok(written)
    }

    /// Copy `source` onto Monday through Friday.
    pub fn copy_to_weekdays(&mut self, source: Weekday) -> Result<Vec<DayAvailability>> {
        self.copy_day(source, &Weekday::WORKWEEK)
    }

    /// Copy `source` onto one other day.
    pub fn copy_to_day(&mut self, source: Weekday, target: Weekday) -> Result<Vec<DayAvailability>> {
        self.copy_day(source, &[target])
    }

    /// Whether `minute` on `day` falls inside a block.
    pub fn is_available(&self, day: Weekday, minute: TimeOfDay) -> bool {
        self.day(day).contains(minute)
    }

    /// Sum of all block durations across the week.
    pub fn total_minutes(&self) -> i32 {
        self.days.iter().map(DayAvailability::total_minutes).sum()
    }

    /// Days that hold at least one block, Sunday first.
    pub fn available_days(&self) -> Vec<Weekday> {
        self.days.iter().filter(|day| !day.is_empty()).map(|day| day.day_of_week).collect()
    }

    /// True when no day holds a block.
    pub fn is_empty(&self) -> bool {
        self.days.iter().all(DayAvailability::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(start: i32, end: i32) -> TimeInterval {
        TimeInterval::from_minutes(start, end).unwrap()
    }

    fn week() -> WeeklyAvailability {
        WeeklyAvailability::new(InstructorId::new("mem_1"))
    }

    #[test]
    fn new_day_sorts_blocks() {
        let day = DayAvailability::new(Weekday::Monday, vec![iv(900, 960), iv(540, 600)]).unwrap();
        assert_eq!(day.blocks(), &[iv(540, 600), iv(900, 960)]);
        assert_eq!(day.total_minutes(), 120);
    }

    #[test]
    fn rejected_replace_leaves_week_unchanged() {
        let mut week = week();
        week.replace_day(Weekday::Tuesday, vec![iv(540, 600)]).unwrap();
        let before = week.clone();

        let err = week.replace_day(Weekday::Tuesday, vec![iv(540, 600), iv(570, 630)]).unwrap_err();
        assert_eq!(err, Violation::Overlap { index_a: 0, index_b: 1 });
        assert_eq!(week, before);
    }

    #[test]
    fn without_block_removes_by_sorted_index() {
        let day = DayAvailability::new(Weekday::Friday, vec![iv(900, 960), iv(540, 600)]).unwrap();
        let trimmed = day.without_block(0).unwrap();
        assert_eq!(trimmed.blocks(), &[iv(900, 960)]);
        assert!(matches!(day.without_block(2), Err(CadenceError::InvalidArgument(_))));
    }

    #[test]
    fn remove_then_add_at_limit_succeeds() {
        let blocks: Vec<_> = (0..5).map(|i| iv(480 + i * 60, 510 + i * 60)).collect();
        let full = DayAvailability::new(Weekday::Monday, blocks).unwrap();
        assert!(!full.has_room());
        assert_eq!(full.with_block(iv(1200, 1230)), Err(Violation::TooManyBlocks));

        let freed = full.without_block(4).unwrap();
        let refilled = freed.with_block(iv(1200, 1230)).unwrap();
        assert_eq!(refilled.len(), 5);
    }

    #[test]
    fn copy_day_refuses_self_and_empty_targets() {
        let monday = DayAvailability::new(Weekday::Monday, vec![iv(540, 600)]).unwrap();
        assert!(matches!(
            copy_day(&monday, &[Weekday::Tuesday, Weekday::Monday]),
            Err(CadenceError::InvalidArgument(_))
        ));
        assert!(matches!(copy_day(&monday, &[]), Err(CadenceError::InvalidArgument(_))));
    }

    #[test]
    fn copy_to_weekdays_overwrites_every_weekday() {
        let mut week = week();
        week.replace_day(Weekday::Sunday, vec![iv(600, 660)]).unwrap();
        week.replace_day(Weekday::Wednesday, vec![iv(420, 480), iv(900, 1000)]).unwrap();

        let written = week.copy_to_weekdays(Weekday::Sunday).unwrap();
        assert_eq!(written.len(), 5);
        for day in Weekday::WORKWEEK {
            assert_eq!(week.day(day).blocks(), &[iv(600, 660)]);
        }
        assert_eq!(week.day(Weekday::Saturday).blocks(), &[]);
    }

    #[test]
    fn copy_to_weekdays_from_weekday_is_refused() {
        let mut week = week();
        week.replace_day(Weekday::Monday, vec![iv(600, 660)]).unwrap();
        assert!(week.copy_to_weekdays(Weekday::Monday).is_err());
    }

    #[test]
    fn records_round_trip_through_week() {
        let records = vec![
            BlockRecord::new(Weekday::Thursday, iv(780, 840)),
            BlockRecord::new(Weekday::Monday, iv(600, 660)),
            BlockRecord::new(Weekday::Monday, iv(540, 570)),
        ];
        let week = WeeklyAvailability::from_records(InstructorId::new("mem_1"), &records).unwrap();
        assert_eq!(week.available_days(), vec![Weekday::Monday, Weekday::Thursday]);
        assert!(week.is_available(Weekday::Monday, TimeOfDay::from_minutes(545).unwrap()));
        assert!(!week.is_available(Weekday::Monday, TimeOfDay::from_minutes(570).unwrap()));
        assert_eq!(week.total_minutes(), 150);

        let flattened = week.to_records();
        assert_eq!(flattened[0], BlockRecord::new(Weekday::Monday, iv(540, 570)));
        assert_eq!(flattened.len(), 3);
    }

    #[test]
    fn from_records_rejects_bad_text_and_bad_days() {
        let bad_text = vec![BlockRecord {
            day_of_week: Weekday::Monday,
            start_time: "25:00".into(),
            end_time: "26:00".into(),
        }];
        assert!(matches!(
            WeeklyAvailability::from_records(InstructorId::new("mem_1"), &bad_text),
            Err(CadenceError::InvalidFormat(_))
        ));

        let overlapping = vec![
            BlockRecord::new(Weekday::Monday, iv(540, 600)),
            BlockRecord::new(Weekday::Monday, iv(580, 640)),
        ];
        let err =
            WeeklyAvailability::from_records(InstructorId::new("mem_1"), &overlapping).unwrap_err();
        assert_eq!(err.violation(), Some(Violation::Overlap { index_a: 0, index_b: 1 }));
    }

    #[test]
    fn deserialization_revalidates() {
        let json = r#"{"dayOfWeek":2,"blocks":[{"start":540,"end":550}]}"#;
        assert!(serde_json::from_str::<DayAvailability>(json).is_err());

        let json = r#"{"dayOfWeek":2,"blocks":[{"start":600,"end":660},{"start":540,"end":600}]}"#;
        let day: DayAvailability = serde_json::from_str(json).unwrap();
        assert_eq!(day.blocks()[0], iv(540, 600));
    }

    #[test]
    fn week_serialization_round_trips() {
        let mut week = week();
        week.replace_day(Weekday::Saturday, vec![iv(600, 720)]).unwrap();
        let json = serde_json::to_string(&week).unwrap();
        let back: WeeklyAvailability = serde_json::from_str(&json).unwrap();
        assert_eq!(back, week);
    }
}
