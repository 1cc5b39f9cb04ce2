//! Integration tests for the availability model
//!
//! Exercises the public surface the way the edit controller and gateways
//! use it, plus property tests for the day invariants.

use cadence_domain::constants::{MAX_BLOCKS_PER_DAY, MIN_BLOCK_MINUTES};
use cadence_domain::{
    copy_day, replace_day, BlockRecord, CadenceError, DayAvailability, InstructorId, TimeInterval,
    TimeOfDay, Violation, Weekday, WeeklyAvailability,
};
use proptest::prelude::*;

fn iv(start: i32, end: i32) -> TimeInterval {
    TimeInterval::from_minutes(start, end).unwrap()
}

fn empty_week() -> WeeklyAvailability {
    WeeklyAvailability::new(InstructorId::new("mem_piano_7"))
}

// ============================================================================
// Scenario tests
// ============================================================================

/// Scenario: an instructor sets Monday, copies it across the week, then
/// customises Friday.
#[test]
fn test_weekly_setup_flow() {
    let mut week = empty_week();
    week.replace_day(Weekday::Sunday, vec![iv(900, 1020), iv(540, 720)]).unwrap();
    week.copy_to_weekdays(Weekday::Sunday).unwrap();
    week.replace_day(Weekday::Friday, vec![iv(540, 600)]).unwrap();

    assert_eq!(week.day(Weekday::Monday).blocks(), &[iv(540, 720), iv(900, 1020)]);
    assert_eq!(week.day(Weekday::Friday).blocks(), &[iv(540, 600)]);
    assert_eq!(week.total_minutes(), 300 * 5 + 60);
    assert_eq!(
        week.available_days(),
        vec![
            Weekday::Sunday,
            Weekday::Monday,
            Weekday::Tuesday,
            Weekday::Wednesday,
            Weekday::Thursday,
            Weekday::Friday,
        ]
    );
}

#[test]
fn test_copy_to_single_day_overwrites_target() {
    let mut week = empty_week();
    week.replace_day(Weekday::Tuesday, vec![iv(600, 660)]).unwrap();
    week.replace_day(Weekday::Saturday, vec![iv(420, 480), iv(800, 900)]).unwrap();

    let written = week.copy_to_day(Weekday::Tuesday, Weekday::Saturday).unwrap();
    assert_eq!(written.len(), 1);
    assert_eq!(week.day(Weekday::Saturday).blocks(), &[iv(600, 660)]);
    assert_eq!(week.day(Weekday::Tuesday).blocks(), &[iv(600, 660)]);
}

#[test]
fn test_copy_to_self_is_invalid_argument() {
    let mut week = empty_week();
    let err = week.copy_to_day(Weekday::Monday, Weekday::Monday).unwrap_err();
    assert!(matches!(err, CadenceError::InvalidArgument(_)));
    assert_eq!(err.label(), "invalid_argument");
}

#[test]
fn test_clear_day_only_touches_that_day() {
    let mut week = empty_week();
    week.replace_day(Weekday::Monday, vec![iv(540, 600)]).unwrap();
    week.replace_day(Weekday::Tuesday, vec![iv(540, 600)]).unwrap();

    assert!(week.clear_day(Weekday::Monday).is_empty());
    assert_eq!(week.day(Weekday::Tuesday).len(), 1);
}

#[test]
fn test_full_day_text_round_trip() {
    let records = vec![
        BlockRecord {
            day_of_week: Weekday::Wednesday,
            start_time: "00:00".into(),
            end_time: "00:15".into(),
        },
        BlockRecord {
            day_of_week: Weekday::Wednesday,
            start_time: "23:00".into(),
            end_time: "23:59".into(),
        },
    ];
    let week = WeeklyAvailability::from_records(InstructorId::new("mem_1"), &records).unwrap();
    assert_eq!(week.to_records(), records);
}

#[test]
fn test_strict_parsing_rejects_loose_text() {
    for text in ["25:00", "9:30", "09:5", "09:30:00", "24:00", "", "ab:cd", " 9:30"] {
        assert!(
            matches!(TimeOfDay::parse(text), Err(CadenceError::InvalidFormat(_))),
            "{text:?} should be rejected"
        );
    }
    assert_eq!(TimeOfDay::END_OF_DAY.format(), "24:00");
}

#[test]
fn test_week_level_replace_reports_caller_indices() {
    let mut week = empty_week();
    let err = week
        .replace_day(Weekday::Thursday, vec![iv(900, 960), iv(540, 560), iv(560, 570)])
        .unwrap_err();
    assert_eq!(err, Violation::BlockTooShort { index: 2 });
}

// ============================================================================
// Property tests
// ============================================================================

fn arb_interval() -> impl Strategy<Value = TimeInterval> {
    (0..1440i32, 1..240i32).prop_map(|(start, len)| iv(start, (start + len).min(1440)))
}

fn arb_blocks() -> impl Strategy<Value = Vec<TimeInterval>> {
    prop::collection::vec(arb_interval(), 0..8)
}

fn arb_weekday() -> impl Strategy<Value = Weekday> {
    (0u8..7).prop_map(|index| Weekday::from_index(index).unwrap())
}

proptest! {
    #[test]
    fn accepted_days_hold_every_invariant(blocks in arb_blocks()) {
        if let Ok(day) = DayAvailability::new(Weekday::Monday, blocks) {
            let stored = day.blocks();
            prop_assert!(stored.len() <= MAX_BLOCKS_PER_DAY);
            for block in stored {
                prop_assert!(block.duration_minutes() >= MIN_BLOCK_MINUTES);
            }
            for pair in stored.windows(2) {
                prop_assert!(pair[0].start <= pair[1].start);
                prop_assert!(!pair[0].overlaps(pair[1]));
            }
        }
    }

    #[test]
    fn replace_is_idempotent(blocks in arb_blocks()) {
        let empty = DayAvailability::empty(Weekday::Tuesday);
        if let Ok(once) = replace_day(&empty, blocks.clone()) {
            let twice = replace_day(&once, blocks).unwrap();
            prop_assert_eq!(once, twice);
        }
    }

    #[test]
    fn rejection_matches_pairwise_scan(blocks in arb_blocks()) {
        let overlapping = blocks.iter().enumerate().any(|(i, a)| {
            blocks[i + 1..].iter().any(|b| a.overlaps(*b))
        });
        let short = blocks.iter().any(|b| b.duration_minutes() < MIN_BLOCK_MINUTES);
        let too_many = blocks.len() > MAX_BLOCKS_PER_DAY;

        let accepted = DayAvailability::new(Weekday::Friday, blocks).is_ok();
        prop_assert_eq!(accepted, !(overlapping || short || too_many));
    }

    #[test]
    fn copy_overwrites_every_target(
        blocks in arb_blocks(),
        source in arb_weekday(),
        targets in prop::collection::vec(arb_weekday(), 1..7),
    ) {
        let Ok(source_day) = DayAvailability::new(source, blocks) else {
            return Ok(());
        };
        let result = copy_day(&source_day, &targets);
        if targets.contains(&source) {
            prop_assert!(result.is_err());
        } else {
            let copies = result.unwrap();
            for target in &targets {
                let copy = &copies[target];
                prop_assert_eq!(copy.day_of_week(), *target);
                prop_assert_eq!(copy.blocks(), source_day.blocks());
            }
        }
    }

    #[test]
    fn format_then_parse_is_identity(minutes in 0..1440i32) {
        let time = TimeOfDay::from_minutes(minutes).unwrap();
        prop_assert_eq!(TimeOfDay::parse(&time.format()).unwrap(), time);
    }

    #[test]
    fn touching_blocks_never_overlap(start in 0..1380i32, len_a in 15..30i32, len_b in 15..30i32) {
        let a = iv(start, start + len_a);
        let b = iv(start + len_a, (start + len_a + len_b).min(1440));
        prop_assert!(!a.overlaps(b));
        prop_assert!(!b.overlaps(a));
    }
}
