//! Expanding the recurring week into concrete UTC windows
//!
//! Blocks are wall-clock times in the instructor's zone. A block that starts
//! or ends inside a DST gap has no real instant and is skipped for that date;
//! an ambiguous local time (the repeated hour when clocks fall back) maps to
//! its earlier instant.

use cadence_domain::{CadenceError, Result, TimeInterval, TimeOfDay, Weekday, WeeklyAvailability};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// One block on one calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub date: NaiveDate,
    pub day_of_week: Weekday,
    pub interval: TimeInterval,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Parse an IANA zone name such as `"America/Chicago"`.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| CadenceError::InvalidArgument(format!("unknown timezone: {name}")))
}

/// Every block occurrence on dates `from..=to`, in chronological order.
///
/// # Errors
/// Returns `InvalidArgument` when `to` is before `from`.
pub fn expand_occurrences(
    week: &WeeklyAvailability,
    tz: Tz,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<Occurrence>> {
    if to < from {
        return Err(CadenceError::InvalidArgument(format!("date range {from}..={to} is inverted")));
    }

    let mut occurrences = Vec::new();
    for date in from.iter_days().take_while(|date| *date <= to) {
        let day_of_week = Weekday::from(date.weekday());
        for interval in week.day(day_of_week).blocks() {
            let (Some(start), Some(end)) =
                (resolve(tz, date, interval.start), resolve(tz, date, interval.end))
            else {
                continue;
            };
            occurrences.push(Occurrence { date, day_of_week, interval: *interval, start, end });
        }
    }
    Ok(occurrences)
}

/// Map a wall-clock minute on `date` to UTC. `24:00` means the next midnight.
fn resolve(tz: Tz, date: NaiveDate, time: TimeOfDay) -> Option<DateTime<Utc>> {
    let local: NaiveDateTime = match time.to_naive_time() {
        Some(naive) => date.and_time(naive),
        None => date.succ_opt()?.and_hms_opt(0, 0, 0)?,
    };
    tz.from_local_datetime(&local).earliest().map(|instant| instant.with_timezone(&Utc))
}
