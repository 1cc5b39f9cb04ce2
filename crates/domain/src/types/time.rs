//! Wall-clock time primitives
//!
//! `TimeOfDay` is an integer minute offset from local midnight with no date or
//! timezone attached. `TimeInterval` is a half-open `[start, end)` span of
//! those minutes. Zones only enter the picture when a block is expanded into
//! absolute instants (see `cadence-core::schedule`).

use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

use crate::constants::{MINUTES_PER_DAY, MINUTES_PER_HOUR};
use crate::errors::{CadenceError, Result};

/// Minutes since local midnight, `0..=1440`.
///
/// `1440` is only meaningful as an exclusive end bound (24:00).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct TimeOfDay(i32);

impl TimeOfDay {
    /// 00:00
    pub const MIDNIGHT: Self = Self(0);
    /// 24:00, the exclusive end of the day.
    pub const END_OF_DAY: Self = Self(MINUTES_PER_DAY);

    /// Build from a minute offset, rejecting values outside `0..=1440`.
    pub fn from_minutes(minutes: i32) -> Result<Self> {
        if (0..=MINUTES_PER_DAY).contains(&minutes) {
            Ok(Self(minutes))
        } else {
            Err(CadenceError::InvalidArgument(format!(
                "minute offset {minutes} is outside 0..={MINUTES_PER_DAY}"
            )))
        }
    }

    /// Build from a minute offset, saturating into `0..=1440`.
    pub const fn saturating(minutes: i32) -> Self {
        if minutes < 0 {
            Self(0)
        } else if minutes > MINUTES_PER_DAY {
            Self(MINUTES_PER_DAY)
        } else {
            Self(minutes)
        }
    }

    /// Build from an hour/minute pair on the 24-hour clock.
    pub fn from_hm(hour: u32, minute: u32) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(CadenceError::InvalidFormat(format!("{hour:02}:{minute:02}")));
        }
        // Bounded above, the cast cannot truncate.
        Ok(Self((hour * 60 + minute) as i32))
    }

    /// Minutes since midnight.
    pub const fn minutes(self) -> i32 {
        self.0
    }

    /// Hour component; `24` only for [`Self::END_OF_DAY`].
    pub const fn hour(self) -> i32 {
        self.0 / MINUTES_PER_HOUR
    }

    /// Minute within the hour.
    pub const fn minute(self) -> i32 {
        self.0 % MINUTES_PER_HOUR
    }

    /// Strictly parse `HH:MM` (two zero-padded digits each, 24-hour clock).
    ///
    /// `"9:30"`, `"25:00"`, `"09:60"`, `"24:00"` and `"09:30:00"` all fail
    /// with [`CadenceError::InvalidFormat`].
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = || CadenceError::InvalidFormat(text.to_string());

        let bytes = text.as_bytes();
        if bytes.len() != 5 || bytes[2] != b':' {
            return Err(invalid());
        }

        let digit = |b: u8| if b.is_ascii_digit() { Some(u32::from(b - b'0')) } else { None };
        let hour = match (digit(bytes[0]), digit(bytes[1])) {
            (Some(tens), Some(ones)) => tens * 10 + ones,
            _ => return Err(invalid()),
        };
        let minute = match (digit(bytes[3]), digit(bytes[4])) {
            (Some(tens), Some(ones)) => tens * 10 + ones,
            _ => return Err(invalid()),
        };

        Self::from_hm(hour, minute).map_err(|_| invalid())
    }

    /// Parse an end bound: strict `HH:MM`, plus `"24:00"` for the end of day.
    ///
    /// Only for values read back from storage or the wire, where an
    /// end-of-day bound has been written out by [`TimeOfDay::format`].
    pub fn parse_end(text: &str) -> Result<Self> {
        if text == "24:00" {
            return Ok(Self::END_OF_DAY);
        }
        Self::parse(text)
    }

    /// Format as zero-padded `HH:MM`. The end-of-day bound renders as `24:00`.
    pub fn format(self) -> String {
        format!("{:02}:{:02}", self.hour(), self.minute())
    }

    /// Convert to a chrono time. `None` for the 24:00 bound.
    pub fn to_naive_time(self) -> Option<NaiveTime> {
        if self.0 >= MINUTES_PER_DAY {
            return None;
        }
        // 0 <= self.0 < 1440 so both components are non-negative.
        NaiveTime::from_hms_opt(self.hour() as u32, self.minute() as u32, 0)
    }
}

impl TryFrom<i32> for TimeOfDay {
    type Error = CadenceError;

    fn try_from(minutes: i32) -> Result<Self> {
        Self::from_minutes(minutes)
    }
}

impl From<TimeOfDay> for i32 {
    fn from(value: TimeOfDay) -> Self {
        value.0
    }
}

impl FromStr for TimeOfDay {
    type Err = CadenceError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Half-open wall-clock span `[start, end)`.
///
/// The type can hold an inverted pair so that candidates coming from the
/// edit controller or the wire can be reported precisely; the validation
/// engine rejects `end <= start` before anything reaches a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct TimeInterval {
    #[cfg_attr(feature = "ts-gen", ts(type = "number"))]
    pub start: TimeOfDay,
    #[cfg_attr(feature = "ts-gen", ts(type = "number"))]
    pub end: TimeOfDay,
}

impl TimeInterval {
    pub const fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { start, end }
    }

    /// Build from raw minute offsets, each within `0..=1440`.
    pub fn from_minutes(start: i32, end: i32) -> Result<Self> {
        Ok(Self::new(TimeOfDay::from_minutes(start)?, TimeOfDay::from_minutes(end)?))
    }

    /// Parse a pair of `HH:MM` strings. The end may be `"24:00"`.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Ok(Self::new(TimeOfDay::parse(start)?, TimeOfDay::parse_end(end)?))
    }

    pub const fn duration_minutes(self) -> i32 {
        self.end.0 - self.start.0
    }

    /// Half-open overlap: touching endpoints do not overlap.
    pub const fn overlaps(self, other: Self) -> bool {
        self.start.0 < other.end.0 && other.start.0 < self.end.0
    }

    /// Whether `minute` falls inside `[start, end)`.
    pub const fn contains(self, minute: TimeOfDay) -> bool {
        self.start.0 <= minute.0 && minute.0 < self.end.0
    }

    pub const fn is_well_formed(self) -> bool {
        self.end.0 > self.start.0
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Free-function form of [`TimeInterval::overlaps`].
pub const fn overlaps(a: TimeInterval, b: TimeInterval) -> bool {
    a.overlaps(b)
}

/// Free-function form of [`TimeInterval::duration_minutes`].
pub const fn duration_minutes(interval: TimeInterval) -> i32 {
    interval.duration_minutes()
}

/// Free-function form of [`TimeOfDay::parse`].
pub fn parse(text: &str) -> Result<TimeOfDay> {
    TimeOfDay::parse(text)
}

/// Free-function form of [`TimeOfDay::format`].
pub fn format(time: TimeOfDay) -> String {
    time.format()
}

/// Round `minutes` to the nearest multiple of `step`; ties round up.
///
/// Works for negative values too, which the edit controller relies on when
/// quantizing upward drag deltas. A non-positive `step` returns the input.
pub const fn quantize(minutes: i32, step: i32) -> i32 {
    if step <= 0 {
        return minutes;
    }
    minutes.saturating_add(step / 2).div_euclid(step).saturating_mul(step)
}
