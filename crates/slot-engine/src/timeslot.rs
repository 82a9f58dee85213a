//! Time-of-day slots and weekday indexing.
//!
//! A [`TimeSlot`] is a half-open `[start, end)` interval within a single day,
//! minute resolution, parsed from and rendered as `"HH:MM"` (24-hour clock).
//! Weekdays follow the 0=Sunday .. 6=Saturday numbering used by the
//! platform's calendar UI.

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, SlotError};

/// Parse an `"HH:MM"` time-of-day string (24-hour, minute resolution).
pub fn parse_hhmm(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|_| SlotError::InvalidTimeFormat(s.to_string()))
}

/// Render a time of day as `"HH:MM"`.
pub fn format_hhmm(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

/// Weekday index of a calendar date: 0=Sunday .. 6=Saturday.
pub fn day_of_week_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Internal map key for a weekday, same 0=Sunday numbering.
pub(crate) fn weekday_index(day: Weekday) -> u8 {
    day.num_days_from_sunday() as u8
}

/// Convert a 0=Sunday .. 6=Saturday index back into a [`Weekday`].
/// Returns `None` for indices outside 0..=6.
pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

/// A half-open `[start, end)` availability interval within one day.
///
/// Construction enforces `start < end`; a malformed `"HH:MM"` string is
/// `InvalidTimeFormat`, a reversed or zero-length interval is
/// `OverlappingSlot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeSlot {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeSlot {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self> {
        if start >= end {
            return Err(SlotError::OverlappingSlot(format!(
                "slot start {} is not before end {}",
                format_hhmm(start),
                format_hhmm(end)
            )));
        }
        Ok(Self { start, end })
    }

    /// Build a slot from `"HH:MM"` strings, e.g. `TimeSlot::parse("09:00", "12:00")`.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_hhmm(start)?, parse_hhmm(end)?)
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Two slots overlap iff `a.start < b.end && b.start < a.end`.
    /// Touching endpoints (one ends where the other starts) do not overlap.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", format_hhmm(self.start), format_hhmm(self.end))
    }
}

// Serialized form matches the platform's TimeSlotDto wire shape.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimeSlotRepr {
    start_time: String,
    end_time: String,
}

impl Serialize for TimeSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        TimeSlotRepr {
            start_time: format_hhmm(self.start),
            end_time: format_hhmm(self.end),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TimeSlot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let repr = TimeSlotRepr::deserialize(deserializer)?;
        TimeSlot::parse(&repr.start_time, &repr.end_time).map_err(serde::de::Error::custom)
    }
}

/// Validate that a day's slot list contains no overlapping intervals.
///
/// Input order does not matter; slots are compared against each other after
/// sorting by start time. Touching endpoints are legal.
pub fn validate_day_slots(slots: &[TimeSlot]) -> Result<()> {
    let mut sorted: Vec<TimeSlot> = slots.to_vec();
    sorted.sort();
    for pair in sorted.windows(2) {
        if pair[0].overlaps(&pair[1]) {
            return Err(SlotError::OverlappingSlot(format!(
                "slot {} overlaps slot {}",
                pair[0], pair[1]
            )));
        }
    }
    Ok(())
}
