//! Slot resolution — from a stored availability configuration plus existing
//! bookings to the open, bookable ranges within a query window.
//!
//! The resolver is a pure function over snapshot inputs: it never mutates
//! the configuration or the booking list, performs no I/O, and either
//! returns a complete result or fails synchronously with a caller error.
//! Double-booking prevention is the booking-creation operation's job — the
//! resolver only reports what is open as of the snapshot it was handed.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::config::AvailabilityConfig;
use crate::error::{Result, SlotError};
use crate::intervals::{open_intervals, LocalInterval};
use crate::timeslot::{day_of_week_index, TimeSlot};

/// Shortest bookable session, in minutes.
pub const MIN_SESSION_MINUTES: i64 = 30;
/// Longest bookable session, in minutes.
pub const MAX_SESSION_MINUTES: i64 = 180;

/// An existing confirmed booking, supplied by the booking subsystem.
/// Instants are `[start, end)` in UTC; used only for exclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookedInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// One date's resolved availability.
///
/// `time_slots` holds the open ranges of at least the requested duration,
/// sorted by start time; an empty list means no availability that day.
/// `is_override` tells whether the day's base slots came from a date
/// override rather than the weekly schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableSlot {
    pub date: NaiveDate,
    /// 0=Sunday .. 6=Saturday.
    pub day_of_week: u8,
    pub time_slots: Vec<TimeSlot>,
    pub is_override: bool,
}

/// Compute the bookable slots for `[query_start, query_end]` relative to the
/// current time. See [`compute_available_slots_at`] for the full contract.
pub fn compute_available_slots(
    config: &AvailabilityConfig,
    booked: &[BookedInterval],
    query_start: NaiveDate,
    query_end: NaiveDate,
    duration_minutes: i64,
) -> Result<Vec<AvailableSlot>> {
    compute_available_slots_at(config, booked, query_start, query_end, duration_minutes, Utc::now())
}

/// Compute the bookable slots for `[query_start, query_end]` (inclusive
/// calendar dates in the mentor's timezone) relative to an explicit `now`.
///
/// Per date: a date override replaces the weekly schedule entirely; booked
/// intervals, expanded by the configured buffer on both sides, are
/// subtracted from the base slots; remaining sub-intervals shorter than
/// `duration_minutes` are discarded. Qualifying sub-intervals are reported
/// in full as open ranges — picking an exact start inside a range is the
/// booking endpoint's job.
///
/// Dates inside the window with nothing open are still reported, with an
/// empty `time_slots` list, so callers can render "no availability" per day.
/// Dates cut off by the advance-booking bounds (before the minimum-notice
/// cutoff or past the horizon) are omitted entirely.
///
/// All weekday matching, override matching, and interval intersection
/// happens in the mentor's local wall-clock time; bookings stored in UTC
/// are converted first, so slots keep their local meaning across DST
/// transitions.
///
/// # Errors
/// Returns `InvalidRange` if `query_end < query_start`, and
/// `InvalidDuration` if `duration_minutes` is outside
/// [`MIN_SESSION_MINUTES`]..=[`MAX_SESSION_MINUTES`]. No partial output is
/// produced on failure.
pub fn compute_available_slots_at(
    config: &AvailabilityConfig,
    booked: &[BookedInterval],
    query_start: NaiveDate,
    query_end: NaiveDate,
    duration_minutes: i64,
    now: DateTime<Utc>,
) -> Result<Vec<AvailableSlot>> {
    if query_end < query_start {
        return Err(SlotError::InvalidRange(query_start, query_end));
    }
    if !(MIN_SESSION_MINUTES..=MAX_SESSION_MINUTES).contains(&duration_minutes) {
        return Err(SlotError::InvalidDuration(duration_minutes));
    }

    let tz = config.timezone;

    // Advance-booking bounds, as mentor-local calendar dates.
    let earliest = (now + Duration::hours(config.min_advance_booking_hours))
        .with_timezone(&tz)
        .date_naive();
    let latest = (now + Duration::days(config.max_advance_booking_days))
        .with_timezone(&tz)
        .date_naive();

    // Bookings land in mentor-local wall clock, expanded by the buffer on
    // both sides so a new session keeps breathing room around existing ones.
    let buffer = Duration::minutes(config.buffer_time_minutes);
    let busy: Vec<LocalInterval> = booked
        .iter()
        .map(|b| {
            (
                b.start.with_timezone(&tz).naive_local() - buffer,
                b.end.with_timezone(&tz).naive_local() + buffer,
            )
        })
        .collect();

    let mut slots = Vec::new();
    for date in query_start.iter_days().take_while(|d| *d <= query_end) {
        if date < earliest || date > latest {
            continue;
        }

        let (base, is_override) = match config.override_for(date) {
            Some(ov) => (ov.slots.as_slice(), true),
            None => (
                config.weekly_slots(date.weekday()).unwrap_or_default(),
                false,
            ),
        };

        let mut time_slots = Vec::new();
        for slot in base {
            let base_interval = (date.and_time(slot.start()), date.and_time(slot.end()));
            for (open_start, open_end) in open_intervals(base_interval, &busy) {
                if (open_end - open_start).num_minutes() >= duration_minutes {
                    // Open sub-intervals never cross midnight: they are
                    // clipped to a same-day base slot, so start < end holds.
                    time_slots.push(TimeSlot::new(open_start.time(), open_end.time())?);
                }
            }
        }

        slots.push(AvailableSlot {
            date,
            day_of_week: day_of_week_index(date),
            time_slots,
            is_override,
        });
    }

    Ok(slots)
}
