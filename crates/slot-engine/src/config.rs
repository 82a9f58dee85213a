//! Mentor availability configuration and its mutation operations.
//!
//! An [`AvailabilityConfig`] holds the recurring weekly schedule, one-off
//! date overrides, the mentor's timezone, and the booking constraints
//! (advance-notice window, horizon, buffer). Keyed maps enforce the
//! one-entry-per-weekday and one-override-per-date invariants structurally,
//! so mutation never has to scan for duplicates.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::timeslot::{validate_day_slots, weekday_index, TimeSlot};

/// Parse an IANA timezone identifier (e.g. `"Europe/Amsterdam"`).
pub fn parse_timezone(s: &str) -> Result<Tz> {
    s.parse()
        .map_err(|_| SlotError::InvalidTimezone(s.to_string()))
}

pub const DEFAULT_MIN_ADVANCE_BOOKING_HOURS: i64 = 24;
pub const DEFAULT_MAX_ADVANCE_BOOKING_DAYS: i64 = 30;
pub const DEFAULT_BUFFER_TIME_MINUTES: i64 = 15;

/// One weekday's worth of recurring availability, as supplied to
/// [`AvailabilityConfig::set_availability`]. Later entries for the same
/// weekday win over earlier ones.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyScheduleEntry {
    pub day: Weekday,
    pub slots: Vec<TimeSlot>,
}

/// A one-off replacement of availability for a specific calendar date.
///
/// An empty `slots` list means the mentor is unavailable all day — distinct
/// from having no override at all, which falls back to the weekly schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateOverride {
    pub slots: Vec<TimeSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Override input for [`AvailabilityConfig::set_availability`].
#[derive(Debug, Clone, PartialEq)]
pub struct DateOverrideEntry {
    pub date: NaiveDate,
    pub slots: Vec<TimeSlot>,
    pub reason: Option<String>,
}

/// Three-state edit for a slot list: leave untouched, remove entirely, or
/// replace wholesale. Models the absent / null / array distinction of the
/// platform's patch DTOs as a tagged variant.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SlotPatch {
    #[default]
    Keep,
    Clear,
    Replace(Vec<TimeSlot>),
}

/// Partial update for [`AvailabilityConfig::update_availability`].
/// `None` fields keep the stored values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AvailabilityUpdate {
    pub weekly: Option<Vec<WeeklyScheduleEntry>>,
    pub overrides: Option<Vec<DateOverrideEntry>>,
    pub timezone: Option<Tz>,
    pub min_advance_booking_hours: Option<i64>,
    pub max_advance_booking_days: Option<i64>,
    pub buffer_time_minutes: Option<i64>,
}

/// A mentor's stored availability configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityConfig {
    // Keyed by 0=Sunday .. 6=Saturday; values are sorted, non-overlapping,
    // non-empty slot lists. An absent key means unavailable that weekday.
    weekly: BTreeMap<u8, Vec<TimeSlot>>,
    overrides: BTreeMap<NaiveDate, DateOverride>,
    pub timezone: Tz,
    pub min_advance_booking_hours: i64,
    pub max_advance_booking_days: i64,
    pub buffer_time_minutes: i64,
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self::new(chrono_tz::UTC)
    }
}

impl AvailabilityConfig {
    /// An empty configuration: no availability, default booking constraints.
    pub fn new(timezone: Tz) -> Self {
        Self {
            weekly: BTreeMap::new(),
            overrides: BTreeMap::new(),
            timezone,
            min_advance_booking_hours: DEFAULT_MIN_ADVANCE_BOOKING_HOURS,
            max_advance_booking_days: DEFAULT_MAX_ADVANCE_BOOKING_DAYS,
            buffer_time_minutes: DEFAULT_BUFFER_TIME_MINUTES,
        }
    }

    /// Build a configuration wholesale, replacing anything previously stored.
    ///
    /// Weekly entries are applied in input order, so a later entry for the
    /// same weekday wins. Entries with an empty slot list remove the weekday
    /// (same meaning as not listing it).
    ///
    /// # Errors
    /// Returns `OverlappingSlot` if any entry's slots overlap within the day.
    pub fn set_availability(
        weekly: Vec<WeeklyScheduleEntry>,
        overrides: Vec<DateOverrideEntry>,
        timezone: Tz,
        min_advance_booking_hours: i64,
        max_advance_booking_days: i64,
        buffer_time_minutes: i64,
    ) -> Result<Self> {
        let mut config = Self {
            weekly: BTreeMap::new(),
            overrides: BTreeMap::new(),
            timezone,
            min_advance_booking_hours,
            max_advance_booking_days,
            buffer_time_minutes,
        };
        for entry in weekly {
            config.update_day_availability(entry.day, SlotPatch::Replace(entry.slots))?;
        }
        for entry in overrides {
            config.update_date_override(entry.date, SlotPatch::Replace(entry.slots), entry.reason)?;
        }
        Ok(config)
    }

    /// Apply a partial update. `Some` fields replace the stored value
    /// wholesale (a `Some(weekly)` replaces the entire weekly map, not
    /// individual days); `None` fields are left untouched.
    pub fn update_availability(&mut self, update: AvailabilityUpdate) -> Result<()> {
        if let Some(weekly) = update.weekly {
            self.weekly.clear();
            for entry in weekly {
                self.update_day_availability(entry.day, SlotPatch::Replace(entry.slots))?;
            }
        }
        if let Some(overrides) = update.overrides {
            self.overrides.clear();
            for entry in overrides {
                self.update_date_override(
                    entry.date,
                    SlotPatch::Replace(entry.slots),
                    entry.reason,
                )?;
            }
        }
        if let Some(tz) = update.timezone {
            self.timezone = tz;
        }
        if let Some(hours) = update.min_advance_booking_hours {
            self.min_advance_booking_hours = hours;
        }
        if let Some(days) = update.max_advance_booking_days {
            self.max_advance_booking_days = days;
        }
        if let Some(minutes) = update.buffer_time_minutes {
            self.buffer_time_minutes = minutes;
        }
        Ok(())
    }

    /// Replace or remove one weekday's recurring slots.
    ///
    /// `Clear` — and `Replace` with an empty list — removes the weekday
    /// entirely (the mentor becomes unavailable that day). `Replace` swaps
    /// the day's slots wholesale; there is no merging with prior slots.
    pub fn update_day_availability(&mut self, day: Weekday, patch: SlotPatch) -> Result<()> {
        match patch {
            SlotPatch::Keep => {}
            SlotPatch::Clear => {
                self.weekly.remove(&weekday_index(day));
            }
            SlotPatch::Replace(slots) if slots.is_empty() => {
                self.weekly.remove(&weekday_index(day));
            }
            SlotPatch::Replace(mut slots) => {
                validate_day_slots(&slots)?;
                slots.sort();
                self.weekly.insert(weekday_index(day), slots);
            }
        }
        Ok(())
    }

    /// Set, replace, or remove the override for one calendar date.
    ///
    /// `Clear` removes the override, reverting the date to the weekly
    /// schedule. `Replace` with an empty list stores an explicit
    /// unavailable-all-day override — a different thing from `Clear`.
    pub fn update_date_override(
        &mut self,
        date: NaiveDate,
        patch: SlotPatch,
        reason: Option<String>,
    ) -> Result<()> {
        match patch {
            SlotPatch::Keep => {}
            SlotPatch::Clear => {
                self.overrides.remove(&date);
            }
            SlotPatch::Replace(mut slots) => {
                validate_day_slots(&slots)?;
                slots.sort();
                self.overrides.insert(date, DateOverride { slots, reason });
            }
        }
        Ok(())
    }

    /// The recurring slots for a weekday, if any are registered.
    pub fn weekly_slots(&self, day: Weekday) -> Option<&[TimeSlot]> {
        self.weekly.get(&weekday_index(day)).map(Vec::as_slice)
    }

    /// The override stored for a date, if any.
    pub fn override_for(&self, date: NaiveDate) -> Option<&DateOverride> {
        self.overrides.get(&date)
    }

    /// All registered weekday entries, keyed 0=Sunday .. 6=Saturday.
    pub fn weekly(&self) -> &BTreeMap<u8, Vec<TimeSlot>> {
        &self.weekly
    }

    /// All stored date overrides, in ascending date order.
    pub fn overrides(&self) -> &BTreeMap<NaiveDate, DateOverride> {
        &self.overrides
    }
}
