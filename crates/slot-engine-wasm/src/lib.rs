//! WASM bindings for slot-engine.
//!
//! Exposes slot resolution and availability-config patching to JavaScript
//! via `wasm-bindgen`. All complex types cross the boundary as JSON strings
//! with the camelCase field names the platform's DTOs use. The stored
//! configuration travels in and out as JSON too — persistence stays with
//! the caller.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/slot-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize};
use slot_engine::{
    compute_available_slots, AvailabilityConfig, AvailabilityUpdate, AvailableSlot,
    BookedInterval, DateOverrideEntry, SlotPatch, TimeSlot, WeeklyScheduleEntry,
};
use slot_engine::timeslot::weekday_from_index;
use wasm_bindgen::prelude::*;

/// Session length assumed when a request omits `duration`, in minutes.
const DEFAULT_DURATION_MINUTES: i64 = 60;

// ---------------------------------------------------------------------------
// DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetAvailableSlotsRequest {
    mentor_id: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    duration: Option<i64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AvailableSlotsResponse {
    mentor_id: String,
    timezone: String,
    slots: Vec<AvailableSlot>,
}

/// Input format for booked intervals passed from JavaScript.
#[derive(Deserialize)]
struct BookedIntervalInput {
    start: String,
    end: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WeeklyScheduleEntryDto {
    day_of_week: u8,
    time_slots: Vec<TimeSlot>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DateOverrideDto {
    date: NaiveDate,
    time_slots: Vec<TimeSlot>,
    reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetAvailabilityRequest {
    weekly_schedule: Vec<WeeklyScheduleEntryDto>,
    #[serde(default)]
    date_overrides: Vec<DateOverrideDto>,
    timezone: Option<String>,
    min_advance_booking_hours: Option<i64>,
    max_advance_booking_days: Option<i64>,
    buffer_time_minutes: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateAvailabilityRequest {
    weekly_schedule: Option<Vec<WeeklyScheduleEntryDto>>,
    date_overrides: Option<Vec<DateOverrideDto>>,
    timezone: Option<String>,
    min_advance_booking_hours: Option<i64>,
    max_advance_booking_days: Option<i64>,
    buffer_time_minutes: Option<i64>,
}

/// `timeSlots` is three-state: absent keeps the stored value, `null` clears
/// it, an array replaces it. The double-`Option` distinguishes absent
/// (`None`) from explicit `null` (`Some(None)`).
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateDayAvailabilityRequest {
    day_of_week: u8,
    #[serde(default, deserialize_with = "double_option")]
    time_slots: Option<Option<Vec<TimeSlot>>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateDateOverrideRequest {
    date: NaiveDate,
    #[serde(default, deserialize_with = "double_option")]
    time_slots: Option<Option<Vec<TimeSlot>>>,
    reason: Option<String>,
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

fn slot_patch(time_slots: Option<Option<Vec<TimeSlot>>>) -> SlotPatch {
    match time_slots {
        None => SlotPatch::Keep,
        Some(None) => SlotPatch::Clear,
        Some(Some(slots)) => SlotPatch::Replace(slots),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse an ISO 8601 datetime string into `DateTime<Utc>`.
///
/// Accepts both RFC 3339 (with timezone offset, e.g., "2026-02-17T14:00:00Z")
/// and naive datetime (e.g., "2026-02-17T14:00:00"), which is interpreted as UTC.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, JsValue> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| JsValue::from_str(&format!("Invalid datetime '{}': {}", s, e)))
}

fn parse_timezone(s: &str) -> Result<Tz, JsValue> {
    slot_engine::config::parse_timezone(s).map_err(err_to_js)
}

fn parse_weekday(index: u8) -> Result<chrono::Weekday, JsValue> {
    weekday_from_index(index)
        .ok_or_else(|| JsValue::from_str(&format!("Invalid day of week: {} (expected 0-6)", index)))
}

fn parse_config(config_json: &str) -> Result<AvailabilityConfig, JsValue> {
    serde_json::from_str(config_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid config JSON: {}", e)))
}

fn parse_json<'a, T: Deserialize<'a>>(json: &'a str, what: &str) -> Result<T, JsValue> {
    serde_json::from_str(json).map_err(|e| JsValue::from_str(&format!("Invalid {}: {}", what, e)))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn err_to_js(e: slot_engine::SlotError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn weekly_entries(dtos: Vec<WeeklyScheduleEntryDto>) -> Result<Vec<WeeklyScheduleEntry>, JsValue> {
    dtos.into_iter()
        .map(|dto| {
            Ok(WeeklyScheduleEntry {
                day: parse_weekday(dto.day_of_week)?,
                slots: dto.time_slots,
            })
        })
        .collect()
}

fn override_entries(dtos: Vec<DateOverrideDto>) -> Vec<DateOverrideEntry> {
    dtos.into_iter()
        .map(|dto| DateOverrideEntry {
            date: dto.date,
            slots: dto.time_slots,
            reason: dto.reason,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Exported functions
// ---------------------------------------------------------------------------

/// Compute bookable slots for a mentor.
///
/// * `config_json` — the stored `AvailabilityConfig` as JSON.
/// * `booked_json` — array of `{ "start": ISO-8601, "end": ISO-8601 }` UTC
///   intervals for the mentor's existing bookings.
/// * `request_json` — `{ mentorId, startDate, endDate, duration? }`.
///
/// Returns `{ mentorId, timezone, slots }` as a JSON string, where each slot
/// is `{ date, dayOfWeek, timeSlots, isOverride }`.
#[wasm_bindgen]
pub fn get_available_slots(
    config_json: &str,
    booked_json: &str,
    request_json: &str,
) -> Result<String, JsValue> {
    let config = parse_config(config_json)?;
    let inputs: Vec<BookedIntervalInput> = parse_json(booked_json, "booked intervals JSON")?;
    let request: GetAvailableSlotsRequest = parse_json(request_json, "request JSON")?;

    let booked: Vec<BookedInterval> = inputs
        .iter()
        .map(|b| {
            Ok(BookedInterval {
                start: parse_datetime(&b.start)?,
                end: parse_datetime(&b.end)?,
            })
        })
        .collect::<Result<_, JsValue>>()?;

    let duration = request.duration.unwrap_or(DEFAULT_DURATION_MINUTES);
    let slots = compute_available_slots(
        &config,
        &booked,
        request.start_date,
        request.end_date,
        duration,
    )
    .map_err(err_to_js)?;

    to_json(&AvailableSlotsResponse {
        mentor_id: request.mentor_id,
        timezone: config.timezone.name().to_string(),
        slots,
    })
}

/// Build a fresh availability configuration wholesale, replacing anything
/// previously stored. Returns the new config as JSON for the caller to
/// persist.
#[wasm_bindgen]
pub fn set_availability(request_json: &str) -> Result<String, JsValue> {
    let request: SetAvailabilityRequest = parse_json(request_json, "request JSON")?;

    let timezone = match request.timezone.as_deref() {
        Some(tz) => parse_timezone(tz)?,
        None => chrono_tz::UTC,
    };
    let config = AvailabilityConfig::set_availability(
        weekly_entries(request.weekly_schedule)?,
        override_entries(request.date_overrides),
        timezone,
        request
            .min_advance_booking_hours
            .unwrap_or(slot_engine::config::DEFAULT_MIN_ADVANCE_BOOKING_HOURS),
        request
            .max_advance_booking_days
            .unwrap_or(slot_engine::config::DEFAULT_MAX_ADVANCE_BOOKING_DAYS),
        request
            .buffer_time_minutes
            .unwrap_or(slot_engine::config::DEFAULT_BUFFER_TIME_MINUTES),
    )
    .map_err(err_to_js)?;

    to_json(&config)
}

/// Apply a partial update to a stored configuration. Absent fields keep
/// their stored values. Returns the updated config as JSON.
#[wasm_bindgen]
pub fn update_availability(config_json: &str, request_json: &str) -> Result<String, JsValue> {
    let mut config = parse_config(config_json)?;
    let request: UpdateAvailabilityRequest = parse_json(request_json, "request JSON")?;

    let update = AvailabilityUpdate {
        weekly: request.weekly_schedule.map(weekly_entries).transpose()?,
        overrides: request.date_overrides.map(override_entries),
        timezone: request.timezone.as_deref().map(parse_timezone).transpose()?,
        min_advance_booking_hours: request.min_advance_booking_hours,
        max_advance_booking_days: request.max_advance_booking_days,
        buffer_time_minutes: request.buffer_time_minutes,
    };
    config.update_availability(update).map_err(err_to_js)?;

    to_json(&config)
}

/// Replace or remove one weekday's recurring slots.
///
/// `request_json` is `{ dayOfWeek, timeSlots }` where `timeSlots` may be an
/// array (replace), `null` (remove the weekday), or absent (no change).
#[wasm_bindgen]
pub fn update_day_availability(config_json: &str, request_json: &str) -> Result<String, JsValue> {
    let mut config = parse_config(config_json)?;
    let request: UpdateDayAvailabilityRequest = parse_json(request_json, "request JSON")?;

    let day = parse_weekday(request.day_of_week)?;
    config
        .update_day_availability(day, slot_patch(request.time_slots))
        .map_err(err_to_js)?;

    to_json(&config)
}

/// Set, replace, or remove the override for one calendar date.
///
/// `request_json` is `{ date, timeSlots, reason? }` where `timeSlots` may be
/// an array (replace — an empty array blocks the whole day), `null` (remove
/// the override, reverting to the weekly schedule), or absent (no change).
#[wasm_bindgen]
pub fn update_date_override(config_json: &str, request_json: &str) -> Result<String, JsValue> {
    let mut config = parse_config(config_json)?;
    let request: UpdateDateOverrideRequest = parse_json(request_json, "request JSON")?;

    config
        .update_date_override(request.date, slot_patch(request.time_slots), request.reason)
        .map_err(err_to_js)?;

    to_json(&config)
}
