//! Tests for slot resolution: override precedence, buffer handling,
//! advance-booking bounds, and timezone/DST behavior.

use chrono::{DateTime, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use slot_engine::error::SlotError;
use slot_engine::{
    compute_available_slots_at, AvailabilityConfig, BookedInterval, SlotPatch, TimeSlot,
    WeeklyScheduleEntry,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn slot(start: &str, end: &str) -> TimeSlot {
    TimeSlot::parse(start, end).unwrap()
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn utc(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

fn booked(start: &str, end: &str) -> BookedInterval {
    BookedInterval {
        start: utc(start),
        end: utc(end),
    }
}

fn config_with(tz: Tz, weekly: Vec<(Weekday, Vec<TimeSlot>)>) -> AvailabilityConfig {
    AvailabilityConfig::set_availability(
        weekly
            .into_iter()
            .map(|(day, slots)| WeeklyScheduleEntry { day, slots })
            .collect(),
        vec![],
        tz,
        24,
        30,
        15,
    )
    .unwrap()
}

// ── The canonical buffer scenario ───────────────────────────────────────────

// Weekly Monday 09:00-12:00, buffer 15, one booking 10:00-10:30, duration 60.
// The booking blocks 09:45-10:45; the leading remainder 09:00-09:45 is only
// 45 minutes and drops out, leaving 10:45-12:00 as the single open range.
#[test]
fn buffer_expands_bookings_not_base_slots() {
    let config = config_with(chrono_tz::UTC, vec![(Weekday::Mon, vec![slot("09:00", "12:00")])]);
    let bookings = [booked("2026-03-16T10:00:00Z", "2026-03-16T10:30:00Z")];

    let slots = compute_available_slots_at(
        &config,
        &bookings,
        date("2026-03-16"),
        date("2026-03-16"),
        60,
        utc("2026-03-10T12:00:00Z"),
    )
    .unwrap();

    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].date, date("2026-03-16"));
    assert_eq!(slots[0].day_of_week, 1);
    assert!(!slots[0].is_override);
    assert_eq!(slots[0].time_slots, vec![slot("10:45", "12:00")]);
}

#[test]
fn far_away_booking_leaves_base_slot_whole() {
    let config = config_with(chrono_tz::UTC, vec![(Weekday::Mon, vec![slot("09:00", "12:00")])]);
    let bookings = [booked("2026-03-16T15:00:00Z", "2026-03-16T16:00:00Z")];

    let slots = compute_available_slots_at(
        &config,
        &bookings,
        date("2026-03-16"),
        date("2026-03-16"),
        60,
        utc("2026-03-10T12:00:00Z"),
    )
    .unwrap();

    // The buffer surrounds bookings; it never shrinks the base slot itself.
    assert_eq!(slots[0].time_slots, vec![slot("09:00", "12:00")]);
}

#[test]
fn booking_covering_whole_slot_leaves_empty_day_record() {
    let config = config_with(chrono_tz::UTC, vec![(Weekday::Mon, vec![slot("09:00", "12:00")])]);
    let bookings = [booked("2026-03-16T08:00:00Z", "2026-03-16T13:00:00Z")];

    let slots = compute_available_slots_at(
        &config,
        &bookings,
        date("2026-03-16"),
        date("2026-03-16"),
        60,
        utc("2026-03-10T12:00:00Z"),
    )
    .unwrap();

    assert_eq!(slots.len(), 1);
    assert!(slots[0].time_slots.is_empty());
}

#[test]
fn touching_booking_does_not_block_with_zero_buffer() {
    let mut config =
        config_with(chrono_tz::UTC, vec![(Weekday::Mon, vec![slot("09:00", "12:00")])]);
    config.buffer_time_minutes = 0;
    let bookings = [booked("2026-03-16T08:00:00Z", "2026-03-16T09:00:00Z")];

    let slots = compute_available_slots_at(
        &config,
        &bookings,
        date("2026-03-16"),
        date("2026-03-16"),
        60,
        utc("2026-03-10T12:00:00Z"),
    )
    .unwrap();

    assert_eq!(slots[0].time_slots, vec![slot("09:00", "12:00")]);
}

// ── Open ranges, not discrete starts ────────────────────────────────────────

#[test]
fn qualifying_sub_intervals_are_reported_in_full() {
    let mut config =
        config_with(chrono_tz::UTC, vec![(Weekday::Mon, vec![slot("09:00", "17:00")])]);
    config.buffer_time_minutes = 0;
    let bookings = [booked("2026-03-16T12:00:00Z", "2026-03-16T13:00:00Z")];

    let slots = compute_available_slots_at(
        &config,
        &bookings,
        date("2026-03-16"),
        date("2026-03-16"),
        60,
        utc("2026-03-10T12:00:00Z"),
    )
    .unwrap();

    // Both remainders qualify and stay whole; the caller picks exact starts.
    assert_eq!(
        slots[0].time_slots,
        vec![slot("09:00", "12:00"), slot("13:00", "17:00")]
    );
}

#[test]
fn slots_within_a_date_ascend_by_start() {
    let mut config = config_with(
        chrono_tz::UTC,
        vec![(
            Weekday::Mon,
            vec![slot("14:00", "17:00"), slot("08:00", "10:00")],
        )],
    );
    config.buffer_time_minutes = 0;

    let slots = compute_available_slots_at(
        &config,
        &[],
        date("2026-03-16"),
        date("2026-03-16"),
        60,
        utc("2026-03-10T12:00:00Z"),
    )
    .unwrap();

    assert_eq!(
        slots[0].time_slots,
        vec![slot("08:00", "10:00"), slot("14:00", "17:00")]
    );
}

// ── Override precedence ─────────────────────────────────────────────────────

#[test]
fn empty_override_blocks_the_day_regardless_of_weekly_schedule() {
    // 2026-12-25 is a Friday with a full weekly entry.
    let mut config =
        config_with(chrono_tz::UTC, vec![(Weekday::Fri, vec![slot("09:00", "17:00")])]);
    config
        .update_date_override(date("2026-12-25"), SlotPatch::Replace(vec![]), Some("holiday".into()))
        .unwrap();

    let slots = compute_available_slots_at(
        &config,
        &[],
        date("2026-12-24"),
        date("2026-12-26"),
        60,
        utc("2026-12-20T12:00:00Z"),
    )
    .unwrap();

    assert_eq!(slots.len(), 3);
    let christmas = &slots[1];
    assert_eq!(christmas.date, date("2026-12-25"));
    assert!(christmas.is_override);
    assert!(christmas.time_slots.is_empty());
}

#[test]
fn override_slots_replace_weekly_slots_entirely() {
    let mut config =
        config_with(chrono_tz::UTC, vec![(Weekday::Mon, vec![slot("09:00", "17:00")])]);
    config
        .update_date_override(
            date("2026-03-16"),
            SlotPatch::Replace(vec![slot("19:00", "21:00")]),
            None,
        )
        .unwrap();

    let slots = compute_available_slots_at(
        &config,
        &[],
        date("2026-03-16"),
        date("2026-03-16"),
        60,
        utc("2026-03-10T12:00:00Z"),
    )
    .unwrap();

    // Only the override's evening slot — the weekly 09:00-17:00 is gone.
    assert!(slots[0].is_override);
    assert_eq!(slots[0].time_slots, vec![slot("19:00", "21:00")]);
}

#[test]
fn clearing_a_weekday_removes_its_slots_unless_overridden() {
    let mut config =
        config_with(chrono_tz::UTC, vec![(Weekday::Mon, vec![slot("09:00", "12:00")])]);
    config
        .update_day_availability(Weekday::Mon, SlotPatch::Clear)
        .unwrap();

    let slots = compute_available_slots_at(
        &config,
        &[],
        date("2026-03-16"),
        date("2026-03-16"),
        60,
        utc("2026-03-10T12:00:00Z"),
    )
    .unwrap();

    assert_eq!(slots.len(), 1);
    assert!(slots[0].time_slots.is_empty());
    assert!(!slots[0].is_override);
}

// ── Advance-booking bounds ──────────────────────────────────────────────────

#[test]
fn dates_inside_minimum_notice_are_omitted() {
    let config = config_with(
        chrono_tz::UTC,
        vec![
            (Weekday::Mon, vec![slot("09:00", "12:00")]),
            (Weekday::Tue, vec![slot("09:00", "12:00")]),
            (Weekday::Wed, vec![slot("09:00", "12:00")]),
        ],
    );

    // now is Monday midnight; 24h notice pushes the earliest date to Tuesday.
    let slots = compute_available_slots_at(
        &config,
        &[],
        date("2026-03-16"),
        date("2026-03-18"),
        60,
        utc("2026-03-16T00:00:00Z"),
    )
    .unwrap();

    let dates: Vec<NaiveDate> = slots.iter().map(|s| s.date).collect();
    assert_eq!(dates, vec![date("2026-03-17"), date("2026-03-18")]);
}

#[test]
fn dates_past_the_horizon_are_omitted() {
    let config = config_with(chrono_tz::UTC, vec![(Weekday::Thu, vec![slot("09:00", "12:00")])]);

    // now + 30 days = 2026-04-09; the 10th and 11th fall off.
    let slots = compute_available_slots_at(
        &config,
        &[],
        date("2026-04-08"),
        date("2026-04-11"),
        60,
        utc("2026-03-10T00:00:00Z"),
    )
    .unwrap();

    let dates: Vec<NaiveDate> = slots.iter().map(|s| s.date).collect();
    assert_eq!(dates, vec![date("2026-04-08"), date("2026-04-09")]);
}

#[test]
fn days_without_weekly_entry_are_reported_empty() {
    let config = config_with(chrono_tz::UTC, vec![(Weekday::Mon, vec![slot("09:00", "12:00")])]);

    let slots = compute_available_slots_at(
        &config,
        &[],
        date("2026-03-16"),
        date("2026-03-17"),
        60,
        utc("2026-03-10T12:00:00Z"),
    )
    .unwrap();

    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0].time_slots, vec![slot("09:00", "12:00")]);
    assert!(slots[1].time_slots.is_empty());
    assert_eq!(slots[1].day_of_week, 2);
}

// ── Validation ──────────────────────────────────────────────────────────────

#[test]
fn reversed_query_range_is_rejected_before_any_computation() {
    let config = config_with(chrono_tz::UTC, vec![(Weekday::Mon, vec![slot("09:00", "12:00")])]);
    let err = compute_available_slots_at(
        &config,
        &[],
        date("2026-03-18"),
        date("2026-03-16"),
        60,
        utc("2026-03-10T12:00:00Z"),
    )
    .unwrap_err();
    assert!(matches!(err, SlotError::InvalidRange(_, _)));
}

#[test]
fn duration_bounds_are_inclusive() {
    let config = config_with(chrono_tz::UTC, vec![(Weekday::Mon, vec![slot("09:00", "12:00")])]);
    let run = |duration| {
        compute_available_slots_at(
            &config,
            &[],
            date("2026-03-16"),
            date("2026-03-16"),
            duration,
            utc("2026-03-10T12:00:00Z"),
        )
    };

    assert!(run(30).is_ok());
    assert!(run(180).is_ok());
    for bad in [29, 181, 0, -5] {
        let err = run(bad).unwrap_err();
        assert!(
            matches!(err, SlotError::InvalidDuration(_)),
            "expected InvalidDuration for {}",
            bad
        );
    }
}

// ── Timezone and DST ────────────────────────────────────────────────────────

#[test]
fn utc_bookings_are_matched_against_mentor_local_slots() {
    // Mentor in New York (EDT, UTC-4 on 2026-03-16). A booking stored as
    // 14:00-14:30 UTC is 10:00-10:30 on the mentor's wall clock, so with the
    // 15-minute buffer the morning remainder is too short for 60 minutes.
    let config = config_with(
        chrono_tz::America::New_York,
        vec![(Weekday::Mon, vec![slot("09:00", "12:00")])],
    );
    let bookings = [booked("2026-03-16T14:00:00Z", "2026-03-16T14:30:00Z")];

    let slots = compute_available_slots_at(
        &config,
        &bookings,
        date("2026-03-16"),
        date("2026-03-16"),
        60,
        utc("2026-03-10T12:00:00Z"),
    )
    .unwrap();

    assert_eq!(slots[0].time_slots, vec![slot("10:45", "12:00")]);
}

#[test]
fn slots_keep_local_meaning_across_spring_forward() {
    // US DST begins 2026-03-08. After the jump New York is UTC-4, so a
    // 14:00Z booking lands at 10:00 local. A naive UTC-5 assumption would
    // misplace it at 09:00 and block the wrong hour.
    let mut config = config_with(
        chrono_tz::America::New_York,
        vec![(Weekday::Sun, vec![slot("09:00", "12:00")])],
    );
    config.buffer_time_minutes = 0;
    let bookings = [booked("2026-03-08T14:00:00Z", "2026-03-08T14:30:00Z")];

    let slots = compute_available_slots_at(
        &config,
        &bookings,
        date("2026-03-08"),
        date("2026-03-08"),
        30,
        utc("2026-03-05T12:00:00Z"),
    )
    .unwrap();

    assert_eq!(
        slots[0].time_slots,
        vec![slot("09:00", "10:00"), slot("10:30", "12:00")]
    );
}

// ── Determinism ─────────────────────────────────────────────────────────────

#[test]
fn identical_inputs_resolve_identically() {
    let config = config_with(
        chrono_tz::Europe::Amsterdam,
        vec![
            (Weekday::Mon, vec![slot("09:00", "12:00"), slot("13:00", "17:00")]),
            (Weekday::Wed, vec![slot("10:00", "16:00")]),
        ],
    );
    let bookings = [
        booked("2026-03-16T09:00:00Z", "2026-03-16T10:00:00Z"),
        booked("2026-03-18T12:00:00Z", "2026-03-18T13:00:00Z"),
    ];
    let now = utc("2026-03-10T12:00:00Z");

    let a = compute_available_slots_at(&config, &bookings, date("2026-03-16"), date("2026-03-20"), 60, now)
        .unwrap();
    let b = compute_available_slots_at(&config, &bookings, date("2026-03-16"), date("2026-03-20"), 60, now)
        .unwrap();
    assert_eq!(a, b);
}
