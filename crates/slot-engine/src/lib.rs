//! # slot-engine
//!
//! Mentor availability resolution for the booking platform.
//!
//! Given a mentor's recurring weekly schedule, date-specific overrides,
//! timezone, buffer time, and advance-booking bounds, plus the already-booked
//! intervals, the engine computes the open ranges a session of a requested
//! duration can be booked into. It is pure computation: no I/O, no stored
//! state, safe to call concurrently over snapshot inputs.
//!
//! ## Modules
//!
//! - [`timeslot`] — `HH:MM` time-of-day intervals and weekday indexing
//! - [`config`] — availability configuration and its patch operations
//! - [`resolver`] — slot resolution over a query window
//! - [`intervals`] — busy-interval merge/subtract arithmetic
//! - [`error`] — error types

pub mod config;
pub mod error;
pub mod intervals;
pub mod resolver;
pub mod timeslot;

pub use config::{
    AvailabilityConfig, AvailabilityUpdate, DateOverride, DateOverrideEntry, SlotPatch,
    WeeklyScheduleEntry,
};
pub use error::SlotError;
pub use resolver::{
    compute_available_slots, compute_available_slots_at, AvailableSlot, BookedInterval,
    MAX_SESSION_MINUTES, MIN_SESSION_MINUTES,
};
pub use timeslot::TimeSlot;
