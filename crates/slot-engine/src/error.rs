//! Error types for slot-engine operations.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlotError {
    #[error("Invalid query range: end date {1} is before start date {0}")]
    InvalidRange(NaiveDate, NaiveDate),

    #[error("Invalid session duration: {0} minutes (must be between 30 and 180)")]
    InvalidDuration(i64),

    #[error("Overlapping or malformed time slots: {0}")]
    OverlappingSlot(String),

    #[error("Invalid time format: {0}")]
    InvalidTimeFormat(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),
}

pub type Result<T> = std::result::Result<T, SlotError>;
