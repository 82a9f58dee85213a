//! Busy-interval arithmetic in mentor-local wall-clock time.
//!
//! Sorts and merges busy periods, clipped to a base interval, then walks the
//! gaps between merged periods to produce the remaining open sub-intervals.

use chrono::NaiveDateTime;

/// A half-open `[start, end)` interval in mentor-local wall-clock time.
pub type LocalInterval = (NaiveDateTime, NaiveDateTime);

/// Merge overlapping or adjacent busy intervals, clipped to the base interval.
///
/// Returns a sorted, non-overlapping list; intervals entirely outside the
/// base are discarded.
fn merge_busy(busy: &[LocalInterval], base_start: NaiveDateTime, base_end: NaiveDateTime) -> Vec<LocalInterval> {
    let mut intervals: Vec<LocalInterval> = busy
        .iter()
        .filter(|(start, end)| *start < base_end && *end > base_start)
        .map(|(start, end)| ((*start).max(base_start), (*end).min(base_end)))
        .collect();

    if intervals.is_empty() {
        return Vec::new();
    }

    intervals.sort();

    let mut merged: Vec<LocalInterval> = Vec::new();
    for (start, end) in intervals {
        if let Some(last) = merged.last_mut() {
            if start <= last.1 {
                // Overlapping or adjacent — extend the current interval.
                last.1 = last.1.max(end);
                continue;
            }
        }
        merged.push((start, end));
    }

    merged
}

/// Subtract busy intervals from a base interval, returning the open gaps.
///
/// Busy intervals may overlap each other; they are merged before the gaps
/// are computed. Gaps are returned sorted by start time.
pub fn open_intervals(base: LocalInterval, busy: &[LocalInterval]) -> Vec<LocalInterval> {
    let (base_start, base_end) = base;
    let merged = merge_busy(busy, base_start, base_end);

    let mut open = Vec::new();
    let mut cursor = base_start;

    for (busy_start, busy_end) in &merged {
        if cursor < *busy_start {
            open.push((cursor, *busy_start));
        }
        cursor = cursor.max(*busy_end);
    }

    // Trailing gap after the last busy period.
    if cursor < base_end {
        open.push((cursor, base_end));
    }

    open
}
