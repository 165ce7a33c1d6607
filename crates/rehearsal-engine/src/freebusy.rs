//! Compute free ranges inside availability windows.
//!
//! Occupied intervals on the window's weekday are clipped to the window,
//! sorted, and merged; the gaps between merged periods are the free ranges.
//! Unlike slot synthesis this ignores any grid or duration.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::availability::AvailabilityWindow;
use crate::interval::Interval;
use crate::time::TimeOfDay;

/// A maximal unoccupied stretch of a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeRange {
    pub day: Weekday,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub duration_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Merge overlapping or adjacent busy periods, clipped to the window.
///
/// Returns a sorted, non-overlapping list of `(start, end)` minute pairs.
fn merge_busy_periods(window: &AvailabilityWindow, occupied: &[Interval]) -> Vec<(u16, u16)> {
    let window_start = window.start().minutes();
    let window_end = window.end().minutes();

    let mut periods: Vec<(u16, u16)> = occupied
        .iter()
        .filter(|busy| busy.overlaps(window.interval()))
        .map(|busy| {
            (
                busy.start().minutes().max(window_start),
                busy.end().minutes().min(window_end),
            )
        })
        .collect();

    if periods.is_empty() {
        return Vec::new();
    }

    periods.sort_unstable();

    let mut merged: Vec<(u16, u16)> = Vec::with_capacity(periods.len());
    for (start, end) in periods {
        if let Some(last) = merged.last_mut() {
            if start <= last.1 {
                last.1 = last.1.max(end);
                continue;
            }
        }
        merged.push((start, end));
    }

    merged
}

/// Free ranges of one window, sorted by start time.
pub fn free_ranges(window: &AvailabilityWindow, occupied: &[Interval]) -> Vec<FreeRange> {
    let merged = merge_busy_periods(window, occupied);
    let gap = |start: u16, end: u16| FreeRange {
        day: window.day(),
        start: TimeOfDay::from_minutes_unchecked(u32::from(start)),
        end: TimeOfDay::from_minutes_unchecked(u32::from(end)),
        duration_minutes: u32::from(end - start),
        location: window.location().map(str::to_string),
    };

    let mut free = Vec::new();
    let mut cursor = window.start().minutes();

    for (busy_start, busy_end) in merged {
        if cursor < busy_start {
            free.push(gap(cursor, busy_start));
        }
        cursor = cursor.max(busy_end);
    }

    let window_end = window.end().minutes();
    if cursor < window_end {
        free.push(gap(cursor, window_end));
    }

    free
}

/// Free ranges of every window, in window order.
pub fn free_ranges_across(windows: &[AvailabilityWindow], occupied: &[Interval]) -> Vec<FreeRange> {
    windows
        .iter()
        .flat_map(|window| free_ranges(window, occupied))
        .collect()
}

/// The first free range of at least `min_minutes` in the window.
pub fn first_free_range(
    window: &AvailabilityWindow,
    occupied: &[Interval],
    min_minutes: u32,
) -> Option<FreeRange> {
    free_ranges(window, occupied)
        .into_iter()
        .find(|range| range.duration_minutes >= min_minutes)
}
