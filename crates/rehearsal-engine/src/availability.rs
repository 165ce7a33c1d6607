//! Bookable slot synthesis from declared weekly availability.
//!
//! For every availability window and every requested duration a start cursor
//! slides through the window on a fixed grid (15 minutes by default). Each
//! `[cursor, cursor + duration)` candidate that overlaps neither an occupied
//! interval nor a slot already chosen in the same session is offered.
//!
//! The synthesizer keeps no state between calls. After the caller accepts a
//! candidate it appends [`CandidateSlot::to_interval`] to `already_chosen` and
//! calls again.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::interval::Interval;
use crate::time::TimeOfDay;

/// Grid spacing for candidate start times.
pub const DEFAULT_STEP_MINUTES: u32 = 15;

/// Durations offered when the caller does not choose any.
pub const DEFAULT_DURATIONS: [u32; 3] = [30, 45, 60];

/// A weekly window in which a teacher or room can be booked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WindowRecord", into = "WindowRecord")]
pub struct AvailabilityWindow {
    interval: Interval,
    location: Option<String>,
}

impl AvailabilityWindow {
    /// # Errors
    /// Returns `EngineError::InvalidInterval` if `end <= start`.
    pub fn new(
        day: Weekday,
        start: TimeOfDay,
        end: TimeOfDay,
        location: Option<String>,
    ) -> Result<Self> {
        Ok(AvailabilityWindow {
            interval: Interval::weekly(day, start, end)?,
            location,
        })
    }

    pub fn day(&self) -> Weekday {
        self.interval.day()
    }

    pub fn start(&self) -> TimeOfDay {
        self.interval.start()
    }

    pub fn end(&self) -> TimeOfDay {
        self.interval.end()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// The window as an undated weekly interval.
    pub fn interval(&self) -> &Interval {
        &self.interval
    }
}

#[derive(Serialize, Deserialize)]
struct WindowRecord {
    day: Weekday,
    start: TimeOfDay,
    end: TimeOfDay,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    location: Option<String>,
}

impl TryFrom<WindowRecord> for AvailabilityWindow {
    type Error = EngineError;

    fn try_from(record: WindowRecord) -> Result<Self> {
        AvailabilityWindow::new(record.day, record.start, record.end, record.location)
    }
}

impl From<AvailabilityWindow> for WindowRecord {
    fn from(window: AvailabilityWindow) -> Self {
        WindowRecord {
            day: window.day(),
            start: window.start(),
            end: window.end(),
            location: window.location,
        }
    }
}

/// A synthesized, not yet booked slot of one specific duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SlotRecord", into = "SlotRecord")]
pub struct CandidateSlot {
    interval: Interval,
    location: Option<String>,
}

impl CandidateSlot {
    pub fn day(&self) -> Weekday {
        self.interval.day()
    }

    pub fn start(&self) -> TimeOfDay {
        self.interval.start()
    }

    pub fn end(&self) -> TimeOfDay {
        self.interval.end()
    }

    pub fn duration_minutes(&self) -> u32 {
        self.interval.duration_minutes()
    }

    /// Location declared by the window this slot came from.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// The weekly interval, ready to append to `already_chosen`.
    pub fn to_interval(&self) -> Interval {
        self.interval.clone()
    }

    /// The slot pinned to a concrete date, for building an `Activity`.
    pub fn on(&self, date: chrono::NaiveDate) -> Interval {
        self.interval.on(date)
    }
}

#[derive(Serialize, Deserialize)]
struct SlotRecord {
    day: Weekday,
    start: TimeOfDay,
    end: TimeOfDay,
    duration_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    location: Option<String>,
}

impl TryFrom<SlotRecord> for CandidateSlot {
    type Error = EngineError;

    fn try_from(record: SlotRecord) -> Result<Self> {
        let interval = Interval::weekly(record.day, record.start, record.end)?;
        if interval.duration_minutes() != record.duration_minutes {
            return Err(EngineError::InvalidInterval(format!(
                "{} lasts {} minutes, not {}",
                interval,
                interval.duration_minutes(),
                record.duration_minutes
            )));
        }
        Ok(CandidateSlot {
            interval,
            location: record.location,
        })
    }
}

impl From<CandidateSlot> for SlotRecord {
    fn from(slot: CandidateSlot) -> Self {
        SlotRecord {
            day: slot.day(),
            start: slot.start(),
            end: slot.end(),
            duration_minutes: slot.duration_minutes(),
            location: slot.location,
        }
    }
}

/// Tunables for [`synthesize_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotOptions {
    /// Spacing of candidate start times. Zero falls back to the default.
    pub step_minutes: u32,
}

impl Default for SlotOptions {
    fn default() -> Self {
        SlotOptions {
            step_minutes: DEFAULT_STEP_MINUTES,
        }
    }
}

impl SlotOptions {
    fn effective_step(&self) -> u32 {
        if self.step_minutes == 0 {
            DEFAULT_STEP_MINUTES
        } else {
            self.step_minutes
        }
    }
}

/// Synthesize candidate slots on the default 15-minute grid.
pub fn synthesize(
    windows: &[AvailabilityWindow],
    occupied: &[Interval],
    already_chosen: &[Interval],
    durations: &[u32],
) -> Vec<CandidateSlot> {
    synthesize_with(
        windows,
        occupied,
        already_chosen,
        durations,
        &SlotOptions::default(),
    )
}

/// Synthesize candidate slots for every window and duration.
///
/// Output is ordered by window (input order), then duration (input order),
/// then start time. Candidates of different durations starting at the same
/// time are all kept. Zero durations and durations longer than a window yield
/// nothing for that window.
pub fn synthesize_with(
    windows: &[AvailabilityWindow],
    occupied: &[Interval],
    already_chosen: &[Interval],
    durations: &[u32],
    options: &SlotOptions,
) -> Vec<CandidateSlot> {
    let step = options.effective_step();
    let mut slots = Vec::new();

    for window in windows {
        let window_start = u32::from(window.start().minutes());
        let window_end = u32::from(window.end().minutes());

        for &duration in durations {
            if duration == 0 {
                continue;
            }
            let Some(last_start) = window_end.checked_sub(duration) else {
                continue;
            };

            let mut cursor = window_start;
            while cursor <= last_start {
                let candidate = Interval::new_unchecked(
                    window.day(),
                    TimeOfDay::from_minutes_unchecked(cursor),
                    TimeOfDay::from_minutes_unchecked(cursor + duration),
                    None,
                );
                let blocked = occupied
                    .iter()
                    .chain(already_chosen)
                    .any(|busy| candidate.overlaps(busy));
                if !blocked {
                    slots.push(CandidateSlot {
                        interval: candidate,
                        location: window.location.clone(),
                    });
                }
                match cursor.checked_add(step) {
                    Some(next) => cursor = next,
                    None => break,
                }
            }
        }
    }

    debug!(
        windows = windows.len(),
        occupied = occupied.len(),
        chosen = already_chosen.len(),
        durations = ?durations,
        step,
        candidates = slots.len(),
        "synthesized candidate slots"
    );
    slots
}
