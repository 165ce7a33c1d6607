//! Day-scoped time ranges and the overlap rule every other module relies on.
//!
//! Two intervals are comparable only when they fall on the same day. A weekly
//! interval (no date) matches any dated interval on the same weekday; two dated
//! intervals must share the exact date.
//!
//! Overlap is strict: `a.start < b.end && a.end > b.start`. Back-to-back
//! intervals, where one ends exactly when the other starts, do not overlap.

use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::time::{self, TimeOfDay};

/// A validated `[start, end)` range on a weekday, optionally pinned to a date.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "IntervalRecord", into = "IntervalRecord")]
pub struct Interval {
    day: Weekday,
    start: TimeOfDay,
    end: TimeOfDay,
    date: Option<NaiveDate>,
}

impl Interval {
    /// Build an interval, validating `end > start` and, when `date` is given,
    /// that `day` is the date's weekday.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidInterval` on either violation.
    pub fn new(
        day: Weekday,
        start: TimeOfDay,
        end: TimeOfDay,
        date: Option<NaiveDate>,
    ) -> Result<Self> {
        if end <= start {
            return Err(EngineError::InvalidInterval(format!(
                "end {} is not after start {}",
                end, start
            )));
        }
        if let Some(date) = date {
            if date.weekday() != day {
                return Err(EngineError::InvalidInterval(format!(
                    "{} falls on {}, not {}",
                    time::format_date(date),
                    date.weekday(),
                    day
                )));
            }
        }
        Ok(Interval {
            day,
            start,
            end,
            date,
        })
    }

    /// An abstract interval that repeats every `day`.
    pub fn weekly(day: Weekday, start: TimeOfDay, end: TimeOfDay) -> Result<Self> {
        Interval::new(day, start, end, None)
    }

    /// A concrete interval on `date`; the weekday is taken from the date.
    pub fn on_date(date: NaiveDate, start: TimeOfDay, end: TimeOfDay) -> Result<Self> {
        Interval::new(date.weekday(), start, end, Some(date))
    }

    /// Caller guarantees `end > start` and date/day agreement.
    pub(crate) fn new_unchecked(
        day: Weekday,
        start: TimeOfDay,
        end: TimeOfDay,
        date: Option<NaiveDate>,
    ) -> Self {
        debug_assert!(end > start);
        debug_assert!(date.is_none_or(|d| d.weekday() == day));
        Interval {
            day,
            start,
            end,
            date,
        }
    }

    /// The same start and end times, pinned to `date`.
    ///
    /// The weekday follows the date, so the result is always valid.
    pub fn on(&self, date: NaiveDate) -> Interval {
        Interval::new_unchecked(date.weekday(), self.start, self.end, Some(date))
    }

    /// The same start and end times with the date dropped.
    pub fn to_weekly(&self) -> Interval {
        Interval::new_unchecked(self.day, self.start, self.end, None)
    }

    pub fn day(&self) -> Weekday {
        self.day
    }

    pub fn start(&self) -> TimeOfDay {
        self.start
    }

    pub fn end(&self) -> TimeOfDay {
        self.end
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn duration_minutes(&self) -> u32 {
        u32::from(self.end.minutes() - self.start.minutes())
    }

    /// Whether the two intervals fall on the same day and can be compared.
    pub fn same_day(&self, other: &Interval) -> bool {
        if self.day != other.day {
            return false;
        }
        match (self.date, other.date) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }

    /// Strict overlap on the same day. Adjacent intervals do not overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.same_day(other) && self.start < other.end && self.end > other.start
    }

    /// Whether `inner` lies entirely within `self` on the same day.
    pub fn contains(&self, inner: &Interval) -> bool {
        self.same_day(inner) && self.start <= inner.start && inner.end <= self.end
    }

    /// Length of the shared range in minutes, zero when they do not overlap.
    pub fn overlap_minutes(&self, other: &Interval) -> u32 {
        if !self.overlaps(other) {
            return 0;
        }
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        u32::from(end.minutes() - start.minutes())
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.date {
            Some(date) => write!(
                f,
                "{} {}-{}",
                time::format_date(date),
                self.start,
                self.end
            ),
            None => write!(f, "{} {}-{}", self.day, self.start, self.end),
        }
    }
}

/// Free-function form of [`Interval::overlaps`].
pub fn overlaps(a: &Interval, b: &Interval) -> bool {
    a.overlaps(b)
}

/// Wire shape of an [`Interval`]. `day` may be omitted when `date` is present.
#[derive(Serialize, Deserialize)]
struct IntervalRecord {
    #[serde(default)]
    day: Option<Weekday>,
    start: TimeOfDay,
    end: TimeOfDay,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date: Option<String>,
}

impl TryFrom<IntervalRecord> for Interval {
    type Error = EngineError;

    fn try_from(record: IntervalRecord) -> Result<Self> {
        let date = record.date.as_deref().map(time::parse_date).transpose()?;
        let day = match (record.day, date) {
            (Some(day), _) => day,
            (None, Some(date)) => date.weekday(),
            (None, None) => {
                return Err(EngineError::InvalidInterval(
                    "interval needs a day or a date".to_string(),
                ))
            }
        };
        Interval::new(day, record.start, record.end, date)
    }
}

impl From<Interval> for IntervalRecord {
    fn from(interval: Interval) -> Self {
        IntervalRecord {
            day: Some(interval.day),
            start: interval.start,
            end: interval.end,
            date: interval.date.map(time::format_date),
        }
    }
}
