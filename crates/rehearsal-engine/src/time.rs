//! Wall-clock primitives: minute-of-day times and strict date parsing.
//!
//! The boundary formats are fixed: `HH:MM` (24-hour, zero-padded) for times
//! and `YYYY-MM-DD` for dates. Nothing else is accepted.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{EngineError, Result};

/// Number of minutes in a day. Every [`TimeOfDay`] is strictly below this.
pub const MINUTES_PER_DAY: u16 = 1440;

/// A wall-clock time, stored as minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Midnight, `00:00`.
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);

    /// Build a time from minutes since midnight.
    ///
    /// # Errors
    /// Returns `EngineError::Format` if `minutes >= 1440`.
    pub fn from_minutes(minutes: u32) -> Result<Self> {
        if minutes >= u32::from(MINUTES_PER_DAY) {
            return Err(EngineError::Format(format!(
                "minute-of-day {} is out of range 0..1440",
                minutes
            )));
        }
        Ok(TimeOfDay(minutes as u16))
    }

    /// Build a time from an hour (0-23) and minute (0-59).
    ///
    /// # Errors
    /// Returns `EngineError::Format` if either component is out of range.
    pub fn from_hm(hour: u32, minute: u32) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(EngineError::Format(format!(
                "{}:{} is not a valid time of day",
                hour, minute
            )));
        }
        Ok(TimeOfDay((hour * 60 + minute) as u16))
    }

    /// Caller guarantees `minutes < 1440`.
    pub(crate) fn from_minutes_unchecked(minutes: u32) -> Self {
        debug_assert!(minutes < u32::from(MINUTES_PER_DAY));
        TimeOfDay(minutes as u16)
    }

    /// Parse a strict `HH:MM` string.
    ///
    /// # Errors
    /// Returns `EngineError::Format` on any deviation: wrong width, a separator
    /// other than `:`, non-digits, hour above 23 or minute above 59.
    pub fn parse(s: &str) -> Result<Self> {
        let bytes = s.as_bytes();
        let well_formed = bytes.len() == 5
            && bytes[2] == b':'
            && [0, 1, 3, 4].iter().all(|&i| bytes[i].is_ascii_digit());
        if !well_formed {
            return Err(EngineError::Format(format!("expected HH:MM, got '{}'", s)));
        }

        let digit = |i: usize| u32::from(bytes[i] - b'0');
        let hour = digit(0) * 10 + digit(1);
        let minute = digit(3) * 10 + digit(4);
        if hour > 23 || minute > 59 {
            return Err(EngineError::Format(format!(
                "'{}' is out of range (hour 00-23, minute 00-59)",
                s
            )));
        }
        Ok(TimeOfDay((hour * 60 + minute) as u16))
    }

    /// Minutes since midnight.
    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }

    /// The time `duration` minutes later on the same day.
    ///
    /// Activities never span midnight, so a result of `24:00` or later is an
    /// overflow rather than a wrap-around.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidDuration` for a zero duration and
    /// `EngineError::Overflow` if the result would not be below 1440.
    pub fn add_minutes(self, duration: u32) -> Result<Self> {
        if duration == 0 {
            return Err(EngineError::InvalidDuration(duration));
        }
        let end = u32::from(self.0)
            .checked_add(duration)
            .filter(|&m| m < u32::from(MINUTES_PER_DAY))
            .ok_or_else(|| EngineError::Overflow {
                start: self.to_string(),
                minutes: duration,
            })?;
        Ok(TimeOfDay(end as u16))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        TimeOfDay::parse(s)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        TimeOfDay::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Parse `HH:MM` straight to minutes since midnight.
///
/// # Errors
/// Same as [`TimeOfDay::parse`].
pub fn to_minutes(s: &str) -> Result<u16> {
    TimeOfDay::parse(s).map(TimeOfDay::minutes)
}

/// Parse a strict `YYYY-MM-DD` date.
///
/// # Errors
/// Returns `EngineError::Format` for any other shape (single-digit month or
/// day, other separators) or for a calendar-invalid date such as `2024-02-30`.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let bytes = s.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !well_formed {
        return Err(EngineError::Format(format!(
            "expected YYYY-MM-DD, got '{}'",
            s
        )));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| EngineError::Format(format!("invalid date '{}': {}", s, e)))
}

/// Canonical `YYYY-MM-DD` rendering.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Serde adapter for a single date in the strict `YYYY-MM-DD` form.
pub mod serde_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_date(&raw).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for a set of dates, serialized as a sorted array of `YYYY-MM-DD`.
pub mod serde_date_set {
    use std::collections::BTreeSet;

    use chrono::NaiveDate;
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        dates: &BTreeSet<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(dates.len()))?;
        for date in dates {
            seq.serialize_element(&super::format_date(*date))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeSet<NaiveDate>, D::Error> {
        let raw = Vec::<String>::deserialize(deserializer)?;
        raw.iter()
            .map(|s| super::parse_date(s).map_err(serde::de::Error::custom))
            .collect()
    }
}
