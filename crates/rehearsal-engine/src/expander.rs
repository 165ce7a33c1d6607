//! Weekly occurrence expansion -- turns a recurrence request into concrete dates.
//!
//! Only one pattern exists: the same weekday every week between two dates,
//! minus an exclusion set. Expansion is deterministic and restartable; every
//! call to [`RecurrenceRequest::occurrences`] starts a fresh walk.

use std::collections::BTreeSet;
use std::iter::FusedIterator;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::activity::Activity;
use crate::interval::Interval;
use crate::time;

/// Inclusive date bounds for an expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(with = "time::serde_date")]
    pub from: NaiveDate,
    #[serde(with = "time::serde_date")]
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        DateRange { from, to }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// A bulk booking: the same slot every week for a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRequest {
    pub group_id: String,
    /// Weekday plus start/end times. A date on this interval is ignored.
    pub interval: Interval,
    pub date_range: DateRange,
    #[serde(default, with = "time::serde_date_set")]
    pub exclusions: BTreeSet<NaiveDate>,
    pub location: String,
    pub supervisor_id: String,
    #[serde(default)]
    pub participant_ids: BTreeSet<String>,
}

impl RecurrenceRequest {
    /// Walk the occurrence dates in ascending order.
    pub fn occurrences(&self) -> Occurrences<'_> {
        Occurrences::new(self.interval.day(), self.date_range, &self.exclusions)
    }

    /// Build the candidate activity for one occurrence date.
    ///
    /// The id is `<group_id>@<YYYY-MM-DD>`.
    pub fn candidate_on(&self, date: NaiveDate) -> Activity {
        Activity {
            id: format!("{}@{}", self.group_id, time::format_date(date)),
            group_id: self.group_id.clone(),
            interval: self.interval.on(date),
            location: self.location.clone(),
            supervisor_id: self.supervisor_id.clone(),
            participant_ids: self.participant_ids.clone(),
        }
    }

    /// One candidate activity per occurrence, in date order.
    pub fn candidates(&self) -> Vec<Activity> {
        self.occurrences()
            .map(|date| self.candidate_on(date))
            .collect()
    }
}

/// Iterator over the dates of a [`RecurrenceRequest`].
#[derive(Debug, Clone)]
pub struct Occurrences<'a> {
    next: Option<NaiveDate>,
    to: NaiveDate,
    exclusions: &'a BTreeSet<NaiveDate>,
}

impl<'a> Occurrences<'a> {
    fn new(day: Weekday, range: DateRange, exclusions: &'a BTreeSet<NaiveDate>) -> Self {
        let next = first_on_or_after(range.from, day).filter(|first| *first <= range.to);
        Occurrences {
            next,
            to: range.to,
            exclusions,
        }
    }
}

impl Iterator for Occurrences<'_> {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        loop {
            let current = self.next?;
            self.next = current
                .checked_add_days(Days::new(7))
                .filter(|following| *following <= self.to);
            if !self.exclusions.contains(&current) {
                return Some(current);
            }
        }
    }
}

impl FusedIterator for Occurrences<'_> {}

/// Expand a request into its occurrence dates.
///
/// Returns an empty list when no matching weekday falls inside the range,
/// including when `from` is after `to`. Exclusions that are not on the
/// recurrence weekday can never match and are ignored.
pub fn expand_occurrences(request: &RecurrenceRequest) -> Vec<NaiveDate> {
    let dates: Vec<NaiveDate> = request.occurrences().collect();
    debug!(
        group = %request.group_id,
        day = %request.interval.day(),
        from = %request.date_range.from,
        to = %request.date_range.to,
        excluded = request.exclusions.len(),
        occurrences = dates.len(),
        "expanded weekly recurrence"
    );
    dates
}

/// First date on or after `from` that falls on `day`.
fn first_on_or_after(from: NaiveDate, day: Weekday) -> Option<NaiveDate> {
    let offset = (7 + day.num_days_from_monday() - from.weekday().num_days_from_monday()) % 7;
    from.checked_add_days(Days::new(u64::from(offset)))
}
