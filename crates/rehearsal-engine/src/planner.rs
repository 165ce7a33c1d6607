//! Bulk recurrence checks: expand a request, then classify every occurrence.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::activity::Activity;
use crate::conflict::{classify_with, ClassifyOptions, ConflictReport};
use crate::expander::RecurrenceRequest;

/// The conflict report for one generated occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccurrenceCheck {
    #[serde(with = "crate::time::serde_date")]
    pub date: NaiveDate,
    pub candidate: Activity,
    pub report: ConflictReport,
}

/// Per-occurrence reports for a whole recurrence request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "PlanRecord")]
pub struct RecurrencePlan {
    occurrences: Vec<OccurrenceCheck>,
    has_critical: bool,
}

#[derive(Deserialize)]
struct PlanRecord {
    occurrences: Vec<OccurrenceCheck>,
}

impl From<PlanRecord> for RecurrencePlan {
    fn from(record: PlanRecord) -> Self {
        RecurrencePlan::from_occurrences(record.occurrences)
    }
}

impl RecurrencePlan {
    pub fn from_occurrences(occurrences: Vec<OccurrenceCheck>) -> Self {
        let has_critical = occurrences.iter().any(|check| check.report.has_critical());
        RecurrencePlan {
            occurrences,
            has_critical,
        }
    }

    pub fn occurrences(&self) -> &[OccurrenceCheck] {
        &self.occurrences
    }

    pub fn into_occurrences(self) -> Vec<OccurrenceCheck> {
        self.occurrences
    }

    /// True iff any occurrence has a critical finding.
    pub fn has_critical(&self) -> bool {
        self.has_critical
    }

    pub fn len(&self) -> usize {
        self.occurrences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }

    /// Dates whose candidate has at least one critical finding.
    pub fn blocked_dates(&self) -> Vec<NaiveDate> {
        self.occurrences
            .iter()
            .filter(|check| check.report.has_critical())
            .map(|check| check.date)
            .collect()
    }

    /// Dates with no findings at all.
    pub fn clear_dates(&self) -> Vec<NaiveDate> {
        self.occurrences
            .iter()
            .filter(|check| check.report.is_clear())
            .map(|check| check.date)
            .collect()
    }
}

/// Check every occurrence of `request` against `existing` with default options.
pub fn check_recurrence(request: &RecurrenceRequest, existing: &[Activity]) -> RecurrencePlan {
    check_recurrence_with(request, existing, &ClassifyOptions::default())
}

/// Check every occurrence of `request` against `existing`.
pub fn check_recurrence_with(
    request: &RecurrenceRequest,
    existing: &[Activity],
    options: &ClassifyOptions,
) -> RecurrencePlan {
    let occurrences: Vec<OccurrenceCheck> = request
        .occurrences()
        .map(|date| {
            let candidate = request.candidate_on(date);
            let report = classify_with(&candidate, existing, options);
            OccurrenceCheck {
                date,
                candidate,
                report,
            }
        })
        .collect();

    let plan = RecurrencePlan::from_occurrences(occurrences);
    debug!(
        group = %request.group_id,
        occurrences = plan.len(),
        has_critical = plan.has_critical(),
        "checked recurrence request"
    );
    plan
}
