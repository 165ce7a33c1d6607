//! Classify conflicts between a candidate activity and the existing roster.
//!
//! Each (candidate, existing) pair that overlaps in time yields one finding per
//! clashing resource: location and supervisor clashes are critical, shared
//! participants are a warning. An overlap with no shared resource yields a
//! generic `time` warning unless [`ClassifyOptions`] turns that off.
//!
//! Adjacent activities (one ends exactly when the other starts) never conflict.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::activity::Activity;

/// The resource on which two activities clash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Overlapping time with no shared resource.
    Time,
    Location,
    Supervisor,
    Participants,
}

/// How strongly a finding should gate submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Advisory; the caller may let the user confirm and proceed.
    Warning,
    /// Blocks submission.
    Critical,
}

/// One dimension-tagged clash between the candidate and an existing activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictFinding {
    pub dimension: Dimension,
    pub severity: Severity,
    pub with_activity: Activity,
    /// The date of the clash: the candidate's, else the existing activity's.
    /// Absent when both are weekly.
    pub affected_date: Option<NaiveDate>,
    pub overlap_minutes: u32,
}

/// Ordered findings for one candidate, with the derived critical flag.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "ReportRecord")]
pub struct ConflictReport {
    findings: Vec<ConflictFinding>,
    has_critical: bool,
}

/// Wire form of a report; `has_critical` is always recomputed on read.
#[derive(Deserialize)]
struct ReportRecord {
    findings: Vec<ConflictFinding>,
}

impl From<ReportRecord> for ConflictReport {
    fn from(record: ReportRecord) -> Self {
        ConflictReport::from_findings(record.findings)
    }
}

impl ConflictReport {
    pub fn from_findings(findings: Vec<ConflictFinding>) -> Self {
        let has_critical = findings
            .iter()
            .any(|f| f.severity == Severity::Critical);
        ConflictReport {
            findings,
            has_critical,
        }
    }

    pub fn findings(&self) -> &[ConflictFinding] {
        &self.findings
    }

    pub fn into_findings(self) -> Vec<ConflictFinding> {
        self.findings
    }

    /// True iff any finding is critical.
    pub fn has_critical(&self) -> bool {
        self.has_critical
    }

    /// True when there is nothing to report at all.
    pub fn is_clear(&self) -> bool {
        self.is_empty()
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn critical(&self) -> impl Iterator<Item = &ConflictFinding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Critical)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ConflictFinding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
    }
}

/// Tunables for [`classify_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifyOptions {
    /// Emit a `time` warning for overlaps that share no resource.
    pub report_time_only_overlaps: bool,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        ClassifyOptions {
            report_time_only_overlaps: true,
        }
    }
}

/// Classify `candidate` against every activity in `existing` with default options.
pub fn classify(candidate: &Activity, existing: &[Activity]) -> ConflictReport {
    classify_with(candidate, existing, &ClassifyOptions::default())
}

/// Classify `candidate` against every activity in `existing`.
///
/// Findings appear in roster order; within one pair the order is location,
/// supervisor, participants, then the generic time finding.
///
/// An existing activity is skipped when it is the candidate itself (same id),
/// when it belongs to the same group on the same date, when it is on another
/// day, or when the time ranges do not overlap.
pub fn classify_with(
    candidate: &Activity,
    existing: &[Activity],
    options: &ClassifyOptions,
) -> ConflictReport {
    let mut findings = Vec::new();

    for other in existing {
        if other.id == candidate.id {
            trace!(id = %other.id, "skipping stored copy of the candidate");
            continue;
        }
        // A group may hold several sessions on one date without clashing with itself.
        if other.group_id == candidate.group_id && other.date() == candidate.date() {
            trace!(id = %other.id, group = %other.group_id, "same-group exemption");
            continue;
        }
        if !candidate.interval.overlaps(&other.interval) {
            continue;
        }
        push_pair_findings(candidate, other, options, &mut findings);
    }

    let report = ConflictReport::from_findings(findings);
    debug!(
        candidate = %candidate.id,
        interval = %candidate.interval,
        roster = existing.len(),
        findings = report.len(),
        critical = report.has_critical(),
        "classified candidate activity"
    );
    report
}

fn push_pair_findings(
    candidate: &Activity,
    other: &Activity,
    options: &ClassifyOptions,
    findings: &mut Vec<ConflictFinding>,
) {
    let overlap_minutes = candidate.interval.overlap_minutes(&other.interval);
    let finding = |dimension, severity| ConflictFinding {
        dimension,
        severity,
        with_activity: other.clone(),
        affected_date: candidate.date().or(other.date()),
        overlap_minutes,
    };

    let before = findings.len();
    if candidate.location == other.location {
        findings.push(finding(Dimension::Location, Severity::Critical));
    }
    if candidate.supervisor_id == other.supervisor_id {
        findings.push(finding(Dimension::Supervisor, Severity::Critical));
    }
    if candidate.shares_participants(other) {
        findings.push(finding(Dimension::Participants, Severity::Warning));
    }
    if findings.len() == before && options.report_time_only_overlaps {
        findings.push(finding(Dimension::Time, Severity::Warning));
    }
}
