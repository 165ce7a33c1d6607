//! Rehearsal and lesson records as seen by the engine.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::interval::Interval;

/// One rehearsal or lesson, either already booked or proposed.
///
/// The engine treats activities as immutable snapshots; it never edits one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    /// The owning ensemble or class.
    pub group_id: String,
    pub interval: Interval,
    pub location: String,
    /// Conductor or teacher.
    pub supervisor_id: String,
    #[serde(default)]
    pub participant_ids: BTreeSet<String>,
}

impl Activity {
    pub fn new(
        id: impl Into<String>,
        group_id: impl Into<String>,
        interval: Interval,
        location: impl Into<String>,
        supervisor_id: impl Into<String>,
    ) -> Self {
        Activity {
            id: id.into(),
            group_id: group_id.into(),
            interval,
            location: location.into(),
            supervisor_id: supervisor_id.into(),
            participant_ids: BTreeSet::new(),
        }
    }

    pub fn with_participants<I, S>(mut self, participants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.participant_ids
            .extend(participants.into_iter().map(Into::into));
        self
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.interval.date()
    }

    /// Whether at least one participant attends both activities.
    pub fn shares_participants(&self, other: &Activity) -> bool {
        !self.participant_ids.is_disjoint(&other.participant_ids)
    }
}
