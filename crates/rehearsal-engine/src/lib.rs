//! # rehearsal-engine
//!
//! Conflict classification, weekly occurrence expansion and bookable-slot
//! synthesis for rehearsal and lesson scheduling.
//!
//! The engine is a set of pure functions over immutable snapshots. It does no
//! I/O and holds no state: callers fetch the current roster, call the engine,
//! and decide what to persist. Re-running with the same inputs always gives
//! the same answer.
//!
//! ## Quick start
//!
//! ```rust
//! use rehearsal_engine::{expand_occurrences, parse_date, DateRange, Interval, RecurrenceRequest, TimeOfDay};
//! use chrono::Weekday;
//!
//! let request = RecurrenceRequest {
//!     group_id: "choir".to_string(),
//!     interval: Interval::weekly(
//!         Weekday::Mon,
//!         TimeOfDay::parse("19:00").unwrap(),
//!         TimeOfDay::parse("21:00").unwrap(),
//!     )
//!     .unwrap(),
//!     date_range: DateRange::new(parse_date("2024-03-04").unwrap(), parse_date("2024-03-25").unwrap()),
//!     exclusions: [parse_date("2024-03-18").unwrap()].into_iter().collect(),
//!     location: "Hall A".to_string(),
//!     supervisor_id: "conductor-1".to_string(),
//!     participant_ids: Default::default(),
//! };
//!
//! let dates = expand_occurrences(&request);
//! assert_eq!(dates.len(), 3);
//! ```
//!
//! ## Modules
//!
//! - [`time`] — `HH:MM` times and strict `YYYY-MM-DD` dates
//! - [`interval`] — day-scoped ranges and the strict overlap rule
//! - [`activity`] — rehearsal/lesson records
//! - [`expander`] — weekly recurrence → concrete dates
//! - [`conflict`] — per-dimension, per-severity conflict classification
//! - [`availability`] — candidate slot synthesis from availability windows
//! - [`freebusy`] — free ranges inside availability windows
//! - [`planner`] — expand + classify a whole recurrence request
//! - [`error`] — Error types

pub mod activity;
pub mod availability;
pub mod conflict;
pub mod error;
pub mod expander;
pub mod freebusy;
pub mod interval;
pub mod planner;
pub mod time;

pub use activity::Activity;
pub use availability::{synthesize, synthesize_with, AvailabilityWindow, CandidateSlot, SlotOptions};
pub use conflict::{
    classify, classify_with, ClassifyOptions, ConflictFinding, ConflictReport, Dimension, Severity,
};
pub use error::EngineError;
pub use expander::{expand_occurrences, DateRange, RecurrenceRequest};
pub use freebusy::{first_free_range, free_ranges, free_ranges_across, FreeRange};
pub use interval::{overlaps, Interval};
pub use planner::{check_recurrence, check_recurrence_with, OccurrenceCheck, RecurrencePlan};
pub use time::{format_date, parse_date, to_minutes, TimeOfDay};
