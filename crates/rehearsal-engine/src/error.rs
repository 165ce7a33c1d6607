//! Error types for rehearsal-engine operations.

use thiserror::Error;

/// Errors raised while constructing engine values.
///
/// All of these are input errors: they are reported once, at construction,
/// and the classifier and synthesizers never produce them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A time or date string did not match `HH:MM` / `YYYY-MM-DD`.
    #[error("Invalid format: {0}")]
    Format(String),

    /// A computed end time reached or passed midnight.
    #[error("Time overflow: {start} + {minutes} minutes crosses midnight")]
    Overflow { start: String, minutes: u32 },

    /// End not after start, or a dated interval whose weekday disagrees with its date.
    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    /// A duration of zero minutes.
    #[error("Invalid duration: {0} minutes")]
    InvalidDuration(u32),
}

pub type Result<T> = std::result::Result<T, EngineError>;
