//! Error types surfaced by ticks and the schedule.

use std::error::Error as StdError;

use thiserror::Error;

/// Writing to an output target failed.
#[derive(Debug, Error)]
pub enum TargetError {
    /// No element with this id exists on the target surface.
    #[error("output element `{id}` not found")]
    Missing { id: String },
    #[error("write output element `{id}`")]
    Write {
        id: String,
        #[source]
        source: std::io::Error,
    },
}

/// A single tick could not render the countdown.
///
/// Never fatal to the schedule: the next tick runs regardless.
#[derive(Debug, Error)]
pub enum TickError {
    #[error("output element `{id}` not found")]
    TargetMissing { id: String },
    #[error("session deadline unavailable: {0}")]
    DeadlineUnavailable(#[source] Box<dyn StdError + Send + Sync>),
    #[error(transparent)]
    Target(TargetError),
}

impl TickError {
    /// Stable label used to deduplicate repeated reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TargetMissing { .. } => "target_missing",
            Self::DeadlineUnavailable(_) => "deadline_unavailable",
            Self::Target(_) => "target_write",
        }
    }
}

impl From<TargetError> for TickError {
    fn from(err: TargetError) -> Self {
        match err {
            TargetError::Missing { id } => Self::TargetMissing { id },
            other => Self::Target(other),
        }
    }
}

/// Lifecycle misuse of [`crate::schedule::SessionTimer`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("session timer is already running")]
    AlreadyRunning,
    #[error("session timer must be started inside a tokio runtime")]
    NoRuntime,
}
