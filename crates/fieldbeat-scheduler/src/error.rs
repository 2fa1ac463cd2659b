//! # Scheduler Error Types
//!
//! The error surface HTTP handlers translate into status codes.
//!
//! ## Mapping
//! ```text
//! SchedulerError::Validation        → 400 (never retried)
//! SchedulerError::ScheduleNotFound  → 404
//! SchedulerError::TaskNotFound      → 404
//! SchedulerError::Db                → 500 (no automatic retry here)
//! ```
//!
//! Proximity rejection deliberately does NOT appear in this enum - a
//! well-formed request that fails the distance check succeeds at the
//! transport level and signals the logical failure through
//! [`crate::VisitOutcome::OutOfRange`].

use thiserror::Error;

use fieldbeat_core::ValidationError;
use fieldbeat_db::DbError;

/// Errors surfaced by the Scheduler Service.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Missing required field, invalid status value, non-numeric coordinate.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Schedule id does not resolve.
    #[error("Schedule not found: {0}")]
    ScheduleNotFound(String),

    /// Task id does not resolve inside the schedule's seven buckets.
    #[error("Visit task {task_id} not found in schedule {schedule_id}")]
    TaskNotFound {
        schedule_id: String,
        task_id: String,
    },

    /// Underlying storage failure.
    #[error("Storage error: {0}")]
    Db(#[from] DbError),
}

/// Result type for scheduler operations.
pub type SchedulerResult<T> = Result<T, SchedulerError>;
