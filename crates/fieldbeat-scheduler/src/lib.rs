//! # fieldbeat-scheduler: Weekly Beat-Mapping Scheduler Service
//!
//! The business logic layer of fieldbeat. Builds, stores and mutates
//! per-employee weekly visit plans, tracks completion state, and verifies
//! visit completion using geographic proximity.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     SchedulerService                                │
//! │                                                                     │
//! │  create_schedule   manual creation from a fully formed 7-bucket     │
//! │                    plan; counts computed before persisting          │
//! │                                                                     │
//! │  import_rows       bulk spreadsheet import; unresolvable employees  │
//! │                    skip their row, unknown dealer codes drop out    │
//! │                    of the bucket - both surface as warnings         │
//! │                                                                     │
//! │  get_schedules     by employee, defaulting to the current ISO week  │
//! │                                                                     │
//! │  set_task_status   pending ⇄ done (both directions, no terminal     │
//! │                    state); counts recomputed from the full plan     │
//! │                                                                     │
//! │  confirm_visit     proximity-gated: haversine against the dealer's  │
//! │                    stored snapshot, soft-reject beyond 100 m        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Error Surface
//! - [`SchedulerError::Validation`] → 4xx (missing field, bad enum value,
//!   non-numeric coordinate)
//! - [`SchedulerError::ScheduleNotFound`] / [`SchedulerError::TaskNotFound`]
//!   → 404
//! - [`SchedulerError::Db`] → 5xx
//! - A proximity rejection is **not** an error: it is the
//!   [`VisitOutcome::OutOfRange`] success variant, carrying the computed
//!   distance so the UI can show "you are N meters away".

pub mod error;
pub mod import;
pub mod service;

pub use error::{SchedulerError, SchedulerResult};
pub use import::{ImportSummary, ScheduleImportRow};
pub use service::{SchedulerService, VisitOutcome};
