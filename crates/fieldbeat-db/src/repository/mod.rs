//! # Repository Module
//!
//! Database repository implementations for fieldbeat.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                               │
//! │                                                                     │
//! │  SchedulerService                                                   │
//! │       │                                                             │
//! │       │  db.schedules().get_by_id(id)                               │
//! │       ▼                                                             │
//! │  ScheduleRepository                                                 │
//! │  ├── insert / insert_many                                           │
//! │  ├── get_by_id                                                      │
//! │  ├── find_by_employee_and_range                                     │
//! │  ├── update (whole-aggregate replace)                               │
//! │  └── update_task_fields (targeted sub-document patch)               │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite Database                                                    │
//! │                                                                     │
//! │  Benefits:                                                          │
//! │  • SQL is isolated in one place                                     │
//! │  • Both write paths converge on the same count invariant            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`schedule::ScheduleRepository`] - WeeklySchedule aggregate persistence
//! - [`directory::DirectoryRepository`] - read-only employee/dealer lookups

pub mod directory;
pub mod schedule;
