//! # fieldbeat-db: Database Layer for fieldbeat
//!
//! This crate provides database access for the beat-mapping scheduler.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       fieldbeat Data Flow                           │
//! │                                                                     │
//! │  SchedulerService (fieldbeat-scheduler)                             │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                  fieldbeat-db (THIS CRATE)                  │   │
//! │  │                                                             │   │
//! │  │  ┌─────────────┐  ┌─────────────────┐  ┌───────────────┐   │   │
//! │  │  │  Database   │  │  Repositories   │  │  Migrations   │   │   │
//! │  │  │  (pool.rs)  │  │ schedule.rs     │  │  (embedded)   │   │   │
//! │  │  │             │  │ directory.rs    │  │ 001_init.sql  │   │   │
//! │  │  │ SqlitePool  │◄─│                 │  │               │   │   │
//! │  │  └─────────────┘  └─────────────────┘  └───────────────┘   │   │
//! │  │                                                             │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite Database (one row per WeeklySchedule aggregate)             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (schedule, directory)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fieldbeat_db::{Database, DbConfig};
//!
//! let config = DbConfig::new("path/to/fieldbeat.db");
//! let db = Database::new(config).await?;
//!
//! let schedules = db
//!     .schedules()
//!     .find_by_employee_and_range("TSE-042", start, end)
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::directory::DirectoryRepository;
pub use repository::schedule::ScheduleRepository;
