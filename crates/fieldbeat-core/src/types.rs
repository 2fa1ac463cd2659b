//! # Domain Types
//!
//! Core domain types for the weekly beat-mapping scheduler.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌──────────────────┐      ┌──────────────────────────────────┐    │
//! │  │  WeeklySchedule  │      │            WeekPlan              │    │
//! │  │  ──────────────  │ owns │  ──────────────────────────────  │    │
//! │  │  id (UUID)       │─────►│  mon: [DealerVisitTask]          │    │
//! │  │  employee_code   │      │  tue: [DealerVisitTask]          │    │
//! │  │  start/end date  │      │  ...   (7 fixed buckets)         │    │
//! │  │  total/done/     │      │  sun: [DealerVisitTask]          │    │
//! │  │  pending (cached)│      └──────────────────────────────────┘    │
//! │  └──────────────────┘                                              │
//! │                                                                     │
//! │  ┌──────────────────┐   ┌──────────────┐   ┌──────────────┐        │
//! │  │ DealerVisitTask  │   │  TaskStatus  │   │ScheduleCounts│        │
//! │  │  ──────────────  │   │  ──────────  │   │  ──────────  │        │
//! │  │  id (UUID)       │   │  Done        │   │  total       │        │
//! │  │  dealer snapshot │   │  Pending     │   │  done        │        │
//! │  │  status, distance│   └──────────────┘   │  pending     │        │
//! │  └──────────────────┘                      └──────────────┘        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why a fixed 7-bucket struct instead of a map?
//! Iterating a map keyed by weekday string makes it possible to forget a
//! day. A struct with seven named fields gives compile-time exhaustiveness:
//! `recompute_counts` and `find_task` cannot silently skip a bucket.
//!
//! ## Count Invariant
//! `total == done + pending` and both sides equal a full scan of all seven
//! buckets. The counts are a **materialized view** - they must be recomputed
//! (via [`WeekPlan::recompute_counts`]) and persisted after *every* status
//! mutation, never adjusted incrementally.

use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// =============================================================================
// Task Status
// =============================================================================

/// Completion state of one planned dealer visit.
///
/// Both transitions are allowed (`pending -> done` and `done -> pending`);
/// there is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Done,
    Pending,
}

impl TaskStatus {
    /// Parses a wire status string.
    ///
    /// ## Errors
    /// Anything other than `"done"` or `"pending"` is a
    /// [`ValidationError::NotAllowed`] - the transport layer maps it to 400.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        match raw {
            "done" => Ok(TaskStatus::Done),
            "pending" => Ok(TaskStatus::Pending),
            _ => Err(ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: vec!["done".to_string(), "pending".to_string()],
            }),
        }
    }

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Done => "done",
            TaskStatus::Pending => "pending",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Dealer Visit Task
// =============================================================================

/// One planned visit to one dealer on one day within a schedule.
///
/// ## Snapshot Pattern
/// `dealer_name`, `latitude` and `longitude` are copied from the dealer
/// directory at schedule-creation time and are NOT re-synced if the dealer
/// record changes later. The proximity gate always checks against the
/// snapshot the plan was built with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealerVisitTask {
    /// Unique identifier (UUID v4), assigned at schedule creation and stable
    /// for the lifetime of the schedule. Used for targeted updates.
    #[serde(default)]
    pub id: String,

    /// Dealer business code - foreign key into the dealer directory.
    pub dealer_code: String,

    /// Dealer display name, snapshotted at creation time.
    pub dealer_name: String,

    /// Dealer latitude snapshot (decimal degrees).
    pub latitude: f64,

    /// Dealer longitude snapshot (decimal degrees).
    pub longitude: f64,

    /// Completion state. New tasks start as `pending`.
    pub status: TaskStatus,

    /// Last computed proximity distance, formatted as `"N.NN meters"`.
    /// Set only by the proximity-gated completion path.
    #[serde(default)]
    pub distance: Option<String>,
}

/// Targeted field patch for one task inside a schedule.
///
/// Used by the repository's sub-document update path: only the fields set
/// here change, everything else on the task is left untouched. Counts are
/// still recomputed from the full plan afterwards.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub status: Option<TaskStatus>,
    pub distance: Option<String>,
}

// =============================================================================
// Week Plan (7 fixed day buckets)
// =============================================================================

/// All seven weekdays, Monday first. Iteration order = visit-plan order.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// The weekly visit plan: an ordered task list per weekday.
///
/// Buckets may be empty. Insertion order within a bucket is the intended
/// visit order for that day.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeekPlan {
    #[serde(rename = "Mon", default)]
    pub mon: Vec<DealerVisitTask>,
    #[serde(rename = "Tue", default)]
    pub tue: Vec<DealerVisitTask>,
    #[serde(rename = "Wed", default)]
    pub wed: Vec<DealerVisitTask>,
    #[serde(rename = "Thu", default)]
    pub thu: Vec<DealerVisitTask>,
    #[serde(rename = "Fri", default)]
    pub fri: Vec<DealerVisitTask>,
    #[serde(rename = "Sat", default)]
    pub sat: Vec<DealerVisitTask>,
    #[serde(rename = "Sun", default)]
    pub sun: Vec<DealerVisitTask>,
}

impl WeekPlan {
    /// Returns the bucket for a weekday.
    pub fn bucket(&self, day: Weekday) -> &Vec<DealerVisitTask> {
        match day {
            Weekday::Mon => &self.mon,
            Weekday::Tue => &self.tue,
            Weekday::Wed => &self.wed,
            Weekday::Thu => &self.thu,
            Weekday::Fri => &self.fri,
            Weekday::Sat => &self.sat,
            Weekday::Sun => &self.sun,
        }
    }

    /// Returns the mutable bucket for a weekday.
    pub fn bucket_mut(&mut self, day: Weekday) -> &mut Vec<DealerVisitTask> {
        match day {
            Weekday::Mon => &mut self.mon,
            Weekday::Tue => &mut self.tue,
            Weekday::Wed => &mut self.wed,
            Weekday::Thu => &mut self.thu,
            Weekday::Fri => &mut self.fri,
            Weekday::Sat => &mut self.sat,
            Weekday::Sun => &mut self.sun,
        }
    }

    /// Iterates all tasks across all seven buckets, Monday first.
    pub fn tasks(&self) -> impl Iterator<Item = &DealerVisitTask> {
        WEEKDAYS.iter().flat_map(|day| self.bucket(*day).iter())
    }

    /// Total number of tasks across all buckets.
    pub fn task_count(&self) -> usize {
        WEEKDAYS.iter().map(|day| self.bucket(*day).len()).sum()
    }

    /// Finds a task by id across all seven buckets.
    pub fn find_task(&self, task_id: &str) -> Option<(Weekday, &DealerVisitTask)> {
        for day in WEEKDAYS {
            if let Some(task) = self.bucket(day).iter().find(|t| t.id == task_id) {
                return Some((day, task));
            }
        }
        None
    }

    /// Finds a task by id across all seven buckets, mutably.
    pub fn find_task_mut(&mut self, task_id: &str) -> Option<(Weekday, &mut DealerVisitTask)> {
        for day in WEEKDAYS {
            if let Some(idx) = self.bucket(day).iter().position(|t| t.id == task_id) {
                return Some((day, &mut self.bucket_mut(day)[idx]));
            }
        }
        None
    }

    /// Recomputes the cached counts from a full scan of all seven buckets.
    ///
    /// ## Contract
    /// Must be called (and the result persisted) after **every** mutation of
    /// any task's status. The counts are never the source of truth - this
    /// scan is.
    pub fn recompute_counts(&self) -> ScheduleCounts {
        let mut total = 0;
        let mut done = 0;
        for task in self.tasks() {
            total += 1;
            if task.status == TaskStatus::Done {
                done += 1;
            }
        }
        ScheduleCounts {
            total,
            done,
            pending: total - done,
        }
    }

    /// Assigns a fresh UUID to every task that arrived without one.
    ///
    /// Called once at schedule creation; ids are stable afterwards.
    pub fn assign_missing_ids(&mut self) {
        for day in WEEKDAYS {
            for task in self.bucket_mut(day).iter_mut() {
                if task.id.is_empty() {
                    task.id = uuid::Uuid::new_v4().to_string();
                }
            }
        }
    }
}

// =============================================================================
// Schedule Counts
// =============================================================================

/// Cached aggregate counts - a materialized view over the plan.
///
/// Invariant: `total == done + pending`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleCounts {
    pub total: i64,
    pub done: i64,
    pub pending: i64,
}

// =============================================================================
// Weekly Schedule Aggregate
// =============================================================================

/// The full weekly plan document for one employee.
///
/// ## Lifecycle
/// Created once per employee per week (manually or via bulk import), mutated
/// by individual status updates, never deleted in-band, superseded by a new
/// aggregate the following week.
///
/// ## Ownership
/// The Scheduler Service exclusively owns mutation of `plan`, `total`,
/// `done` and `pending` as a unit. No other writer may touch these fields
/// independently - that is what protects the count invariant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySchedule {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owning employee code. Not unique alone - `(employee_code,
    /// start_date, end_date)` is the effective key for range lookups.
    pub employee_code: String,

    /// First day of the covered range (inclusive).
    pub start_date: NaiveDate,

    /// Last day of the covered range (inclusive).
    pub end_date: NaiveDate,

    /// The seven day buckets of visit tasks.
    #[serde(rename = "schedule")]
    pub plan: WeekPlan,

    /// Cached task count (see [`ScheduleCounts`]).
    pub total: i64,

    /// Cached count of tasks with status `done`.
    pub done: i64,

    /// Cached count of tasks with status `pending`.
    pub pending: i64,

    /// When the schedule was created.
    pub created_at: DateTime<Utc>,

    /// When the schedule was last updated.
    pub updated_at: DateTime<Utc>,
}

impl WeeklySchedule {
    /// Refreshes the cached counts from a full scan of the plan.
    pub fn apply_counts(&mut self) {
        let counts = self.plan.recompute_counts();
        self.total = counts.total;
        self.done = counts.done;
        self.pending = counts.pending;
    }

    /// Current cached counts as a value.
    pub fn counts(&self) -> ScheduleCounts {
        ScheduleCounts {
            total: self.total,
            done: self.done,
            pending: self.pending,
        }
    }
}

// =============================================================================
// Directory Records
// =============================================================================

/// An employee directory entry (read-only from the scheduler's perspective).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Employee {
    pub code: String,
    pub name: String,
    pub role: String,
}

/// A dealer directory entry (read-only from the scheduler's perspective).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Dealer {
    pub dealer_code: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

// =============================================================================
// Unit Tests
// =============================================================================
