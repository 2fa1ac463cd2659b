//! # Bulk Import Types
//!
//! Row types and plan construction for the spreadsheet bulk import.
//!
//! The upload surface (file handling, CSV mechanics) lives outside this
//! workspace; by the time rows reach the scheduler they are already parsed
//! into [`ScheduleImportRow`] values: one employee display name plus a raw
//! cell of whitespace-separated dealer codes per weekday.
//!
//! ## Reconciliation Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Row-level:  employee name not in directory (with role TSE)         │
//! │              → skip the ROW, log, keep going (not fatal)            │
//! │                                                                     │
//! │  Code-level: dealer code not in directory                           │
//! │              → drop the CODE from its day bucket, schedule is       │
//! │                still created from the remaining valid tasks         │
//! │                                                                     │
//! │  Both are reported back in ImportSummary so the caller can show     │
//! │  warnings instead of silently losing data.                          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use fieldbeat_core::{Dealer, DealerVisitTask, TaskStatus, WeekPlan, WEEKDAYS};

/// One parsed spreadsheet row: an employee and their per-day dealer codes.
///
/// Each day cell is the raw spreadsheet text - dealer codes separated by
/// whitespace, possibly empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleImportRow {
    /// Employee display name (the "TSE Name" spreadsheet column).
    #[serde(rename = "tseName")]
    pub employee_name: String,

    #[serde(rename = "Mon", default)]
    pub mon: String,
    #[serde(rename = "Tue", default)]
    pub tue: String,
    #[serde(rename = "Wed", default)]
    pub wed: String,
    #[serde(rename = "Thu", default)]
    pub thu: String,
    #[serde(rename = "Fri", default)]
    pub fri: String,
    #[serde(rename = "Sat", default)]
    pub sat: String,
    #[serde(rename = "Sun", default)]
    pub sun: String,
}

impl ScheduleImportRow {
    /// Raw cell text for a weekday.
    pub fn day_cell(&self, day: chrono::Weekday) -> &str {
        match day {
            chrono::Weekday::Mon => &self.mon,
            chrono::Weekday::Tue => &self.tue,
            chrono::Weekday::Wed => &self.wed,
            chrono::Weekday::Thu => &self.thu,
            chrono::Weekday::Fri => &self.fri,
            chrono::Weekday::Sat => &self.sat,
            chrono::Weekday::Sun => &self.sun,
        }
    }

    /// Every dealer code referenced by this row, in plan order, with
    /// duplicates removed (a dealer visited on two days is one lookup).
    pub fn all_dealer_codes(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for day in WEEKDAYS {
            for code in self.day_cell(day).split_whitespace() {
                if !seen.iter().any(|c: &String| c == code) {
                    seen.push(code.to_string());
                }
            }
        }
        seen
    }
}

/// Outcome of a bulk import.
///
/// `skipped_employees` and `unknown_dealer_codes` exist so the upload UI
/// can warn about stale spreadsheet data; the accept/drop behavior itself
/// is unchanged (rows without a directory match are skipped, unknown codes
/// are dropped from their bucket).
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    /// Number of schedules created.
    pub created: usize,

    /// Employee names with no directory match for the scheduling role.
    pub skipped_employees: Vec<String>,

    /// Dealer codes referenced by the sheet but absent from the directory.
    pub unknown_dealer_codes: Vec<String>,
}

/// Builds the 7-bucket plan for one row from resolved dealer records.
///
/// Every constructed task starts as `pending` with a fresh task id.
/// Codes missing from `dealer_index` are dropped and returned so the
/// caller can report them.
pub fn build_week_plan(
    row: &ScheduleImportRow,
    dealer_index: &HashMap<String, Dealer>,
) -> (WeekPlan, Vec<String>) {
    let mut plan = WeekPlan::default();
    let mut unknown = Vec::new();

    for day in WEEKDAYS {
        for code in row.day_cell(day).split_whitespace() {
            match dealer_index.get(code) {
                Some(dealer) => {
                    plan.bucket_mut(day).push(DealerVisitTask {
                        id: Uuid::new_v4().to_string(),
                        dealer_code: dealer.dealer_code.clone(),
                        dealer_name: dealer.name.clone(),
                        latitude: dealer.latitude,
                        longitude: dealer.longitude,
                        status: TaskStatus::Pending,
                        distance: None,
                    });
                }
                None => {
                    warn!(code, day = %day, "Dealer code not in directory, dropping from bucket");
                    if !unknown.iter().any(|c: &String| c == code) {
                        unknown.push(code.to_string());
                    }
                }
            }
        }
    }

    (plan, unknown)
}

// =============================================================================
// Unit Tests
// =============================================================================
