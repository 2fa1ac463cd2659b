//! # Scheduler Service
//!
//! Orchestrates schedule creation, retrieval, status transitions,
//! proximity-gated completion, and bulk import over `fieldbeat-core` and
//! `fieldbeat-db`.
//!
//! ## Proximity-Gated Completion
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  confirm_visit(schedule, task, employee lat/lng, target status)     │
//! │                                                                     │
//! │  1. Parse coordinates (string wire form, 400 on garbage)            │
//! │  2. Load schedule, locate task (404 on either miss)                 │
//! │  3. d = haversine(employee, dealer snapshot)                        │
//! │  4. d > 100 m   → VisitOutcome::OutOfRange  (task untouched)        │
//! │     d <= 100 m  → patch status + "N.NN meters" distance, counts     │
//! │                   recomputed, one transactional write               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The out-of-range branch is an Ok value, not an error: the request was
//! well formed and the system answered it. Only malformed input, unknown
//! ids and storage failures travel the error path.

use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use tracing::{info, warn};
use uuid::Uuid;

use fieldbeat_core::geo::{distance_meters, format_distance, parse_coordinate, within_allowed_radius};
use fieldbeat_core::validation::{validate_date_range, validate_employee_code};
use fieldbeat_core::week::current_week;
use fieldbeat_core::{
    TaskPatch, TaskStatus, ValidationError, WeekPlan, WeeklySchedule, FIELD_REP_ROLE,
};
use fieldbeat_db::Database;

use crate::error::{SchedulerError, SchedulerResult};
use crate::import::{build_week_plan, ImportSummary, ScheduleImportRow};

/// Result of a proximity-gated completion attempt.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum VisitOutcome {
    /// The employee was within the allowed radius; the task was updated and
    /// the counts recomputed.
    #[serde(rename_all = "camelCase")]
    Confirmed {
        /// The updated aggregate, as persisted.
        schedule: WeeklySchedule,
        /// The computed distance, formatted as `"N.NN meters"`.
        distance_from_dealer: String,
    },

    /// The employee was strictly beyond the allowed radius; nothing was
    /// written. The distance is returned so the UI can show how far off
    /// the employee is.
    #[serde(rename_all = "camelCase")]
    OutOfRange {
        distance_meters: f64,
        distance_from_dealer: String,
    },
}

/// The business logic layer for weekly beat-mapping schedules.
///
/// Cheap to clone (the underlying pool is reference counted).
#[derive(Debug, Clone)]
pub struct SchedulerService {
    db: Database,
}

impl SchedulerService {
    /// Creates a service over an initialized database.
    pub fn new(db: Database) -> Self {
        SchedulerService { db }
    }

    /// Creates one schedule from a fully formed 7-bucket plan.
    ///
    /// Tasks that arrive without an id get a fresh UUID; the cached counts
    /// are computed from the plan before persisting, so the stored row
    /// satisfies `total == done + pending` from its first write.
    pub async fn create_schedule(
        &self,
        employee_code: &str,
        start: NaiveDate,
        end: NaiveDate,
        mut plan: WeekPlan,
    ) -> SchedulerResult<WeeklySchedule> {
        validate_employee_code(employee_code)?;
        validate_date_range(start, end)?;

        plan.assign_missing_ids();

        let now = Utc::now();
        let mut schedule = WeeklySchedule {
            id: Uuid::new_v4().to_string(),
            employee_code: employee_code.to_string(),
            start_date: start,
            end_date: end,
            plan,
            total: 0,
            done: 0,
            pending: 0,
            created_at: now,
            updated_at: now,
        };
        schedule.apply_counts();

        self.db.schedules().insert(&schedule).await?;

        info!(
            id = %schedule.id,
            employee = %schedule.employee_code,
            total = schedule.total,
            "Created weekly schedule"
        );

        Ok(schedule)
    }

    /// Fetches an employee's schedules for a date window.
    ///
    /// When `range` is `None` the window defaults to the current ISO week
    /// (Monday through Sunday containing today). An empty result is an
    /// empty `Vec`, not an error - the transport layer decides whether a
    /// blank week is a 404 or an empty page.
    pub async fn get_schedules(
        &self,
        employee_code: &str,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> SchedulerResult<Vec<WeeklySchedule>> {
        validate_employee_code(employee_code)?;

        let (start, end) = match range {
            Some((start, end)) => {
                validate_date_range(start, end)?;
                (start, end)
            }
            None => current_week(Utc::now().date_naive()),
        };

        let schedules = self
            .db
            .schedules()
            .find_by_employee_and_range(employee_code, start, end)
            .await?;

        Ok(schedules)
    }

    /// Fetches one schedule by id.
    ///
    /// ## Errors
    /// * [`SchedulerError::ScheduleNotFound`] - id does not resolve
    pub async fn get_schedule(&self, schedule_id: &str) -> SchedulerResult<WeeklySchedule> {
        self.db
            .schedules()
            .get_by_id(schedule_id)
            .await?
            .ok_or_else(|| SchedulerError::ScheduleNotFound(schedule_id.to_string()))
    }

    /// Flips one task's status without any proximity check.
    ///
    /// Both directions are allowed (`pending ⇄ done`); undoing a completion
    /// is a legitimate correction, not a special case. Counts are recomputed
    /// from the full plan and written with the status in one transaction.
    pub async fn set_task_status(
        &self,
        schedule_id: &str,
        task_id: &str,
        status: &str,
    ) -> SchedulerResult<WeeklySchedule> {
        let status = TaskStatus::parse(status)?;

        // Resolve both ids up front so the 404s are distinguishable.
        let schedule = self.get_schedule(schedule_id).await?;
        if schedule.plan.find_task(task_id).is_none() {
            return Err(SchedulerError::TaskNotFound {
                schedule_id: schedule_id.to_string(),
                task_id: task_id.to_string(),
            });
        }

        let patch = TaskPatch {
            status: Some(status),
            distance: None,
        };
        let updated = self
            .db
            .schedules()
            .update_task_fields(schedule_id, task_id, &patch)
            .await?;

        info!(schedule_id, task_id, %status, "Updated visit task status");

        Ok(updated)
    }

    /// Proximity-gated completion: updates a task's status only if the
    /// employee's reported location is within the allowed radius of the
    /// dealer coordinates snapshotted on the task.
    ///
    /// Coordinates arrive as strings (the wire form); parsing failures are
    /// validation errors. An out-of-range employee gets
    /// [`VisitOutcome::OutOfRange`] and no write happens.
    pub async fn confirm_visit(
        &self,
        schedule_id: &str,
        task_id: &str,
        employee_lat: &str,
        employee_lng: &str,
        target_status: &str,
    ) -> SchedulerResult<VisitOutcome> {
        if schedule_id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "scheduleId".to_string(),
            }
            .into());
        }
        if task_id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "taskId".to_string(),
            }
            .into());
        }
        let lat = parse_coordinate("latitude", employee_lat)?;
        let lng = parse_coordinate("longitude", employee_lng)?;
        let status = TaskStatus::parse(target_status)?;

        let schedule = self.get_schedule(schedule_id).await?;
        let (_, task) = schedule.plan.find_task(task_id).ok_or_else(|| {
            SchedulerError::TaskNotFound {
                schedule_id: schedule_id.to_string(),
                task_id: task_id.to_string(),
            }
        })?;

        let distance = distance_meters(lat, lng, task.latitude, task.longitude);

        if !within_allowed_radius(distance) {
            info!(
                schedule_id,
                task_id,
                distance = %format_distance(distance),
                "Visit rejected: employee outside allowed radius"
            );
            return Ok(VisitOutcome::OutOfRange {
                distance_meters: distance,
                distance_from_dealer: format_distance(distance),
            });
        }

        let formatted = format_distance(distance);
        let patch = TaskPatch {
            status: Some(status),
            distance: Some(formatted.clone()),
        };
        let updated = self
            .db
            .schedules()
            .update_task_fields(schedule_id, task_id, &patch)
            .await?;

        info!(
            schedule_id,
            task_id,
            %status,
            distance = %formatted,
            "Visit confirmed within allowed radius"
        );

        Ok(VisitOutcome::Confirmed {
            schedule: updated,
            distance_from_dealer: formatted,
        })
    }

    /// Bulk import: one schedule per spreadsheet row.
    ///
    /// ## Reconciliation
    /// * Employee name with no directory match for the field role → the row
    ///   is skipped (logged and reported), the import continues.
    /// * Dealer code with no directory entry → dropped from its day bucket
    ///   (logged and reported), the schedule is still created.
    ///
    /// ## Atomicity
    /// Rows are resolved one by one but inserted as a single batch: a
    /// storage failure rolls the whole import back, so a partial import can
    /// only arise from the documented skip rules, never from a crash.
    pub async fn import_rows(
        &self,
        rows: &[ScheduleImportRow],
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> SchedulerResult<ImportSummary> {
        let (start, end) = match range {
            Some((start, end)) => {
                validate_date_range(start, end)?;
                (start, end)
            }
            None => current_week(Utc::now().date_naive()),
        };

        let directory = self.db.directory();
        let mut summary = ImportSummary::default();
        let mut batch: Vec<WeeklySchedule> = Vec::new();

        for row in rows {
            let name = row.employee_name.trim();
            if name.is_empty() {
                warn!("Import row with empty employee name, skipping");
                summary.skipped_employees.push(String::new());
                continue;
            }

            let employee = match directory
                .find_employee_by_name_and_role(name, FIELD_REP_ROLE)
                .await?
            {
                Some(employee) => employee,
                None => {
                    warn!(name, role = FIELD_REP_ROLE, "No directory match, skipping row");
                    summary.skipped_employees.push(name.to_string());
                    continue;
                }
            };

            let codes = row.all_dealer_codes();
            let dealers = directory.find_dealers_by_codes(&codes).await?;
            let dealer_index: HashMap<String, _> = dealers
                .into_iter()
                .map(|d| (d.dealer_code.clone(), d))
                .collect();

            let (plan, unknown) = build_week_plan(row, &dealer_index);
            for code in unknown {
                if !summary.unknown_dealer_codes.contains(&code) {
                    summary.unknown_dealer_codes.push(code);
                }
            }

            let now = Utc::now();
            let mut schedule = WeeklySchedule {
                id: Uuid::new_v4().to_string(),
                employee_code: employee.code,
                start_date: start,
                end_date: end,
                plan,
                total: 0,
                done: 0,
                pending: 0,
                created_at: now,
                updated_at: now,
            };
            schedule.apply_counts();
            batch.push(schedule);
        }

        summary.created = self.db.schedules().insert_many(&batch).await?;

        info!(
            created = summary.created,
            skipped = summary.skipped_employees.len(),
            unknown_dealers = summary.unknown_dealer_codes.len(),
            "Bulk import finished"
        );

        Ok(summary)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use fieldbeat_core::DealerVisitTask;
    use fieldbeat_db::DbConfig;

    const DEALER_LAT: f64 = 28.6139;
    const DEALER_LNG: f64 = 77.2090;
    // ~500 m due north of the dealer (0.0044966° of latitude).
    const FAR_LAT: f64 = 28.618_396_6;

    async fn seeded_service() -> SchedulerService {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        sqlx::query("INSERT INTO employees (code, name, role) VALUES (?1, ?2, ?3)")
            .bind("TSE-01")
            .bind("Ravi Kumar")
            .bind(FIELD_REP_ROLE)
            .execute(db.pool())
            .await
            .unwrap();

        for (code, name, lat, lng) in [
            ("DLR001", "Sharma Electricals", DEALER_LAT, DEALER_LNG),
            ("DLR002", "Gupta Traders", 28.7041, 77.1025),
        ] {
            sqlx::query(
                "INSERT INTO dealers (dealer_code, name, latitude, longitude) \
                 VALUES (?1, ?2, ?3, ?4)",
            )
            .bind(code)
            .bind(name)
            .bind(lat)
            .bind(lng)
            .execute(db.pool())
            .await
            .unwrap();
        }

        SchedulerService::new(db)
    }

    fn pending_task(id: &str) -> DealerVisitTask {
        DealerVisitTask {
            id: id.to_string(),
            dealer_code: "DLR001".to_string(),
            dealer_name: "Sharma Electricals".to_string(),
            latitude: DEALER_LAT,
            longitude: DEALER_LNG,
            status: TaskStatus::Pending,
            distance: None,
        }
    }

    fn week() -> (NaiveDate, NaiveDate) {
        (
            "2024-01-01".parse().unwrap(),
            "2024-01-07".parse().unwrap(),
        )
    }

    async fn one_task_schedule(service: &SchedulerService) -> WeeklySchedule {
        let mut plan = WeekPlan::default();
        plan.mon.push(pending_task("t1"));
        let (start, end) = week();
        service
            .create_schedule("TSE-01", start, end, plan)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_schedule_computes_counts_and_ids() {
        let service = seeded_service().await;

        let mut plan = WeekPlan::default();
        let mut no_id = pending_task("");
        no_id.id = String::new();
        plan.mon.push(no_id);
        plan.wed.push(pending_task("keep"));

        let (start, end) = week();
        let schedule = service
            .create_schedule("TSE-01", start, end, plan)
            .await
            .unwrap();

        assert_eq!(schedule.total, 2);
        assert_eq!(schedule.pending, 2);
        assert_eq!(schedule.done, 0);
        assert!(!schedule.plan.mon[0].id.is_empty());
        assert_eq!(schedule.plan.wed[0].id, "keep");

        let loaded = service.get_schedule(&schedule.id).await.unwrap();
        assert_eq!(loaded.counts(), schedule.counts());
    }

    #[tokio::test]
    async fn test_create_schedule_rejects_inverted_range() {
        let service = seeded_service().await;
        let err = service
            .create_schedule(
                "TSE-01",
                "2024-01-07".parse().unwrap(),
                "2024-01-01".parse().unwrap(),
                WeekPlan::default(),
            )
            .await;
        assert!(matches!(err, Err(SchedulerError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_schedules_filters_by_explicit_range() {
        let service = seeded_service().await;
        let created = one_task_schedule(&service).await;

        let found = service
            .get_schedules("TSE-01", Some(week()))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, created.id);

        // A disjoint window finds nothing, and that is not an error.
        let found = service
            .get_schedules(
                "TSE-01",
                Some((
                    "2024-02-05".parse().unwrap(),
                    "2024-02-11".parse().unwrap(),
                )),
            )
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_confirm_visit_at_dealer_location() {
        let service = seeded_service().await;
        let schedule = one_task_schedule(&service).await;

        let outcome = service
            .confirm_visit(&schedule.id, "t1", "28.6139", "77.2090", "done")
            .await
            .unwrap();

        match outcome {
            VisitOutcome::Confirmed {
                schedule: updated,
                distance_from_dealer,
            } => {
                assert_eq!(distance_from_dealer, "0.00 meters");
                assert_eq!(updated.plan.mon[0].status, TaskStatus::Done);
                assert_eq!(
                    updated.plan.mon[0].distance.as_deref(),
                    Some("0.00 meters")
                );
                assert_eq!(updated.total, 1);
                assert_eq!(updated.done, 1);
                assert_eq!(updated.pending, 0);
            }
            VisitOutcome::OutOfRange { .. } => panic!("expected confirmation"),
        }
    }

    #[tokio::test]
    async fn test_confirm_visit_rejects_beyond_radius() {
        let service = seeded_service().await;
        let schedule = one_task_schedule(&service).await;

        let outcome = service
            .confirm_visit(
                &schedule.id,
                "t1",
                &FAR_LAT.to_string(),
                &DEALER_LNG.to_string(),
                "done",
            )
            .await
            .unwrap();

        match outcome {
            VisitOutcome::OutOfRange {
                distance_meters: d,
                distance_from_dealer,
            } => {
                assert!((495.0..505.0).contains(&d), "got {d}");
                assert!(distance_from_dealer.ends_with(" meters"));
            }
            VisitOutcome::Confirmed { .. } => panic!("expected rejection"),
        }

        // A rejection must leave the stored schedule untouched.
        let loaded = service.get_schedule(&schedule.id).await.unwrap();
        assert_eq!(loaded.plan.mon[0].status, TaskStatus::Pending);
        assert!(loaded.plan.mon[0].distance.is_none());
        assert_eq!(loaded.pending, 1);
        assert_eq!(loaded.done, 0);
    }

    #[tokio::test]
    async fn test_confirm_visit_rejects_bad_coordinates() {
        let service = seeded_service().await;
        let schedule = one_task_schedule(&service).await;

        let err = service
            .confirm_visit(&schedule.id, "t1", "north-ish", "77.2090", "done")
            .await;
        assert!(matches!(err, Err(SchedulerError::Validation(_))));

        let err = service
            .confirm_visit(&schedule.id, "t1", "", "77.2090", "done")
            .await;
        assert!(matches!(err, Err(SchedulerError::Validation(_))));
    }

    #[tokio::test]
    async fn test_status_flip_is_reversible() {
        let service = seeded_service().await;
        let schedule = one_task_schedule(&service).await;

        let updated = service
            .set_task_status(&schedule.id, "t1", "done")
            .await
            .unwrap();
        assert_eq!(updated.done, 1);
        assert_eq!(updated.pending, 0);

        // Undo the completion.
        let updated = service
            .set_task_status(&schedule.id, "t1", "pending")
            .await
            .unwrap();
        assert_eq!(updated.done, 0);
        assert_eq!(updated.pending, 1);
        assert_eq!(updated.total, 1);
    }

    #[tokio::test]
    async fn test_status_update_rejects_unknown_value() {
        let service = seeded_service().await;
        let schedule = one_task_schedule(&service).await;

        let err = service
            .set_task_status(&schedule.id, "t1", "cancelled")
            .await;
        assert!(matches!(err, Err(SchedulerError::Validation(_))));
    }

    #[tokio::test]
    async fn test_not_found_variants_are_distinguishable() {
        let service = seeded_service().await;
        let schedule = one_task_schedule(&service).await;

        let err = service.set_task_status("missing", "t1", "done").await;
        assert!(matches!(err, Err(SchedulerError::ScheduleNotFound(_))));

        let err = service
            .set_task_status(&schedule.id, "missing", "done")
            .await;
        assert!(matches!(err, Err(SchedulerError::TaskNotFound { .. })));
    }

    #[tokio::test]
    async fn test_import_skips_unresolvable_employee() {
        let service = seeded_service().await;

        let rows = vec![
            ScheduleImportRow {
                employee_name: "Ravi Kumar".to_string(),
                mon: "DLR001".to_string(),
                fri: "DLR002".to_string(),
                ..Default::default()
            },
            ScheduleImportRow {
                employee_name: "Nobody Here".to_string(),
                mon: "DLR001".to_string(),
                ..Default::default()
            },
        ];

        let summary = service.import_rows(&rows, Some(week())).await.unwrap();

        assert_eq!(summary.created, 1);
        assert_eq!(summary.skipped_employees, vec!["Nobody Here".to_string()]);
        assert!(summary.unknown_dealer_codes.is_empty());

        let schedules = service
            .get_schedules("TSE-01", Some(week()))
            .await
            .unwrap();
        assert_eq!(schedules.len(), 1);
        assert_eq!(schedules[0].total, 2);
        assert_eq!(schedules[0].pending, 2);
        assert_eq!(schedules[0].plan.mon[0].dealer_name, "Sharma Electricals");
    }

    #[tokio::test]
    async fn test_import_drops_unknown_dealer_but_creates_schedule() {
        let service = seeded_service().await;

        let rows = vec![ScheduleImportRow {
            employee_name: "Ravi Kumar".to_string(),
            tue: "DLR001 GHOST".to_string(),
            ..Default::default()
        }];

        let summary = service.import_rows(&rows, Some(week())).await.unwrap();

        assert_eq!(summary.created, 1);
        assert_eq!(summary.unknown_dealer_codes, vec!["GHOST".to_string()]);

        let schedules = service
            .get_schedules("TSE-01", Some(week()))
            .await
            .unwrap();
        assert_eq!(schedules[0].total, 1);
        assert_eq!(schedules[0].plan.tue.len(), 1);
        assert_eq!(schedules[0].plan.tue[0].dealer_code, "DLR001");
    }

    #[tokio::test]
    async fn test_imported_tasks_are_completable_via_proximity() {
        let service = seeded_service().await;

        let rows = vec![ScheduleImportRow {
            employee_name: "Ravi Kumar".to_string(),
            sat: "DLR001".to_string(),
            ..Default::default()
        }];
        service.import_rows(&rows, Some(week())).await.unwrap();

        let schedules = service
            .get_schedules("TSE-01", Some(week()))
            .await
            .unwrap();
        let schedule = &schedules[0];
        let task_id = schedule.plan.sat[0].id.clone();

        let outcome = service
            .confirm_visit(&schedule.id, &task_id, "28.6139", "77.2090", "done")
            .await
            .unwrap();
        assert!(matches!(outcome, VisitOutcome::Confirmed { .. }));

        let loaded = service.get_schedule(&schedule.id).await.unwrap();
        assert_eq!(loaded.done, 1);
        assert_eq!(loaded.pending, 0);
    }
}
