//! # Schedule Repository
//!
//! Persistence for WeeklySchedule aggregates.
//!
//! ## Storage Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                 weekly_schedules (one row per aggregate)            │
//! │                                                                     │
//! │  id | employee_code | start_date | end_date | plan (JSON) | counts  │
//! │                                       │                             │
//! │                                       ▼                             │
//! │  { "Mon": [ {id, dealerCode, dealerName, lat, lng, status}, ... ],  │
//! │    "Tue": [...], ... "Sun": [...] }                                 │
//! │                                                                     │
//! │  Tasks have no independent table - they live and die with their     │
//! │  parent aggregate.                                                  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Two Write Paths, One Invariant
//! - [`ScheduleRepository::update`] replaces the whole aggregate.
//! - [`ScheduleRepository::update_task_fields`] patches a single task
//!   inside the JSON document, then recomputes the counts from the full
//!   plan and writes plan + counts in the same transaction.
//!
//! Either way a reader can never observe an updated status with stale
//! counts: the row is written in a single UPDATE.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;

use crate::error::{DbError, DbResult};
use fieldbeat_core::{TaskPatch, WeekPlan, WeeklySchedule};

/// Raw row shape for `weekly_schedules`.
///
/// The `plan` column holds the JSON-serialized [`WeekPlan`]; conversion to
/// the domain aggregate happens in `TryFrom`.
#[derive(Debug, sqlx::FromRow)]
struct ScheduleRow {
    id: String,
    employee_code: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    plan: String,
    total: i64,
    done: i64,
    pending: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ScheduleRow> for WeeklySchedule {
    type Error = DbError;

    fn try_from(row: ScheduleRow) -> DbResult<Self> {
        let plan: WeekPlan = serde_json::from_str(&row.plan)?;
        Ok(WeeklySchedule {
            id: row.id,
            employee_code: row.employee_code,
            start_date: row.start_date,
            end_date: row.end_date,
            plan,
            total: row.total,
            done: row.done,
            pending: row.pending,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const SELECT_COLUMNS: &str = "id, employee_code, start_date, end_date, plan, \
     total, done, pending, created_at, updated_at";

/// Repository for WeeklySchedule database operations.
#[derive(Debug, Clone)]
pub struct ScheduleRepository {
    pool: SqlitePool,
}

impl ScheduleRepository {
    /// Creates a new ScheduleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ScheduleRepository { pool }
    }

    /// Inserts a single schedule aggregate.
    pub async fn insert(&self, schedule: &WeeklySchedule) -> DbResult<()> {
        debug!(id = %schedule.id, employee = %schedule.employee_code, "Inserting schedule");

        let mut tx = self.pool.begin().await?;
        insert_in_tx(&mut tx, schedule).await?;
        tx.commit().await?;

        Ok(())
    }

    /// Inserts a batch of schedules in one transaction.
    ///
    /// ## All-Or-Nothing
    /// The bulk import path resolves rows one by one and inserts the whole
    /// batch at the end. If any insert fails the transaction rolls back, so
    /// a storage failure can never leave a partial import behind.
    ///
    /// ## Returns
    /// Number of schedules inserted.
    pub async fn insert_many(&self, schedules: &[WeeklySchedule]) -> DbResult<usize> {
        debug!(count = schedules.len(), "Inserting schedule batch");

        let mut tx = self.pool.begin().await?;
        for schedule in schedules {
            insert_in_tx(&mut tx, schedule).await?;
        }
        tx.commit().await?;

        Ok(schedules.len())
    }

    /// Gets a schedule by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(WeeklySchedule))` - Schedule found
    /// * `Ok(None)` - Schedule not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<WeeklySchedule>> {
        let row: Option<ScheduleRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM weekly_schedules WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(WeeklySchedule::try_from).transpose()
    }

    /// Finds schedules for an employee whose range falls inside the
    /// requested window.
    ///
    /// Matches rows with `start_date >= start` AND `end_date <= end`,
    /// ordered by start date.
    pub async fn find_by_employee_and_range(
        &self,
        employee_code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<Vec<WeeklySchedule>> {
        debug!(employee = %employee_code, %start, %end, "Range lookup");

        let rows: Vec<ScheduleRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM weekly_schedules \
             WHERE employee_code = ?1 AND start_date >= ?2 AND end_date <= ?3 \
             ORDER BY start_date"
        ))
        .bind(employee_code)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(WeeklySchedule::try_from).collect()
    }

    /// Replaces a whole aggregate: plan, counts, and `updated_at` go out in
    /// a single UPDATE statement.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - Schedule doesn't exist
    pub async fn update(&self, schedule: &WeeklySchedule) -> DbResult<()> {
        debug!(id = %schedule.id, "Updating schedule");

        let plan_json = serde_json::to_string(&schedule.plan)?;
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE weekly_schedules SET \
                 employee_code = ?2, start_date = ?3, end_date = ?4, \
                 plan = ?5, total = ?6, done = ?7, pending = ?8, \
                 updated_at = ?9 \
             WHERE id = ?1",
        )
        .bind(&schedule.id)
        .bind(&schedule.employee_code)
        .bind(schedule.start_date)
        .bind(schedule.end_date)
        .bind(plan_json)
        .bind(schedule.total)
        .bind(schedule.done)
        .bind(schedule.pending)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Schedule", &schedule.id));
        }

        Ok(())
    }

    /// Patches fields of one task inside the aggregate, identified by
    /// `(schedule_id, task_id)` across all seven day buckets.
    ///
    /// ## What This Does
    /// 1. Loads the row inside a transaction
    /// 2. Applies the patch to the matching task
    /// 3. Recomputes counts from the FULL plan (never incrementally)
    /// 4. Writes plan + counts + `updated_at` back in one UPDATE
    ///
    /// ## Errors
    /// * `DbError::NotFound("Schedule", ..)` - schedule id doesn't resolve
    /// * `DbError::NotFound("VisitTask", ..)` - task id not in any bucket
    ///
    /// ## Returns
    /// The updated aggregate.
    pub async fn update_task_fields(
        &self,
        schedule_id: &str,
        task_id: &str,
        patch: &TaskPatch,
    ) -> DbResult<WeeklySchedule> {
        debug!(schedule_id, task_id, "Patching visit task");

        let mut tx = self.pool.begin().await?;

        let row: Option<ScheduleRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM weekly_schedules WHERE id = ?1"
        ))
        .bind(schedule_id)
        .fetch_optional(&mut *tx)
        .await?;

        let mut schedule: WeeklySchedule = row
            .ok_or_else(|| DbError::not_found("Schedule", schedule_id))?
            .try_into()?;

        {
            let (_, task) = schedule
                .plan
                .find_task_mut(task_id)
                .ok_or_else(|| DbError::not_found("VisitTask", task_id))?;

            if let Some(status) = patch.status {
                task.status = status;
            }
            if let Some(distance) = &patch.distance {
                task.distance = Some(distance.clone());
            }
        }

        schedule.apply_counts();
        schedule.updated_at = Utc::now();

        let plan_json = serde_json::to_string(&schedule.plan)?;
        sqlx::query(
            "UPDATE weekly_schedules SET \
                 plan = ?2, total = ?3, done = ?4, pending = ?5, updated_at = ?6 \
             WHERE id = ?1",
        )
        .bind(schedule_id)
        .bind(plan_json)
        .bind(schedule.total)
        .bind(schedule.done)
        .bind(schedule.pending)
        .bind(schedule.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(schedule)
    }

    /// Counts stored schedules (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM weekly_schedules")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Shared INSERT used by both the single and the batch path.
async fn insert_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    schedule: &WeeklySchedule,
) -> DbResult<()> {
    let plan_json = serde_json::to_string(&schedule.plan)?;

    sqlx::query(
        "INSERT INTO weekly_schedules ( \
             id, employee_code, start_date, end_date, plan, \
             total, done, pending, created_at, updated_at \
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    )
    .bind(&schedule.id)
    .bind(&schedule.employee_code)
    .bind(schedule.start_date)
    .bind(schedule.end_date)
    .bind(plan_json)
    .bind(schedule.total)
    .bind(schedule.done)
    .bind(schedule.pending)
    .bind(schedule.created_at)
    .bind(schedule.updated_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use fieldbeat_core::{DealerVisitTask, TaskStatus};
    use uuid::Uuid;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn task(id: &str, status: TaskStatus) -> DealerVisitTask {
        DealerVisitTask {
            id: id.to_string(),
            dealer_code: "DLR001".to_string(),
            dealer_name: "Sharma Electricals".to_string(),
            latitude: 28.6139,
            longitude: 77.2090,
            status,
            distance: None,
        }
    }

    fn schedule(employee: &str, start: &str, end: &str, plan: WeekPlan) -> WeeklySchedule {
        let now = Utc::now();
        let mut s = WeeklySchedule {
            id: Uuid::new_v4().to_string(),
            employee_code: employee.to_string(),
            start_date: start.parse().unwrap(),
            end_date: end.parse().unwrap(),
            plan,
            total: 0,
            done: 0,
            pending: 0,
            created_at: now,
            updated_at: now,
        };
        s.apply_counts();
        s
    }

    #[tokio::test]
    async fn test_insert_and_get_roundtrip() {
        let db = test_db().await;
        let repo = db.schedules();

        let mut plan = WeekPlan::default();
        plan.mon.push(task("t1", TaskStatus::Pending));
        let s = schedule("TSE-01", "2024-01-01", "2024-01-07", plan);

        repo.insert(&s).await.unwrap();

        let loaded = repo.get_by_id(&s.id).await.unwrap().unwrap();
        assert_eq!(loaded.employee_code, "TSE-01");
        assert_eq!(loaded.plan.mon.len(), 1);
        assert_eq!(loaded.plan.mon[0].dealer_name, "Sharma Electricals");
        assert_eq!(loaded.counts(), s.counts());
    }

    #[tokio::test]
    async fn test_get_by_id_missing_returns_none() {
        let db = test_db().await;
        assert!(db.schedules().get_by_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_range_lookup_filters_by_employee_and_dates() {
        let db = test_db().await;
        let repo = db.schedules();

        let week1 = schedule("TSE-01", "2024-01-01", "2024-01-07", WeekPlan::default());
        let week2 = schedule("TSE-01", "2024-01-08", "2024-01-14", WeekPlan::default());
        let other = schedule("TSE-02", "2024-01-01", "2024-01-07", WeekPlan::default());
        repo.insert(&week1).await.unwrap();
        repo.insert(&week2).await.unwrap();
        repo.insert(&other).await.unwrap();

        let found = repo
            .find_by_employee_and_range(
                "TSE-01",
                "2024-01-01".parse().unwrap(),
                "2024-01-07".parse().unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, week1.id);

        // Wider window catches both weeks.
        let found = repo
            .find_by_employee_and_range(
                "TSE-01",
                "2024-01-01".parse().unwrap(),
                "2024-01-31".parse().unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn test_insert_many_is_all_or_nothing() {
        let db = test_db().await;
        let repo = db.schedules();

        let a = schedule("TSE-01", "2024-01-01", "2024-01-07", WeekPlan::default());
        let mut b = schedule("TSE-02", "2024-01-01", "2024-01-07", WeekPlan::default());
        b.id = a.id.clone(); // duplicate primary key forces a failure

        let err = repo.insert_many(&[a, b]).await;
        assert!(err.is_err());

        // The first row must have been rolled back with the batch.
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_insert_many_returns_count() {
        let db = test_db().await;
        let repo = db.schedules();

        let batch = vec![
            schedule("TSE-01", "2024-01-01", "2024-01-07", WeekPlan::default()),
            schedule("TSE-02", "2024-01-01", "2024-01-07", WeekPlan::default()),
        ];
        let created = repo.insert_many(&batch).await.unwrap();
        assert_eq!(created, 2);
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_update_task_fields_patches_status_and_counts() {
        let db = test_db().await;
        let repo = db.schedules();

        let mut plan = WeekPlan::default();
        plan.tue.push(task("t1", TaskStatus::Pending));
        plan.fri.push(task("t2", TaskStatus::Pending));
        let s = schedule("TSE-01", "2024-01-01", "2024-01-07", plan);
        repo.insert(&s).await.unwrap();

        let patch = TaskPatch {
            status: Some(TaskStatus::Done),
            distance: Some("42.00 meters".to_string()),
        };
        let updated = repo.update_task_fields(&s.id, "t2", &patch).await.unwrap();

        assert_eq!(updated.plan.fri[0].status, TaskStatus::Done);
        assert_eq!(updated.plan.fri[0].distance.as_deref(), Some("42.00 meters"));
        assert_eq!(updated.total, 2);
        assert_eq!(updated.done, 1);
        assert_eq!(updated.pending, 1);

        // The persisted row agrees with the returned aggregate.
        let loaded = repo.get_by_id(&s.id).await.unwrap().unwrap();
        assert_eq!(loaded.done, 1);
        assert_eq!(loaded.plan.fri[0].status, TaskStatus::Done);
    }

    #[tokio::test]
    async fn test_update_task_fields_not_found_cases() {
        let db = test_db().await;
        let repo = db.schedules();

        let mut plan = WeekPlan::default();
        plan.mon.push(task("t1", TaskStatus::Pending));
        let s = schedule("TSE-01", "2024-01-01", "2024-01-07", plan);
        repo.insert(&s).await.unwrap();

        let patch = TaskPatch {
            status: Some(TaskStatus::Done),
            distance: None,
        };

        let err = repo.update_task_fields("missing", "t1", &patch).await;
        assert!(matches!(err, Err(DbError::NotFound { .. })));

        let err = repo.update_task_fields(&s.id, "missing", &patch).await;
        assert!(matches!(err, Err(DbError::NotFound { .. })));

        // Failed lookups must not have mutated anything.
        let loaded = repo.get_by_id(&s.id).await.unwrap().unwrap();
        assert_eq!(loaded.pending, 1);
    }

    #[tokio::test]
    async fn test_whole_update_persists_counts_with_plan() {
        let db = test_db().await;
        let repo = db.schedules();

        let mut plan = WeekPlan::default();
        plan.wed.push(task("t1", TaskStatus::Pending));
        let mut s = schedule("TSE-01", "2024-01-01", "2024-01-07", plan);
        repo.insert(&s).await.unwrap();

        s.plan.wed[0].status = TaskStatus::Done;
        s.apply_counts();
        repo.update(&s).await.unwrap();

        let loaded = repo.get_by_id(&s.id).await.unwrap().unwrap();
        assert_eq!(loaded.done, 1);
        assert_eq!(loaded.total, loaded.done + loaded.pending);
    }
}
