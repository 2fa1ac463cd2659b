//! # Directory Repository
//!
//! Read-only lookups against the employee and dealer directories.
//!
//! The directories are maintained by the admin surface outside this
//! workspace; the scheduler only ever reads them:
//!
//! - employee display name + role → employee code (bulk import)
//! - dealer codes → name + registered coordinates (plan construction)

use sqlx::{QueryBuilder, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use fieldbeat_core::{Dealer, Employee};

/// Repository for directory lookups.
#[derive(Debug, Clone)]
pub struct DirectoryRepository {
    pool: SqlitePool,
}

impl DirectoryRepository {
    /// Creates a new DirectoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DirectoryRepository { pool }
    }

    /// Resolves an employee by display name, filtered to a role.
    ///
    /// The role filter matters: the import spreadsheet names people, and
    /// only entries carrying the scheduling role (see
    /// [`fieldbeat_core::FIELD_REP_ROLE`]) may own a weekly schedule.
    ///
    /// ## Returns
    /// * `Ok(Some(Employee))` - match found
    /// * `Ok(None)` - no directory entry with that name and role
    pub async fn find_employee_by_name_and_role(
        &self,
        name: &str,
        role: &str,
    ) -> DbResult<Option<Employee>> {
        debug!(name, role, "Employee directory lookup");

        let employee: Option<Employee> = sqlx::query_as(
            "SELECT code, name, role FROM employees WHERE name = ?1 AND role = ?2",
        )
        .bind(name)
        .bind(role)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    /// Resolves a set of dealer codes in one query.
    ///
    /// Codes with no directory entry are simply absent from the result -
    /// the caller decides what a miss means (the bulk import drops them
    /// from the day bucket and reports them as warnings).
    pub async fn find_dealers_by_codes(&self, codes: &[String]) -> DbResult<Vec<Dealer>> {
        if codes.is_empty() {
            return Ok(Vec::new());
        }

        debug!(count = codes.len(), "Dealer directory lookup");

        let mut query = QueryBuilder::new(
            "SELECT dealer_code, name, latitude, longitude FROM dealers WHERE dealer_code IN (",
        );
        let mut separated = query.separated(", ");
        for code in codes {
            separated.push_bind(code);
        }
        query.push(")");

        let dealers: Vec<Dealer> = query
            .build_query_as()
            .fetch_all(&self.pool)
            .await?;

        Ok(dealers)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use fieldbeat_core::FIELD_REP_ROLE;

    async fn seeded_db() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        sqlx::query("INSERT INTO employees (code, name, role) VALUES (?1, ?2, ?3)")
            .bind("TSE-01")
            .bind("Ravi Kumar")
            .bind(FIELD_REP_ROLE)
            .execute(db.pool())
            .await
            .unwrap();
        sqlx::query("INSERT INTO employees (code, name, role) VALUES (?1, ?2, ?3)")
            .bind("MGR-01")
            .bind("Ravi Kumar")
            .bind("Manager")
            .execute(db.pool())
            .await
            .unwrap();

        for (code, name, lat, lng) in [
            ("DLR001", "Sharma Electricals", 28.6139, 77.2090),
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

        db
    }

    #[tokio::test]
    async fn test_employee_lookup_respects_role_filter() {
        let db = seeded_db().await;
        let repo = db.directory();

        let tse = repo
            .find_employee_by_name_and_role("Ravi Kumar", FIELD_REP_ROLE)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(tse.code, "TSE-01");

        // Same name, wrong role → no match.
        let none = repo
            .find_employee_by_name_and_role("Ravi Kumar", "Accountant")
            .await
            .unwrap();
        assert!(none.is_none());

        let none = repo
            .find_employee_by_name_and_role("Unknown Person", FIELD_REP_ROLE)
            .await
            .unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn test_dealer_bulk_lookup_skips_unknown_codes() {
        let db = seeded_db().await;
        let repo = db.directory();

        let dealers = repo
            .find_dealers_by_codes(&[
                "DLR001".to_string(),
                "GHOST".to_string(),
                "DLR002".to_string(),
            ])
            .await
            .unwrap();

        assert_eq!(dealers.len(), 2);
        assert!(dealers.iter().any(|d| d.dealer_code == "DLR001"));
        assert!(dealers.iter().all(|d| d.dealer_code != "GHOST"));
    }

    #[tokio::test]
    async fn test_dealer_lookup_with_empty_input() {
        let db = seeded_db().await;
        let dealers = db.directory().find_dealers_by_codes(&[]).await.unwrap();
        assert!(dealers.is_empty());
    }
}
