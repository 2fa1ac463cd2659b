//! # Week Range Helpers
//!
//! Computes the Monday..Sunday range a schedule defaults to when the caller
//! does not supply explicit dates.
//!
//! Pure module: the caller supplies "today" (usually `Utc::now().date_naive()`
//! from the service layer), so the computation stays deterministic and
//! testable.

use chrono::{Datelike, Duration, NaiveDate};

/// Returns the Monday and Sunday (inclusive) of the ISO week containing
/// `today`.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use fieldbeat_core::week::current_week;
///
/// // 2024-01-03 is a Wednesday; its week runs Jan 1 (Mon) .. Jan 7 (Sun).
/// let wed = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
/// let (start, end) = current_week(wed);
/// assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
/// assert_eq!(end, NaiveDate::from_ymd_opt(2024, 1, 7).unwrap());
/// ```
pub fn current_week(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let days_from_monday = today.weekday().num_days_from_monday() as i64;
    let monday = today - Duration::days(days_from_monday);
    let sunday = monday + Duration::days(6);
    (monday, sunday)
}
