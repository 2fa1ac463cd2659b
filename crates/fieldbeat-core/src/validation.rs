//! # Validation Module
//!
//! Input validation rules for schedule operations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                              │
//! │                                                                     │
//! │  Layer 1: Transport (HTTP handlers, out of scope here)              │
//! │  ├── Type validation (deserialization)                              │
//! │  └── Immediate 400 on malformed JSON                                │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: THIS MODULE - required fields, enum values, ranges        │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 3: Database (SQLite)                                         │
//! │  └── NOT NULL / CHECK constraints                                   │
//! │                                                                     │
//! │  Defense in depth: multiple layers catch different errors           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates an employee code.
///
/// ## Rules
/// - Must not be empty
/// - Maximum 50 characters
pub fn validate_employee_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "employeeCode".to_string(),
        });
    }

    if code.len() > 50 {
        return Err(ValidationError::InvalidFormat {
            field: "employeeCode".to_string(),
            reason: "must be at most 50 characters".to_string(),
        });
    }

    Ok(())
}

/// Validates a dealer code.
pub fn validate_dealer_code(code: &str) -> ValidationResult<()> {
    if code.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "dealerCode".to_string(),
        });
    }

    Ok(())
}

/// Validates an inclusive date range.
///
/// ## Rules
/// - End must not be before start
///
/// Creating overlapping schedules for the same employee is accepted
/// behavior, so no uniqueness check happens here.
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> ValidationResult<()> {
    if end < start {
        return Err(ValidationError::InvertedDateRange);
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_employee_code() {
        assert!(validate_employee_code("TSE-042").is_ok());
        assert!(validate_employee_code("").is_err());
        assert!(validate_employee_code("   ").is_err());
        assert!(validate_employee_code(&"X".repeat(60)).is_err());
    }

    #[test]
    fn test_validate_dealer_code() {
        assert!(validate_dealer_code("DLR001").is_ok());
        assert!(validate_dealer_code(" ").is_err());
    }

    #[test]
    fn test_validate_date_range() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        assert!(validate_date_range(start, end).is_ok());
        // Single-day range is fine.
        assert!(validate_date_range(start, start).is_ok());
        assert!(validate_date_range(end, start).is_err());
    }
}
