//! # Geodistance Calculator
//!
//! Great-circle distance between two coordinate pairs, plus the proximity
//! acceptance rule used to gate visit completion.
//!
//! ## Proximity Gate
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                   Proximity-Gated Completion                        │
//! │                                                                     │
//! │  Employee reports location (lat, lng)                               │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  distance_meters(employee, dealer snapshot) ← haversine             │
//! │       │                                                             │
//! │       ├── distance > 100.0  → REJECT (soft): status untouched,      │
//! │       │                       distance returned for "too far" UI    │
//! │       │                                                             │
//! │       └── distance <= 100.0 → ACCEPT: status updated, distance      │
//! │                               persisted as "N.NN meters"            │
//! │                                                                     │
//! │  Note the strict `>`: exactly 100.00 m is still accepted.           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Precision
//! Haversine on a mean-radius sphere is accurate to well under a meter at
//! the tens-to-hundreds-of-meters range this gate operates on, which is
//! far tighter than GPS fix error anyway.

use crate::error::ValidationError;
use crate::ALLOWED_RADIUS_METERS;

/// Mean Earth radius in meters (IUGG value).
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Computes the great-circle distance in meters between two points.
///
/// Pure function, no I/O. Inputs are decimal degrees.
///
/// ## Example
/// ```rust
/// use fieldbeat_core::geo::distance_meters;
///
/// // Same point -> zero
/// assert_eq!(distance_meters(28.61, 77.21, 28.61, 77.21), 0.0);
/// ```
pub fn distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Applies the acceptance rule: reject only when strictly beyond the radius.
///
/// `within_allowed_radius(100.0)` is `true`; `100.01` is `false`.
pub fn within_allowed_radius(distance: f64) -> bool {
    !(distance > ALLOWED_RADIUS_METERS)
}

/// Formats a distance the way it is persisted on the task and shown to the
/// employee: two decimals, meters suffix.
pub fn format_distance(distance: f64) -> String {
    format!("{distance:.2} meters")
}

/// Parses a coordinate that may arrive as a string from the transport layer.
///
/// ## Errors
/// - Non-numeric input → [`ValidationError::InvalidFormat`]
/// - Latitude outside ±90 or longitude outside ±180 →
///   [`ValidationError::OutOfRange`]
pub fn parse_coordinate(field: &str, raw: &str) -> Result<f64, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let value: f64 = raw.parse().map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a decimal number".to_string(),
    })?;

    let bound = if field.contains("lat") { 90.0 } else { 180.0 };
    if !value.is_finite() || value.abs() > bound {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: -bound,
            max: bound,
        });
    }

    Ok(value)
}

// =============================================================================
// Unit Tests
// =============================================================================
