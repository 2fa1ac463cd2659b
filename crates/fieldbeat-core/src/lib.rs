//! # fieldbeat-core: Pure Business Logic for fieldbeat
//!
//! This crate is the **heart** of the beat-mapping scheduler. It contains
//! all business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      fieldbeat Architecture                         │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                HTTP handlers (out of scope)                 │   │
//! │  └────────────────────────────┬────────────────────────────────┘   │
//! │                               │                                     │
//! │  ┌────────────────────────────▼────────────────────────────────┐   │
//! │  │                 fieldbeat-scheduler                         │   │
//! │  │   create / import / status updates / proximity gate         │   │
//! │  └────────────────────────────┬────────────────────────────────┘   │
//! │                               │                                     │
//! │  ┌────────────────────────────▼────────────────────────────────┐   │
//! │  │             ★ fieldbeat-core (THIS CRATE) ★                 │   │
//! │  │                                                             │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌────────────┐    │   │
//! │  │   │  types   │ │   geo    │ │   week   │ │ validation │    │   │
//! │  │   │ WeekPlan │ │ haversine│ │ ISO week │ │   rules    │    │   │
//! │  │   │  counts  │ │ 100m gate│ │  ranges  │ │   checks   │    │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └────────────┘    │   │
//! │  │                                                             │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS        │   │
//! │  └────────────────────────────┬────────────────────────────────┘   │
//! │                               │                                     │
//! │  ┌────────────────────────────▼────────────────────────────────┐   │
//! │  │                fieldbeat-db (Database Layer)                │   │
//! │  │          SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (WeeklySchedule, WeekPlan, DealerVisitTask, ...)
//! - [`geo`] - Great-circle distance and the proximity acceptance rule
//! - [`week`] - ISO week range computation (pure - caller supplies the clock)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Counts are a view**: `total/done/pending` are always recomputed from
//!    the full plan, never adjusted incrementally
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod geo;
pub mod types;
pub mod validation;
pub mod week;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use fieldbeat_core::WeeklySchedule` instead of
// `use fieldbeat_core::types::WeeklySchedule`

pub use error::{CoreError, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Role string identifying field employees who own weekly schedules.
///
/// ## Why a constant?
/// The bulk import path only resolves employees carrying this role; any
/// other directory entry with the same display name must not match.
pub const FIELD_REP_ROLE: &str = "TSE";

/// Maximum distance, in meters, between an employee's reported location and
/// a dealer's registered location for a visit to count as completed.
///
/// ## Acceptance rule
/// A visit is rejected only when the computed distance is **strictly
/// greater** than this radius. Exactly 100.00 m is still accepted.
pub const ALLOWED_RADIUS_METERS: f64 = 100.0;
