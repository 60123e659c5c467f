//! Calendar scheduling core.
//!
//! Validates proposed item placements against a user's existing calendar and
//! personal constraints, expands yearly anniversaries into concrete all-day
//! items, and keeps items on the same local wall clock when the user changes
//! timezone.

pub mod config;
pub mod domain;
pub mod engine;
pub mod outbound;
pub mod telemetry;
