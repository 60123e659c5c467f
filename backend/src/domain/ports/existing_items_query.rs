//! Port for reading a user's already-scheduled calendar items.
//!
//! Unlike the constraint provider, failures here are never degraded: skipping
//! the overlap check would approve slots that collide with real items.

use async_trait::async_trait;
use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::domain::{CalendarItem, TimeSlot, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by existing-items query adapters.
    pub enum ExistingItemsQueryError {
        /// The item store could not be reached.
        Connection { message: String } =>
            "existing items query connection failed: {message}",
        /// The lookup failed during execution.
        Query { message: String } =>
            "existing items query failed: {message}",
    }
}

/// Window-bounded reads over a user's calendar items.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExistingItemsQuery: Send + Sync {
    /// Items whose slot overlaps `slot`.
    ///
    /// Adapters may over-fetch; callers re-check with
    /// [`TimeSlot::overlaps`](crate::domain::TimeSlot::overlaps).
    async fn overlapping(
        &self,
        user_id: &UserId,
        slot: &TimeSlot,
    ) -> Result<Vec<CalendarItem>, ExistingItemsQueryError>;

    /// Items starting on `date` as observed in `zone`.
    async fn on_date(
        &self,
        user_id: &UserId,
        date: NaiveDate,
        zone: Tz,
    ) -> Result<Vec<CalendarItem>, ExistingItemsQueryError>;
}

/// Fixture query over an empty calendar.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureExistingItemsQuery;

#[async_trait]
impl ExistingItemsQuery for FixtureExistingItemsQuery {
    async fn overlapping(
        &self,
        _user_id: &UserId,
        _slot: &TimeSlot,
    ) -> Result<Vec<CalendarItem>, ExistingItemsQueryError> {
        Ok(Vec::new())
    }

    async fn on_date(
        &self,
        _user_id: &UserId,
        _date: NaiveDate,
        _zone: Tz,
    ) -> Result<Vec<CalendarItem>, ExistingItemsQueryError> {
        Ok(Vec::new())
    }
}
