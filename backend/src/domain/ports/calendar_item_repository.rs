//! Port for bulk reads and atomic bulk updates of calendar items.

use async_trait::async_trait;

use crate::domain::{CalendarItem, CalendarItemUpdate, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by calendar item repository adapters.
    pub enum CalendarItemRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "calendar item repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "calendar item repository query failed: {message}",
    }
}

/// Storage for a user's calendar items.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CalendarItemRepository: Send + Sync {
    /// Every item owned by the user, scheduled or not.
    async fn find_all_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<CalendarItem>, CalendarItemRepositoryError>;

    /// Replace the slots of the listed items.
    ///
    /// Implementations must apply the whole list or nothing; a partial
    /// application would leave items on two different wall clocks.
    async fn apply_updates(
        &self,
        user_id: &UserId,
        updates: &[CalendarItemUpdate],
    ) -> Result<(), CalendarItemRepositoryError>;
}

/// Fixture repository holding no items and discarding updates.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCalendarItemRepository;

#[async_trait]
impl CalendarItemRepository for FixtureCalendarItemRepository {
    async fn find_all_by_user(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<CalendarItem>, CalendarItemRepositoryError> {
        Ok(Vec::new())
    }

    async fn apply_updates(
        &self,
        _user_id: &UserId,
        _updates: &[CalendarItemUpdate],
    ) -> Result<(), CalendarItemRepositoryError> {
        Ok(())
    }
}
