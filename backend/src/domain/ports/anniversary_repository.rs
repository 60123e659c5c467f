//! Port for anniversaries and the calendar items generated from them.

use async_trait::async_trait;

use crate::domain::{MaterializationBatch, MemorableEventAnniversary, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by anniversary repository adapters.
    pub enum AnniversaryRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "anniversary repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "anniversary repository query failed: {message}",
    }
}

/// Storage for anniversaries and their materialized items.
///
/// # Batch semantics
///
/// [`AnniversaryRepository::apply`] receives one [`MaterializationBatch`] and
/// must, in a single transaction:
///
/// 1. delete every anniversary listed in `removed`, together with every item
///    tagged with its key;
/// 2. for each materialization, delete the items previously tagged with the
///    same key, upsert the anniversary, and insert the new items.
///
/// Stale instances must never survive a successful call, and a failed call
/// must leave storage untouched.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnniversaryRepository: Send + Sync {
    /// Anniversaries stored for the user, including the birthday.
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<MemorableEventAnniversary>, AnniversaryRepositoryError>;

    /// Apply a batch atomically.
    async fn apply(&self, batch: &MaterializationBatch) -> Result<(), AnniversaryRepositoryError>;
}

/// Fixture repository with no stored anniversaries.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAnniversaryRepository;

#[async_trait]
impl AnniversaryRepository for FixtureAnniversaryRepository {
    async fn list_for_user(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<MemorableEventAnniversary>, AnniversaryRepositoryError> {
        Ok(Vec::new())
    }

    async fn apply(&self, _batch: &MaterializationBatch) -> Result<(), AnniversaryRepositoryError> {
        Ok(())
    }
}
