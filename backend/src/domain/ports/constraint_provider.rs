//! Port for fetching a user's scheduling preferences.
//!
//! The constraints collaborator usually lives in another service, so adapters
//! are expected to fail with [`ConstraintProviderError::Connection`] when it
//! is unreachable. Callers treat both `Ok(None)` and an error as "no
//! preferences configured" and keep enforcing the hard overlap rule.

use async_trait::async_trait;

use crate::domain::{ConstraintSnapshot, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by constraint provider adapters.
    pub enum ConstraintProviderError {
        /// The constraints collaborator could not be reached.
        Connection { message: String } =>
            "constraint provider connection failed: {message}",
        /// The collaborator answered with something unusable.
        Query { message: String } =>
            "constraint provider query failed: {message}",
    }
}

/// Read access to per-user constraint snapshots.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConstraintProvider: Send + Sync {
    /// Fetch the user's snapshot; `None` when the user has no record.
    async fn fetch(
        &self,
        user_id: &UserId,
    ) -> Result<Option<ConstraintSnapshot>, ConstraintProviderError>;
}

/// Fixture provider reporting that no user has preferences.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureConstraintProvider;

#[async_trait]
impl ConstraintProvider for FixtureConstraintProvider {
    async fn fetch(
        &self,
        _user_id: &UserId,
    ) -> Result<Option<ConstraintSnapshot>, ConstraintProviderError> {
        Ok(None)
    }
}
