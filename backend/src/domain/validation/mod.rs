//! Scheduling constraint validation.
//!
//! [`ConstraintValidationService`] runs the overlap, sleep-hour and daily
//! budget rules in that order and collects every violation instead of
//! stopping at the first. The overlap rule is hard: it runs in every full
//! validation and a failing items query fails the call. The other two rules
//! are soft: they are skipped when the user's preferences cannot be loaded.

mod daily_budget;
mod overlap;
mod sleep_hours;
mod violation;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{debug, warn};

pub use self::daily_budget::DailyBudgetValidator;
pub use self::overlap::OverlapValidator;
pub use self::sleep_hours::SleepHourValidator;
pub use self::violation::{OverlapConflict, Violation};

use crate::domain::ports::{
    ConstraintProvider, ConstraintProviderError, ExistingItemsQuery, ExistingItemsQueryError,
};
use crate::domain::{
    CalendarItemId, ConstraintSnapshot, Error, ItemCategory, TimeSlot, TimeSlotValidationError,
    UserId,
};

/// Which rules a validation call runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Overlap, sleep hours, then daily budget. Used when committing a slot.
    Full,
    /// Sleep hours and daily budget only. Used for live feedback while the
    /// user is still editing.
    PreferencesOnly,
}

/// A proposed placement to validate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRequest {
    /// User whose calendar is being edited.
    pub user_id: UserId,
    /// Proposed slot.
    pub slot: TimeSlot,
    /// Category of the item being placed.
    pub category: ItemCategory,
    /// Zone used for times of day, calendar dates, and message times.
    pub zone: Tz,
    /// Item being rescheduled, ignored when counting conflicts and usage.
    pub exclude_item_id: Option<CalendarItemId>,
}

impl ValidationRequest {
    /// Build a request from raw instants.
    ///
    /// A slot ending before it starts is a malformed request and is rejected
    /// rather than validated.
    pub fn new(
        user_id: UserId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        category: ItemCategory,
        zone: Tz,
    ) -> Result<Self, Error> {
        let slot = TimeSlot::new(start, end).map_err(|err| map_slot_error(&err))?;
        Ok(Self {
            user_id,
            slot,
            category,
            zone,
            exclude_item_id: None,
        })
    }

    /// Ignore `item_id` while validating, for rescheduling an existing item.
    pub fn excluding(mut self, item_id: CalendarItemId) -> Self {
        self.exclude_item_id = Some(item_id);
        self
    }
}

fn map_slot_error(err: &TimeSlotValidationError) -> Error {
    match err {
        TimeSlotValidationError::EndsBeforeStart { start, end } => {
            Error::invalid_request(err.to_string()).with_details(serde_json::json!({
                "field": "timeSlot",
                "startTime": start,
                "endTime": end,
            }))
        }
    }
}

/// Orchestrates the three scheduling rules over the collaborator ports.
#[derive(Clone)]
pub struct ConstraintValidationService<C, Q> {
    constraints: Arc<C>,
    items: Arc<Q>,
    overlap: OverlapValidator,
    sleep_hours: SleepHourValidator,
    daily_budget: DailyBudgetValidator,
}

impl<C, Q> ConstraintValidationService<C, Q> {
    /// Create a service over the given collaborators.
    pub fn new(constraints: Arc<C>, items: Arc<Q>) -> Self {
        Self {
            constraints,
            items,
            overlap: OverlapValidator::default(),
            sleep_hours: SleepHourValidator,
            daily_budget: DailyBudgetValidator,
        }
    }

    /// Name at most `limit` conflicts in overlap violations.
    pub fn with_overlap_listing_limit(mut self, limit: usize) -> Self {
        self.overlap = OverlapValidator::new(limit);
        self
    }
}

impl<C, Q> ConstraintValidationService<C, Q>
where
    C: ConstraintProvider,
    Q: ExistingItemsQuery,
{
    fn map_items_error(error: ExistingItemsQueryError) -> Error {
        match error {
            ExistingItemsQueryError::Connection { message } => {
                Error::service_unavailable(format!("calendar items unavailable: {message}"))
            }
            ExistingItemsQueryError::Query { message } => {
                Error::internal(format!("calendar items query failed: {message}"))
            }
        }
    }

    /// Load the user's preferences, degrading to `None` on any failure.
    async fn load_snapshot(&self, user_id: &UserId) -> Option<ConstraintSnapshot> {
        match self.constraints.fetch(user_id).await {
            Ok(Some(snapshot)) => Some(snapshot),
            Ok(None) => {
                warn!(
                    user_id = %user_id,
                    "no scheduling constraints recorded; skipping sleep and budget checks"
                );
                None
            }
            Err(err) => {
                let reason = match &err {
                    ConstraintProviderError::Connection { .. } => "unreachable",
                    ConstraintProviderError::Query { .. } => "query_failed",
                };
                warn!(
                    user_id = %user_id,
                    reason,
                    error = %err,
                    "constraint provider failed; skipping sleep and budget checks"
                );
                None
            }
        }
    }

    async fn check_overlap(&self, request: &ValidationRequest) -> Result<Option<Violation>, Error> {
        let existing = self
            .items
            .overlapping(&request.user_id, &request.slot)
            .await
            .map_err(Self::map_items_error)?;
        Ok(self.overlap.check(
            &request.slot,
            &existing,
            request.exclude_item_id,
            request.zone,
        ))
    }

    async fn check_daily_budget(
        &self,
        request: &ValidationRequest,
        snapshot: &ConstraintSnapshot,
    ) -> Result<Option<Violation>, Error> {
        let Some(budget) = snapshot.daily_budget_for(request.category) else {
            debug!(
                user_id = %request.user_id,
                category = %request.category,
                "no daily budget applies"
            );
            return Ok(None);
        };
        let date = request.slot.start_date_in(request.zone);
        let same_day = self
            .items
            .on_date(&request.user_id, date, request.zone)
            .await
            .map_err(Self::map_items_error)?;
        Ok(self.daily_budget.check(
            &request.slot,
            request.category,
            budget,
            &same_day,
            request.exclude_item_id,
            request.zone,
        ))
    }

    /// Validate a proposed slot.
    ///
    /// Returns every violation found, in rule order; an empty list means the
    /// slot is acceptable. Fails only when existing items cannot be read.
    pub async fn validate(
        &self,
        request: &ValidationRequest,
        mode: ValidationMode,
    ) -> Result<Vec<Violation>, Error> {
        let mut violations = Vec::new();

        if mode == ValidationMode::Full {
            violations.extend(self.check_overlap(request).await?);
        }

        if let Some(snapshot) = self.load_snapshot(&request.user_id).await {
            violations.extend(self.sleep_hours.check(
                &request.slot,
                snapshot.sleep_hours(),
                request.zone,
            ));
            violations.extend(self.check_daily_budget(request, &snapshot).await?);
        }

        debug!(
            user_id = %request.user_id,
            category = %request.category,
            ?mode,
            violations = violations.len(),
            "validated time slot"
        );
        Ok(violations)
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
