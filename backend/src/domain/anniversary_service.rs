//! Birthday and memorable event maintenance.
//!
//! Every operation loads what it needs, builds a single
//! [`MaterializationBatch`], and hands it to the repository in one call, so a
//! failure never leaves half-regenerated anniversaries behind.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{AnniversaryRepository, AnniversaryRepositoryError};
use crate::domain::wall_clock::parse_zone;
use crate::domain::{
    AnniversaryValidationError, BirthdayChanged, Error, MaterializationBatch,
    MaterializationError, MemorableEventAnniversary, MemorableEventDraft, RecurringMaterializer,
    UserId,
};

/// Knobs for anniversary expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnniversaryPolicy {
    /// Years of instances generated per anniversary.
    pub horizon_years: u32,
    /// Title reserved for the birthday anniversary.
    pub birthday_title: String,
}

/// Outcome of a write, reported back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnniversarySyncSummary {
    /// Anniversaries created or regenerated.
    pub events_created: usize,
    /// Anniversaries deleted together with their items.
    pub events_removed: usize,
    /// Calendar items generated.
    pub calendar_items_generated: usize,
}

impl AnniversarySyncSummary {
    fn of(batch: &MaterializationBatch) -> Self {
        Self {
            events_created: batch.materializations.len(),
            events_removed: batch.removed.len(),
            calendar_items_generated: batch.item_count(),
        }
    }
}

/// Service maintaining a user's anniversaries and their generated items.
#[derive(Clone)]
pub struct AnniversaryService<R> {
    repository: Arc<R>,
    materializer: RecurringMaterializer,
    policy: AnniversaryPolicy,
}

impl<R> AnniversaryService<R> {
    /// Create a service writing through `repository`.
    pub fn new(
        repository: Arc<R>,
        materializer: RecurringMaterializer,
        policy: AnniversaryPolicy,
    ) -> Self {
        Self {
            repository,
            materializer,
            policy,
        }
    }
}

impl<R> AnniversaryService<R>
where
    R: AnniversaryRepository,
{
    fn map_repository_error(error: AnniversaryRepositoryError) -> Error {
        match error {
            AnniversaryRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("anniversary repository unavailable: {message}"))
            }
            AnniversaryRepositoryError::Query { message } => {
                Error::internal(format!("anniversary repository error: {message}"))
            }
        }
    }

    fn map_validation_error(title: &str, error: &AnniversaryValidationError) -> Error {
        Error::invalid_request(error.to_string()).with_details(json!({
            "field": "events",
            "title": title,
        }))
    }

    fn map_materialization_error(error: &MaterializationError) -> Error {
        Error::internal(error.to_string())
    }

    fn is_birthday(&self, title: &str) -> bool {
        title.trim().eq_ignore_ascii_case(self.policy.birthday_title.trim())
    }

    /// Replace the user's birthday anniversary and regenerate its items.
    pub async fn sync_birthday(
        &self,
        event: &BirthdayChanged,
    ) -> Result<AnniversarySyncSummary, Error> {
        let zone = parse_zone(&event.zone)?;
        let birthday = MemorableEventAnniversary::new(
            event.user_id.clone(),
            self.policy.birthday_title.clone(),
            event.day,
            event.month,
        )
        .map_err(|err| Self::map_validation_error(&self.policy.birthday_title, &err))?;

        let mut batch = MaterializationBatch::new(event.user_id.clone());
        batch.materializations.push(
            self.materializer
                .materialize(&birthday, self.policy.horizon_years, zone)
                .map_err(|err| Self::map_materialization_error(&err))?,
        );
        self.repository
            .apply(&batch)
            .await
            .map_err(Self::map_repository_error)?;

        let summary = AnniversarySyncSummary::of(&batch);
        info!(
            user_id = %event.user_id,
            day = event.day,
            month = event.month,
            items = summary.calendar_items_generated,
            "birthday regenerated"
        );
        Ok(summary)
    }

    fn validate_drafts(
        &self,
        user_id: &UserId,
        drafts: &[MemorableEventDraft],
    ) -> Result<Vec<MemorableEventAnniversary>, Error> {
        let mut seen = HashSet::new();
        drafts
            .iter()
            .map(|draft| {
                if self.is_birthday(&draft.title) {
                    return Err(Error::invalid_request(format!(
                        "{:?} is reserved for the birthday",
                        self.policy.birthday_title
                    ))
                    .with_details(json!({ "field": "events", "title": draft.title })));
                }
                let anniversary = MemorableEventAnniversary::new(
                    user_id.clone(),
                    draft.title.as_str(),
                    draft.day,
                    draft.month,
                )
                .map_err(|err| Self::map_validation_error(&draft.title, &err))?;
                if !seen.insert(anniversary.title().to_lowercase()) {
                    return Err(Error::invalid_request(format!(
                        "duplicate memorable event title {:?}",
                        anniversary.title()
                    ))
                    .with_details(json!({ "field": "events", "title": draft.title })));
                }
                Ok(anniversary)
            })
            .collect()
    }

    /// Replace the user's memorable events with `drafts`.
    ///
    /// Previous events missing from `drafts` are removed with their items;
    /// every listed event is regenerated. The birthday is left untouched.
    pub async fn replace_memorable_events(
        &self,
        user_id: &UserId,
        drafts: &[MemorableEventDraft],
        zone: &str,
    ) -> Result<AnniversarySyncSummary, Error> {
        let zone = parse_zone(zone)?;
        let anniversaries = self.validate_drafts(user_id, drafts)?;
        let existing = self
            .repository
            .list_for_user(user_id)
            .await
            .map_err(Self::map_repository_error)?;

        let kept: HashSet<_> = anniversaries.iter().map(|a| a.key()).collect();
        let mut batch = MaterializationBatch::new(user_id.clone());
        batch.removed = existing
            .iter()
            .filter(|anniversary| !self.is_birthday(anniversary.title()))
            .map(MemorableEventAnniversary::key)
            .filter(|key| !kept.contains(key))
            .collect();
        for anniversary in &anniversaries {
            batch.materializations.push(
                self.materializer
                    .materialize(anniversary, self.policy.horizon_years, zone)
                    .map_err(|err| Self::map_materialization_error(&err))?,
            );
        }
        self.repository
            .apply(&batch)
            .await
            .map_err(Self::map_repository_error)?;

        let summary = AnniversarySyncSummary::of(&batch);
        info!(
            user_id = %user_id,
            created = summary.events_created,
            removed = summary.events_removed,
            items = summary.calendar_items_generated,
            "memorable events replaced"
        );
        Ok(summary)
    }

    /// The user's anniversaries, birthday included, in calendar order.
    pub async fn list_memorable_events(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<MemorableEventAnniversary>, Error> {
        let mut anniversaries = self
            .repository
            .list_for_user(user_id)
            .await
            .map_err(Self::map_repository_error)?;
        anniversaries.sort_by(|left, right| {
            (left.month(), left.day(), left.title()).cmp(&(
                right.month(),
                right.day(),
                right.title(),
            ))
        });
        Ok(anniversaries)
    }
}

#[cfg(test)]
#[path = "anniversary_service_tests.rs"]
mod tests;
