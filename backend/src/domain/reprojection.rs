//! Timezone changes that keep every item on the same local wall clock.
//!
//! A 09:00 meeting stays a 09:00 meeting after the user moves from New York
//! to London: its stored instant is read as a wall-clock time in the old
//! zone and resolved again in the new one. Shifting every instant by the
//! offset difference is wrong across DST boundaries and is not used.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::{debug, info};

use super::wall_clock::{local_reading, parse_zone, resolve_local};
use super::{
    CalendarItem, CalendarItemId, CalendarItemUpdate, Error, TimeSlot, TimezoneChanged, UserId,
};
use crate::domain::ports::{CalendarItemRepository, CalendarItemRepositoryError};

/// Errors raised by [`TimezoneReprojector::reproject`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReprojectionError {
    /// An item owned by another user was passed in.
    ForeignItem {
        /// Offending item.
        item_id: CalendarItemId,
    },
}

impl fmt::Display for ReprojectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForeignItem { item_id } => {
                write!(f, "item {item_id} belongs to a different user")
            }
        }
    }
}

impl std::error::Error for ReprojectionError {}

/// Recomputes slots so local wall-clock times survive a zone change.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TimezoneReprojector;

impl TimezoneReprojector {
    /// One update per scheduled item, in input order.
    ///
    /// Unscheduled items are skipped. The whole list is computed before
    /// anything is written, so callers can apply it in one transaction.
    pub fn reproject(
        &self,
        user_id: &UserId,
        items: &[CalendarItem],
        old_zone: Tz,
        new_zone: Tz,
    ) -> Result<Vec<CalendarItemUpdate>, ReprojectionError> {
        let mut updates = Vec::with_capacity(items.len());
        for item in items {
            if &item.user_id != user_id {
                return Err(ReprojectionError::ForeignItem { item_id: item.id });
            }
            let Some(slot) = item.time_slot else {
                continue;
            };
            updates.push(CalendarItemUpdate {
                item_id: item.id,
                time_slot: reproject_slot(slot, old_zone, new_zone),
            });
        }
        Ok(updates)
    }
}

fn reproject_instant(instant: DateTime<Utc>, old_zone: Tz, new_zone: Tz) -> DateTime<Utc> {
    resolve_local(new_zone, local_reading(old_zone, instant))
}

fn reproject_slot(slot: TimeSlot, old_zone: Tz, new_zone: Tz) -> TimeSlot {
    let start = reproject_instant(slot.start(), old_zone, new_zone);
    let end = reproject_instant(slot.end(), old_zone, new_zone);
    // A slot inside a repeated hour can read backwards on the wall clock;
    // keep its length instead.
    TimeSlot::new(start, end).unwrap_or_else(|_| {
        let fallback_end = start + slot.duration();
        TimeSlot::new(start, fallback_end).unwrap_or(slot)
    })
}

/// Result of a timezone conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReprojectionSummary {
    /// Items loaded for the user.
    pub items_scanned: usize,
    /// Items whose slot was rewritten.
    pub items_updated: usize,
}

/// Applies a [`TimezoneChanged`] event to a user's calendar.
#[derive(Clone)]
pub struct TimezoneConversionService<R> {
    repository: Arc<R>,
    reprojector: TimezoneReprojector,
}

impl<R> TimezoneConversionService<R> {
    /// Create a service reading and writing through `repository`.
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            reprojector: TimezoneReprojector,
        }
    }
}

impl<R> TimezoneConversionService<R>
where
    R: CalendarItemRepository,
{
    fn map_repository_error(error: CalendarItemRepositoryError) -> Error {
        match error {
            CalendarItemRepositoryError::Connection { message } => Error::service_unavailable(
                format!("calendar item repository unavailable: {message}"),
            ),
            CalendarItemRepositoryError::Query { message } => {
                Error::internal(format!("calendar item repository error: {message}"))
            }
        }
    }

    /// Reproject every item of the user and write all updates at once.
    ///
    /// A user with no items, or an event naming the same zone twice, is a
    /// successful no-op.
    pub async fn convert(&self, event: &TimezoneChanged) -> Result<ReprojectionSummary, Error> {
        let old_zone = parse_zone(&event.old_zone)?;
        let new_zone = parse_zone(&event.new_zone)?;
        if old_zone == new_zone {
            debug!(user_id = %event.user_id, zone = %old_zone, "timezone unchanged");
            return Ok(ReprojectionSummary {
                items_scanned: 0,
                items_updated: 0,
            });
        }

        let items = self
            .repository
            .find_all_by_user(&event.user_id)
            .await
            .map_err(Self::map_repository_error)?;
        let updates = self
            .reprojector
            .reproject(&event.user_id, &items, old_zone, new_zone)
            .map_err(|err| Error::internal(err.to_string()))?;
        if !updates.is_empty() {
            self.repository
                .apply_updates(&event.user_id, &updates)
                .await
                .map_err(Self::map_repository_error)?;
        }

        let summary = ReprojectionSummary {
            items_scanned: items.len(),
            items_updated: updates.len(),
        };
        info!(
            user_id = %event.user_id,
            old_zone = %old_zone,
            new_zone = %new_zone,
            scanned = summary.items_scanned,
            updated = summary.items_updated,
            "calendar reprojected to new timezone"
        );
        Ok(summary)
    }
}

#[cfg(test)]
#[path = "reprojection_tests.rs"]
mod tests;
