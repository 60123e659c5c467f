//! Expansion of anniversaries into dated all-day calendar items.
//!
//! Each anniversary yields exactly one item per year of the horizon, starting
//! with the current year in the user's zone. Items are tagged with the
//! anniversary key, and every [`MaterializationBatch`] replaces the previously
//! generated items for the keys it touches, so no stale instance survives an
//! edit.

use std::fmt;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate, NaiveTime, TimeDelta};
use chrono_tz::Tz;
use mockable::Clock;

use super::wall_clock::resolve_local;
use super::{
    AnniversaryKey, CalendarItem, CalendarItemId, ItemKind, MemorableEventAnniversary, TimeSlot,
    UserId,
};

/// Errors raised while materializing an anniversary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaterializationError {
    /// A year of the horizon cannot be represented.
    YearOutOfRange {
        /// Offending year.
        year: i64,
    },
}

impl fmt::Display for MaterializationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::YearOutOfRange { year } => {
                write!(f, "cannot materialize anniversaries in year {year}")
            }
        }
    }
}

impl std::error::Error for MaterializationError {}

/// An anniversary together with the items generated for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Materialization {
    /// Source anniversary.
    pub anniversary: MemorableEventAnniversary,
    /// One all-day item per year, in year order.
    pub items: Vec<CalendarItem>,
}

/// One atomic change to a user's anniversaries.
///
/// Adapters delete `removed` keys and their items, then replace the items of
/// every materialized key, all in one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializationBatch {
    /// User whose anniversaries change.
    pub user_id: UserId,
    /// Anniversaries to delete along with their items.
    pub removed: Vec<AnniversaryKey>,
    /// Anniversaries to upsert, each replacing its previous items.
    pub materializations: Vec<Materialization>,
}

impl MaterializationBatch {
    /// An empty batch for `user_id`.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            removed: Vec::new(),
            materializations: Vec::new(),
        }
    }

    /// Number of items the batch writes.
    pub fn item_count(&self) -> usize {
        self.materializations
            .iter()
            .map(|materialization| materialization.items.len())
            .sum()
    }
}

/// Generates anniversary instances over a multi-year horizon.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use chrono_tz::Tz;
/// use mockable::DefaultClock;
/// use scheduling_backend::domain::{MemorableEventAnniversary, RecurringMaterializer, UserId};
///
/// let materializer = RecurringMaterializer::new(Arc::new(DefaultClock));
/// let anniversary = MemorableEventAnniversary::new(UserId::random(), "Wedding", 14, 6)
///     .expect("valid anniversary");
/// let materialization = materializer
///     .materialize(&anniversary, 5, Tz::UTC)
///     .expect("years in range");
/// assert_eq!(materialization.items.len(), 5);
/// ```
#[derive(Clone)]
pub struct RecurringMaterializer {
    clock: Arc<dyn Clock>,
    color: Option<String>,
}

impl RecurringMaterializer {
    /// Create a materializer reading the current year from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock, color: None }
    }

    /// Stamp generated items with a display colour.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Produce one all-day item per year for `horizon_years` years.
    ///
    /// Dates that do not exist in a given year are clamped to the end of the
    /// month. Each item spans local midnight to the next local midnight in
    /// `zone`. A zero horizon yields no items.
    pub fn materialize(
        &self,
        anniversary: &MemorableEventAnniversary,
        horizon_years: u32,
        zone: Tz,
    ) -> Result<Materialization, MaterializationError> {
        let current_year = self.clock.utc().with_timezone(&zone).year();
        let key = anniversary.key();
        let items = (0..horizon_years)
            .map(|offset| {
                let year = i64::from(current_year) + i64::from(offset);
                let date = i32::try_from(year)
                    .ok()
                    .and_then(|year| anniversary.date_in(year))
                    .ok_or(MaterializationError::YearOutOfRange { year })?;
                let time_slot =
                    all_day(date, zone).ok_or(MaterializationError::YearOutOfRange { year })?;
                Ok(CalendarItem {
                    id: CalendarItemId::random(),
                    user_id: anniversary.user_id().clone(),
                    name: anniversary.title().to_owned(),
                    kind: ItemKind::MemorableEvent {
                        anniversary: key.clone(),
                    },
                    time_slot: Some(time_slot),
                    color: self.color.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Materialization {
            anniversary: anniversary.clone(),
            items,
        })
    }
}

/// Local midnight of `date` to local midnight of the following day.
fn all_day(date: NaiveDate, zone: Tz) -> Option<TimeSlot> {
    let next = date.checked_add_signed(TimeDelta::days(1))?;
    let start = resolve_local(zone, date.and_time(NaiveTime::MIN));
    let end = resolve_local(zone, next.and_time(NaiveTime::MIN));
    TimeSlot::new(start, end).ok()
}
