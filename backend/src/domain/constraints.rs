//! Per-user scheduling preferences: sleep hours and daily budgets.
//!
//! A snapshot is fetched once per validation call and never mutated. Absence
//! is expressed at two levels: no snapshot at all (`Option<ConstraintSnapshot>`
//! from the provider) and, inside a snapshot, no budget for a category
//! ([`ConstraintSnapshot::daily_budget_for`] returning `None`).

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ItemCategory, ParseItemCategoryError, TimeRange, TimeRangeValidationError};

const MINUTES_PER_HOUR: i64 = 60;

/// A positive daily allowance for one category, in whole hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyBudget {
    hours: u32,
}

impl DailyBudget {
    /// Configured allowance in hours.
    pub const fn hours(&self) -> u32 {
        self.hours
    }

    /// Configured allowance in minutes.
    pub fn limit_minutes(&self) -> i64 {
        i64::from(self.hours) * MINUTES_PER_HOUR
    }
}

/// Immutable bundle of a user's scheduling preferences.
///
/// # Examples
/// ```
/// use std::collections::HashMap;
/// use scheduling_backend::domain::{ConstraintSnapshot, ItemCategory, TimeRange};
///
/// let sleep = TimeRange::parse("23:00", "07:00").expect("valid range");
/// let budgets = HashMap::from([(ItemCategory::Task, 4), (ItemCategory::Event, 0)]);
/// let snapshot = ConstraintSnapshot::new(vec![sleep], true, budgets);
///
/// assert_eq!(snapshot.daily_budget_for(ItemCategory::Task).map(|b| b.hours()), Some(4));
/// assert!(snapshot.daily_budget_for(ItemCategory::Event).is_none());
/// assert!(snapshot.daily_budget_for(ItemCategory::Routine).is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintSnapshot {
    sleep_hours: Vec<TimeRange>,
    daily_budget_enabled: bool,
    daily_budgets: HashMap<ItemCategory, u32>,
}

impl ConstraintSnapshot {
    /// Build a snapshot from already-validated parts.
    pub fn new(
        sleep_hours: Vec<TimeRange>,
        daily_budget_enabled: bool,
        daily_budgets: HashMap<ItemCategory, u32>,
    ) -> Self {
        Self {
            sleep_hours,
            daily_budget_enabled,
            daily_budgets,
        }
    }

    /// Build a snapshot from the constraints collaborator's raw payload.
    pub fn from_wire(wire: ConstraintSnapshotWire) -> Result<Self, ConstraintSnapshotError> {
        let sleep_hours = wire
            .sleep_hours
            .iter()
            .map(|range| TimeRange::parse(&range.start_time, &range.end_time))
            .collect::<Result<Vec<_>, _>>()?;
        let daily_budgets = wire
            .daily_limits
            .into_iter()
            .map(|(name, hours)| {
                name.parse::<ItemCategory>()
                    .map(|category| (category, hours))
            })
            .collect::<Result<HashMap<_, _>, _>>()?;
        Ok(Self::new(
            sleep_hours,
            wire.daily_limit_feature_enabled,
            daily_budgets,
        ))
    }

    /// Configured sleep windows.
    pub fn sleep_hours(&self) -> &[TimeRange] {
        &self.sleep_hours
    }

    /// Whether the daily budget feature is switched on.
    pub const fn daily_budget_enabled(&self) -> bool {
        self.daily_budget_enabled
    }

    /// Effective budget for `category`.
    ///
    /// `None` when the feature is off, the category has no entry, or the entry
    /// is zero.
    pub fn daily_budget_for(&self, category: ItemCategory) -> Option<DailyBudget> {
        if !self.daily_budget_enabled {
            return None;
        }
        self.daily_budgets
            .get(&category)
            .copied()
            .filter(|hours| *hours > 0)
            .map(|hours| DailyBudget { hours })
    }
}

/// Raw time range as sent by the constraints collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRangeWire {
    /// `HH:MM` start.
    pub start_time: String,
    /// `HH:MM` end.
    pub end_time: String,
}

/// Raw constraints payload, keyed by category name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintSnapshotWire {
    /// Sleep windows.
    #[serde(default)]
    pub sleep_hours: Vec<TimeRangeWire>,
    /// Daily budget feature switch.
    #[serde(default)]
    pub daily_limit_feature_enabled: bool,
    /// Hours per category name, for example `"TASK": 4`.
    #[serde(default)]
    pub daily_limits: HashMap<String, u32>,
}

/// Errors raised while decoding a [`ConstraintSnapshotWire`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintSnapshotError {
    /// A sleep window boundary was malformed.
    SleepHours(TimeRangeValidationError),
    /// A budget was keyed by an unknown category.
    UnknownCategory {
        /// The unrecognised key.
        name: String,
    },
}

impl fmt::Display for ConstraintSnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SleepHours(err) => write!(f, "invalid sleep hours: {err}"),
            Self::UnknownCategory { name } => {
                write!(f, "daily limit configured for unknown category {name:?}")
            }
        }
    }
}

impl std::error::Error for ConstraintSnapshotError {}

impl From<TimeRangeValidationError> for ConstraintSnapshotError {
    fn from(value: TimeRangeValidationError) -> Self {
        Self::SleepHours(value)
    }
}

impl From<ParseItemCategoryError> for ConstraintSnapshotError {
    fn from(value: ParseItemCategoryError) -> Self {
        Self::UnknownCategory { name: value.input }
    }
}
