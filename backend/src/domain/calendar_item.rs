//! Calendar items as consumed by the scheduling core.
//!
//! Items are created and updated by the surrounding CRUD service. The core only
//! reads them, emits freshly materialized ones, and proposes slot updates.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AnniversaryKey, TimeSlot, UserId};

/// Stable calendar item identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarItemId(Uuid);

impl CalendarItemId {
    /// Wrap an existing UUID.
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for CalendarItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Category of a calendar item; daily budgets are configured per category.
///
/// # Examples
/// ```
/// use scheduling_backend::domain::ItemCategory;
///
/// assert_eq!(ItemCategory::ProjectWork.as_str(), "PROJECT_WORK");
/// assert_eq!("TASK".parse::<ItemCategory>(), Ok(ItemCategory::Task));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemCategory {
    /// One-off task.
    Task,
    /// Repeating routine occurrence.
    Routine,
    /// Calendar event.
    Event,
    /// Work on a project task.
    ProjectWork,
    /// Generated anniversary instance.
    MemorableEvent,
}

impl ItemCategory {
    /// All categories in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Task,
        Self::Routine,
        Self::Event,
        Self::ProjectWork,
        Self::MemorableEvent,
    ];

    /// Upper-case wire name, as used in budget maps and messages.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Task => "TASK",
            Self::Routine => "ROUTINE",
            Self::Event => "EVENT",
            Self::ProjectWork => "PROJECT_WORK",
            Self::MemorableEvent => "MEMORABLE_EVENT",
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown category name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseItemCategoryError {
    /// The unrecognised input value.
    pub input: String,
}

impl fmt::Display for ParseItemCategoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown item category: {}", self.input)
    }
}

impl std::error::Error for ParseItemCategoryError {}

impl FromStr for ItemCategory {
    type Err = ParseItemCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| ParseItemCategoryError {
                input: s.to_owned(),
            })
    }
}

/// Category plus any category-specific payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum ItemKind {
    /// One-off task, optionally split out of a larger task.
    Task {
        /// Parent task this item was scheduled from.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent_task_id: Option<Uuid>,
    },
    /// Routine occurrence.
    Routine,
    /// Plain event.
    Event,
    /// Work session on a project task.
    ProjectWork {
        /// Project task being worked on.
        project_task_id: Uuid,
    },
    /// Instance generated from an anniversary.
    MemorableEvent {
        /// Anniversary that generated this instance.
        anniversary: AnniversaryKey,
    },
}

impl ItemKind {
    /// Category used for budgeting and messages.
    pub const fn category(&self) -> ItemCategory {
        match self {
            Self::Task { .. } => ItemCategory::Task,
            Self::Routine => ItemCategory::Routine,
            Self::Event => ItemCategory::Event,
            Self::ProjectWork { .. } => ItemCategory::ProjectWork,
            Self::MemorableEvent { .. } => ItemCategory::MemorableEvent,
        }
    }
}

/// A user's calendar item.
///
/// An item without a time slot is unscheduled and takes no part in overlap
/// or budget checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarItem {
    /// Item identifier.
    pub id: CalendarItemId,
    /// Owning user.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Category and payload.
    pub kind: ItemKind,
    /// Scheduled slot, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_slot: Option<TimeSlot>,
    /// Display colour, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl CalendarItem {
    /// Category of the item.
    pub const fn category(&self) -> ItemCategory {
        self.kind.category()
    }

    /// Whether the item has a time slot.
    pub const fn is_scheduled(&self) -> bool {
        self.time_slot.is_some()
    }

    /// Anniversary tag carried by generated instances.
    pub const fn anniversary(&self) -> Option<&AnniversaryKey> {
        match &self.kind {
            ItemKind::MemorableEvent { anniversary } => Some(anniversary),
            _ => None,
        }
    }

    /// Whether the item is scheduled to start on `date` as observed in `zone`.
    pub fn starts_on(&self, date: NaiveDate, zone: Tz) -> bool {
        self.time_slot
            .is_some_and(|slot| slot.start_date_in(zone) == date)
    }
}

/// A proposed new slot for an existing item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarItemUpdate {
    /// Item to reschedule.
    pub item_id: CalendarItemId,
    /// Replacement slot.
    pub time_slot: TimeSlot,
}
