//! Yearly anniversaries (birthdays and user-defined memorable events).

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::UserId;

/// Leap year used to validate day/month pairs, so Feb 29 is accepted.
const REFERENCE_LEAP_YEAR: i32 = 2000;

/// Validation errors raised by [`MemorableEventAnniversary::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnniversaryValidationError {
    /// The title was blank.
    EmptyTitle,
    /// The month was outside `1..=12`.
    MonthOutOfRange {
        /// Rejected month.
        month: u32,
    },
    /// The day does not exist in the given month of any year.
    DayOutOfRange {
        /// Rejected day.
        day: u32,
        /// Month it was paired with.
        month: u32,
    },
}

impl fmt::Display for AnniversaryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "anniversary title must not be empty"),
            Self::MonthOutOfRange { month } => {
                write!(f, "anniversary month must be between 1 and 12 (got {month})")
            }
            Self::DayOutOfRange { day, month } => {
                write!(f, "day {day} does not exist in month {month}")
            }
        }
    }
}

impl std::error::Error for AnniversaryValidationError {}

/// Identity of an anniversary: one per user and title.
///
/// Generated calendar items carry this key so they can be removed together
/// when the anniversary is edited or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnniversaryKey {
    /// Owning user.
    pub user_id: UserId,
    /// Anniversary title.
    pub title: String,
}

/// A user's yearly recurring date.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use scheduling_backend::domain::{MemorableEventAnniversary, UserId};
///
/// let leap = MemorableEventAnniversary::new(UserId::random(), "Leap day", 29, 2)
///     .expect("Feb 29 is a valid anniversary");
/// assert_eq!(leap.date_in(2025), NaiveDate::from_ymd_opt(2025, 2, 28));
/// assert_eq!(leap.date_in(2028), NaiveDate::from_ymd_opt(2028, 2, 29));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemorableEventAnniversary {
    user_id: UserId,
    title: String,
    day: u32,
    month: u32,
}

impl MemorableEventAnniversary {
    /// Validate and build an anniversary. The title is trimmed.
    pub fn new(
        user_id: UserId,
        title: impl Into<String>,
        day: u32,
        month: u32,
    ) -> Result<Self, AnniversaryValidationError> {
        let title = title.into().trim().to_owned();
        if title.is_empty() {
            return Err(AnniversaryValidationError::EmptyTitle);
        }
        if !(1..=12).contains(&month) {
            return Err(AnniversaryValidationError::MonthOutOfRange { month });
        }
        if NaiveDate::from_ymd_opt(REFERENCE_LEAP_YEAR, month, day).is_none() {
            return Err(AnniversaryValidationError::DayOutOfRange { day, month });
        }
        Ok(Self {
            user_id,
            title,
            day,
            month,
        })
    }

    /// Owning user.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Title shown on generated items.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Day of month, `1..=31`.
    pub const fn day(&self) -> u32 {
        self.day
    }

    /// Month, `1..=12`.
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// Key identifying this anniversary and its generated items.
    pub fn key(&self) -> AnniversaryKey {
        AnniversaryKey {
            user_id: self.user_id.clone(),
            title: self.title.clone(),
        }
    }

    /// The anniversary's date in `year`.
    ///
    /// A day that does not exist that year (Feb 29 outside leap years) is
    /// clamped to the last day of the month. `None` only when `year` is
    /// outside chrono's representable range.
    pub fn date_in(&self, year: i32) -> Option<NaiveDate> {
        (28..=self.day)
            .rev()
            .find_map(|day| NaiveDate::from_ymd_opt(year, self.month, day))
    }
}

/// Raw user input for a memorable event, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemorableEventDraft {
    /// Requested title.
    pub title: String,
    /// Requested day of month.
    pub day: u32,
    /// Requested month.
    pub month: u32,
}
