//! Absolute time slots.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Validation errors raised by [`TimeSlot::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeSlotValidationError {
    /// `end` precedes `start`.
    EndsBeforeStart {
        /// Requested start.
        start: DateTime<Utc>,
        /// Requested end.
        end: DateTime<Utc>,
    },
}

impl fmt::Display for TimeSlotValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndsBeforeStart { start, end } => write!(
                f,
                "time slot end must not precede its start (start {start}, end {end})"
            ),
        }
    }
}

impl std::error::Error for TimeSlotValidationError {}

/// An ordered pair of absolute instants with `end >= start`.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use scheduling_backend::domain::TimeSlot;
///
/// let at = |h| Utc.with_ymd_and_hms(2024, 6, 10, h, 0, 0).single().expect("valid instant");
/// let morning = TimeSlot::new(at(9), at(10)).expect("ordered slot");
/// let next = TimeSlot::new(at(10), at(11)).expect("ordered slot");
///
/// assert!(!morning.overlaps(&next));
/// assert_eq!(morning.duration_minutes(), 60);
/// assert!(TimeSlot::new(at(11), at(10)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "TimeSlotDto", into = "TimeSlotDto")]
pub struct TimeSlot {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeSlot {
    /// Build a slot, rejecting `end < start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, TimeSlotValidationError> {
        if end < start {
            return Err(TimeSlotValidationError::EndsBeforeStart { start, end });
        }
        Ok(Self { start, end })
    }

    /// Start instant.
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// End instant.
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Length of the slot.
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Length of the slot in whole minutes.
    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// Strict intersection: touching endpoints do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Inclusive containment of an instant.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }

    /// Calendar date of the start instant as observed in `zone`.
    pub fn start_date_in(&self, zone: Tz) -> NaiveDate {
        self.start.with_timezone(&zone).date_naive()
    }

    /// Times of day of the start and end instants as observed in `zone`.
    pub fn times_of_day_in(&self, zone: Tz) -> (NaiveTime, NaiveTime) {
        (
            self.start.with_timezone(&zone).time(),
            self.end.with_timezone(&zone).time(),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimeSlotDto {
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
}

impl From<TimeSlot> for TimeSlotDto {
    fn from(value: TimeSlot) -> Self {
        Self {
            start_time: value.start,
            end_time: value.end,
        }
    }
}

impl TryFrom<TimeSlotDto> for TimeSlot {
    type Error = TimeSlotValidationError;

    fn try_from(value: TimeSlotDto) -> Result<Self, Self::Error> {
        Self::new(value.start_time, value.end_time)
    }
}
