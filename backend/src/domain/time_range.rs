//! Time-of-day ranges with wrap-around semantics.
//!
//! A [`TimeRange`] carries no date. When `start > end` the range is
//! "overnight" and wraps past midnight (for example 22:00-06:00) instead of
//! being treated as empty or invalid.

use std::fmt;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Formats accepted by [`TimeRange::parse`].
const TIME_FORMATS: [&str; 2] = ["%H:%M", "%H:%M:%S"];

/// Display format for times of day, for example `11:00 PM`.
pub(crate) const TWELVE_HOUR_FORMAT: &str = "%-I:%M %p";

/// Validation errors raised while building a [`TimeRange`] from raw input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeRangeValidationError {
    /// A boundary was not a `HH:MM` (or `HH:MM:SS`) time of day.
    MalformedTime {
        /// The rejected input.
        value: String,
    },
}

impl fmt::Display for TimeRangeValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedTime { value } => {
                write!(f, "time of day must be formatted as HH:MM (got {value:?})")
            }
        }
    }
}

impl std::error::Error for TimeRangeValidationError {}

/// An ordered pair of times of day.
///
/// # Examples
/// ```
/// use chrono::NaiveTime;
/// use scheduling_backend::domain::TimeRange;
///
/// let sleep = TimeRange::parse("23:00", "07:00").expect("valid range");
/// assert!(sleep.is_overnight());
/// assert!(sleep.contains(NaiveTime::from_hms_opt(2, 0, 0).expect("valid time")));
/// assert_eq!(sleep.duration_minutes(), 8 * 60);
/// assert_eq!(sleep.to_string(), "11:00 PM - 7:00 AM");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeRange {
    /// Build a range from two times of day. `start > end` wraps past midnight.
    pub const fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Parse a range from `HH:MM` strings such as `"22:00"` and `"06:00"`.
    pub fn parse(start: &str, end: &str) -> Result<Self, TimeRangeValidationError> {
        Ok(Self::new(parse_time(start)?, parse_time(end)?))
    }

    /// Start of the range.
    pub const fn start(&self) -> NaiveTime {
        self.start
    }

    /// End of the range.
    pub const fn end(&self) -> NaiveTime {
        self.end
    }

    /// Whether the range wraps past midnight.
    pub fn is_overnight(&self) -> bool {
        self.start > self.end
    }

    /// Inclusive, wrap-aware containment.
    pub fn contains(&self, time: NaiveTime) -> bool {
        if self.is_overnight() {
            time >= self.start || time <= self.end
        } else {
            time >= self.start && time <= self.end
        }
    }

    /// Wrap-aware containment over `[start, end)`.
    ///
    /// This is the test for a point at which something *begins*: beginning
    /// exactly at `end` is outside the range.
    pub fn admits_start(&self, time: NaiveTime) -> bool {
        if self.is_overnight() {
            time >= self.start || time < self.end
        } else {
            time >= self.start && time < self.end
        }
    }

    /// Wrap-aware containment over `(start, end]`.
    ///
    /// This is the test for a point at which something *finishes*: finishing
    /// exactly at `start` is outside the range.
    pub fn admits_end(&self, time: NaiveTime) -> bool {
        if self.is_overnight() {
            time > self.start || time <= self.end
        } else {
            time > self.start && time <= self.end
        }
    }

    /// Whether the two ranges share at least one time of day.
    ///
    /// Both directions are checked, so two overnight ranges and a range that
    /// swallows the other are both detected.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.contains(other.start)
            || self.contains(other.end)
            || other.contains(self.start)
            || other.contains(self.end)
    }

    /// Length of the range in minutes; overnight ranges count across midnight.
    pub fn duration_minutes(&self) -> i64 {
        let start = minute_of_day(self.start);
        let end = minute_of_day(self.end);
        if self.is_overnight() {
            (MINUTES_PER_DAY - start) + end
        } else {
            end - start
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.start.format(TWELVE_HOUR_FORMAT),
            self.end.format(TWELVE_HOUR_FORMAT)
        )
    }
}

fn minute_of_day(time: NaiveTime) -> i64 {
    i64::from(time.num_seconds_from_midnight() / 60)
}

fn parse_time(raw: &str) -> Result<NaiveTime, TimeRangeValidationError> {
    let trimmed = raw.trim();
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| TimeRangeValidationError::MalformedTime {
            value: raw.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    //! Boundary coverage for wrap-aware range arithmetic.

    use super::*;
    use rstest::rstest;

    fn t(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time of day")
    }

    fn range(start: (u32, u32), end: (u32, u32)) -> TimeRange {
        TimeRange::new(t(start.0, start.1), t(end.0, end.1))
    }

    #[rstest]
    #[case(t(9, 0), true)]
    #[case(t(12, 0), true)]
    #[case(t(17, 0), true)]
    #[case(t(8, 59), false)]
    #[case(t(17, 1), false)]
    #[case(t(0, 0), false)]
    fn daytime_range_contains_inclusive_bounds(#[case] time: NaiveTime, #[case] expected: bool) {
        assert_eq!(range((9, 0), (17, 0)).contains(time), expected);
    }

    #[rstest]
    #[case(t(22, 0), true)]
    #[case(t(23, 59), true)]
    #[case(t(0, 0), true)]
    #[case(t(6, 0), true)]
    #[case(t(6, 1), false)]
    #[case(t(21, 59), false)]
    #[case(t(12, 0), false)]
    fn overnight_range_wraps_past_midnight(#[case] time: NaiveTime, #[case] expected: bool) {
        assert_eq!(range((22, 0), (6, 0)).contains(time), expected);
    }

    #[rstest]
    fn contains_matches_the_wrap_rule_for_every_minute() {
        let ranges = [
            range((9, 0), (17, 0)),
            range((22, 0), (6, 0)),
            range((23, 0), (7, 0)),
            range((0, 0), (23, 59)),
            range((12, 0), (12, 0)),
        ];
        for candidate in ranges {
            for minute in 0..(24 * 60) {
                let time = t(minute / 60, minute % 60);
                let expected = if candidate.start() <= candidate.end() {
                    time >= candidate.start() && time <= candidate.end()
                } else {
                    time >= candidate.start() || time <= candidate.end()
                };
                assert_eq!(candidate.contains(time), expected, "{candidate} at {time}");
            }
        }
    }

    #[rstest]
    #[case(range((23, 0), (7, 0)), t(23, 0), true)]
    #[case(range((23, 0), (7, 0)), t(7, 0), false)]
    #[case(range((23, 0), (7, 0)), t(6, 59), true)]
    #[case(range((13, 0), (14, 0)), t(13, 0), true)]
    #[case(range((13, 0), (14, 0)), t(14, 0), false)]
    fn admits_start_excludes_the_end(
        #[case] candidate: TimeRange,
        #[case] time: NaiveTime,
        #[case] expected: bool,
    ) {
        assert_eq!(candidate.admits_start(time), expected);
    }

    #[rstest]
    #[case(range((23, 0), (7, 0)), t(23, 0), false)]
    #[case(range((23, 0), (7, 0)), t(23, 1), true)]
    #[case(range((23, 0), (7, 0)), t(7, 0), true)]
    #[case(range((13, 0), (14, 0)), t(13, 0), false)]
    #[case(range((13, 0), (14, 0)), t(14, 0), true)]
    fn admits_end_excludes_the_start(
        #[case] candidate: TimeRange,
        #[case] time: NaiveTime,
        #[case] expected: bool,
    ) {
        assert_eq!(candidate.admits_end(time), expected);
    }

    #[rstest]
    #[case(range((9, 0), (12, 0)), range((11, 0), (13, 0)), true)]
    #[case(range((9, 0), (12, 0)), range((12, 0), (13, 0)), true)]
    #[case(range((9, 0), (12, 0)), range((12, 1), (13, 0)), false)]
    #[case(range((9, 0), (17, 0)), range((10, 0), (11, 0)), true)]
    #[case(range((10, 0), (11, 0)), range((9, 0), (17, 0)), true)]
    #[case(range((22, 0), (6, 0)), range((5, 0), (8, 0)), true)]
    #[case(range((22, 0), (6, 0)), range((7, 0), (21, 0)), false)]
    #[case(range((22, 0), (6, 0)), range((23, 0), (2, 0)), true)]
    #[case(range((23, 0), (2, 0)), range((22, 0), (6, 0)), true)]
    #[case(range((22, 0), (1, 0)), range((0, 30), (5, 0)), true)]
    #[case(range((20, 0), (4, 0)), range((21, 0), (3, 0)), true)]
    #[case(range((22, 0), (2, 0)), range((3, 0), (21, 0)), false)]
    fn overlaps_checks_both_directions(
        #[case] left: TimeRange,
        #[case] right: TimeRange,
        #[case] expected: bool,
    ) {
        assert_eq!(left.overlaps(&right), expected, "{left} vs {right}");
        assert_eq!(right.overlaps(&left), expected, "{right} vs {left}");
    }

    #[rstest]
    #[case(range((9, 0), (17, 30)), 510)]
    #[case(range((22, 0), (6, 0)), 480)]
    #[case(range((23, 30), (0, 15)), 45)]
    #[case(range((8, 0), (8, 0)), 0)]
    fn duration_never_goes_negative(#[case] candidate: TimeRange, #[case] expected: i64) {
        assert_eq!(candidate.duration_minutes(), expected);
    }

    #[rstest]
    #[case("22:00", "06:00")]
    #[case(" 22:00 ", "06:00:00")]
    fn parse_accepts_hours_and_minutes(#[case] start: &str, #[case] end: &str) {
        let parsed = TimeRange::parse(start, end).expect("range parses");
        assert_eq!(parsed, range((22, 0), (6, 0)));
    }

    #[rstest]
    #[case("25:00")]
    #[case("10pm")]
    #[case("")]
    fn parse_rejects_malformed_times(#[case] raw: &str) {
        let err = TimeRange::parse(raw, "06:00").expect_err("malformed time");
        assert_eq!(
            err,
            TimeRangeValidationError::MalformedTime {
                value: raw.to_owned()
            }
        );
    }

    #[rstest]
    #[case(range((23, 0), (7, 0)), "11:00 PM - 7:00 AM")]
    #[case(range((0, 5), (12, 30)), "12:05 AM - 12:30 PM")]
    fn displays_in_twelve_hour_format(#[case] candidate: TimeRange, #[case] expected: &str) {
        assert_eq!(candidate.to_string(), expected);
    }
}
