//! Typed constraint violations and their user-facing messages.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::time_range::TWELVE_HOUR_FORMAT;
use crate::domain::{CalendarItemId, ItemCategory, TimeRange};

const DATE_FORMAT: &str = "%b %-d";

/// An existing item named in an overlap violation.
///
/// Times are wall-clock readings in the comparison zone of the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlapConflict {
    /// Conflicting item.
    pub item_id: CalendarItemId,
    /// Its display name.
    pub name: String,
    /// Local start of its slot.
    pub start: NaiveDateTime,
    /// Local end of its slot.
    pub end: NaiveDateTime,
}

impl fmt::Display for OverlapConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = self.start.format(DATE_FORMAT);
        let start_time = self.start.format(TWELVE_HOUR_FORMAT);
        let end_time = self.end.format(TWELVE_HOUR_FORMAT);
        if self.start.date() == self.end.date() {
            write!(f, "'{}' ({start}, {start_time} - {end_time})", self.name)
        } else {
            let end = self.end.format(DATE_FORMAT);
            write!(
                f,
                "'{}' ({start}, {start_time} - {end}, {end_time})",
                self.name
            )
        }
    }
}

/// A reason a candidate slot was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// Hard rule: the slot intersects existing items.
    Overlap {
        /// Conflicts named in the message, in start order.
        listed: Vec<OverlapConflict>,
        /// Further conflicts summarised as "and N more".
        unlisted: usize,
    },
    /// Soft rule: the slot touches a sleep window.
    SleepHours {
        /// First conflicting sleep window.
        window: TimeRange,
    },
    /// Soft rule: the slot would exceed the category's daily budget.
    DailyBudget {
        /// Budgeted category.
        category: ItemCategory,
        /// Configured allowance in hours.
        limit_hours: u32,
        /// Minutes already scheduled that day.
        used_minutes: i64,
        /// Minutes the candidate adds.
        new_minutes: i64,
    },
}

impl Violation {
    /// Whether the violation comes from a rule that can never be waived.
    pub const fn is_hard(&self) -> bool {
        matches!(self, Self::Overlap { .. })
    }
}

/// A minute count shown as hours with one decimal place, halves rounding up.
struct Hours(i64);

impl fmt::Display for Hours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tenths = (self.0 * 10 + 30).div_euclid(60);
        write!(f, "{}.{}", tenths.div_euclid(10), tenths.rem_euclid(10))
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overlap { listed, unlisted } => {
                f.write_str("Time slot overlaps with existing calendar items: ")?;
                for (index, conflict) in listed.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{conflict}")?;
                }
                if *unlisted > 0 {
                    write!(f, ", and {unlisted} more")?;
                }
                Ok(())
            }
            Self::SleepHours { window } => {
                write!(f, "Time slot conflicts with sleep hours ({window}).")
            }
            Self::DailyBudget {
                category,
                limit_hours,
                used_minutes,
                new_minutes,
            } => write!(
                f,
                "Daily limit exceeded for {category} items. Limit: {} hours, \
                 Currently used: {} hours, New item: {} hours, \
                 Total would be: {} hours",
                Hours(i64::from(*limit_hours) * 60),
                Hours(*used_minutes),
                Hours(*new_minutes),
                Hours(used_minutes + new_minutes),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Message formats shown to users.

    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn local(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, day)
            .and_then(|date| date.and_hms_opt(hour, minute, 0))
            .expect("valid reading")
    }

    fn conflict(name: &str, start: NaiveDateTime, end: NaiveDateTime) -> OverlapConflict {
        OverlapConflict {
            item_id: CalendarItemId::random(),
            name: name.to_owned(),
            start,
            end,
        }
    }

    #[rstest]
    fn overlap_lists_same_day_conflicts() {
        let violation = Violation::Overlap {
            listed: vec![conflict("Standup", local(10, 14, 0), local(10, 15, 0))],
            unlisted: 0,
        };
        insta::assert_snapshot!(
            violation.to_string(),
            @"Time slot overlaps with existing calendar items: 'Standup' (Jun 10, 2:00 PM - 3:00 PM)"
        );
    }

    #[rstest]
    fn overlap_spells_out_both_days_across_midnight() {
        let violation = Violation::Overlap {
            listed: vec![
                conflict("Release", local(10, 23, 0), local(11, 1, 0)),
                conflict("Pager", local(11, 0, 0), local(11, 0, 30)),
            ],
            unlisted: 2,
        };
        insta::assert_snapshot!(
            violation.to_string(),
            @"Time slot overlaps with existing calendar items: 'Release' (Jun 10, 11:00 PM - Jun 11, 1:00 AM), 'Pager' (Jun 11, 12:00 AM - 12:30 AM), and 2 more"
        );
    }

    #[rstest]
    fn sleep_violation_names_the_window() {
        let violation = Violation::SleepHours {
            window: TimeRange::parse("23:00", "07:00").expect("valid range"),
        };
        insta::assert_snapshot!(
            violation.to_string(),
            @"Time slot conflicts with sleep hours (11:00 PM - 7:00 AM)."
        );
    }

    #[rstest]
    fn budget_violation_reports_one_decimal_place() {
        let violation = Violation::DailyBudget {
            category: ItemCategory::Task,
            limit_hours: 4,
            used_minutes: 210,
            new_minutes: 60,
        };
        insta::assert_snapshot!(
            violation.to_string(),
            @"Daily limit exceeded for TASK items. Limit: 4.0 hours, Currently used: 3.5 hours, New item: 1.0 hours, Total would be: 4.5 hours"
        );
    }

    #[rstest]
    fn budget_violation_rounds_quarter_hours_up() {
        let violation = Violation::DailyBudget {
            category: ItemCategory::Routine,
            limit_hours: 4,
            used_minutes: 195,
            new_minutes: 75,
        };
        insta::assert_snapshot!(
            violation.to_string(),
            @"Daily limit exceeded for ROUTINE items. Limit: 4.0 hours, Currently used: 3.3 hours, New item: 1.3 hours, Total would be: 4.5 hours"
        );
    }

    #[rstest]
    #[case(0, "0.0")]
    #[case(1, "0.0")]
    #[case(3, "0.1")]
    #[case(45, "0.8")]
    #[case(100, "1.7")]
    #[case(600, "10.0")]
    fn hours_show_one_decimal(#[case] minutes: i64, #[case] expected: &str) {
        assert_eq!(Hours(minutes).to_string(), expected);
    }

    #[rstest]
    #[case(Violation::Overlap { listed: Vec::new(), unlisted: 0 }, true)]
    #[case(
        Violation::SleepHours { window: TimeRange::parse("22:00", "06:00").expect("valid") },
        false
    )]
    fn only_overlap_is_hard(#[case] violation: Violation, #[case] expected: bool) {
        assert_eq!(violation.is_hard(), expected);
    }

    #[rstest]
    fn violations_serialise_with_a_kind_tag() {
        let value = serde_json::to_value(Violation::SleepHours {
            window: TimeRange::parse("23:00", "07:00").expect("valid range"),
        })
        .expect("violation serialises");
        assert_eq!(
            value,
            serde_json::json!({
                "kind": "sleep_hours",
                "window": { "start": "23:00:00", "end": "07:00:00" },
            })
        );
    }
}
