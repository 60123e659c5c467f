//! Soft rule: cap the time spent per category on one calendar date.

use chrono_tz::Tz;

use super::violation::Violation;
use crate::domain::{CalendarItem, CalendarItemId, DailyBudget, ItemCategory, TimeSlot};

/// Sums same-category minutes on the candidate's start date and rejects the
/// candidate if it would push the total past the budget.
///
/// Items are attributed whole to the date of their start instant; nothing is
/// split across midnight.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DailyBudgetValidator;

impl DailyBudgetValidator {
    /// Check `candidate` against `budget` given the items already on its date.
    pub fn check(
        &self,
        candidate: &TimeSlot,
        category: ItemCategory,
        budget: DailyBudget,
        same_day: &[CalendarItem],
        exclude: Option<CalendarItemId>,
        zone: Tz,
    ) -> Option<Violation> {
        let date = candidate.start_date_in(zone);
        let used_minutes: i64 = same_day
            .iter()
            .filter(|item| item.category() == category)
            .filter(|item| Some(item.id) != exclude)
            .filter(|item| item.starts_on(date, zone))
            .filter_map(|item| item.time_slot)
            .map(|slot| slot.duration_minutes())
            .sum();
        let new_minutes = candidate.duration_minutes();

        (used_minutes + new_minutes > budget.limit_minutes()).then(|| Violation::DailyBudget {
            category,
            limit_hours: budget.hours(),
            used_minutes,
            new_minutes,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for daily budget accumulation.

    use std::collections::HashMap;

    use super::*;
    use crate::domain::{ConstraintSnapshot, ItemKind, UserId};
    use chrono::{DateTime, TimeZone, Utc};
    use rstest::{fixture, rstest};

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, hour, minute, 0)
            .single()
            .expect("valid instant")
    }

    fn slot(start: DateTime<Utc>, end: DateTime<Utc>) -> TimeSlot {
        TimeSlot::new(start, end).expect("ordered slot")
    }

    fn item(kind: ItemKind, start: DateTime<Utc>, end: DateTime<Utc>) -> CalendarItem {
        CalendarItem {
            id: CalendarItemId::random(),
            user_id: UserId::random(),
            name: "Work".to_owned(),
            kind,
            time_slot: Some(slot(start, end)),
            color: None,
        }
    }

    fn task(start: DateTime<Utc>, end: DateTime<Utc>) -> CalendarItem {
        item(ItemKind::Task { parent_task_id: None }, start, end)
    }

    #[fixture]
    fn four_hours() -> DailyBudget {
        ConstraintSnapshot::new(Vec::new(), true, HashMap::from([(ItemCategory::Task, 4)]))
            .daily_budget_for(ItemCategory::Task)
            .expect("budget configured")
    }

    #[rstest]
    fn exceeding_the_budget_reports_every_figure(four_hours: DailyBudget) {
        let existing = vec![task(at(10, 8, 0), at(10, 10, 0)), task(at(10, 13, 0), at(10, 14, 30))];
        let candidate = slot(at(10, 16, 0), at(10, 17, 0));

        let violation = DailyBudgetValidator.check(
            &candidate,
            ItemCategory::Task,
            four_hours,
            &existing,
            None,
            Tz::UTC,
        );
        assert_eq!(
            violation,
            Some(Violation::DailyBudget {
                category: ItemCategory::Task,
                limit_hours: 4,
                used_minutes: 210,
                new_minutes: 60,
            })
        );
    }

    #[rstest]
    fn reaching_the_budget_exactly_is_allowed(four_hours: DailyBudget) {
        let existing = vec![task(at(10, 8, 0), at(10, 11, 0))];
        let candidate = slot(at(10, 16, 0), at(10, 17, 0));
        let violation = DailyBudgetValidator.check(
            &candidate,
            ItemCategory::Task,
            four_hours,
            &existing,
            None,
            Tz::UTC,
        );
        assert!(violation.is_none());
    }

    #[rstest]
    fn other_categories_and_days_do_not_count(four_hours: DailyBudget) {
        let existing = vec![
            item(ItemKind::Event, at(10, 8, 0), at(10, 12, 0)),
            task(at(9, 20, 0), at(9, 23, 59)),
            task(at(11, 0, 0), at(11, 3, 0)),
        ];
        let candidate = slot(at(10, 16, 0), at(10, 19, 0));
        let violation = DailyBudgetValidator.check(
            &candidate,
            ItemCategory::Task,
            four_hours,
            &existing,
            None,
            Tz::UTC,
        );
        assert!(violation.is_none());
    }

    #[rstest]
    fn rescheduled_item_does_not_count_against_itself(four_hours: DailyBudget) {
        let current = task(at(10, 9, 0), at(10, 12, 0));
        let candidate = slot(at(10, 13, 0), at(10, 16, 0));
        let violation = DailyBudgetValidator.check(
            &candidate,
            ItemCategory::Task,
            four_hours,
            std::slice::from_ref(&current),
            Some(current.id),
            Tz::UTC,
        );
        assert!(violation.is_none());
    }

    #[rstest]
    fn items_crossing_midnight_count_toward_their_start_date(four_hours: DailyBudget) {
        let late = task(at(9, 22, 0), at(10, 2, 0));
        let candidate = slot(at(10, 9, 0), at(10, 12, 0));
        let violation = DailyBudgetValidator.check(
            &candidate,
            ItemCategory::Task,
            four_hours,
            &[late],
            None,
            Tz::UTC,
        );
        assert!(violation.is_none());
    }
}
