//! Soft rule: keep scheduled work out of the user's sleep windows.

use chrono_tz::Tz;

use super::violation::Violation;
use crate::domain::{TimeRange, TimeSlot};

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Rejects a slot whose start or end falls in a sleep window, or which
/// swallows the start of one.
///
/// Boundaries are back-to-back friendly: a slot may begin exactly when sleep
/// ends and may finish exactly when sleep begins. A slot lasting a whole day
/// or more covers every window.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SleepHourValidator;

impl SleepHourValidator {
    /// Report the first sleep window the candidate conflicts with.
    pub fn check(
        &self,
        candidate: &TimeSlot,
        sleep_hours: &[TimeRange],
        zone: Tz,
    ) -> Option<Violation> {
        let conflict = if candidate.duration_minutes() >= MINUTES_PER_DAY {
            sleep_hours.first()
        } else {
            let (start, end) = candidate.times_of_day_in(zone);
            let span = TimeRange::new(start, end);
            sleep_hours.iter().find(|window| {
                window.admits_start(start)
                    || window.admits_end(end)
                    || span.admits_start(window.start())
            })
        };
        conflict.map(|window| Violation::SleepHours { window: *window })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for sleep window conflicts.

    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use rstest::rstest;

    fn slot(start: (u32, u32), end: (u32, u32)) -> TimeSlot {
        let at = |(hour, minute): (u32, u32)| -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2024, 6, 10, hour, minute, 0)
                .single()
                .expect("valid instant")
        };
        TimeSlot::new(at(start), at(end)).expect("ordered slot")
    }

    fn window(start: &str, end: &str) -> TimeRange {
        TimeRange::parse(start, end).expect("valid window")
    }

    #[rstest]
    #[case(slot((6, 0), (6, 30)), true)]
    #[case(slot((23, 30), (23, 45)), true)]
    #[case(slot((22, 0), (23, 30)), true)]
    #[case(slot((6, 30), (8, 0)), true)]
    #[case(slot((8, 0), (9, 0)), false)]
    #[case(slot((7, 0), (8, 0)), false)]
    #[case(slot((22, 0), (23, 0)), false)]
    fn overnight_window(#[case] candidate: TimeSlot, #[case] conflicts: bool) {
        let result = SleepHourValidator.check(&candidate, &[window("23:00", "07:00")], Tz::UTC);
        assert_eq!(result.is_some(), conflicts);
    }

    #[rstest]
    fn long_slot_swallowing_a_nap_conflicts() {
        let result = SleepHourValidator.check(
            &slot((12, 0), (16, 0)),
            &[window("13:00", "13:30")],
            Tz::UTC,
        );
        assert_eq!(
            result,
            Some(Violation::SleepHours {
                window: window("13:00", "13:30")
            })
        );
    }

    #[rstest]
    #[case(24)]
    #[case(25)]
    fn slots_of_a_day_or_more_cover_every_window(#[case] hours: i64) {
        let start = Utc
            .with_ymd_and_hms(2024, 6, 10, 0, 0, 0)
            .single()
            .expect("valid instant");
        let candidate =
            TimeSlot::new(start, start + chrono::TimeDelta::hours(hours)).expect("ordered slot");
        let windows = [window("13:00", "13:30"), window("23:00", "07:00")];

        let result = SleepHourValidator.check(&candidate, &windows, Tz::UTC);
        assert_eq!(
            result,
            Some(Violation::SleepHours {
                window: window("13:00", "13:30")
            })
        );
    }

    #[rstest]
    fn a_full_day_without_windows_is_clear() {
        let start = Utc
            .with_ymd_and_hms(2024, 6, 10, 0, 0, 0)
            .single()
            .expect("valid instant");
        let candidate =
            TimeSlot::new(start, start + chrono::TimeDelta::days(1)).expect("ordered slot");
        assert!(SleepHourValidator.check(&candidate, &[], Tz::UTC).is_none());
    }

    #[rstest]
    fn reports_only_the_first_conflicting_window() {
        let windows = [window("05:00", "06:15"), window("23:00", "07:00")];
        let result = SleepHourValidator.check(&slot((6, 0), (6, 30)), &windows, Tz::UTC);
        assert_eq!(
            result,
            Some(Violation::SleepHours {
                window: window("05:00", "06:15")
            })
        );
    }

    #[rstest]
    fn uses_the_comparison_zone_for_times_of_day() {
        // 06:00 UTC is 08:00 in Berlin during summer time.
        let zone: Tz = "Europe/Berlin".parse().expect("known zone");
        let candidate = slot((6, 0), (7, 0));
        let windows = [window("23:00", "07:00")];

        assert!(SleepHourValidator.check(&candidate, &windows, Tz::UTC).is_some());
        assert!(SleepHourValidator.check(&candidate, &windows, zone).is_none());
    }

    #[rstest]
    fn no_windows_means_no_conflict() {
        assert!(SleepHourValidator.check(&slot((2, 0), (3, 0)), &[], Tz::UTC).is_none());
    }
}
