//! Mapping local wall-clock readings back to absolute instants.
//!
//! Local readings are not always unique: a DST fall-back repeats an hour and a
//! spring-forward skips one. Ambiguous readings resolve to the earlier
//! instant; readings inside a gap move later by the length of the gap.

use chrono::{DateTime, LocalResult, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

use super::Error;

/// Parse an IANA zone identifier, rejecting unknown names as invalid input.
pub fn parse_zone(raw: &str) -> Result<Tz, Error> {
    raw.trim().parse::<Tz>().map_err(|_| {
        Error::invalid_request(format!("unknown timezone: {raw:?}"))
            .with_details(serde_json::json!({ "field": "zone", "value": raw }))
    })
}

/// Resolve a local wall-clock reading in `zone` to an absolute instant.
///
/// # Examples
/// ```
/// use chrono::{NaiveDate, TimeZone, Utc};
/// use chrono_tz::Tz;
/// use scheduling_backend::domain::resolve_local;
///
/// let zone: Tz = "America/New_York".parse().expect("known zone");
/// // 02:30 does not exist on 2024-03-10 in New York; it lands on 03:30 EDT.
/// let local = NaiveDate::from_ymd_opt(2024, 3, 10)
///     .and_then(|d| d.and_hms_opt(2, 30, 0))
///     .expect("valid reading");
/// let expected = Utc.with_ymd_and_hms(2024, 3, 10, 7, 30, 0).single().expect("valid instant");
/// assert_eq!(resolve_local(zone, local), expected);
/// ```
pub fn resolve_local(zone: Tz, local: NaiveDateTime) -> DateTime<Utc> {
    match zone.from_local_datetime(&local) {
        LocalResult::Single(resolved) | LocalResult::Ambiguous(resolved, _) => {
            resolved.with_timezone(&Utc)
        }
        LocalResult::None => {
            // The offset in force a day earlier is the one the gap skips from.
            let before_gap = zone
                .offset_from_utc_datetime(&(local - TimeDelta::days(1)))
                .fix();
            let utc = local - TimeDelta::seconds(i64::from(before_gap.local_minus_utc()));
            Utc.from_utc_datetime(&utc)
        }
    }
}

/// Local wall-clock reading of `instant` in `zone`.
pub fn local_reading(zone: Tz, instant: DateTime<Utc>) -> NaiveDateTime {
    instant.with_timezone(&zone).naive_local()
}
