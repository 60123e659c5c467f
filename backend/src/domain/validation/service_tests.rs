//! Tests for the constraint validation service.

use std::collections::HashMap;
use std::sync::Arc;

use super::*;
use crate::domain::ports::{
    FixtureConstraintProvider, FixtureExistingItemsQuery, MockConstraintProvider,
    MockExistingItemsQuery,
};
use crate::domain::{CalendarItem, ErrorCode, ItemKind, TimeRange};
use chrono::TimeZone;
use rstest::{fixture, rstest};

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 10, hour, minute, 0)
        .single()
        .expect("valid instant")
}

fn task(user_id: &UserId, name: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> CalendarItem {
    CalendarItem {
        id: CalendarItemId::random(),
        user_id: user_id.clone(),
        name: name.to_owned(),
        kind: ItemKind::Task {
            parent_task_id: None,
        },
        time_slot: Some(TimeSlot::new(start, end).expect("ordered slot")),
        color: None,
    }
}

fn snapshot() -> ConstraintSnapshot {
    ConstraintSnapshot::new(
        vec![TimeRange::parse("23:00", "07:00").expect("valid range")],
        true,
        HashMap::from([(ItemCategory::Task, 4)]),
    )
}

#[fixture]
fn user_id() -> UserId {
    UserId::random()
}

fn request(user_id: &UserId, start: DateTime<Utc>, end: DateTime<Utc>) -> ValidationRequest {
    ValidationRequest::new(user_id.clone(), start, end, ItemCategory::Task, Tz::UTC)
        .expect("ordered slot")
}

fn provider_returning(snapshot: Option<ConstraintSnapshot>) -> MockConstraintProvider {
    let mut provider = MockConstraintProvider::new();
    provider
        .expect_fetch()
        .times(1)
        .return_once(move |_| Ok(snapshot));
    provider
}

#[rstest]
#[tokio::test]
async fn full_validation_accumulates_every_rule(user_id: UserId) {
    let standup = task(&user_id, "Standup", at(6, 0), at(7, 0));
    let morning = task(&user_id, "Inbox", at(8, 0), at(11, 30));
    let mut items = MockExistingItemsQuery::new();
    let overlapping = vec![standup.clone()];
    items
        .expect_overlapping()
        .times(1)
        .return_once(move |_, _| Ok(overlapping));
    items
        .expect_on_date()
        .times(1)
        .withf(|_, date, zone| {
            *date == chrono::NaiveDate::from_ymd_opt(2024, 6, 10).expect("valid date")
                && *zone == Tz::UTC
        })
        .return_once(move |_, _, _| Ok(vec![standup, morning]));

    let service = ConstraintValidationService::new(
        Arc::new(provider_returning(Some(snapshot()))),
        Arc::new(items),
    );
    let violations = service
        .validate(&request(&user_id, at(6, 30), at(7, 0)), ValidationMode::Full)
        .await
        .expect("validation succeeds");

    let kinds: Vec<&str> = violations
        .iter()
        .map(|violation| match violation {
            Violation::Overlap { .. } => "overlap",
            Violation::SleepHours { .. } => "sleep",
            Violation::DailyBudget { .. } => "budget",
        })
        .collect();
    assert_eq!(kinds, ["overlap", "sleep", "budget"]);
}

#[rstest]
#[tokio::test]
async fn preferences_only_mode_never_queries_overlaps(user_id: UserId) {
    let mut items = MockExistingItemsQuery::new();
    items.expect_overlapping().never();
    items
        .expect_on_date()
        .times(1)
        .return_once(|_, _, _| Ok(Vec::new()));

    let service = ConstraintValidationService::new(
        Arc::new(provider_returning(Some(snapshot()))),
        Arc::new(items),
    );
    let violations = service
        .validate(
            &request(&user_id, at(6, 0), at(6, 30)),
            ValidationMode::PreferencesOnly,
        )
        .await
        .expect("validation succeeds");

    assert_eq!(
        violations,
        vec![Violation::SleepHours {
            window: TimeRange::parse("23:00", "07:00").expect("valid range")
        }]
    );
}

#[rstest]
#[case(Ok(None))]
#[case(Err(ConstraintProviderError::connection("user service down")))]
#[case(Err(ConstraintProviderError::query("bad payload")))]
#[tokio::test]
async fn missing_preferences_still_enforce_overlap(
    user_id: UserId,
    #[case] outcome: Result<Option<ConstraintSnapshot>, ConstraintProviderError>,
) {
    let mut provider = MockConstraintProvider::new();
    provider
        .expect_fetch()
        .times(1)
        .return_once(move |_| outcome);
    let existing = vec![task(&user_id, "Review", at(2, 0), at(3, 0))];
    let mut items = MockExistingItemsQuery::new();
    items
        .expect_overlapping()
        .times(1)
        .return_once(move |_, _| Ok(existing));
    items.expect_on_date().never();

    let service = ConstraintValidationService::new(Arc::new(provider), Arc::new(items));
    let violations = service
        .validate(&request(&user_id, at(2, 30), at(3, 30)), ValidationMode::Full)
        .await
        .expect("validation succeeds");

    assert_eq!(violations.len(), 1);
    assert!(violations[0].is_hard());
}

#[rstest]
#[case(
    ExistingItemsQueryError::connection("database offline"),
    ErrorCode::ServiceUnavailable
)]
#[case(ExistingItemsQueryError::query("syntax error"), ErrorCode::InternalError)]
#[tokio::test]
async fn failing_overlap_query_fails_the_call(
    user_id: UserId,
    #[case] failure: ExistingItemsQueryError,
    #[case] expected: ErrorCode,
) {
    let mut items = MockExistingItemsQuery::new();
    items
        .expect_overlapping()
        .times(1)
        .return_once(move |_, _| Err(failure));

    let service =
        ConstraintValidationService::new(Arc::new(FixtureConstraintProvider), Arc::new(items));
    let error = service
        .validate(&request(&user_id, at(9, 0), at(10, 0)), ValidationMode::Full)
        .await
        .expect_err("query failure surfaces");
    assert_eq!(error.code(), expected);
}

#[rstest]
#[tokio::test]
async fn failing_budget_query_fails_the_call(user_id: UserId) {
    let mut items = MockExistingItemsQuery::new();
    items
        .expect_on_date()
        .times(1)
        .return_once(|_, _, _| Err(ExistingItemsQueryError::connection("timeout")));

    let service = ConstraintValidationService::new(
        Arc::new(provider_returning(Some(snapshot()))),
        Arc::new(items),
    );
    let error = service
        .validate(
            &request(&user_id, at(9, 0), at(10, 0)),
            ValidationMode::PreferencesOnly,
        )
        .await
        .expect_err("query failure surfaces");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn disabled_budgets_skip_the_same_day_query(user_id: UserId) {
    let disabled = ConstraintSnapshot::new(
        Vec::new(),
        false,
        HashMap::from([(ItemCategory::Task, 1)]),
    );
    let mut items = MockExistingItemsQuery::new();
    items.expect_on_date().never();

    let service = ConstraintValidationService::new(
        Arc::new(provider_returning(Some(disabled))),
        Arc::new(items),
    );
    let violations = service
        .validate(
            &request(&user_id, at(9, 0), at(17, 0)),
            ValidationMode::PreferencesOnly,
        )
        .await
        .expect("validation succeeds");
    assert!(violations.is_empty());
}

#[rstest]
#[tokio::test]
async fn listing_limit_is_configurable(user_id: UserId) {
    let existing: Vec<CalendarItem> = (0..3)
        .map(|offset| task(&user_id, &format!("Block {offset}"), at(9, 0), at(12, 0)))
        .collect();
    let mut items = MockExistingItemsQuery::new();
    items
        .expect_overlapping()
        .return_once(move |_, _| Ok(existing));

    let service =
        ConstraintValidationService::new(Arc::new(FixtureConstraintProvider), Arc::new(items))
            .with_overlap_listing_limit(1);
    let violations = service
        .validate(&request(&user_id, at(10, 0), at(11, 0)), ValidationMode::Full)
        .await
        .expect("validation succeeds");

    assert!(violations[0].to_string().ends_with(", and 2 more"));
}

#[rstest]
fn reversed_slots_are_rejected_as_invalid_requests(user_id: UserId) {
    let error = ValidationRequest::new(user_id, at(10, 0), at(9, 0), ItemCategory::Task, Tz::UTC)
        .expect_err("reversed slot");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn empty_calendar_with_fixtures_is_acceptable(user_id: UserId) {
    let service = ConstraintValidationService::new(
        Arc::new(FixtureConstraintProvider),
        Arc::new(FixtureExistingItemsQuery),
    );
    let violations = service
        .validate(&request(&user_id, at(9, 0), at(10, 0)), ValidationMode::Full)
        .await
        .expect("validation succeeds");
    assert!(violations.is_empty());
}
