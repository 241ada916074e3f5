// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz
//
// Regression tests for itinerary date validation (validator.rs).
// Covers: single-field rules, return ordering (same day is rejected),
// multi-city chronological ordering with per-segment short-circuit,
// accumulation of every failure, and idempotence.

use chrono::NaiveDate;
use wayfare_core::itinerary::{MultiCityForm, OneWayForm, ReturnForm, Segment};
use wayfare_core::{
    validate_date, validate_itinerary, DateField, DateInput, DateIssue, FieldKey, FormKind,
    ItineraryForm,
};

fn init_logging() {
    let _ = simplelog::TestLogger::init(simplelog::LevelFilter::Debug, simplelog::Config::default());
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// All fixed dates below lie after this.
fn today() -> NaiveDate {
    ymd(2026, 1, 15)
}

fn date(s: &str) -> Option<DateInput> {
    Some(DateInput::from(s))
}

fn return_form(dep: Option<DateInput>, ret: Option<DateInput>) -> ItineraryForm {
    ItineraryForm::Return(ReturnForm {
        origin: "JFK".into(),
        destination: "LHR".into(),
        departure_date: dep,
        return_date: ret,
        ..Default::default()
    })
}

fn multi_city(dates: Vec<Option<DateInput>>) -> ItineraryForm {
    ItineraryForm::MultiCity(MultiCityForm {
        segments: dates
            .into_iter()
            .map(|d| Segment::new("JFK", "LHR", d))
            .collect(),
        ..Default::default()
    })
}

const RET: FieldKey = FieldKey {
    form: FormKind::Return,
    field: DateField::Return,
};
const DEP: FieldKey = FieldKey {
    form: FormKind::Return,
    field: DateField::Departure,
};

// =====================================================================
// Single field
// =====================================================================

#[test]
fn test_required() {
    init_logging();
    assert_eq!(validate_date(None, "departure_date", today()), Some(DateIssue::Required));
}

#[test]
fn test_impossible_date_never_passes() {
    init_logging();
    let issue = validate_date(date("2026-13-40").as_ref(), "departure_date", today());
    assert!(
        matches!(issue, Some(DateIssue::Invalid) | Some(DateIssue::Format)),
        "got {:?}",
        issue
    );
}

#[test]
fn test_yesterday_and_today() {
    let t = today();
    let yesterday = t.pred_opt().unwrap();
    assert_eq!(
        validate_date(Some(&DateInput::Date(yesterday)), "x", t),
        Some(DateIssue::InPast)
    );
    assert_eq!(validate_date(Some(&DateInput::Date(t)), "x", t), None);
}

#[test]
fn test_local_today_is_accepted() {
    let t = wayfare_core::local_today();
    assert_eq!(validate_date(Some(&DateInput::Date(t)), "x", t), None);
}

// =====================================================================
// One-way
// =====================================================================

#[test]
fn test_one_way_uses_single_key() {
    let form = ItineraryForm::OneWay(OneWayForm::default());
    let report = validate_itinerary(&form, today());
    assert_eq!(report.len(), 1);
    assert_eq!(
        report.get(&FieldKey::new(FormKind::OneWay, DateField::Departure)),
        Some(&DateIssue::Required)
    );
}

// =====================================================================
// Return
// =====================================================================

#[test]
fn test_return_same_day_is_ordering_error() {
    let report = validate_itinerary(&return_form(date("2026-02-20"), date("2026-02-20")), today());
    assert_eq!(report.len(), 1);
    assert_eq!(report.get(&RET), Some(&DateIssue::ReturnNotAfterDeparture));
}

#[test]
fn test_return_before_departure() {
    let report = validate_itinerary(&return_form(date("2026-02-20"), date("2026-02-19")), today());
    assert_eq!(report.get(&RET), Some(&DateIssue::ReturnNotAfterDeparture));
    assert!(report.get(&DEP).is_none());
}

#[test]
fn test_return_next_day_is_valid() {
    let report = validate_itinerary(&return_form(date("2026-02-20"), date("2026-02-21")), today());
    assert!(report.is_valid());
}

#[test]
fn test_return_mixed_inputs_compare_by_calendar_day() {
    let form = return_form(Some(ymd(2026, 2, 20).into()), date("2026-02-20"));
    let report = validate_itinerary(&form, today());
    assert_eq!(report.get(&RET), Some(&DateIssue::ReturnNotAfterDeparture));
}

#[test]
fn test_return_ordering_skipped_when_a_field_fails() {
    // Departure unreadable: only its own error, no ordering error on return.
    let report = validate_itinerary(&return_form(date("2026-13-01"), date("2026-02-01")), today());
    assert_eq!(report.len(), 1);
    assert_eq!(report.get(&DEP), Some(&DateIssue::Invalid));

    // Return in the past and before departure: the past error wins.
    let report = validate_itinerary(&return_form(date("2026-02-20"), date("2026-01-01")), today());
    assert_eq!(report.len(), 1);
    assert_eq!(report.get(&RET), Some(&DateIssue::InPast));
}

#[test]
fn test_return_both_missing_reports_both() {
    let report = validate_itinerary(&return_form(None, None), today());
    assert_eq!(report.len(), 2);
    assert_eq!(report.get(&DEP), Some(&DateIssue::Required));
    assert_eq!(report.get(&RET), Some(&DateIssue::Required));
}

// =====================================================================
// Multi-city
// =====================================================================

#[test]
fn test_multi_city_same_day_legs() {
    let report = validate_itinerary(&multi_city(vec![date("2026-03-01"), date("2026-03-01")]), today());
    assert_eq!(report.len(), 1);
    assert_eq!(
        report.get(&FieldKey::segment(1)),
        Some(&DateIssue::NotAfterPreviousSegment)
    );
}

#[test]
fn test_multi_city_only_offending_leg_flagged() {
    let form = multi_city(vec![date("2026-03-01"), date("2026-03-05"), date("2026-03-04")]);
    let report = validate_itinerary(&form, today());
    assert_eq!(report.len(), 1);
    assert!(report.get(&FieldKey::segment(1)).is_none());
    assert_eq!(
        report.get(&FieldKey::segment(2)),
        Some(&DateIssue::NotAfterPreviousSegment)
    );
}

#[test]
fn test_multi_city_invalid_leg_gets_no_ordering_error() {
    // Leg 2 is both in the past and before leg 1; only the past error shows.
    let form = multi_city(vec![date("2026-03-01"), date("2026-01-02")]);
    let report = validate_itinerary(&form, today());
    assert_eq!(report.get(&FieldKey::segment(1)), Some(&DateIssue::InPast));
}

#[test]
fn test_multi_city_compares_against_past_previous_leg() {
    // Leg 1 fails on its own but is still a real date; leg 2 is after it.
    let form = multi_city(vec![date("2026-01-10"), date("2026-03-01")]);
    let report = validate_itinerary(&form, today());
    assert_eq!(report.len(), 1);
    assert_eq!(report.get(&FieldKey::segment(0)), Some(&DateIssue::InPast));
}

#[test]
fn test_multi_city_unreadable_previous_leg() {
    let form = multi_city(vec![None, date("2026-03-01"), date("03/02/2026"), date("2026-03-03")]);
    let report = validate_itinerary(&form, today());
    assert_eq!(report.len(), 2);
    assert_eq!(report.get(&FieldKey::segment(0)), Some(&DateIssue::Required));
    assert!(report.get(&FieldKey::segment(1)).is_none());
    assert_eq!(report.get(&FieldKey::segment(2)), Some(&DateIssue::Format));
    assert!(report.get(&FieldKey::segment(3)).is_none());
}

#[test]
fn test_multi_city_accumulates_every_failure() {
    let form = multi_city(vec![
        None,
        date("2026-03-05"),
        date("2026-03-05"),
        date("not a date"),
        date("2026-02-30"),
    ]);
    let report = validate_itinerary(&form, today());
    let issues: Vec<(usize, DateIssue)> = report
        .iter()
        .map(|(key, issue)| match key.field {
            DateField::Segment(i) => (i, issue.clone()),
            other => panic!("unexpected field {:?}", other),
        })
        .collect();
    assert_eq!(
        issues,
        vec![
            (0, DateIssue::Required),
            (2, DateIssue::NotAfterPreviousSegment),
            (3, DateIssue::Format),
            (4, DateIssue::Invalid),
        ]
    );
}

// =====================================================================
// Purity
// =====================================================================

#[test]
fn test_validation_is_idempotent() {
    let forms = vec![
        return_form(date("2026-02-20"), date("2026-02-19")),
        multi_city(vec![date("2026-03-01"), date("2026-03-05"), date("2026-03-04")]),
        ItineraryForm::OneWay(OneWayForm::default()),
    ];
    for form in &forms {
        let first = validate_itinerary(form, today());
        let second = validate_itinerary(form, today());
        assert_eq!(first, second);
    }
}
