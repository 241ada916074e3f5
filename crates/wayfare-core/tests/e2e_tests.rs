use std::fs;
use tempfile::TempDir;
use wayfare_core::directory::AirportDirectory;
use wayfare_core::itinerary::{CabinClass, ItineraryForm, SearchRequest};
use wayfare_core::settings::{Settings, SettingsManager};
use wayfare_core::{DateIssue, FieldKey, FormKind, ItineraryError};

fn today() -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()
}

fn write_form(dir: &TempDir, name: &str, json: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, json).unwrap();
    path
}

#[test]
fn test_form_file_to_one_way_request() {
    let tmp = TempDir::new().unwrap();
    let path = write_form(
        &tmp,
        "one_way.json",
        r#"{
            "kind": "one-way",
            "origin": "New York",
            "destination": "lax",
            "departure_date": "2026-02-20",
            "passengers": 3,
            "cabin_class": "first"
        }"#,
    );

    let form = ItineraryForm::load(&path).unwrap();
    let dir = AirportDirectory::bundled().unwrap();
    let request = form.to_request(&dir, today()).unwrap();

    match &request {
        SearchRequest::OneWay(req) => {
            assert_eq!(req.origin, "JFK");
            assert_eq!(req.destination, "LAX");
            assert_eq!(req.passengers, 3);
            assert_eq!(req.cabin_class, CabinClass::First);
        }
        other => panic!("expected a one-way request, got {:?}", other),
    }
    assert_eq!(request.endpoint(), "/airfare/search/one-way");
}

#[test]
fn test_multi_city_file_reports_every_bad_leg() {
    let tmp = TempDir::new().unwrap();
    let path = write_form(
        &tmp,
        "multi.json",
        r#"{
            "kind": "multi-city",
            "segments": [
                {"origin": "JFK", "destination": "LHR", "departure_date": "2026-03-01"},
                {"origin": "LHR", "destination": "CDG", "departure_date": "2026-03-01"},
                {"origin": "CDG", "destination": "FCO", "departure_date": "2026/03/09"},
                {"origin": "FCO", "destination": "JFK"}
            ]
        }"#,
    );

    let form = ItineraryForm::load(&path).unwrap();
    let dir = AirportDirectory::bundled().unwrap();
    match form.to_request(&dir, today()) {
        Err(ItineraryError::Invalid(report)) => {
            assert_eq!(report.len(), 3);
            assert_eq!(
                report.get(&FieldKey::segment(1)),
                Some(&DateIssue::NotAfterPreviousSegment)
            );
            assert_eq!(report.get(&FieldKey::segment(2)), Some(&DateIssue::Format));
            assert_eq!(report.get(&FieldKey::segment(3)), Some(&DateIssue::Required));
        }
        other => panic!("expected validation failure, got {:?}", other),
    }
}

#[test]
fn test_unknown_kind_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let path = write_form(&tmp, "bad.json", r#"{"kind": "round-the-world"}"#);
    let err = ItineraryForm::load(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse itinerary"));
}

#[test]
fn test_template_round_trip_with_settings_defaults() {
    let tmp = TempDir::new().unwrap();
    let manager = SettingsManager::new(tmp.path().join("settings.json"));
    manager
        .save(&Settings {
            default_passengers: 2,
            default_cabin: CabinClass::Business,
            ..Default::default()
        })
        .unwrap();
    let settings = manager.load().unwrap();

    let template = ItineraryForm::new(FormKind::Return)
        .with_defaults(settings.default_passengers, settings.default_cabin);
    let path = tmp.path().join("template.json");
    template.save(&path).unwrap();

    let loaded = ItineraryForm::load(&path).unwrap();
    assert_eq!(loaded, template);
    assert_eq!(loaded.kind(), FormKind::Return);
    assert_eq!(loaded.passengers(), 2);

    // An untouched template is not submittable: both dates are missing.
    let report = loaded.validate(today());
    assert_eq!(report.len(), 2);
}
