use crate::directory::AirportDirectory;
use crate::validator::{
    validate_itinerary, DateField, DateInput, DateIssue, FieldKey, FormKind, ValidationReport,
};
use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const MIN_PASSENGERS: u32 = 1;
pub const MAX_PASSENGERS: u32 = 9;
/// The search backend refuses multi-city requests with fewer legs.
pub const MIN_MULTI_CITY_SEGMENTS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CabinClass {
    #[default]
    Economy,
    Premium,
    Business,
    First,
}

impl fmt::Display for CabinClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CabinClass::Economy => "Economy",
            CabinClass::Premium => "Premium Economy",
            CabinClass::Business => "Business",
            CabinClass::First => "First Class",
        };
        f.write_str(s)
    }
}

fn default_passengers() -> u32 {
    MIN_PASSENGERS
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Segment {
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub departure_date: Option<DateInput>,
}

impl Segment {
    pub fn new(origin: &str, destination: &str, departure_date: Option<DateInput>) -> Self {
        Self {
            origin: origin.to_string(),
            destination: destination.to_string(),
            departure_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneWayForm {
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub departure_date: Option<DateInput>,
    #[serde(default = "default_passengers")]
    pub passengers: u32,
    #[serde(default)]
    pub cabin_class: CabinClass,
}

impl Default for OneWayForm {
    fn default() -> Self {
        Self {
            origin: String::new(),
            destination: String::new(),
            departure_date: None,
            passengers: default_passengers(),
            cabin_class: CabinClass::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnForm {
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub departure_date: Option<DateInput>,
    #[serde(default)]
    pub return_date: Option<DateInput>,
    #[serde(default = "default_passengers")]
    pub passengers: u32,
    #[serde(default)]
    pub cabin_class: CabinClass,
}

impl Default for ReturnForm {
    fn default() -> Self {
        Self {
            origin: String::new(),
            destination: String::new(),
            departure_date: None,
            return_date: None,
            passengers: default_passengers(),
            cabin_class: CabinClass::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiCityForm {
    /// Legs in travel order.
    pub segments: Vec<Segment>,
    #[serde(default = "default_passengers")]
    pub passengers: u32,
    #[serde(default)]
    pub cabin_class: CabinClass,
}

impl Default for MultiCityForm {
    fn default() -> Self {
        Self {
            segments: vec![Segment::default()],
            passengers: default_passengers(),
            cabin_class: CabinClass::default(),
        }
    }
}

impl MultiCityForm {
    pub fn add_segment(&mut self) {
        self.segments.push(Segment::default());
    }

    /// Removes a leg. The last remaining leg is never removed.
    pub fn remove_segment(&mut self, index: usize) -> bool {
        if self.segments.len() <= 1 || index >= self.segments.len() {
            return false;
        }
        self.segments.remove(index);
        true
    }
}

/// Form state for one of the three search shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ItineraryForm {
    OneWay(OneWayForm),
    Return(ReturnForm),
    MultiCity(MultiCityForm),
}

#[derive(Error, Debug)]
pub enum ItineraryError {
    #[error("{} date field(s) failed validation", .0.len())]
    Invalid(ValidationReport),
    #[error("Passengers must be between 1 and 9 (got {0})")]
    Passengers(u32),
    #[error("Multi-city search needs at least 2 segments (got {0})")]
    TooFewSegments(usize),
    #[error("No airport matches '{value}' for {field}")]
    UnknownAirport { field: String, value: String },
}

impl ItineraryForm {
    /// An empty form of the given shape.
    pub fn new(kind: FormKind) -> Self {
        match kind {
            FormKind::OneWay => ItineraryForm::OneWay(OneWayForm::default()),
            FormKind::Return => ItineraryForm::Return(ReturnForm::default()),
            FormKind::MultiCity => ItineraryForm::MultiCity(MultiCityForm::default()),
        }
    }

    /// Reads a form saved as JSON (`{"kind": "return", ...}`).
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read itinerary {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse itinerary {}", path.display()))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self).context("Failed to serialize itinerary")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write itinerary {}", path.display()))
    }

    pub fn kind(&self) -> FormKind {
        match self {
            ItineraryForm::OneWay(_) => FormKind::OneWay,
            ItineraryForm::Return(_) => FormKind::Return,
            ItineraryForm::MultiCity(_) => FormKind::MultiCity,
        }
    }

    /// Applies the configured passenger count and cabin to a fresh form.
    pub fn with_defaults(mut self, passengers: u32, cabin: CabinClass) -> Self {
        match &mut self {
            ItineraryForm::OneWay(f) => {
                f.passengers = passengers;
                f.cabin_class = cabin;
            }
            ItineraryForm::Return(f) => {
                f.passengers = passengers;
                f.cabin_class = cabin;
            }
            ItineraryForm::MultiCity(f) => {
                f.passengers = passengers;
                f.cabin_class = cabin;
            }
        }
        self
    }

    pub fn passengers(&self) -> u32 {
        match self {
            ItineraryForm::OneWay(f) => f.passengers,
            ItineraryForm::Return(f) => f.passengers,
            ItineraryForm::MultiCity(f) => f.passengers,
        }
    }

    pub fn validate(&self, today: NaiveDate) -> ValidationReport {
        validate_itinerary(self, today)
    }

    /// Validates the form and turns it into the payload the search endpoint
    /// expects. Airport fields may hold a code or any text the directory
    /// can resolve.
    pub fn to_request(
        &self,
        directory: &AirportDirectory,
        today: NaiveDate,
    ) -> Result<SearchRequest, ItineraryError> {
        let report = self.validate(today);
        if !report.is_valid() {
            return Err(ItineraryError::Invalid(report));
        }

        let passengers = self.passengers();
        if !(MIN_PASSENGERS..=MAX_PASSENGERS).contains(&passengers) {
            return Err(ItineraryError::Passengers(passengers));
        }

        let request = match self {
            ItineraryForm::OneWay(f) => SearchRequest::OneWay(OneWayRequest {
                origin: resolve_code(directory, "origin", &f.origin)?,
                destination: resolve_code(directory, "destination", &f.destination)?,
                departure_date: valid_date(
                    &f.departure_date,
                    FieldKey::new(FormKind::OneWay, DateField::Departure),
                )?,
                passengers,
                cabin_class: f.cabin_class,
            }),
            ItineraryForm::Return(f) => SearchRequest::Return(ReturnRequest {
                origin: resolve_code(directory, "origin", &f.origin)?,
                destination: resolve_code(directory, "destination", &f.destination)?,
                departure_date: valid_date(
                    &f.departure_date,
                    FieldKey::new(FormKind::Return, DateField::Departure),
                )?,
                return_date: valid_date(
                    &f.return_date,
                    FieldKey::new(FormKind::Return, DateField::Return),
                )?,
                passengers,
                cabin_class: f.cabin_class,
            }),
            ItineraryForm::MultiCity(f) => {
                if f.segments.len() < MIN_MULTI_CITY_SEGMENTS {
                    return Err(ItineraryError::TooFewSegments(f.segments.len()));
                }
                let segments = f
                    .segments
                    .iter()
                    .enumerate()
                    .map(|(i, seg)| {
                        Ok(SegmentRequest {
                            origin: resolve_code(
                                directory,
                                &format!("segment {} origin", i + 1),
                                &seg.origin,
                            )?,
                            destination: resolve_code(
                                directory,
                                &format!("segment {} destination", i + 1),
                                &seg.destination,
                            )?,
                            departure_date: valid_date(
                                &seg.departure_date,
                                FieldKey::segment(i),
                            )?,
                        })
                    })
                    .collect::<Result<Vec<_>, ItineraryError>>()?;
                SearchRequest::MultiCity(MultiCityRequest {
                    segments,
                    passengers,
                    cabin_class: f.cabin_class,
                })
            }
        };

        log::debug!(
            "Built {} search request — endpoint={}",
            request.kind(),
            request.endpoint()
        );
        Ok(request)
    }
}

fn resolve_code(
    directory: &AirportDirectory,
    field: &str,
    value: &str,
) -> Result<String, ItineraryError> {
    directory
        .resolve(value)
        .map(|airport| airport.code.clone())
        .ok_or_else(|| ItineraryError::UnknownAirport {
            field: field.to_string(),
            value: value.trim().to_string(),
        })
}

// Only reached after validation passed, so a miss here means the field was
// edited in between.
fn valid_date(input: &Option<DateInput>, key: FieldKey) -> Result<NaiveDate, ItineraryError> {
    input.as_ref().and_then(DateInput::resolve).ok_or_else(|| {
        let mut report = ValidationReport::default();
        report.insert(key, DateIssue::Required);
        ItineraryError::Invalid(report)
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OneWayRequest {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub passengers: u32,
    pub cabin_class: CabinClass,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReturnRequest {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
    pub passengers: u32,
    pub cabin_class: CabinClass,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentRequest {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MultiCityRequest {
    pub segments: Vec<SegmentRequest>,
    pub passengers: u32,
    pub cabin_class: CabinClass,
}

/// Normalised payload for one of the search endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SearchRequest {
    OneWay(OneWayRequest),
    Return(ReturnRequest),
    MultiCity(MultiCityRequest),
}

impl SearchRequest {
    pub fn kind(&self) -> FormKind {
        match self {
            SearchRequest::OneWay(_) => FormKind::OneWay,
            SearchRequest::Return(_) => FormKind::Return,
            SearchRequest::MultiCity(_) => FormKind::MultiCity,
        }
    }

    /// Path of the search endpoint, relative to the API base URL.
    pub fn endpoint(&self) -> &'static str {
        match self {
            SearchRequest::OneWay(_) => "/airfare/search/one-way",
            SearchRequest::Return(_) => "/airfare/search/return",
            SearchRequest::MultiCity(_) => "/airfare/search/multi-city",
        }
    }
}
