use crate::itinerary::{ItineraryForm, Segment};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// A date field as the form holds it: either a picked calendar date or
/// whatever the user typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DateInput {
    Date(NaiveDate),
    Text(String),
}

impl DateInput {
    fn is_blank(&self) -> bool {
        matches!(self, DateInput::Text(s) if s.is_empty())
    }

    /// Checks the `YYYY-MM-DD` shape, then the calendar.
    fn parse(&self) -> Result<NaiveDate, DateIssue> {
        match self {
            DateInput::Date(date) => Ok(*date),
            DateInput::Text(text) => {
                static SHAPE_RE: OnceLock<Regex> = OnceLock::new();
                let shape_re =
                    SHAPE_RE.get_or_init(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap());
                if !shape_re.is_match(text) {
                    return Err(DateIssue::Format);
                }
                NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| DateIssue::Invalid)
            }
        }
    }

    /// The calendar date this input denotes, if any. Ignores the
    /// today-or-later rule.
    pub fn resolve(&self) -> Option<NaiveDate> {
        self.parse().ok()
    }
}

impl From<NaiveDate> for DateInput {
    fn from(date: NaiveDate) -> Self {
        DateInput::Date(date)
    }
}

impl From<String> for DateInput {
    fn from(text: String) -> Self {
        DateInput::Text(text)
    }
}

impl From<&str> for DateInput {
    fn from(text: &str) -> Self {
        DateInput::Text(text.to_string())
    }
}

impl From<DateInput> for String {
    fn from(input: DateInput) -> Self {
        match input {
            DateInput::Date(date) => date.format("%Y-%m-%d").to_string(),
            DateInput::Text(text) => text,
        }
    }
}

/// Why a single date field was rejected. `Display` is the message shown
/// next to the field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateIssue {
    #[error("Date is required")]
    Required,
    #[error("Date must be in YYYY-MM-DD format (e.g., 2026-02-20)")]
    Format,
    #[error("Invalid date")]
    Invalid,
    #[error("Date must be today or in the future")]
    InPast,
    #[error("Return date must be after departure date")]
    ReturnNotAfterDeparture,
    #[error("Date must be after previous segment date")]
    NotAfterPreviousSegment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormKind {
    OneWay,
    Return,
    MultiCity,
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FormKind::OneWay => "one-way",
            FormKind::Return => "return",
            FormKind::MultiCity => "multi-city",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DateField {
    Departure,
    Return,
    /// Zero-based position in a multi-city itinerary.
    Segment(usize),
}

/// Identifies one date field of one form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldKey {
    pub form: FormKind,
    pub field: DateField,
}

impl FieldKey {
    pub fn new(form: FormKind, field: DateField) -> Self {
        Self { form, field }
    }

    pub fn segment(index: usize) -> Self {
        Self::new(FormKind::MultiCity, DateField::Segment(index))
    }
}

/// Field label as shown next to its error, e.g. `return date` or
/// `segment 2 date`. Segments are numbered from 1.
impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.field {
            DateField::Departure => f.write_str("departure date"),
            DateField::Return => f.write_str("return date"),
            DateField::Segment(i) => write!(f, "segment {} date", i + 1),
        }
    }
}

/// Every failing field of a form. An absent key means the field passed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    issues: BTreeMap<FieldKey, DateIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn get(&self, key: &FieldKey) -> Option<&DateIssue> {
        self.issues.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldKey, &DateIssue)> {
        self.issues.iter()
    }

    pub fn insert(&mut self, key: FieldKey, issue: DateIssue) {
        self.issues.insert(key, issue);
    }

    /// Drops the error shown for a field, e.g. once the user edits it.
    pub fn clear(&mut self, key: &FieldKey) -> Option<DateIssue> {
        self.issues.remove(key)
    }
}

/// The local calendar date, used as the lower bound for every field.
pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Checks one date field in isolation: present, well formed, a real
/// calendar day, and not before `today`.
pub fn validate_date(
    value: Option<&DateInput>,
    field_label: &str,
    today: NaiveDate,
) -> Option<DateIssue> {
    let issue = match value {
        None => Some(DateIssue::Required),
        Some(input) if input.is_blank() => Some(DateIssue::Required),
        Some(input) => match input.parse() {
            Err(issue) => Some(issue),
            Ok(date) if date < today => Some(DateIssue::InPast),
            Ok(_) => None,
        },
    };

    if let Some(ref issue) = issue {
        log::debug!("Date rejected — field={} issue={:?}", field_label, issue);
    }
    issue
}

/// Validates every date field of `form`, collecting all failures rather
/// than stopping at the first.
pub fn validate_itinerary(form: &ItineraryForm, today: NaiveDate) -> ValidationReport {
    let mut report = ValidationReport::default();

    match form {
        ItineraryForm::OneWay(f) => {
            if let Some(issue) = validate_date(f.departure_date.as_ref(), "departure_date", today) {
                report.insert(FieldKey::new(FormKind::OneWay, DateField::Departure), issue);
            }
        }
        ItineraryForm::Return(f) => {
            let dep_issue = validate_date(f.departure_date.as_ref(), "departure_date", today);
            let ret_issue = validate_date(f.return_date.as_ref(), "return_date", today);
            let both_valid = dep_issue.is_none() && ret_issue.is_none();

            if let Some(issue) = dep_issue {
                report.insert(FieldKey::new(FormKind::Return, DateField::Departure), issue);
            }
            if let Some(issue) = ret_issue {
                report.insert(FieldKey::new(FormKind::Return, DateField::Return), issue);
            }

            if both_valid {
                let dep = f.departure_date.as_ref().and_then(DateInput::resolve);
                let ret = f.return_date.as_ref().and_then(DateInput::resolve);
                if let (Some(dep), Some(ret)) = (dep, ret) {
                    // Same day counts as "not after".
                    if ret <= dep {
                        report.insert(
                            FieldKey::new(FormKind::Return, DateField::Return),
                            DateIssue::ReturnNotAfterDeparture,
                        );
                    }
                }
            }
        }
        ItineraryForm::MultiCity(f) => validate_segments(&f.segments, today, &mut report),
    }

    report
}

fn validate_segments(segments: &[Segment], today: NaiveDate, report: &mut ValidationReport) {
    for (index, segment) in segments.iter().enumerate() {
        let label = format!("segment-{}", index);
        if let Some(issue) = validate_date(segment.departure_date.as_ref(), &label, today) {
            report.insert(FieldKey::segment(index), issue);
            continue;
        }
        if index == 0 {
            continue;
        }

        // A previous date that cannot be read leaves nothing to compare with.
        let prev = segments[index - 1]
            .departure_date
            .as_ref()
            .and_then(DateInput::resolve);
        let curr = segment.departure_date.as_ref().and_then(DateInput::resolve);
        if let (Some(prev), Some(curr)) = (prev, curr) {
            if curr <= prev {
                report.insert(FieldKey::segment(index), DateIssue::NotAfterPreviousSegment);
            }
        }
    }
}
