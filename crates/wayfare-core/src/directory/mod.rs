// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

pub mod data;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;

/// Upper bound on suggestions handed back for a single query.
pub const MAX_SUGGESTIONS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Airport {
    /// IATA code, three uppercase letters.
    pub code: String,
    pub name: String,
    pub city: String,
    pub country: String,
}

impl Airport {
    pub fn new(code: &str, name: &str, city: &str, country: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            city: city.to_string(),
            country: country.to_string(),
        }
    }

    /// Text shown in the input once a suggestion has been picked, e.g. `JFK - New York`.
    pub fn label(&self) -> String {
        format!("{} - {}", self.code, self.city)
    }

    fn matches(&self, needle: &str) -> bool {
        self.code.to_lowercase().contains(needle)
            || self.city.to_lowercase().contains(needle)
            || self.name.to_lowercase().contains(needle)
            || self.country.to_lowercase().contains(needle)
    }
}

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Invalid airport code '{0}': expected three letters")]
    InvalidCode(String),
    #[error("Duplicate airport code '{0}'")]
    DuplicateCode(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Immutable airport reference list backing the autocomplete.
///
/// Built once and shared by reference; nothing mutates it after construction,
/// so it can be handed to any number of forms (or threads) at the same time.
#[derive(Debug, Clone)]
pub struct AirportDirectory {
    airports: Vec<Airport>,
}

impl AirportDirectory {
    /// Builds a directory from records in their declaration order.
    /// Codes are upper-cased; anything that is not three ASCII letters, or that
    /// repeats an earlier code, is rejected.
    pub fn new(records: Vec<Airport>) -> Result<Self, DirectoryError> {
        let mut seen = HashSet::with_capacity(records.len());
        let mut airports = Vec::with_capacity(records.len());

        for mut airport in records {
            let code = airport.code.trim().to_uppercase();
            if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(DirectoryError::InvalidCode(airport.code));
            }
            if !seen.insert(code.clone()) {
                return Err(DirectoryError::DuplicateCode(code));
            }
            airport.code = code;
            airports.push(airport);
        }

        Ok(Self { airports })
    }

    /// The directory compiled into the binary.
    pub fn bundled() -> Result<Self, DirectoryError> {
        Self::new(data::bundled_airports()?)
    }

    /// Loads a JSON array of `{code, name, city, country}` records.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, DirectoryError> {
        let mut content = String::new();
        BufReader::new(File::open(path)?).read_to_string(&mut content)?;
        Self::new(serde_json::from_str(&content)?)
    }

    /// Loads a CSV file with a `code,name,city,country` header row.
    pub fn from_csv_file<P: AsRef<Path>>(path: P) -> Result<Self, DirectoryError> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
        let records = rdr
            .deserialize::<Airport>()
            .collect::<Result<Vec<_>, csv::Error>>()?;
        Self::new(records)
    }

    /// Picks the loader from the file extension (`.csv`, anything else is JSON).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DirectoryError> {
        let path = path.as_ref();
        let is_csv = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);

        let directory = if is_csv {
            Self::from_csv_file(path)?
        } else {
            Self::from_json_file(path)?
        };
        log::debug!(
            "Loaded airport directory — path={} records={}",
            path.display(),
            directory.len()
        );
        Ok(directory)
    }

    pub fn len(&self) -> usize {
        self.airports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }

    pub fn airports(&self) -> &[Airport] {
        &self.airports
    }

    /// Case-insensitive substring search over code, city, name and country.
    ///
    /// Results keep declaration order (no ranking) and are capped at
    /// [`MAX_SUGGESTIONS`]. A blank query yields nothing.
    pub fn search(&self, query: &str) -> Vec<&Airport> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        // Linear scan; the list is small and re-filtered on every keystroke.
        self.airports
            .iter()
            .filter(|a| a.matches(&needle))
            .take(MAX_SUGGESTIONS)
            .collect()
    }

    /// Exact code lookup, ignoring case and surrounding whitespace.
    pub fn find_code(&self, code: &str) -> Option<&Airport> {
        let code = code.trim();
        self.airports
            .iter()
            .find(|a| a.code.eq_ignore_ascii_case(code))
    }

    /// Turns free text into a single airport: an exact code wins, otherwise
    /// the first suggestion (what pressing Enter in the autocomplete selects).
    pub fn resolve(&self, text: &str) -> Option<&Airport> {
        self.find_code(text)
            .or_else(|| self.search(text).into_iter().next())
    }
}
