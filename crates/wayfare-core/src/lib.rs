pub mod api;
pub mod directory;
pub mod flights;
pub mod itinerary;
pub mod settings;
pub mod validator;

use directory::{AirportDirectory, DirectoryError};
use settings::Settings;
use std::path::PathBuf;

pub use directory::Airport;
pub use itinerary::{ItineraryError, ItineraryForm, SearchRequest};
pub use validator::{
    local_today, validate_date, validate_itinerary, DateField, DateInput, DateIssue, FieldKey,
    FormKind, ValidationReport,
};

/// Per-user configuration directory, e.g. `~/.config/wayfare` on Linux.
pub fn get_config_root() -> PathBuf {
    directories::ProjectDirs::from("org", "wayfare", "Wayfare")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".wayfare"))
}

/// The airport list selected by `settings`: a user file if configured,
/// otherwise the bundled list.
pub fn load_directory(settings: &Settings) -> Result<AirportDirectory, DirectoryError> {
    match &settings.airports_file {
        Some(path) => AirportDirectory::from_file(path),
        None => AirportDirectory::bundled(),
    }
}
