use crate::itinerary::{CabinClass, MAX_PASSENGERS, MIN_PASSENGERS};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the trip / airfare backend.
    pub api_base_url: String,
    pub timeout_secs: u64,
    /// Replaces the bundled airport list when set (`.json` or `.csv`).
    pub airports_file: Option<PathBuf>,
    pub default_passengers: u32,
    pub default_cabin: CabinClass,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 30,
            airports_file: None,
            default_passengers: 1,
            default_cabin: CabinClass::Economy,
        }
    }
}

impl Settings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn sanitized(mut self) -> Self {
        let defaults = Settings::default();
        if self.api_base_url.trim().is_empty() {
            log::warn!("Empty api_base_url in settings; using {}", defaults.api_base_url);
            self.api_base_url = defaults.api_base_url;
        }
        if self.timeout_secs == 0 {
            log::warn!("timeout_secs must be positive; using {}", defaults.timeout_secs);
            self.timeout_secs = defaults.timeout_secs;
        }
        if !(MIN_PASSENGERS..=MAX_PASSENGERS).contains(&self.default_passengers) {
            log::warn!(
                "default_passengers out of range — value={} using={}",
                self.default_passengers,
                defaults.default_passengers
            );
            self.default_passengers = defaults.default_passengers;
        }
        self
    }
}

#[derive(Debug, Clone)]
pub struct SettingsManager {
    config_path: PathBuf,
}

impl Default for SettingsManager {
    fn default() -> Self {
        Self::new(crate::get_config_root().join("settings.json"))
    }
}

impl SettingsManager {
    pub fn new<P: AsRef<Path>>(config_path: P) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Reads the settings file. A missing file yields the defaults; values
    /// out of range are replaced by their default.
    pub fn load(&self) -> Result<Settings> {
        let path = &self.config_path;
        if !path.exists() {
            log::debug!("No settings file; using defaults — path={}", path.display());
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings {}", path.display()))?;

        Ok(settings.sanitized())
    }

    /// Writes through a sibling temp file so a crash never leaves a
    /// truncated settings.json behind.
    pub fn save(&self, settings: &Settings) -> Result<()> {
        let path = &self.config_path;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content =
            serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content)
            .with_context(|| format!("Failed to write settings {}", tmp.display()))?;
        fs::rename(&tmp, path)
            .with_context(|| format!("Failed to replace settings {}", path.display()))
    }
}
