use crate::flights::{SearchRecord, Trip};
use crate::itinerary::SearchRequest;
use crate::settings::Settings;
use log::{debug, info};
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

const MAX_TRIP_NAME_LEN: usize = 255;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request timeout. Please try again.")]
    Timeout,
    #[error("Cannot connect to server. Make sure the backend is running on {0}")]
    Connect(String),
    #[error("{detail}")]
    Status { status: u16, detail: String },
    #[error("{0}")]
    InvalidRequest(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Blocking client for the trip and airfare backend.
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ApiError> {
        Self::new(&settings.api_base_url, settings.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str, trip_id: Option<i64>) -> String {
        match trip_id {
            Some(id) => format!("{}{}?trip_id={}", self.base_url, path, id),
            None => format!("{}{}", self.base_url, path),
        }
    }

    pub fn list_trips(&self) -> Result<Vec<Trip>, ApiError> {
        self.fetch(self.http.get(self.url("/trips", None)))
    }

    pub fn get_trip(&self, id: i64) -> Result<Trip, ApiError> {
        self.fetch(self.http.get(self.url(&format!("/trips/{}", id), None)))
    }

    pub fn create_trip(&self, name: &str) -> Result<Trip, ApiError> {
        let name = name.trim();
        if name.is_empty() || name.chars().count() > MAX_TRIP_NAME_LEN {
            return Err(ApiError::InvalidRequest(format!(
                "Trip name must be 1-{} characters",
                MAX_TRIP_NAME_LEN
            )));
        }
        let body = serde_json::json!({ "name": name });
        let trip: Trip = self.fetch(self.http.post(self.url("/trips", None)).json(&body))?;
        info!("Created trip — id={} name={}", trip.id, trip.name);
        Ok(trip)
    }

    pub fn delete_trip(&self, id: i64) -> Result<(), ApiError> {
        self.execute(self.http.delete(self.url(&format!("/trips/{}", id), None)))?;
        info!("Deleted trip — id={}", id);
        Ok(())
    }

    /// Submits a validated search, optionally filing it under a trip.
    pub fn search(
        &self,
        request: &SearchRequest,
        trip_id: Option<i64>,
    ) -> Result<SearchRecord, ApiError> {
        let url = self.url(request.endpoint(), trip_id);
        info!("Submitting {} search — url={}", request.kind(), url);
        self.fetch(self.http.post(url).json(request))
    }

    pub fn history(&self, trip_id: Option<i64>) -> Result<Vec<SearchRecord>, ApiError> {
        self.fetch(self.http.get(self.url("/airfare/searches", trip_id)))
    }

    pub fn get_search(&self, id: i64) -> Result<SearchRecord, ApiError> {
        self.fetch(self.http.get(self.url(&format!("/airfare/searches/{}", id), None)))
    }

    fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.execute(request)?;
        response.json::<T>().map_err(|e| self.map_transport(e))
    }

    fn execute(&self, request: RequestBuilder) -> Result<reqwest::blocking::Response, ApiError> {
        let response = request.send().map_err(|e| self.map_transport(e))?;
        let status = response.status();
        debug!("Backend responded — url={} status={}", response.url(), status);

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            detail: error_detail(status.as_u16(), status.canonical_reason(), &body),
        })
    }

    fn map_transport(&self, e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_connect() {
            ApiError::Connect(self.base_url.clone())
        } else {
            ApiError::Http(e)
        }
    }
}

/// Best human-readable message for a failed response: the backend's
/// `detail` (a string, or a list of validation errors) or the status line.
fn error_detail(status: u16, reason: Option<&str>, body: &str) -> String {
    let fallback = || match reason {
        Some(reason) => format!("Request failed: {} {}", status, reason),
        None => format!("Request failed: {}", status),
    };

    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return fallback();
    };

    match value.get("detail") {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Array(items)) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect();
            if msgs.is_empty() {
                fallback()
            } else {
                msgs.join("; ")
            }
        }
        _ => fallback(),
    }
}
