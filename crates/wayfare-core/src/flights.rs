use crate::validator::FormKind;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// One priced flight as returned by the search backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightOption {
    pub airline: String,
    #[serde(default)]
    pub airline_name: Option<String>,
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub duration: String,
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub stops: u32,
    #[serde(default)]
    pub cabin_class: Option<String>,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl FlightOption {
    pub fn carrier(&self) -> &str {
        self.airline_name.as_deref().unwrap_or(&self.airline)
    }

    pub fn stops_label(&self) -> String {
        if self.stops == 0 {
            "Direct".to_string()
        } else {
            format!("{} stop(s)", self.stops)
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} {}  {} -> {}  {} / {}  {}  {}  {:.2} {}",
            self.carrier(),
            self.flight_number,
            self.origin,
            self.destination,
            self.departure_time,
            self.arrival_time,
            self.duration,
            self.stops_label(),
            self.price,
            self.currency
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRoute {
    pub origin: String,
    pub destination: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentFlights {
    pub segment: SegmentRoute,
    #[serde(default)]
    pub flights: Vec<FlightOption>,
}

/// The three result shapes, one per search kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlightResults {
    Return {
        outbound: Vec<FlightOption>,
        #[serde(rename = "return")]
        inbound: Vec<FlightOption>,
    },
    MultiCity(Vec<SegmentFlights>),
    Single(Vec<FlightOption>),
}

impl FlightResults {
    /// Plain-text listing, grouped the same way the results page groups them.
    pub fn render(&self) -> String {
        let mut out = String::new();
        match self {
            FlightResults::Single(flights) => render_list(&mut out, flights),
            FlightResults::Return { outbound, inbound } => {
                out.push_str("Outbound Flights\n");
                render_list(&mut out, outbound);
                out.push_str("Return Flights\n");
                render_list(&mut out, inbound);
            }
            FlightResults::MultiCity(segments) => {
                if segments.is_empty() {
                    out.push_str("No flights found\n");
                }
                for (i, seg) in segments.iter().enumerate() {
                    out.push_str(&format!(
                        "Segment {}: {} -> {}\n",
                        i + 1,
                        seg.segment.origin,
                        seg.segment.destination
                    ));
                    render_list(&mut out, &seg.flights);
                }
            }
        }
        out
    }
}

fn render_list(out: &mut String, flights: &[FlightOption]) {
    if flights.is_empty() {
        out.push_str("  No flights found\n");
        return;
    }
    for flight in flights {
        out.push_str("  ");
        out.push_str(&flight.summary());
        out.push('\n');
    }
}

/// A stored search as the history endpoint reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub trip_id: Option<i64>,
    pub search_type: FormKind,
    pub origin: String,
    pub destination: String,
    #[serde(default)]
    pub departure_date: Option<NaiveDate>,
    #[serde(default)]
    pub return_date: Option<NaiveDate>,
    pub passengers: u32,
    #[serde(default)]
    pub search_results: Option<serde_json::Value>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl SearchRecord {
    /// Typed view of `search_results`; `None` when absent or of an unknown shape.
    pub fn results(&self) -> Option<FlightResults> {
        let raw = self.search_results.as_ref()?;
        match serde_json::from_value(raw.clone()) {
            Ok(results) => Some(results),
            Err(e) => {
                log::warn!("Unrecognised search_results payload — id={:?} err={}", self.id, e);
                None
            }
        }
    }

    pub fn headline(&self) -> String {
        let dates = match (self.departure_date, self.return_date) {
            (Some(dep), Some(ret)) => format!("{} - {}", dep, ret),
            (Some(dep), None) => dep.to_string(),
            _ => "-".to_string(),
        };
        format!(
            "#{} [{}] {} -> {}  {}  pax {}",
            self.id.map(|id| id.to_string()).unwrap_or_else(|| "?".to_string()),
            self.search_type,
            self.origin,
            self.destination,
            dates,
            self.passengers
        )
    }
}
