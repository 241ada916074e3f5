// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};
use std::path::PathBuf;
use wayfare_core::api::ApiClient;
use wayfare_core::flights::SearchRecord;
use wayfare_core::settings::{Settings, SettingsManager};
use wayfare_core::{FormKind, ItineraryError, ItineraryForm};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file (defaults to the per-user config directory)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Backend base URL, overrides the settings file
    #[arg(long, env = "WAYFARE_API_URL")]
    api_url: Option<String>,

    /// Airport list (.json or .csv), overrides the settings file
    #[arg(long)]
    airports: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Suggest airports for a code, city, name or country fragment
    Airports { query: String },
    /// Write an empty itinerary form to fill in
    New {
        #[arg(value_enum)]
        kind: Kind,
        /// Output file
        output: PathBuf,
    },
    /// Check the dates of an itinerary form
    Validate {
        form: PathBuf,
        /// Treat this day as today (YYYY-MM-DD)
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Validate an itinerary form and run the flight search
    Search {
        form: PathBuf,
        /// File the search under this trip
        #[arg(long)]
        trip: Option<i64>,
        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },
    /// Manage trips
    Trips {
        #[command(subcommand)]
        action: TripAction,
    },
    /// Show past searches
    History {
        /// Only searches filed under this trip
        #[arg(long, conflicts_with = "id")]
        trip: Option<i64>,
        /// Show one stored search with its flights
        #[arg(long)]
        id: Option<i64>,
    },
}

#[derive(Subcommand)]
enum TripAction {
    List,
    Show { id: i64 },
    Create { name: String },
    Delete { id: i64 },
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    OneWay,
    Return,
    MultiCity,
}

impl From<Kind> for FormKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::OneWay => FormKind::OneWay,
            Kind::Return => FormKind::Return,
            Kind::MultiCity => FormKind::MultiCity,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let config = ConfigBuilder::new()
        .add_filter_allow_str("wayfare")
        .build();
    // A second init only fails if a logger already exists.
    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto);
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let manager = match &cli.settings {
        Some(path) => SettingsManager::new(path),
        None => SettingsManager::default(),
    };
    let mut settings = manager.load()?;
    if let Some(url) = &cli.api_url {
        settings.api_base_url = url.clone();
    }
    if let Some(path) = &cli.airports {
        settings.airports_file = Some(path.clone());
    }
    log::debug!(
        "Settings loaded — path={} api={}",
        manager.path().display(),
        settings.api_base_url
    );
    Ok(settings)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let settings = load_settings(&cli)?;

    match &cli.command {
        Commands::Airports { query } => {
            let directory = wayfare_core::load_directory(&settings)?;
            let hits = directory.search(query);
            if hits.is_empty() {
                println!("No airports found");
            }
            for airport in hits {
                println!(
                    "{}  {:<16} {:<45} {}",
                    airport.code, airport.city, airport.name, airport.country
                );
            }
        }
        Commands::New { kind, output } => {
            let form = ItineraryForm::new((*kind).into())
                .with_defaults(settings.default_passengers, settings.default_cabin);
            form.save(output)?;
            println!("Wrote empty {} itinerary to {}", form.kind(), output.display());
        }
        Commands::Validate { form, today } => {
            let form = ItineraryForm::load(form)?;
            let today = today.unwrap_or_else(wayfare_core::local_today);
            let report = form.validate(today);
            if report.is_valid() {
                println!("All {} dates are valid", form.kind());
            } else {
                for (key, issue) in report.iter() {
                    println!("{}: {}", key, issue);
                }
                anyhow::bail!("{} date field(s) failed validation", report.len());
            }
        }
        Commands::Search { form, trip, json } => {
            let form = ItineraryForm::load(form)?;
            let directory = wayfare_core::load_directory(&settings)?;
            let request = match form.to_request(&directory, wayfare_core::local_today()) {
                Ok(request) => request,
                Err(ItineraryError::Invalid(report)) => {
                    for (key, issue) in report.iter() {
                        println!("{}: {}", key, issue);
                    }
                    anyhow::bail!("Search not submitted: fix the dates above");
                }
                Err(e) => return Err(e.into()),
            };

            let client = ApiClient::from_settings(&settings)?;
            let record = client.search(&request, *trip)?;
            if *json {
                let out = serde_json::to_string_pretty(&record)
                    .context("Failed to serialize search result")?;
                println!("{}", out);
            } else {
                print_record(&record);
            }
        }
        Commands::Trips { action } => {
            let client = ApiClient::from_settings(&settings)?;
            match action {
                TripAction::List => {
                    let trips = client.list_trips()?;
                    if trips.is_empty() {
                        println!("No trips yet");
                    }
                    for trip in trips {
                        println!("{:>4}  {}", trip.id, trip.name);
                    }
                }
                TripAction::Show { id } => {
                    let trip = client.get_trip(*id)?;
                    println!("Trip {}: {}", trip.id, trip.name);
                    if let Some(created) = &trip.created_at {
                        println!("Created {}", created);
                    }
                    let records = client.history(Some(trip.id))?;
                    if records.is_empty() {
                        println!("No searches filed under this trip");
                    }
                    for record in records {
                        println!("  {}", record.headline());
                    }
                }
                TripAction::Create { name } => {
                    let trip = client.create_trip(name)?;
                    println!("Created trip {} ({})", trip.id, trip.name);
                }
                TripAction::Delete { id } => {
                    client.delete_trip(*id)?;
                    println!("Deleted trip {}", id);
                }
            }
        }
        Commands::History { id: Some(id), .. } => {
            let client = ApiClient::from_settings(&settings)?;
            print_record(&client.get_search(*id)?);
        }
        Commands::History { trip, id: None } => {
            let client = ApiClient::from_settings(&settings)?;
            let records = client.history(*trip)?;
            if records.is_empty() {
                println!("No searches yet");
            }
            for record in records {
                println!("{}", record.headline());
            }
        }
    }

    Ok(())
}

fn print_record(record: &SearchRecord) {
    println!("{}", record.headline());
    match record.results() {
        Some(results) => print!("{}", results.render()),
        None => println!("No flights found"),
    }
}
