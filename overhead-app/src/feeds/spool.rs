//! TOML spool file feeds
//!
//! Flight spool:
//!
//! ```toml
//! [[aircraft]]
//! flight_number = "BA123"
//! latitude = 51.6
//! longitude = -0.03
//! altitude_ft = 35000
//! ```
//!
//! Weather spool:
//!
//! ```toml
//! [weather]
//! temperature_c = 15.0
//! weather_code = 2
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::trace;

use overhead_core::data::{Aircraft, FeedError, FlightFeed, WeatherFeed, WeatherReport};

#[derive(Debug, Deserialize)]
struct FlightSpool {
    #[serde(default)]
    aircraft: Vec<Aircraft>,
}

#[derive(Debug, Deserialize)]
struct WeatherSpool {
    weather: WeatherReport,
}

async fn read_spool(path: &Path) -> Result<String, FeedError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| FeedError::Unavailable(format!("{}: {}", path.display(), e)))
}

fn parse_flights(text: &str) -> Result<Vec<Aircraft>, FeedError> {
    toml::from_str::<FlightSpool>(text)
        .map(|spool| spool.aircraft)
        .map_err(|e| FeedError::Malformed(e.to_string()))
}

fn parse_weather(text: &str) -> Result<WeatherReport, FeedError> {
    toml::from_str::<WeatherSpool>(text)
        .map(|spool| spool.weather)
        .map_err(|e| FeedError::Malformed(e.to_string()))
}

/// Aircraft list read from a spool file
pub struct SpoolFlightFeed {
    path: PathBuf,
}

impl SpoolFlightFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FlightFeed for SpoolFlightFeed {
    async fn fetch(&mut self) -> Result<Vec<Aircraft>, FeedError> {
        let text = read_spool(&self.path).await?;
        let aircraft = parse_flights(&text)?;
        trace!("{} aircraft in {}", aircraft.len(), self.path.display());
        Ok(aircraft)
    }
}

/// Weather report read from a spool file
pub struct SpoolWeatherFeed {
    path: PathBuf,
}

impl SpoolWeatherFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl WeatherFeed for SpoolWeatherFeed {
    async fn fetch(&mut self) -> Result<WeatherReport, FeedError> {
        let text = read_spool(&self.path).await?;
        parse_weather(&text)
    }
}
