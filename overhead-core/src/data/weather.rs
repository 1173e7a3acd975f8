//! Weather reports and snapshots

use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Current conditions plus today's summary
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WeatherReport {
    pub temperature_c: f32,
    /// Apparent temperature
    pub feels_like_c: f32,
    /// Relative humidity, percent
    pub humidity: u8,
    pub wind_speed_kmh: f32,
    /// Direction the wind blows from, degrees
    pub wind_direction: u16,
    pub wind_gusts_kmh: f32,
    /// Surface pressure
    pub pressure_hpa: f32,
    /// WMO weather interpretation code
    pub weather_code: u8,
    /// Overrides the description derived from `weather_code`
    pub description: Option<String>,
    pub is_day: bool,
    /// Local sunrise, "HH:MM"
    pub sunrise: Option<String>,
    /// Local sunset, "HH:MM"
    pub sunset: Option<String>,
    /// Today's maximum
    pub temp_max_c: f32,
    /// Today's minimum
    pub temp_min_c: f32,
    /// Today's precipitation total
    pub precipitation_mm: f32,
}

impl WeatherReport {
    /// Human readable conditions
    pub fn description(&self) -> &str {
        match self.description.as_deref() {
            Some(d) if !d.is_empty() => d,
            _ => describe_weather_code(self.weather_code),
        }
    }

    /// 16-point compass name for the wind direction
    pub fn wind_compass(&self) -> &'static str {
        compass_point(self.wind_direction)
    }
}

/// A weather report as published by the collaborator
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub report: WeatherReport,
    pub fetched_at: Instant,
}

impl WeatherSnapshot {
    pub fn new(report: WeatherReport, fetched_at: Instant) -> Self {
        Self { report, fetched_at }
    }

    /// Age relative to `now`
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.fetched_at)
    }
}

/// Describe a WMO weather interpretation code
pub fn describe_weather_code(code: u8) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Foggy",
        48 => "Rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow",
        73 => "Moderate snow",
        75 => "Heavy snow",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}

const COMPASS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Nearest of the 16 compass points for a bearing in degrees
pub fn compass_point(degrees: u16) -> &'static str {
    let index = ((degrees % 360) as f32 / 22.5).round() as usize % 16;
    COMPASS[index]
}
