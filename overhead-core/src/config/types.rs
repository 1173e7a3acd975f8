//! Top-level configuration
//!
//! Location, feed cadence, freshness limits and touch calibration. Display
//! hardware lives in [`super::display`].

use std::time::Duration;

use heapless::String;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::display::DisplayConfig;
use crate::data::Watchlist;
use crate::geo::Position;
use crate::geometry::Resolution;

/// Maximum location name length
pub const MAX_LABEL_LEN: usize = 32;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("latitude {0} outside -90..=90")]
    InvalidLatitude(f64),
    #[error("longitude {0} outside -180..=180")]
    InvalidLongitude(f64),
    #[error("flight radius must be positive, got {0} km")]
    InvalidRadius(f64),
    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),
    #[error(
        "logical {logical} rotated {rotation} degrees does not fit the {panel} panel"
    )]
    GeometryMismatch {
        logical: Resolution,
        rotation: u16,
        panel: Resolution,
    },
    #[error("SPI mode must be 0-3, got {0}")]
    InvalidSpiMode(u8),
    #[error("SPI max transfer must be 1..=65536 bytes, got {0}")]
    InvalidTransfer(usize),
    #[error("touch calibration for the {0} axis has equal endpoints")]
    DegenerateCalibration(&'static str),
    #[error("{0} path is empty")]
    EmptyPath(&'static str),
}

/// Observer location
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Location {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Name shown on the idle screen
    pub name: String<MAX_LABEL_LEN>,
}

impl Default for Location {
    fn default() -> Self {
        let mut name = String::new();
        let _ = name.push_str("London");
        Self {
            latitude: 51.5074,
            longitude: -0.1278,
            name,
        }
    }
}

impl Location {
    pub fn position(&self) -> Position {
        Position::new(self.latitude, self.longitude)
    }
}

/// Weather feed settings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WeatherConfig {
    /// Seconds between weather refreshes
    pub update_interval_seconds: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            update_interval_seconds: 900,
        }
    }
}

/// How old a snapshot may get before it is treated as stale
///
/// Unset limits derive from the matching update interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FreshnessConfig {
    /// Flight snapshot age limit (default: 3 update intervals)
    pub flight_max_age_seconds: Option<u64>,
    /// Weather snapshot age limit (default: 2 update intervals)
    pub weather_max_age_seconds: Option<u64>,
}

/// Touch panel settings
///
/// Calibration endpoints are the raw readings at the logical left/right and
/// top/bottom edges. Swapping an endpoint pair inverts that axis.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TouchConfig {
    /// Enable touch input
    pub enabled: bool,
    /// evdev node; discovered by name when unset
    pub device: Option<std::string::String>,
    /// Consecutive pressed polls required before a tap is emitted
    pub min_press_polls: u8,
    /// Raw reading at logical x = 0
    pub raw_x_min: u16,
    /// Raw reading at logical x = width - 1
    pub raw_x_max: u16,
    /// Raw reading at logical y = 0
    pub raw_y_min: u16,
    /// Raw reading at logical y = height - 1
    pub raw_y_max: u16,
    /// Sensor X runs along the logical Y axis
    pub swap_xy: bool,
}

impl Default for TouchConfig {
    fn default() -> Self {
        // ADS7846 on the MHS35 with the panel turned to landscape
        Self {
            enabled: true,
            device: None,
            min_press_polls: 2,
            raw_x_min: 3900,
            raw_x_max: 200,
            raw_y_min: 200,
            raw_y_max: 3900,
            swap_xy: true,
        }
    }
}

/// Where live snapshots come from
///
/// External fetchers keep these files current; the feed tasks only read.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FeedConfig {
    /// TOML file with `[[aircraft]]` tables
    pub flights_spool: std::string::String,
    /// TOML file with a `[weather]` table
    pub weather_spool: std::string::String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            flights_spool: "/run/overhead/flights.toml".into(),
            weather_spool: "/run/overhead/weather.toml".into(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    pub location: Location,
    /// Aircraft further away than this are ignored
    pub flight_radius_km: f64,
    /// Seconds between flight refreshes
    pub flight_update_interval_seconds: u64,
    pub weather: WeatherConfig,
    pub display: DisplayConfig,
    pub touch: TouchConfig,
    pub freshness: FreshnessConfig,
    pub feeds: FeedConfig,
    /// Registrations that get highlighted
    pub watchlist: Watchlist,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            location: Location::default(),
            flight_radius_km: 50.0,
            flight_update_interval_seconds: 15,
            weather: WeatherConfig::default(),
            display: DisplayConfig::default(),
            touch: TouchConfig::default(),
            freshness: FreshnessConfig::default(),
            feeds: FeedConfig::default(),
            watchlist: Watchlist::default(),
        }
    }
}

impl Config {
    /// Check every cross-field constraint once, at load time
    pub fn validate(&self) -> Result<(), ConfigError> {
        let loc = &self.location;
        if !(-90.0..=90.0).contains(&loc.latitude) {
            return Err(ConfigError::InvalidLatitude(loc.latitude));
        }
        if !(-180.0..=180.0).contains(&loc.longitude) {
            return Err(ConfigError::InvalidLongitude(loc.longitude));
        }
        if !(self.flight_radius_km > 0.0) {
            return Err(ConfigError::InvalidRadius(self.flight_radius_km));
        }
        if self.flight_update_interval_seconds == 0 {
            return Err(ConfigError::ZeroInterval("flight_update_interval_seconds"));
        }
        if self.weather.update_interval_seconds == 0 {
            return Err(ConfigError::ZeroInterval("weather.update_interval_seconds"));
        }
        if self.freshness.flight_max_age_seconds == Some(0) {
            return Err(ConfigError::ZeroInterval("freshness.flight_max_age_seconds"));
        }
        if self.freshness.weather_max_age_seconds == Some(0) {
            return Err(ConfigError::ZeroInterval("freshness.weather_max_age_seconds"));
        }

        self.display.validate()?;

        if self.touch.enabled {
            if self.touch.raw_x_min == self.touch.raw_x_max {
                return Err(ConfigError::DegenerateCalibration("x"));
            }
            if self.touch.raw_y_min == self.touch.raw_y_max {
                return Err(ConfigError::DegenerateCalibration("y"));
            }
            if self.touch.min_press_polls == 0 {
                return Err(ConfigError::ZeroInterval("touch.min_press_polls"));
            }
        }

        if self.feeds.flights_spool.is_empty() {
            return Err(ConfigError::EmptyPath("feeds.flights_spool"));
        }
        if self.feeds.weather_spool.is_empty() {
            return Err(ConfigError::EmptyPath("feeds.weather_spool"));
        }

        Ok(())
    }

    /// Interval between flight refreshes
    pub fn flight_update_interval(&self) -> Duration {
        Duration::from_secs(self.flight_update_interval_seconds)
    }

    /// Interval between weather refreshes
    pub fn weather_update_interval(&self) -> Duration {
        Duration::from_secs(self.weather.update_interval_seconds)
    }

    /// Age beyond which a flight snapshot no longer drives the Flight screen
    pub fn flight_max_age(&self) -> Duration {
        match self.freshness.flight_max_age_seconds {
            Some(s) => Duration::from_secs(s),
            None => self.flight_update_interval() * 3,
        }
    }

    /// Age beyond which weather fields render as placeholders
    pub fn weather_max_age(&self) -> Duration {
        match self.freshness.weather_max_age_seconds {
            Some(s) => Duration::from_secs(s),
            None => self.weather_update_interval() * 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert_eq!(Config::default().validate(), Ok(()));
    }

    #[test]
    fn test_derived_freshness() {
        let config = Config::default();
        assert_eq!(config.flight_max_age(), Duration::from_secs(45));
        assert_eq!(config.weather_max_age(), Duration::from_secs(1800));

        let mut config = Config::default();
        config.freshness.flight_max_age_seconds = Some(20);
        assert_eq!(config.flight_max_age(), Duration::from_secs(20));
    }

    #[test]
    fn test_rejects_bad_location() {
        let mut config = Config::default();
        config.location.latitude = 91.0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidLatitude(91.0)));
    }

    #[test]
    fn test_rejects_nan_radius() {
        let mut config = Config::default();
        config.flight_radius_km = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRadius(_))
        ));
    }

    #[test]
    fn test_rejects_flat_calibration() {
        let mut config = Config::default();
        config.touch.raw_y_max = config.touch.raw_y_min;
        assert_eq!(
            config.validate(),
            Err(ConfigError::DegenerateCalibration("y"))
        );

        // Ignored when touch is off
        config.touch.enabled = false;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_parse_partial_toml() {
        let text = r#"
            flight_radius_km = 25.0

            [location]
            latitude = 40.6413
            longitude = -73.7781
            name = "JFK"

            [display]
            rotation = 270
            mirror_hdmi = false

            [watchlist]
            "N628TS" = "Elon's jet"
        "#;
        let config: Config = toml::from_str(text).unwrap();
        assert_eq!(config.flight_radius_km, 25.0);
        assert_eq!(config.location.name.as_str(), "JFK");
        assert_eq!(config.display.rotation, crate::geometry::Rotation::Deg270);
        assert!(!config.display.mirror_hdmi);
        // Untouched sections keep their defaults
        assert_eq!(config.flight_update_interval_seconds, 15);
        assert_eq!(config.display.width, 480);
        assert!(config.watchlist.lookup("n628ts").is_some());
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_parse_rejects_odd_rotation() {
        let text = "[display]\nrotation = 45\n";
        assert!(toml::from_str::<Config>(text).is_err());
    }
}
