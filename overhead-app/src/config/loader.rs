//! TOML configuration loader
//!
//! Reads the configuration file once at startup. A missing file falls back
//! to the built-in defaults; a file that exists but cannot be read, parsed
//! or validated is fatal.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use overhead_core::config::{Config, ConfigError};

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum LoadError {
    /// File exists but could not be read
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// TOML syntax or type error
    #[error("cannot parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// Parsed, but violates a constraint
    #[error("invalid configuration: {0}")]
    Invalid(#[from] ConfigError),
}

/// Load and validate the configuration at `path`
pub fn load(path: &Path) -> Result<Config, LoadError> {
    info!("Loading configuration from {}", path.display());

    let config = match fs::read_to_string(path) {
        Ok(text) => {
            debug!("Read {} bytes of TOML", text.len());
            parse_config(&text)?
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!("{} not found, using defaults", path.display());
            let config = Config::default();
            config.validate()?;
            config
        }
        Err(source) => {
            return Err(LoadError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    log_config_summary(&config);
    Ok(config)
}

/// Parse and validate configuration text
pub fn parse_config(text: &str) -> Result<Config, LoadError> {
    let config: Config = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
}

fn log_config_summary(config: &Config) {
    let display_cfg = &config.display;
    info!(
        "Location: {} ({:.4}, {:.4}), radius {} km",
        config.location.name, config.location.latitude, config.location.longitude, config.flight_radius_km
    );
    info!(
        "Display: logical {} rotated {} onto {} panel, tick {} ms",
        display_cfg.logical(),
        display_cfg.rotation.degrees(),
        display_cfg.panel.resolution(),
        display_cfg.timing.tick_ms
    );
    info!(
        "Feeds: flights every {} s (max age {} s), weather every {} s (max age {} s)",
        config.flight_update_interval_seconds,
        config.flight_max_age().as_secs(),
        config.weather.update_interval_seconds,
        config.weather_max_age().as_secs()
    );
    info!(
        "Touch: {}, HDMI mirror: {}, watchlist: {} entries",
        if config.touch.enabled { "on" } else { "off" },
        if display_cfg.mirror_hdmi { "on" } else { "off" },
        config.watchlist.len()
    );
}
