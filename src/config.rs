//! Runtime configuration and logging setup
//!
//! The API credential is never compiled in: it comes from `--api-key` or the
//! `OPENWEATHER_API_KEY` environment variable.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing_subscriber::EnvFilter;

use crate::api::{DEFAULT_ENDPOINT, ForecastClient};
use crate::geo::{DEFAULT_IP_LOOKUP_URL, FixedLocation, IpLocation, LocationSource};
use crate::state::Coordinates;

pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("missing API key: pass --api-key or set {API_KEY_ENV}")]
    MissingApiKey,
    #[error("UTC offset of {0} hours is out of range")]
    InvalidOffset(f64),
    #[error("--lat and --lon must be given together")]
    PartialLocation,
    #[error("could not open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not install logger: {0}")]
    Logger(String),
}

/// Dashboard options, flattened into the binary's CLI
#[derive(clap::Args, Debug, Clone, Default)]
pub struct Settings {
    /// OpenWeather API key (falls back to $OPENWEATHER_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Forecast endpoint
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// City to search for at startup
    #[arg(long, short)]
    pub city: Option<String>,

    /// Hours east of UTC used to group forecasts into days (default: local offset)
    #[arg(long, allow_hyphen_values = true)]
    pub utc_offset: Option<f64>,

    /// Fixed latitude for "my location" (requires --lon)
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Fixed longitude for "my location" (requires --lat)
    #[arg(long, allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// IP geolocation endpoint used when no fixed position is given
    #[arg(long, default_value = DEFAULT_IP_LOOKUP_URL)]
    pub geo_url: String,

    /// Disable "my location" entirely
    #[arg(long)]
    pub no_geolocation: bool,

    /// Log file (stdout belongs to the terminal UI)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Where "my location" comes from
#[derive(Clone, Debug, PartialEq)]
pub enum LocationConfig {
    Disabled,
    Fixed(Coordinates),
    Ip { url: String },
}

impl LocationConfig {
    pub fn source(&self) -> Option<Arc<dyn LocationSource>> {
        match self {
            LocationConfig::Disabled => None,
            LocationConfig::Fixed(coords) => Some(Arc::new(FixedLocation(*coords))),
            LocationConfig::Ip { url } => Some(Arc::new(IpLocation::new(url.clone()))),
        }
    }
}

/// Fully resolved configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub api_key: String,
    pub endpoint: String,
    pub initial_city: Option<String>,
    pub utc_offset_secs: i32,
    pub location: LocationConfig,
    pub log_file: PathBuf,
}

impl Config {
    pub fn forecast_client(&self) -> ForecastClient {
        ForecastClient::with_endpoint(self.api_key.clone(), self.endpoint.clone())
    }
}

impl Settings {
    /// Resolve against the environment key and the machine's local offset
    pub fn resolve(
        self,
        env_api_key: Option<String>,
        local_offset_secs: i32,
    ) -> Result<Config, ConfigError> {
        let api_key = self
            .api_key
            .or(env_api_key)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let utc_offset_secs = match self.utc_offset {
            Some(hours) if hours.abs() < 24.0 => (hours * 3600.0).round() as i32,
            Some(hours) => return Err(ConfigError::InvalidOffset(hours)),
            None => local_offset_secs,
        };

        let location = if self.no_geolocation {
            LocationConfig::Disabled
        } else {
            match (self.lat, self.lon) {
                (Some(lat), Some(lon)) => LocationConfig::Fixed(Coordinates { lat, lon }),
                (None, None) => LocationConfig::Ip { url: self.geo_url },
                _ => return Err(ConfigError::PartialLocation),
            }
        };

        let initial_city = self
            .city
            .map(|city| city.trim().to_string())
            .filter(|city| !city.is_empty());

        Ok(Config {
            api_key,
            endpoint: self.endpoint,
            initial_city,
            utc_offset_secs,
            location,
            log_file: self.log_file.unwrap_or_else(default_log_file),
        })
    }
}

pub fn default_log_file() -> PathBuf {
    std::env::temp_dir().join("forecast-dash.log")
}

/// Offset of the machine's local time zone right now
pub fn local_offset_secs() -> i32 {
    chrono::Local::now().offset().local_minus_utc()
}

/// Send `tracing` output to `path`; level from `RUST_LOG`, default `info`
pub fn init_logging(path: &Path) -> Result<(), ConfigError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| ConfigError::LogFile {
            path: path.to_path_buf(),
            source,
        })?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| ConfigError::Logger(e.to_string()))
}
