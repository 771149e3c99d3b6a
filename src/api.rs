//! OpenWeather 5-day/3-hour forecast client

use serde::Deserialize;
use tracing::instrument;

use crate::state::{City, Coordinates, ForecastEntry, ForecastResponse};

pub const DEFAULT_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/forecast";

/// What to ask the forecast endpoint for
#[derive(Clone, Debug, PartialEq)]
pub enum ForecastQuery {
    City(String),
    Coords(Coordinates),
}

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("forecast request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("forecast unavailable (HTTP {0})")]
    NotFound(reqwest::StatusCode),
    #[error("malformed forecast payload: {0}")]
    Decode(String),
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwEntry>,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    coord: Option<OwCoord>,
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwEntry {
    dt: i64,
    main: OwMain,
    wind: OwWind,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

impl From<OwEntry> for ForecastEntry {
    fn from(entry: OwEntry) -> Self {
        let (description, icon) = entry
            .weather
            .into_iter()
            .next()
            .map(|w| (w.description, w.icon))
            .unwrap_or_default();
        ForecastEntry {
            timestamp: entry.dt,
            temperature: entry.main.temp,
            humidity: entry.main.humidity,
            wind_speed: entry.wind.speed,
            description,
            icon,
        }
    }
}

/// Decode a forecast body; a payload with no entries has no current snapshot
pub fn parse_forecast(body: &str) -> Result<ForecastResponse, FetchError> {
    let data: OwForecastResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;

    if data.list.is_empty() {
        return Err(FetchError::Decode("forecast list is empty".to_string()));
    }

    let coord = data
        .city
        .coord
        .map(|c| Coordinates {
            lat: c.lat,
            lon: c.lon,
        })
        .unwrap_or_default();

    Ok(ForecastResponse {
        city: City {
            name: data.city.name,
            country: data.city.country,
            coord,
        },
        entries: data.list.into_iter().map(ForecastEntry::from).collect(),
    })
}

// ============================================================================
// Client
// ============================================================================

#[derive(Clone, Debug)]
pub struct ForecastClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl ForecastClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_endpoint(api_key, DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    /// Full request URL for a query, credential included
    pub fn url(&self, query: &ForecastQuery) -> String {
        match query {
            ForecastQuery::City(name) => format!(
                "{}?q={}&appid={}&units=metric",
                self.endpoint,
                urlencoding::encode(name),
                urlencoding::encode(&self.api_key)
            ),
            ForecastQuery::Coords(Coordinates { lat, lon }) => format!(
                "{}?lat={}&lon={}&appid={}&units=metric",
                self.endpoint,
                lat,
                lon,
                urlencoding::encode(&self.api_key)
            ),
        }
    }

    /// Single GET, no retry
    #[instrument(skip(self), level = "info")]
    pub async fn fetch(&self, query: &ForecastQuery) -> Result<ForecastResponse, FetchError> {
        let response = self.http.get(self.url(query)).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "forecast endpoint returned an error status");
            return Err(FetchError::NotFound(status));
        }

        let body = response.text().await?;
        let forecast = parse_forecast(&body)?;
        tracing::info!(
            city = %forecast.city.name,
            entries = forecast.entries.len(),
            "forecast loaded"
        );
        Ok(forecast)
    }
}
