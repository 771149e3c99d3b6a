//! Device location lookup
//!
//! A terminal has no browser geolocation, so the "device position" comes from a
//! configured [`LocationSource`]: either fixed coordinates or an IP lookup.
//! Running without a source is the "capability absent" case.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::Coordinates;

/// Why a location lookup produced no position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum GeoFailure {
    /// No location source is available at all
    Unsupported,
    /// A source exists but refused or failed
    Denied,
}

#[derive(thiserror::Error, Debug)]
pub enum GeoError {
    #[error("location lookup request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("location lookup refused: {0}")]
    Refused(String),
}

#[async_trait]
pub trait LocationSource: Send + Sync {
    async fn locate(&self) -> Result<Coordinates, GeoError>;
}

/// Always answers with the configured coordinates
pub struct FixedLocation(pub Coordinates);

#[async_trait]
impl LocationSource for FixedLocation {
    async fn locate(&self) -> Result<Coordinates, GeoError> {
        Ok(self.0)
    }
}

pub const DEFAULT_IP_LOOKUP_URL: &str = "http://ip-api.com/json/?fields=status,message,lat,lon";

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

/// Resolves the position of this machine's public IP
pub struct IpLocation {
    client: reqwest::Client,
    url: String,
}

impl IpLocation {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl LocationSource for IpLocation {
    async fn locate(&self) -> Result<Coordinates, GeoError> {
        let data: IpLookupResponse = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if data.status.as_deref().is_some_and(|status| status != "success") {
            return Err(GeoError::Refused(
                data.message.unwrap_or_else(|| "lookup failed".to_string()),
            ));
        }

        match (data.lat, data.lon) {
            (Some(lat), Some(lon)) => Ok(Coordinates { lat, lon }),
            _ => Err(GeoError::Refused("response had no coordinates".to_string())),
        }
    }
}

/// Ask `source` for a position; `None` means the capability is absent.
pub async fn locate(source: Option<&dyn LocationSource>) -> Result<Coordinates, GeoFailure> {
    let Some(source) = source else {
        tracing::warn!("location requested but no location source is configured");
        return Err(GeoFailure::Unsupported);
    };

    source.locate().await.map_err(|err| {
        tracing::warn!(error = %err, "location lookup failed");
        GeoFailure::Denied
    })
}
