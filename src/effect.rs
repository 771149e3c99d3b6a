//! Effects - side effects declared by the reducer, and the async work behind them

use std::sync::Arc;

use crate::action::Action;
use crate::api::{ForecastClient, ForecastQuery};
use crate::geo::{self, LocationSource};
use crate::state::{BANNER_TTL, RequestId, RequestOrigin};

/// Side effects that can be triggered by actions
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fetch the forecast for a city or position
    FetchForecast {
        request: RequestId,
        origin: RequestOrigin,
        query: ForecastQuery,
    },
    /// Ask the location source for the current position
    Locate { request: RequestId },
    /// Remove a banner once its lifetime is over
    ExpireBanner { id: u64 },
}

/// Shared handles the effect tasks need
pub struct Services {
    pub client: ForecastClient,
    pub location: Option<Arc<dyn LocationSource>>,
}

impl Services {
    pub fn new(client: ForecastClient, location: Option<Arc<dyn LocationSource>>) -> Self {
        Self { client, location }
    }
}

impl Effect {
    /// One key per request or banner, so no running task is ever replaced
    pub fn task_key(&self) -> String {
        match self {
            Effect::FetchForecast { request, .. } => format!("forecast_{request}"),
            Effect::Locate { request } => format!("locate_{request}"),
            Effect::ExpireBanner { id } => format!("banner_{id}"),
        }
    }

    /// Perform the effect and report back as an action
    pub async fn run(self, services: Arc<Services>) -> Action {
        match self {
            Effect::FetchForecast {
                request,
                origin,
                query,
            } => match services.client.fetch(&query).await {
                Ok(forecast) => Action::ForecastDidLoad {
                    request,
                    origin,
                    forecast,
                },
                Err(e) => Action::ForecastDidError {
                    request,
                    origin,
                    error: e.to_string(),
                },
            },
            Effect::Locate { request } => match geo::locate(services.location.as_deref()).await {
                Ok(coords) => Action::LocateDidResolve { request, coords },
                Err(failure) => Action::LocateDidFail { request, failure },
            },
            Effect::ExpireBanner { id } => {
                tokio::time::sleep(BANNER_TTL).await;
                Action::BannerExpire(id)
            }
        }
    }
}
