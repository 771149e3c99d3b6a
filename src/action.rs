//! Actions - everything that can happen to the dashboard

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::geo::GeoFailure;
use crate::state::{Coordinates, ForecastResponse, RequestId, RequestOrigin};

/// Application actions with automatic category inference
#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    // ===== Search category =====
    /// Search field text changed
    SearchInputChange(String),

    /// Submit the search field (Enter)
    SearchSubmit(String),

    // ===== Locate category =====
    /// Intent: look up the forecast for the current position
    LocateRequest,

    /// Result: position resolved for a request
    LocateDidResolve {
        request: RequestId,
        coords: Coordinates,
    },

    /// Result: position unavailable
    LocateDidFail {
        request: RequestId,
        failure: GeoFailure,
    },

    // ===== Forecast category =====
    /// Result: forecast loaded
    ForecastDidLoad {
        request: RequestId,
        origin: RequestOrigin,
        forecast: ForecastResponse,
    },

    /// Result: forecast fetch failed
    ForecastDidError {
        request: RequestId,
        origin: RequestOrigin,
        error: String,
    },

    // ===== Card category =====
    /// Move the card selection
    CardSelect(usize),

    /// Remove the card for a city
    CardDismiss(String),

    // ===== Focus category =====
    FocusSearch,
    FocusCards,

    // ===== Banner category =====
    /// A banner's lifetime ran out
    BannerExpire(u64),

    // ===== Uncategorized (global) =====
    /// Spinner frame
    Tick,

    /// Force a re-render (cursor movement etc.)
    Render,

    /// Exit the application
    Quit,
}
