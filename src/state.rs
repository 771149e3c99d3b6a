//! Application state - single source of truth

use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Banner shown when a city search fails
pub const CITY_NOT_FOUND: &str = "City not found. Please try again.";
/// Banner shown when the forecast for a located position fails
pub const LOCATION_WEATHER_FAILED: &str = "Unable to get weather for your location";
/// Banner shown when the location source refuses a lookup
pub const GEOLOCATION_DENIED: &str = "Geolocation is not supported or permission denied";
/// Banner shown when no location source exists at all
pub const GEOLOCATION_UNSUPPORTED: &str = "Geolocation is not supported by your browser";

/// How long an error banner stays on screen
pub const BANNER_TTL: Duration = Duration::from_secs(5);

/// Spinner frame interval while a request is in flight.
pub const SPINNER_TICK_MS: u64 = 80;

/// Identifies one user-triggered fetch; strictly increasing.
pub type RequestId = u64;

/// A latitude/longitude pair
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// City descriptor returned with every forecast
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct City {
    pub name: String,
    pub country: String,
    pub coord: Coordinates,
}

/// One forecast timestep (3-hour steps from the provider)
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ForecastEntry {
    /// Seconds since the unix epoch
    pub timestamp: i64,
    /// Degrees Celsius
    pub temperature: f64,
    /// Percent
    pub humidity: u8,
    /// Meters per second
    pub wind_speed: f64,
    pub description: String,
    /// Provider icon identifier, e.g. `10d`
    pub icon: String,
}

/// Payload for one forecast query
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ForecastResponse {
    pub city: City,
    pub entries: Vec<ForecastEntry>,
}

impl ForecastResponse {
    /// The earliest entry, treated as "now"
    pub fn current(&self) -> Option<&ForecastEntry> {
        self.entries.first()
    }
}

/// Which user action started a request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum RequestOrigin {
    Search,
    Location,
}

/// A displayed card, keyed by city name
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WeatherCard {
    pub city: String,
    /// Request that produced this card
    pub request: RequestId,
    pub forecast: ForecastResponse,
}

impl WeatherCard {
    pub fn new(request: RequestId, forecast: ForecastResponse) -> Self {
        Self {
            city: forecast.city.name.clone(),
            request,
            forecast,
        }
    }
}

/// A transient error message
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ErrorBanner {
    pub id: u64,
    pub message: String,
}

/// Which pane receives key input
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Focus {
    #[default]
    Search,
    Cards,
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    /// Current contents of the search field
    #[debug(section = "Search", label = "Input")]
    pub search_input: String,

    #[debug(section = "Search", label = "Focus", debug_fmt)]
    pub focus: Focus,

    /// Displayed cards, most recent first
    #[debug(section = "Cards", label = "Cards", debug_fmt)]
    pub cards: Vec<WeatherCard>,

    /// Selected card index (card pane focus)
    #[debug(section = "Cards", label = "Selected")]
    pub selected: usize,

    /// Requests awaiting a response; loading is shown while non-empty
    #[debug(section = "Requests", label = "In flight", debug_fmt)]
    pub in_flight: Vec<RequestId>,

    #[debug(section = "Requests", label = "Next id")]
    pub next_request_id: RequestId,

    /// Active error banners in arrival order
    #[debug(section = "Banners", label = "Active", debug_fmt)]
    pub banners: Vec<ErrorBanner>,

    #[debug(skip)]
    pub next_banner_id: u64,

    /// Offset used to turn timestamps into calendar days
    #[debug(section = "Display", label = "UTC offset (s)")]
    pub utc_offset_secs: i32,

    /// Spinner frame counter
    #[debug(skip)]
    pub spinner_tick: u32,
}

impl AppState {
    /// Create state that renders days in the given UTC offset
    pub fn new(utc_offset_secs: i32) -> Self {
        Self {
            search_input: String::new(),
            focus: Focus::default(),
            cards: Vec::new(),
            selected: 0,
            in_flight: Vec::new(),
            next_request_id: 1,
            banners: Vec::new(),
            next_banner_id: 1,
            utc_offset_secs,
            spinner_tick: 0,
        }
    }

    pub fn timezone(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_secs).unwrap_or_else(|| Utc.fix())
    }

    pub fn is_loading(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Allocate a request id and mark it in flight
    pub fn begin_request(&mut self) -> RequestId {
        let id = self.next_request_id;
        self.next_request_id += 1;
        self.in_flight.push(id);
        id
    }

    /// Mark a request as settled; unknown ids are ignored
    pub fn finish_request(&mut self, id: RequestId) -> bool {
        let before = self.in_flight.len();
        self.in_flight.retain(|&pending| pending != id);
        before != self.in_flight.len()
    }

    pub fn card(&self, city: &str) -> Option<&WeatherCard> {
        self.cards.iter().find(|card| card.city == city)
    }

    /// Replace any card for the same city and put the new one first.
    ///
    /// Returns `false` when an existing card came from a newer request,
    /// in which case nothing changes.
    pub fn upsert_card(&mut self, card: WeatherCard) -> bool {
        if let Some(existing) = self.card(&card.city) {
            if existing.request > card.request {
                return false;
            }
        }
        self.cards.retain(|existing| existing.city != card.city);
        self.cards.insert(0, card);
        self.selected = 0;
        true
    }

    /// Remove exactly the card for `city`
    pub fn dismiss_card(&mut self, city: &str) -> bool {
        let before = self.cards.len();
        self.cards.retain(|card| card.city != city);
        if self.cards.len() == before {
            return false;
        }
        self.selected = self.selected.min(self.cards.len().saturating_sub(1));
        true
    }

    pub fn selected_card(&self) -> Option<&WeatherCard> {
        self.cards.get(self.selected)
    }

    /// Append a banner; banners stack without deduplication
    pub fn push_banner(&mut self, message: impl Into<String>) -> u64 {
        let id = self.next_banner_id;
        self.next_banner_id += 1;
        self.banners.push(ErrorBanner {
            id,
            message: message.into(),
        });
        id
    }

    pub fn expire_banner(&mut self, id: u64) -> bool {
        let before = self.banners.len();
        self.banners.retain(|banner| banner.id != id);
        before != self.banners.len()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(0)
    }
}
