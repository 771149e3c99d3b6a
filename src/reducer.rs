//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::api::ForecastQuery;
use crate::effect::Effect;
use crate::geo::GeoFailure;
use crate::state::{
    AppState, CITY_NOT_FOUND, Focus, GEOLOCATION_DENIED, GEOLOCATION_UNSUPPORTED,
    LOCATION_WEATHER_FAILED, RequestOrigin, WeatherCard,
};

/// The reducer handles all state transitions
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Search actions =====
        Action::SearchInputChange(text) => {
            if state.search_input == text {
                return DispatchResult::unchanged();
            }
            state.search_input = text;
            DispatchResult::changed()
        }

        Action::SearchSubmit(text) => {
            let city = text.trim();
            if city.is_empty() {
                return DispatchResult::unchanged();
            }
            let query = ForecastQuery::City(city.to_string());
            let request = state.begin_request();
            state.spinner_tick = 0;
            DispatchResult::changed_with(Effect::FetchForecast {
                request,
                origin: RequestOrigin::Search,
                query,
            })
        }

        // ===== Locate actions =====
        Action::LocateRequest => {
            let request = state.begin_request();
            state.spinner_tick = 0;
            DispatchResult::changed_with(Effect::Locate { request })
        }

        Action::LocateDidResolve { request, coords } => {
            if !state.in_flight.contains(&request) {
                return DispatchResult::unchanged();
            }
            // The request stays in flight until the forecast settles
            DispatchResult::changed_with(Effect::FetchForecast {
                request,
                origin: RequestOrigin::Location,
                query: ForecastQuery::Coords(coords),
            })
        }

        Action::LocateDidFail { request, failure } => {
            state.finish_request(request);
            let message = match failure {
                GeoFailure::Unsupported => GEOLOCATION_UNSUPPORTED,
                GeoFailure::Denied => GEOLOCATION_DENIED,
            };
            show_banner(state, message)
        }

        // ===== Forecast actions =====
        Action::ForecastDidLoad {
            request,
            origin,
            forecast,
        } => {
            state.finish_request(request);
            if origin == RequestOrigin::Search {
                state.search_input.clear();
            }
            if !state.upsert_card(WeatherCard::new(request, forecast)) {
                tracing::debug!(request, "dropping forecast superseded by a newer request");
            }
            DispatchResult::changed()
        }

        Action::ForecastDidError {
            request,
            origin,
            error,
        } => {
            state.finish_request(request);
            tracing::warn!(request, ?origin, %error, "forecast request failed");
            let message = match origin {
                RequestOrigin::Search => CITY_NOT_FOUND,
                RequestOrigin::Location => LOCATION_WEATHER_FAILED,
            };
            show_banner(state, message)
        }

        // ===== Card actions =====
        Action::CardSelect(index) => {
            if index < state.cards.len() && index != state.selected {
                state.selected = index;
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::CardDismiss(city) => {
            if state.dismiss_card(&city) {
                if state.cards.is_empty() {
                    state.focus = Focus::Search;
                }
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        // ===== Focus actions =====
        Action::FocusSearch => set_focus(state, Focus::Search),

        Action::FocusCards => {
            if state.cards.is_empty() {
                return DispatchResult::unchanged();
            }
            set_focus(state, Focus::Cards)
        }

        // ===== Banner actions =====
        Action::BannerExpire(id) => {
            if state.expire_banner(id) {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Render => DispatchResult::changed(),

        // ===== Global actions =====
        Action::Tick => {
            if state.is_loading() {
                state.spinner_tick = state.spinner_tick.wrapping_add(1);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn show_banner(state: &mut AppState, message: &str) -> DispatchResult<Effect> {
    let id = state.push_banner(message);
    DispatchResult::changed_with(Effect::ExpireBanner { id })
}

fn set_focus(state: &mut AppState, focus: Focus) -> DispatchResult<Effect> {
    if state.focus == focus {
        return DispatchResult::unchanged();
    }
    state.focus = focus;
    DispatchResult::changed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{City, Coordinates, ForecastEntry, ForecastResponse};

    fn forecast(city: &str) -> ForecastResponse {
        ForecastResponse {
            city: City {
                name: city.into(),
                country: "GB".into(),
                ..Default::default()
            },
            entries: vec![ForecastEntry {
                timestamp: 1_700_000_000,
                temperature: 11.6,
                humidity: 81,
                wind_speed: 4.1,
                description: "light rain".into(),
                icon: "10d".into(),
            }],
        }
    }

    #[test]
    fn test_blank_submit_is_noop() {
        let mut state = AppState::default();
        for text in ["", "   ", "\t\n"] {
            let result = reducer(&mut state, Action::SearchSubmit(text.into()));
            assert!(!result.changed);
            assert!(result.effects.is_empty());
        }
        assert!(!state.is_loading());
        assert_eq!(state.next_request_id, 1);
    }

    #[test]
    fn test_submit_trims_and_starts_loading() {
        let mut state = AppState::default();

        let result = reducer(&mut state, Action::SearchSubmit("  London ".into()));

        assert!(result.changed);
        assert!(state.is_loading());
        assert_eq!(
            result.effects,
            vec![Effect::FetchForecast {
                request: 1,
                origin: RequestOrigin::Search,
                query: ForecastQuery::City("London".into()),
            }]
        );
    }

    #[test]
    fn test_load_clears_input_and_loading() {
        let mut state = AppState {
            search_input: "London".into(),
            ..Default::default()
        };
        reducer(&mut state, Action::SearchSubmit("London".into()));

        reducer(
            &mut state,
            Action::ForecastDidLoad {
                request: 1,
                origin: RequestOrigin::Search,
                forecast: forecast("London"),
            },
        );

        assert!(!state.is_loading());
        assert!(state.search_input.is_empty());
        assert_eq!(state.cards.len(), 1);
        assert_eq!(state.cards[0].city, "London");
    }

    #[test]
    fn test_location_load_keeps_input() {
        let mut state = AppState {
            search_input: "half typed".into(),
            ..Default::default()
        };
        reducer(&mut state, Action::LocateRequest);
        reducer(
            &mut state,
            Action::ForecastDidLoad {
                request: 1,
                origin: RequestOrigin::Location,
                forecast: forecast("Leeds"),
            },
        );
        assert_eq!(state.search_input, "half typed");
    }

    #[test]
    fn test_error_banner_and_expire_effect() {
        let mut state = AppState::default();
        reducer(&mut state, Action::SearchSubmit("Atlantis".into()));

        let result = reducer(
            &mut state,
            Action::ForecastDidError {
                request: 1,
                origin: RequestOrigin::Search,
                error: "HTTP 404".into(),
            },
        );

        assert!(!state.is_loading());
        assert_eq!(state.banners.len(), 1);
        assert_eq!(state.banners[0].message, CITY_NOT_FOUND);
        assert_eq!(
            result.effects,
            vec![Effect::ExpireBanner {
                id: state.banners[0].id
            }]
        );
    }

    #[test]
    fn test_stale_result_does_not_overwrite_newer_card() {
        let mut state = AppState::default();
        reducer(&mut state, Action::SearchSubmit("paris".into()));
        reducer(&mut state, Action::SearchSubmit("Paris".into()));

        let mut newer = forecast("Paris");
        newer.entries[0].temperature = 20.0;
        reducer(
            &mut state,
            Action::ForecastDidLoad {
                request: 2,
                origin: RequestOrigin::Search,
                forecast: newer,
            },
        );
        reducer(
            &mut state,
            Action::ForecastDidLoad {
                request: 1,
                origin: RequestOrigin::Search,
                forecast: forecast("Paris"),
            },
        );

        assert_eq!(state.cards.len(), 1);
        assert_eq!(state.cards[0].request, 2);
        assert_eq!(state.cards[0].forecast.entries[0].temperature, 20.0);
        assert!(!state.is_loading());
    }

    #[test]
    fn test_locate_resolve_fetches_coords() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::LocateRequest);
        assert_eq!(result.effects, vec![Effect::Locate { request: 1 }]);

        let coords = Coordinates { lat: 1.0, lon: 2.0 };
        let result = reducer(&mut state, Action::LocateDidResolve { request: 1, coords });

        assert!(state.is_loading());
        assert!(matches!(
            result.effects.as_slice(),
            [Effect::FetchForecast {
                request: 1,
                origin: RequestOrigin::Location,
                query: ForecastQuery::Coords(_),
            }]
        ));
    }

    #[test]
    fn test_locate_failures() {
        let mut state = AppState::default();
        reducer(&mut state, Action::LocateRequest);
        reducer(
            &mut state,
            Action::LocateDidFail {
                request: 1,
                failure: GeoFailure::Denied,
            },
        );
        reducer(&mut state, Action::LocateRequest);
        reducer(
            &mut state,
            Action::LocateDidFail {
                request: 2,
                failure: GeoFailure::Unsupported,
            },
        );

        let messages: Vec<&str> = state.banners.iter().map(|b| b.message.as_str()).collect();
        assert_eq!(messages, vec![GEOLOCATION_DENIED, GEOLOCATION_UNSUPPORTED]);
        assert!(!state.is_loading());
    }

    #[test]
    fn test_focus_cards_requires_cards() {
        let mut state = AppState::default();
        assert!(!reducer(&mut state, Action::FocusCards).changed);
        assert_eq!(state.focus, Focus::Search);

        state.upsert_card(WeatherCard::new(1, forecast("Oslo")));
        assert!(reducer(&mut state, Action::FocusCards).changed);
        assert_eq!(state.focus, Focus::Cards);
    }

    #[test]
    fn test_dismiss_last_card_returns_focus_to_search() {
        let mut state = AppState::default();
        state.upsert_card(WeatherCard::new(1, forecast("Oslo")));
        state.focus = Focus::Cards;

        reducer(&mut state, Action::CardDismiss("Oslo".into()));

        assert!(state.cards.is_empty());
        assert_eq!(state.focus, Focus::Search);
    }

    #[test]
    fn test_tick_only_while_loading() {
        let mut state = AppState::default();
        assert!(!reducer(&mut state, Action::Tick).changed);

        state.begin_request();
        assert!(reducer(&mut state, Action::Tick).changed);
        assert_eq!(state.spinner_tick, 1);
    }
}
