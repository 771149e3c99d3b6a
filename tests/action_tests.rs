//! Action and reducer tests using EffectStore and TestHarness

use forecast_dash::{
    action::Action,
    api::ForecastQuery,
    components::{Component, Dashboard, DashboardProps},
    effect::Effect,
    geo::GeoFailure,
    reducer::reducer,
    state::{
        AppState, CITY_NOT_FOUND, City, Focus, ForecastEntry, ForecastResponse,
        LOCATION_WEATHER_FAILED, RequestOrigin, WeatherCard,
    },
};
use tui_dispatch::testing::*;
use tui_dispatch::{EffectStore, NumericComponentId, assert_emitted, assert_not_emitted};

fn forecast(name: &str) -> ForecastResponse {
    ForecastResponse {
        city: City {
            name: name.into(),
            country: "GB".into(),
            ..Default::default()
        },
        entries: vec![ForecastEntry {
            timestamp: 1_699_956_000,
            temperature: 8.4,
            humidity: 81,
            wind_speed: 10.0,
            description: "overcast clouds".into(),
            icon: "04d".into(),
        }],
    }
}

#[test]
fn test_reducer_search_submit() {
    let mut store = EffectStore::new(AppState::default(), reducer);

    assert!(!store.state().is_loading());

    let result = store.dispatch(Action::SearchSubmit("London".into()));
    assert!(result.changed, "State should change");
    assert!(store.state().is_loading());
    assert_eq!(result.effects.len(), 1);
    assert!(matches!(
        &result.effects[0],
        Effect::FetchForecast {
            origin: RequestOrigin::Search,
            query: ForecastQuery::City(city),
            ..
        } if city == "London"
    ));
}

#[test]
fn test_reducer_forecast_load() {
    let mut store = EffectStore::new(AppState::default(), reducer);

    store.dispatch(Action::SearchInputChange("London".into()));
    store.dispatch(Action::SearchSubmit("London".into()));
    store.dispatch(Action::ForecastDidLoad {
        request: 1,
        origin: RequestOrigin::Search,
        forecast: forecast("London"),
    });

    let state = store.state();
    assert!(!state.is_loading());
    assert!(state.search_input.is_empty());
    assert_eq!(state.cards.len(), 1);
    assert_eq!(state.cards[0].forecast, forecast("London"));
}

#[test]
fn test_reducer_location_error_message() {
    let mut store = EffectStore::new(AppState::default(), reducer);

    store.dispatch(Action::LocateRequest);
    store.dispatch(Action::LocateDidResolve {
        request: 1,
        coords: Default::default(),
    });
    let result = store.dispatch(Action::ForecastDidError {
        request: 1,
        origin: RequestOrigin::Location,
        error: "HTTP 500".into(),
    });

    assert!(!store.state().is_loading());
    assert_eq!(store.state().banners[0].message, LOCATION_WEATHER_FAILED);
    assert!(matches!(result.effects[..], [Effect::ExpireBanner { .. }]));
}

#[test]
fn test_reducer_banners_stack() {
    let mut store = EffectStore::new(AppState::default(), reducer);

    for request in 1..=2 {
        store.dispatch(Action::SearchSubmit("Atlantis".into()));
        store.dispatch(Action::ForecastDidError {
            request,
            origin: RequestOrigin::Search,
            error: "HTTP 404".into(),
        });
    }

    let banners = &store.state().banners;
    assert_eq!(banners.len(), 2, "no deduplication");
    assert!(banners.iter().all(|b| b.message == CITY_NOT_FOUND));
    assert_ne!(banners[0].id, banners[1].id);

    let first = banners[0].id;
    store.dispatch(Action::BannerExpire(first));
    assert_eq!(store.state().banners.len(), 1);
    assert!(!store.dispatch(Action::BannerExpire(first)).changed);
}

#[test]
fn test_dismiss_removes_only_that_card() {
    let mut state = AppState::default();
    state.upsert_card(WeatherCard::new(1, forecast("London")));
    state.upsert_card(WeatherCard::new(2, forecast("Paris")));
    let mut store = EffectStore::new(state, reducer);

    let result = store.dispatch(Action::CardDismiss("London".into()));

    assert!(result.changed);
    assert!(result.effects.is_empty());
    let cities: Vec<_> = store.state().cards.iter().map(|c| c.city.as_str()).collect();
    assert_eq!(cities, vec!["Paris"]);
    assert!(!store.dispatch(Action::CardDismiss("London".into())).changed);
}

#[test]
fn test_component_keyboard_events() {
    let mut state = AppState::default();
    state.upsert_card(WeatherCard::new(1, forecast("London")));
    state.focus = Focus::Cards;
    let mut harness = TestHarness::<AppState, Action>::new(state);
    let mut component = Dashboard::new();

    let actions = harness.send_keys::<NumericComponentId, _, _>("x", |state, event| {
        let props = DashboardProps {
            state,
            is_focused: true,
        };
        component
            .handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });

    actions.assert_count(1);
    actions.assert_first(Action::CardDismiss("London".into()));
}

#[test]
fn test_component_ignores_when_unfocused() {
    let mut harness = TestHarness::<AppState, Action>::default();
    let mut component = Dashboard::new();

    let actions = harness.send_keys::<NumericComponentId, _, _>("a q x", |state, event| {
        let props = DashboardProps {
            state,
            is_focused: false,
        };
        component
            .handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });

    actions.assert_empty();
}

#[test]
fn test_action_categories() {
    let did_load = Action::ForecastDidLoad {
        request: 1,
        origin: RequestOrigin::Search,
        forecast: ForecastResponse::default(),
    };
    let focus = Action::FocusCards;
    let submit = Action::SearchSubmit("Oslo".into());
    let tick = Action::Tick;

    assert_eq!(did_load.category(), Some("forecast_did"));
    assert_eq!(focus.category(), Some("focus"));
    assert_eq!(submit.category(), Some("search"));
    assert_eq!(tick.category(), None);

    assert!(did_load.is_forecast_did());
    assert!(focus.is_focus());
}

#[test]
fn test_harness_emit_and_drain() {
    let mut harness = TestHarness::<(), Action>::new(());

    harness.emit(Action::LocateRequest);
    harness.emit(Action::LocateDidFail {
        request: 1,
        failure: GeoFailure::Denied,
    });
    harness.emit(Action::BannerExpire(1));

    let actions = harness.drain_emitted();
    actions.assert_count(3);
}

#[test]
fn test_assert_emitted_macro() {
    let actions = vec![
        Action::SearchSubmit("Lima".into()),
        Action::ForecastDidLoad {
            request: 1,
            origin: RequestOrigin::Search,
            forecast: forecast("Lima"),
        },
    ];

    assert_emitted!(actions, Action::SearchSubmit(_));
    assert_emitted!(actions, Action::ForecastDidLoad { .. });
    assert_not_emitted!(actions, Action::Quit);
    assert_not_emitted!(actions, Action::ForecastDidError { .. });
}

#[test]
fn test_utc_offset_state() {
    let state = AppState::new(-5 * 3600);

    assert_eq!(state.utc_offset_secs, -18_000);
    assert_eq!(state.timezone().local_minus_utc(), -18_000);
    assert!(state.cards.is_empty());
}
