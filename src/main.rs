//! Forecast dashboard - OpenWeather 5-day forecast cards in the terminal

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use forecast_dash::action::Action;
use forecast_dash::components::{Component, Dashboard, DashboardProps};
use forecast_dash::config::{self, API_KEY_ENV, Config, Settings};
use forecast_dash::effect::{Effect, Services};
use forecast_dash::reducer::reducer;
use forecast_dash::state::{AppState, SPINNER_TICK_MS};
use ratatui::Terminal;
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventKind, EventOutcome,
    RenderContext, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

/// Weather forecasts for any city or your current location
#[derive(Parser, Debug)]
#[command(name = "forecast-dash")]
#[command(about = "OpenWeather 5-day forecast dashboard")]
struct Args {
    #[command(flatten)]
    settings: Settings,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        settings,
        debug: debug_args,
    } = Args::parse();

    let env_api_key = std::env::var(API_KEY_ENV).ok();
    let config = match settings.resolve(env_api_key, config::local_offset_secs()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = config::init_logging(&config.log_file) {
        eprintln!("Warning: {e}");
    }

    let debug = DebugSession::new(debug_args);
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let utc_offset_secs = config.utc_offset_secs;
    let state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(AppState::new(utc_offset_secs))
        })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    tracing::info!(
        endpoint = %config.endpoint,
        utc_offset_secs,
        location = ?config.location,
        "starting dashboard"
    );

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions, &config).await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    Ok(())
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
    config: &Config,
) -> io::Result<DebugRunOutput<AppState>> {
    let services = Arc::new(Services::new(
        config.forecast_client(),
        config.location.source(),
    ));
    let dashboard = Rc::new(RefCell::new(Dashboard::new()));
    let dashboard_events = Rc::clone(&dashboard);

    debug
        .run_effect_app(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            config.initial_city.clone().map(Action::SearchSubmit),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }
                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(SPINNER_TICK_MS),
                    || Action::Tick,
                );
            },
            move |frame, area, state, render_ctx: RenderContext| {
                let props = DashboardProps {
                    state,
                    is_focused: render_ctx.is_focused(),
                };
                dashboard.borrow_mut().render(frame, area, props);
            },
            move |event, state| -> EventOutcome<Action> {
                if let EventKind::Resize(_, _) = event {
                    return EventOutcome::ignored().with_render();
                }
                let props = DashboardProps {
                    state,
                    is_focused: true,
                };
                let actions: Vec<_> = dashboard_events
                    .borrow_mut()
                    .handle_event(event, props)
                    .into_iter()
                    .collect();
                EventOutcome::actions(actions)
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx, services.clone()),
        )
        .await
}

/// Handle effects by spawning tasks
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, services: Arc<Services>) {
    tracing::debug!(?effect, "spawning effect");
    let key = TaskKey::new(effect.task_key());
    ctx.tasks().spawn(key, effect.run(services));
}
