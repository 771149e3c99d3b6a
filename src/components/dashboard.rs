use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::card_panel::CARD_HEIGHT;
use super::welcome::WELCOME_HEIGHT;
use super::{CardPanel, CardPanelProps, Component, SearchBar, SearchBarProps, Welcome};
use crate::action::Action;
use crate::forecast::CardView;
use crate::state::{AppState, Focus};

pub const ERROR_ICON: &str = "\u{26a0}\u{fe0f}";
pub const SPINNERS: [&str; 10] = [
    "\u{280b}", "\u{2819}", "\u{2839}", "\u{2838}", "\u{283c}", "\u{2834}", "\u{2826}",
    "\u{2827}", "\u{2807}", "\u{280f}",
];

/// Props for Dashboard - read-only view of state
pub struct DashboardProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// Root component: search field, cards, banners, hints
#[derive(Default)]
pub struct Dashboard {
    search: SearchBar,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn search_props(state: &AppState, is_focused: bool) -> SearchBarProps<'_> {
        SearchBarProps {
            value: &state.search_input,
            is_focused: is_focused && state.focus == Focus::Search,
            on_change: Action::SearchInputChange,
            on_submit: Action::SearchSubmit,
        }
    }

    fn card_keys(state: &AppState, code: KeyCode) -> Option<Action> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            KeyCode::Tab | KeyCode::Char('/') => Some(Action::FocusSearch),
            KeyCode::Char('l') => Some(Action::LocateRequest),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::CardSelect(state.selected + 1)),
            KeyCode::Up | KeyCode::Char('k') => {
                if state.selected == 0 {
                    Some(Action::FocusSearch)
                } else {
                    Some(Action::CardSelect(state.selected - 1))
                }
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                state
                    .selected_card()
                    .map(|card| Action::CardDismiss(card.city.clone()))
            }
            _ => None,
        }
    }
}

impl Component<Action> for Dashboard {
    type Props<'a> = DashboardProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }

        let EventKind::Key(key) = event else {
            return Vec::new();
        };

        let state = props.state;
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('l') => return vec![Action::LocateRequest],
                KeyCode::Char('c') => return vec![Action::Quit],
                _ => {}
            }
        }

        match state.focus {
            Focus::Search => match key.code {
                KeyCode::Enter => vec![Action::SearchSubmit(state.search_input.clone())],
                KeyCode::Tab | KeyCode::Down => vec![Action::FocusCards],
                KeyCode::Esc => vec![Action::Quit],
                _ => self
                    .search
                    .handle_event(event, Self::search_props(state, true))
                    .into_iter()
                    .collect(),
            },
            Focus::Cards => Self::card_keys(state, key.code).into_iter().collect(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        let banner_rows = state.banners.len() as u16;
        let chunks = Layout::vertical([
            Constraint::Length(3),           // Search field
            Constraint::Length(1),           // Loading line
            Constraint::Min(1),              // Cards + welcome
            Constraint::Length(banner_rows), // Error banners
            Constraint::Length(1),           // Help bar
        ])
        .split(area);

        self.search
            .render(frame, chunks[0], Self::search_props(state, props.is_focused));
        render_loading(frame, chunks[1], state);
        render_feed(frame, chunks[2], state);
        render_banners(frame, chunks[3], state);
        render_help(frame, chunks[4], state);
    }
}

fn render_loading(frame: &mut Frame, area: Rect, state: &AppState) {
    if !state.is_loading() {
        return;
    }
    let frame_idx = state.spinner_tick as usize % SPINNERS.len();
    let line = Line::from(vec![
        Span::styled(SPINNERS[frame_idx], Style::default().fg(Color::Cyan)),
        Span::styled(" Loading forecast...", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Cards (newest first) followed by the welcome block, scrolled so the
/// selected card stays visible. The welcome block is never taken away.
fn render_feed(frame: &mut Frame, area: Rect, state: &AppState) {
    let tz = state.timezone();
    // Indexed like `state.cards` so selection lines up even if a card can't be shown
    let views: Vec<Option<CardView>> = state
        .cards
        .iter()
        .map(|card| CardView::build(card, &tz))
        .collect();

    let fit = (area.height / CARD_HEIGHT).max(1) as usize;
    let offset = if state.focus == Focus::Cards {
        state.selected.saturating_sub(fit - 1)
    } else {
        0
    };

    let mut y = area.y;
    let bottom = area.y + area.height;
    for (index, view) in views.iter().enumerate().skip(offset) {
        let Some(view) = view else {
            continue;
        };
        if y + CARD_HEIGHT > bottom {
            return;
        }
        let card_area = Rect::new(area.x, y, area.width, CARD_HEIGHT);
        CardPanel.render(
            frame,
            card_area,
            CardPanelProps {
                view,
                is_selected: state.focus == Focus::Cards && index == state.selected,
            },
        );
        y += CARD_HEIGHT;
    }

    if y + WELCOME_HEIGHT <= bottom {
        Welcome.render(frame, Rect::new(area.x, y, area.width, WELCOME_HEIGHT), ());
    }
}

fn render_banners(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::vertical(state.banners.iter().map(|_| Constraint::Length(1))).split(area);
    for (banner, row) in state.banners.iter().zip(rows.iter()) {
        let line = Line::from(vec![
            Span::raw(format!(" {ERROR_ICON} ")),
            Span::styled(banner.message.clone(), Style::default().fg(Color::White).bold()),
        ]);
        frame.render_widget(
            Paragraph::new(line).style(Style::default().bg(Color::Rgb(120, 30, 30))),
            *row,
        );
    }
}

fn render_help(frame: &mut Frame, area: Rect, state: &AppState) {
    let hints = match state.focus {
        Focus::Search => vec![
            StatusBarHint::new("enter", "search"),
            StatusBarHint::new("^L", "my location"),
            StatusBarHint::new("tab", "cards"),
            StatusBarHint::new("esc", "quit"),
        ],
        Focus::Cards => vec![
            StatusBarHint::new("j/k", "select"),
            StatusBarHint::new("x/del", "dismiss"),
            StatusBarHint::new("l", "my location"),
            StatusBarHint::new("/", "search"),
            StatusBarHint::new("q", "quit"),
        ],
    };

    let mut status_bar = StatusBar::new();
    <StatusBar as Component<Action>>::render(
        &mut status_bar,
        frame,
        area,
        StatusBarProps {
            left: StatusBarSection::empty(),
            center: StatusBarSection::hints(&hints),
            right: StatusBarSection::empty(),
            style: StatusBarStyle::default(),
            is_focused: false,
        },
    );
}
