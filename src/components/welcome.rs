use artbox::{
    Alignment as ArtAlignment, Color as ArtColor, Fill, LinearGradient, Renderer, fonts,
    integrations::ratatui::ArtBox,
};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::Component;
use crate::action::Action;

pub const WELCOME_TITLE: &str = "Welcome to Weather Dashboard";
pub const WELCOME_HINT: &str = "Search for a city or use your current location to see the weather";

/// Heading art + title + hint
pub const WELCOME_HEIGHT: u16 = 7;

/// Static greeting shown from startup onwards
pub struct Welcome;

impl Component<Action> for Welcome {
    type Props<'a> = ();

    fn render(&mut self, frame: &mut Frame, area: Rect, _props: Self::Props<'_>) {
        let chunks = Layout::vertical([
            Constraint::Fill(1),   // FIGlet heading
            Constraint::Length(1), // Title
            Constraint::Length(1), // Hint
        ])
        .split(area);

        let renderer = Renderer::new(fonts::stack(&["miniwi"]))
            .with_plain_fallback()
            .with_alignment(ArtAlignment::Center)
            .with_fill(Fill::Linear(LinearGradient::horizontal(
                ArtColor::rgb(100, 180, 255),
                ArtColor::rgb(255, 220, 100),
            )));
        frame.render_widget(ArtBox::new(&renderer, "Weather"), chunks[0]);

        frame.render_widget(
            Paragraph::new(
                Line::from(Span::styled(
                    WELCOME_TITLE,
                    Style::default().fg(Color::White).bold(),
                ))
                .centered(),
            ),
            chunks[1],
        );
        frame.render_widget(
            Paragraph::new(
                Line::from(Span::styled(
                    WELCOME_HINT,
                    Style::default().fg(Color::DarkGray),
                ))
                .centered(),
            ),
            chunks[2],
        );
    }
}
