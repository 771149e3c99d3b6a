use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use super::Component;
use crate::action::Action;
use crate::forecast::{CardView, DayTile};

/// Rows a card occupies, borders included
pub const CARD_HEIGHT: u16 = 9;

/// One city card
pub struct CardPanel;

pub struct CardPanelProps<'a> {
    pub view: &'a CardView,
    pub is_selected: bool,
}

impl Component<Action> for CardPanel {
    type Props<'a> = CardPanelProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let view = props.view;
        let border_color = if props.is_selected {
            Color::Cyan
        } else {
            Color::DarkGray
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color))
            .title(Line::from(vec![Span::styled(
                format!(" {} ", view.title),
                Style::default().fg(Color::White).bold(),
            )]))
            .title_bottom(
                Line::from(vec![Span::styled(
                    if props.is_selected { " x dismiss " } else { "" },
                    Style::default().fg(Color::DarkGray),
                )])
                .right_aligned(),
            );
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::vertical([
            Constraint::Length(1), // date + temperature
            Constraint::Length(1), // description
            Constraint::Length(1), // humidity + wind
            Constraint::Length(1), // icon url
            Constraint::Length(1), // forecast heading
            Constraint::Length(2), // tiles
            Constraint::Min(0),
        ])
        .split(inner);

        let header =
            Layout::horizontal([Constraint::Min(1), Constraint::Length(12)]).split(chunks[0]);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                view.date.clone(),
                Style::default().fg(Color::Gray),
            ))),
            header[0],
        );
        frame.render_widget(
            Paragraph::new(
                Line::from(vec![
                    Span::raw(format!("{} ", view.condition.emoji())),
                    Span::styled(
                        view.temperature.clone(),
                        Style::default()
                            .fg(view.condition.color())
                            .add_modifier(Modifier::BOLD),
                    ),
                ])
                .right_aligned(),
            ),
            header[1],
        );

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                view.description.clone(),
                Style::default().fg(view.condition.color()),
            ))),
            chunks[1],
        );

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::raw(view.humidity.clone()),
                Span::styled(" \u{2022} ", Style::default().fg(Color::DarkGray)),
                Span::raw(view.wind.clone()),
            ])),
            chunks[2],
        );

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                view.icon_url.clone(),
                Style::default().fg(Color::DarkGray),
            ))),
            chunks[3],
        );

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "3-Day Forecast",
                Style::default().fg(Color::Gray).bold(),
            ))),
            chunks[4],
        );

        render_tiles(frame, chunks[5], &view.days);
    }
}

fn render_tiles(frame: &mut Frame, area: Rect, days: &[DayTile]) {
    let columns = Layout::horizontal([Constraint::Ratio(1, 3); 3]).split(area);
    for (tile, column) in days.iter().zip(columns.iter()) {
        let lines = vec![
            Line::from(Span::styled(
                tile.weekday.clone(),
                Style::default().fg(Color::Gray),
            ))
            .centered(),
            Line::from(vec![
                Span::raw(format!("{} ", tile.condition.emoji())),
                Span::styled(
                    tile.temperature.clone(),
                    Style::default().fg(tile.condition.color()),
                ),
            ])
            .centered(),
        ];
        frame.render_widget(Paragraph::new(lines), *column);
    }
}
