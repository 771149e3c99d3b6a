//! OpenWeather icon identifiers and their terminal glyphs

use ratatui::style::Color;

const ICON_BASE: &str = "https://openweathermap.org/img/wn";

/// Which icon asset variant to reference
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IconSize {
    /// `@2x` asset used for the current snapshot
    Large,
    /// Plain asset used for forecast tiles
    Standard,
}

pub fn icon_url(icon: &str, size: IconSize) -> String {
    match size {
        IconSize::Large => format!("{ICON_BASE}/{icon}@2x.png"),
        IconSize::Standard => format!("{ICON_BASE}/{icon}.png"),
    }
}

/// Condition family encoded in the first two characters of an icon id
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Condition {
    ClearSky,
    FewClouds,
    Clouds,
    Showers,
    Rain,
    Thunderstorm,
    Snow,
    Mist,
    Unknown,
}

impl Condition {
    pub fn from_icon(icon: &str) -> Self {
        match icon.get(..2) {
            Some("01") => Condition::ClearSky,
            Some("02") => Condition::FewClouds,
            Some("03") | Some("04") => Condition::Clouds,
            Some("09") => Condition::Showers,
            Some("10") => Condition::Rain,
            Some("11") => Condition::Thunderstorm,
            Some("13") => Condition::Snow,
            Some("50") => Condition::Mist,
            _ => Condition::Unknown,
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Condition::ClearSky => "\u{2600}\u{fe0f}",
            Condition::FewClouds => "\u{26c5}",
            Condition::Clouds | Condition::Unknown => "\u{2601}\u{fe0f}",
            Condition::Showers => "\u{1f326}\u{fe0f}",
            Condition::Rain => "\u{1f327}\u{fe0f}",
            Condition::Thunderstorm => "\u{26c8}\u{fe0f}",
            Condition::Snow => "\u{2744}\u{fe0f}",
            Condition::Mist => "\u{1f32b}\u{fe0f}",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Condition::ClearSky => Color::Rgb(255, 210, 90),
            Condition::FewClouds => Color::Rgb(230, 220, 160),
            Condition::Clouds | Condition::Unknown => Color::Rgb(170, 175, 185),
            Condition::Showers | Condition::Rain => Color::Rgb(110, 170, 240),
            Condition::Thunderstorm => Color::Rgb(190, 140, 255),
            Condition::Snow => Color::Rgb(220, 240, 255),
            Condition::Mist => Color::Rgb(150, 160, 160),
        }
    }
}
