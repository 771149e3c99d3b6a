//! Day bucketing and the card view model
//!
//! Everything here is pure: timestamps are turned into calendar days using the
//! offset passed in, never the process locale.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Datelike, FixedOffset, Utc};

use crate::icons::{Condition, IconSize, icon_url};
use crate::state::{ForecastEntry, WeatherCard};

/// Number of day tiles shown under a card
pub const SUMMARY_DAYS: usize = 3;

/// Numeric month/day, displayed the en-US way (`11/14`)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DayKey {
    pub month: u32,
    pub day: u32,
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.month, self.day)
    }
}

/// Entries that fall on one calendar day, in arrival order
#[derive(Clone, Debug, PartialEq)]
pub struct DayBucket<'a> {
    pub key: DayKey,
    pub entries: Vec<&'a ForecastEntry>,
}

impl<'a> DayBucket<'a> {
    /// The entry that stands in for the whole day
    pub fn representative(&self) -> &'a ForecastEntry {
        self.entries[0]
    }
}

pub fn local_time(timestamp: i64, tz: &FixedOffset) -> DateTime<FixedOffset> {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .unwrap_or_default()
        .with_timezone(tz)
}

pub fn day_key(timestamp: i64, tz: &FixedOffset) -> DayKey {
    let date = local_time(timestamp, tz);
    DayKey {
        month: date.month(),
        day: date.day(),
    }
}

/// Group entries by calendar day.
///
/// Buckets come out in first-seen order and are not sorted; the provider
/// already returns entries chronologically.
pub fn group_by_day<'a>(entries: &'a [ForecastEntry], tz: &FixedOffset) -> Vec<DayBucket<'a>> {
    let mut buckets: Vec<DayBucket<'a>> = Vec::new();
    let mut index: HashMap<DayKey, usize> = HashMap::new();

    for entry in entries {
        let key = day_key(entry.timestamp, tz);
        match index.get(&key) {
            Some(&slot) => buckets[slot].entries.push(entry),
            None => {
                index.insert(key, buckets.len());
                buckets.push(DayBucket {
                    key,
                    entries: vec![entry],
                });
            }
        }
    }

    buckets
}

/// Whole degrees, halves rounded up
pub fn round_temp(celsius: f64) -> i64 {
    (celsius + 0.5).floor() as i64
}

pub fn format_temp(celsius: f64) -> String {
    format!("{}°C", round_temp(celsius))
}

/// m/s to km/h with one decimal
pub fn wind_kmh(meters_per_second: f64) -> String {
    format!("{:.1} km/h", meters_per_second * 3.6)
}

/// One day tile under a card
#[derive(Clone, Debug, PartialEq)]
pub struct DayTile {
    pub weekday: String,
    pub temperature: String,
    pub description: String,
    pub condition: Condition,
    pub icon_url: String,
}

impl DayTile {
    fn from_bucket(bucket: &DayBucket<'_>, tz: &FixedOffset) -> Self {
        let entry = bucket.representative();
        DayTile {
            weekday: local_time(entry.timestamp, tz).format("%a").to_string(),
            temperature: format_temp(entry.temperature),
            description: entry.description.clone(),
            condition: Condition::from_icon(&entry.icon),
            icon_url: icon_url(&entry.icon, IconSize::Standard),
        }
    }
}

/// First [`SUMMARY_DAYS`] buckets as tiles
pub fn summary_days(buckets: &[DayBucket<'_>], tz: &FixedOffset) -> Vec<DayTile> {
    buckets
        .iter()
        .take(SUMMARY_DAYS)
        .map(|bucket| DayTile::from_bucket(bucket, tz))
        .collect()
}

/// Everything a card displays, already formatted
#[derive(Clone, Debug, PartialEq)]
pub struct CardView {
    pub city: String,
    pub title: String,
    pub date: String,
    pub description: String,
    pub humidity: String,
    pub wind: String,
    pub temperature: String,
    pub condition: Condition,
    pub icon_url: String,
    pub days: Vec<DayTile>,
}

impl CardView {
    /// `None` when the card has no current snapshot
    pub fn build(card: &WeatherCard, tz: &FixedOffset) -> Option<Self> {
        let forecast = &card.forecast;
        let current = forecast.current()?;
        let buckets = group_by_day(&forecast.entries, tz);

        Some(CardView {
            city: card.city.clone(),
            title: format!("{}, {}", forecast.city.name, forecast.city.country),
            date: local_time(current.timestamp, tz)
                .format("%A, %B %-d, %Y")
                .to_string(),
            description: current.description.clone(),
            humidity: format!("Humidity: {}%", current.humidity),
            wind: format!("Wind: {}", wind_kmh(current.wind_speed)),
            temperature: format_temp(current.temperature),
            condition: Condition::from_icon(&current.icon),
            icon_url: icon_url(&current.icon, IconSize::Large),
            days: summary_days(&buckets, tz),
        })
    }
}
