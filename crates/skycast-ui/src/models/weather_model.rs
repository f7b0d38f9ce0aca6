//! Conditions panel: headline, current conditions, forecast cards and clock.

use std::time::{Duration, Instant};

use chrono::{DateTime, Local, Utc};
use skycast_weather::{daily_summaries, IconKind, WeatherReport};

use crate::format;

/// One card of the forecast strip
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastCard {
    pub day: String,
    pub icon: IconKind,
    pub range: String,
}

#[derive(Debug, Clone)]
pub struct WeatherModel {
    headline: String,
    error_since: Option<Instant>,
    error_display: Duration,
    temperature: String,
    description: String,
    feels_like: String,
    humidity: String,
    wind: String,
    icon: Option<IconKind>,
    forecast: Vec<ForecastCard>,
    /// Offset used by the clock
    utc_offset_secs: i32,
}

/// Current UTC offset of the machine running the app.
pub fn machine_utc_offset() -> i32 {
    Local::now().offset().local_minus_utc()
}

impl WeatherModel {
    pub fn new(error_display: Duration) -> Self {
        Self {
            headline: String::new(),
            error_since: None,
            error_display,
            temperature: String::new(),
            description: String::new(),
            feels_like: String::new(),
            humidity: String::new(),
            wind: String::new(),
            icon: None,
            forecast: Vec::new(),
            utc_offset_secs: machine_utc_offset(),
        }
    }

    pub fn headline(&self) -> &str {
        &self.headline
    }

    /// Whether the headline is an error still within its display window
    pub fn is_error_highlighted(&self) -> bool {
        self.error_since.is_some()
    }

    pub fn temperature(&self) -> &str {
        &self.temperature
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Feels like, humidity and wind, in display order
    pub fn details(&self) -> [&str; 3] {
        [&self.feels_like, &self.humidity, &self.wind]
    }

    pub fn icon(&self) -> Option<IconKind> {
        self.icon
    }

    pub fn forecast(&self) -> &[ForecastCard] {
        &self.forecast
    }

    pub fn utc_offset_secs(&self) -> i32 {
        self.utc_offset_secs
    }

    /// Date and time lines of the clock
    pub fn clock(&self, now: DateTime<Utc>) -> (String, String) {
        format::clock_lines(now, self.utc_offset_secs)
    }

    /// Progress text ("Searching…"); other widgets keep their content.
    pub fn show_status(&mut self, message: impl Into<String>) {
        self.headline = message.into();
        self.error_since = None;
    }

    /// Fill every widget from a fresh report. `now` decides which forecast
    /// day counts as today in the city.
    pub fn update_from_report(&mut self, report: &WeatherReport, now: DateTime<Utc>) {
        let current = &report.current;

        self.utc_offset_secs = current.utc_offset_secs;
        self.headline = format::city_line(&current.city, &current.country);
        self.error_since = None;
        self.temperature = format::temperature(current.temperature);
        self.description = format::capitalize(&current.description);
        self.feels_like = format::feels_like(current.feels_like);
        self.humidity = format::humidity(current.humidity);
        self.wind = format::wind(current.wind_speed);
        self.icon = Some(IconKind::from_icon_code(&current.icon));

        self.forecast = daily_summaries(&report.forecast, current.utc_offset_secs, now)
            .iter()
            .map(|day| ForecastCard {
                day: format::day_name(day.date),
                icon: day.icon_kind(),
                range: format::day_range(day.max, day.min),
            })
            .collect();

        tracing::debug!(
            "Showing {} with {} forecast days",
            current.city,
            self.forecast.len()
        );
    }

    /// Show `message` as an error and clear everything else.
    pub fn show_error(&mut self, message: impl Into<String>, now: Instant) {
        self.headline = message.into();
        self.error_since = Some(now);
        self.temperature.clear();
        self.description.clear();
        self.feels_like.clear();
        self.humidity.clear();
        self.wind.clear();
        self.icon = Some(IconKind::Unknown);
        self.forecast.clear();
        self.utc_offset_secs = machine_utc_offset();
    }

    /// Drop the error highlight once its display time is over.
    pub fn tick(&mut self, now: Instant) {
        if let Some(since) = self.error_since {
            if now.saturating_duration_since(since) >= self.error_display {
                self.error_since = None;
            }
        }
    }
}
