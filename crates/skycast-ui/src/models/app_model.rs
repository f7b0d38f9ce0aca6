//! Whole-screen state: keyboard handling, service results and the
//! background animation.

use std::time::{Duration, Instant};

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use skycast_core::{AppError, UiConfig};
use skycast_weather::{CityDirectory, WeatherReport};

use super::{SearchModel, WeatherModel};
use crate::services::ServiceMessage;
use crate::theme::{target_background, ColorAnimation, Rgb, Theme};

pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a city name.";
pub const LOCATING_MESSAGE: &str = "Detecting location…";

/// Poll interval when nothing is animating; keeps the clock ticking.
const IDLE_POLL: Duration = Duration::from_millis(200);

/// What the event loop should do after a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    None,
    Quit,
    Search(String),
    Locate,
}

#[derive(Debug, Clone)]
pub struct AppModel {
    pub search: SearchModel,
    pub weather: WeatherModel,
    theme: Theme,
    background: Rgb,
    animation: Option<ColorAnimation>,
    animation_steps: u32,
    animation_frame: Duration,
    last_frame: Instant,
}

impl AppModel {
    pub fn new(config: &UiConfig, theme: Theme) -> Self {
        Self {
            search: SearchModel::default(),
            weather: WeatherModel::new(Duration::from_secs(config.error_display_secs)),
            theme,
            background: theme.default_background(),
            animation: None,
            animation_steps: config.animation_steps,
            animation_frame: Duration::from_millis(config.animation_frame_ms),
            last_frame: Instant::now(),
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Current conditions panel background
    pub fn background(&self) -> Rgb {
        self.background
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// How long the event loop may wait for input before the next frame.
    pub fn poll_timeout(&self) -> Duration {
        if self.is_animating() {
            self.animation_frame
        } else {
            IDLE_POLL
        }
    }

    pub fn toggle_theme(&mut self) {
        let previous = self.theme;
        self.theme = previous.toggled();

        // A panel showing the old default follows the new theme
        if self.animation.is_none() && self.background == previous.default_background() {
            self.background = self.theme.default_background();
        }
        tracing::debug!("Theme switched to {:?}", self.theme);
    }

    pub fn handle_key(&mut self, key: KeyEvent, cities: &CityDirectory, now: Instant) -> UiAction {
        if key.kind != KeyEventKind::Press {
            return UiAction::None;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => UiAction::Quit,
            KeyCode::Char('c') if ctrl => UiAction::Quit,
            KeyCode::Char('t') if ctrl => {
                self.toggle_theme();
                UiAction::None
            }
            KeyCode::Char('r') if ctrl => UiAction::Locate,
            KeyCode::Up => {
                self.search.select_previous();
                UiAction::None
            }
            KeyCode::Down => {
                self.search.select_next();
                UiAction::None
            }
            KeyCode::Enter => match self.search.submit() {
                Some(city) => UiAction::Search(city),
                None => {
                    self.show_error(AppError::InvalidInput(EMPTY_QUERY_MESSAGE.into()), now);
                    UiAction::None
                }
            },
            KeyCode::Backspace => {
                self.search.backspace(cities);
                UiAction::None
            }
            KeyCode::Char(c) if !ctrl => {
                self.search.insert_char(c, cities);
                UiAction::None
            }
            _ => UiAction::None,
        }
    }

    pub fn begin_search(&mut self, city: &str) {
        self.weather.show_status(format!("Searching '{}'…", city));
    }

    pub fn begin_locate(&mut self) {
        self.weather.show_status(LOCATING_MESSAGE);
    }

    /// Apply a background result. Results of superseded requests are
    /// dropped. Returns the city to fetch next when location detection
    /// succeeded.
    pub fn apply_message(
        &mut self,
        message: ServiceMessage,
        current_generation: u64,
        now: Instant,
    ) -> Option<String> {
        if message.generation() != current_generation {
            tracing::debug!(
                "Dropping stale result of request {} (current {})",
                message.generation(),
                current_generation
            );
            return None;
        }

        match message {
            ServiceMessage::LocateDone {
                result: Ok(city), ..
            } => Some(city),
            ServiceMessage::LocateDone { result: Err(e), .. } => {
                self.show_error(e.into(), now);
                None
            }
            ServiceMessage::FetchDone {
                result: Ok(report),
                ..
            } => {
                self.show_report(&report, now);
                None
            }
            ServiceMessage::FetchDone { result: Err(e), .. } => {
                self.show_error(e.into(), now);
                None
            }
        }
    }

    fn show_report(&mut self, report: &WeatherReport, now: Instant) {
        self.weather.update_from_report(report, Utc::now());

        let target = target_background(&report.current.icon, self.theme);
        tracing::debug!("Animating background {} -> {}", self.background, target);
        self.animation = Some(ColorAnimation::new(
            self.background,
            target,
            self.animation_steps,
        ));
        self.last_frame = now;
    }

    fn show_error(&mut self, error: AppError, now: Instant) {
        tracing::info!("Showing error: {}", error);
        self.weather.show_error(error.user_message(), now);
        self.animation = None;
        self.background = self.theme.default_background();
    }

    /// Advance time-driven state: one animation step per elapsed frame and
    /// the error highlight timeout.
    pub fn tick(&mut self, now: Instant) {
        if let Some(animation) = self.animation.as_mut() {
            if now.saturating_duration_since(self.last_frame) >= self.animation_frame {
                self.background = animation.advance();
                self.last_frame = now;
                if animation.is_finished() {
                    self.animation = None;
                }
            }
        }
        self.weather.tick(now);
    }
}
