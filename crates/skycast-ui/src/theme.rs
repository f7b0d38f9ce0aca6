//! Colors: light/dark theme and the animated conditions background.

use ratatui::style::Color;
use skycast_weather::{is_day_icon, WeatherCondition};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Color `step` of `steps` on the straight line from `self` to `target`.
    /// The last step is exactly `target`.
    pub fn lerp(self, target: Rgb, step: u32, steps: u32) -> Rgb {
        if steps == 0 || step >= steps {
            return target;
        }
        let channel = |from: u8, to: u8| -> u8 {
            let delta = (i32::from(to) - i32::from(from)) * step as i32 / steps as i32;
            (i32::from(from) + delta).clamp(0, 255) as u8
        };
        Rgb::new(
            channel(self.r, target.r),
            channel(self.g, target.g),
            channel(self.b, target.b),
        )
    }
}

impl From<Rgb> for Color {
    fn from(c: Rgb) -> Self {
        Color::Rgb(c.r, c.g, c.b)
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

// Conditions panel backgrounds
pub const THUNDERSTORM_BG: Rgb = Rgb::new(0x48, 0x3d, 0x8b);
pub const RAIN_BG: Rgb = Rgb::new(0x53, 0x71, 0x88);
pub const SNOW_BG: Rgb = Rgb::new(0xb0, 0xe0, 0xe6);
pub const CLEAR_DAY_BG: Rgb = Rgb::new(0x62, 0xa7, 0xe3);
pub const CLEAR_NIGHT_BG: Rgb = Rgb::new(0x19, 0x2f, 0x44);
pub const CLOUDS_BG: Rgb = Rgb::new(0x76, 0x8c, 0x8c);

// Forecast strip
pub const FORECAST_STRIP_BG: Rgb = Rgb::new(0x1a, 0x1a, 0x1a);
pub const FORECAST_CARD_BG: Rgb = Rgb::new(0x2b, 0x2b, 0x2b);
pub const FORECAST_CARD_FG: Rgb = Rgb::new(0xdc, 0xe4, 0xee);

pub const ERROR_FG: Rgb = Rgb::new(0xff, 0x45, 0x45);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn from_dark_mode(dark: bool) -> Self {
        if dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Conditions panel background when no weather is shown
    pub fn default_background(self) -> Rgb {
        match self {
            Theme::Dark => Rgb::new(0x1f, 0x1f, 0x1f),
            Theme::Light => Rgb::new(0xf1, 0xf2, 0xf6),
        }
    }

    /// Search panel background
    pub fn panel_background(self) -> Rgb {
        match self {
            Theme::Dark => Rgb::new(0x2b, 0x2b, 0x2b),
            Theme::Light => Rgb::new(0xdb, 0xdb, 0xdb),
        }
    }

    pub fn foreground(self) -> Rgb {
        match self {
            Theme::Dark => Rgb::new(0xdc, 0xe4, 0xee),
            Theme::Light => Rgb::new(0x1a, 0x1a, 0x1a),
        }
    }

    /// Suggestion row colors: (normal, selected)
    pub fn suggestion_colors(self) -> (Rgb, Rgb) {
        match self {
            Theme::Dark => (Rgb::new(0x2b, 0x2b, 0x2b), Rgb::new(0x4b, 0x4b, 0x4b)),
            Theme::Light => (Rgb::new(0xe5, 0xe5, 0xe5), Rgb::new(0xb3, 0xb3, 0xb3)),
        }
    }

    /// Label of the action that switches to the other theme
    pub fn toggle_label(self) -> &'static str {
        match self {
            Theme::Dark => "☀️ Light theme",
            Theme::Light => "🌙 Dark theme",
        }
    }
}

/// Background the conditions panel moves to for an icon code.
pub fn target_background(icon_code: &str, theme: Theme) -> Rgb {
    match WeatherCondition::from_icon_code(icon_code) {
        WeatherCondition::Thunderstorm => THUNDERSTORM_BG,
        WeatherCondition::Rain => RAIN_BG,
        WeatherCondition::Snow => SNOW_BG,
        WeatherCondition::Clear if is_day_icon(icon_code) => CLEAR_DAY_BG,
        WeatherCondition::Clear => CLEAR_NIGHT_BG,
        WeatherCondition::Clouds => CLOUDS_BG,
        WeatherCondition::Mist | WeatherCondition::Unknown => theme.default_background(),
    }
}

/// Linear RGB transition driven one step at a time by the UI loop.
#[derive(Debug, Clone)]
pub struct ColorAnimation {
    start: Rgb,
    target: Rgb,
    steps: u32,
    step: u32,
}

impl ColorAnimation {
    pub fn new(start: Rgb, target: Rgb, steps: u32) -> Self {
        Self {
            start,
            target,
            steps: steps.max(1),
            step: 0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.step >= self.steps
    }

    /// Move one step forward and return the color to paint.
    pub fn advance(&mut self) -> Rgb {
        if self.step < self.steps {
            self.step += 1;
        }
        self.start.lerp(self.target, self.step, self.steps)
    }
}
