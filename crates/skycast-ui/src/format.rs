//! Text shown in the conditions panel.

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Offset between a regional indicator symbol and its ASCII upper-case letter
const REGIONAL_INDICATOR_OFFSET: u32 = 0x1F1E6 - 'A' as u32;

const WHITE_FLAG: &str = "🏳️";

/// Flag emoji for an ISO 3166 alpha-2 country code.
pub fn country_flag(code: &str) -> String {
    if code.chars().count() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return WHITE_FLAG.to_string();
    }

    code.chars()
        .filter_map(|c| char::from_u32(c.to_ascii_uppercase() as u32 + REGIONAL_INDICATOR_OFFSET))
        .collect()
}

/// Whole degrees; halves round to the even neighbour.
pub fn round_temp(celsius: f64) -> i64 {
    celsius.round_ties_even() as i64
}

pub fn temperature(celsius: f64) -> String {
    format!("{}°C", round_temp(celsius))
}

/// First character upper-case, the rest lower-case.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

pub fn city_line(city: &str, country: &str) -> String {
    format!("{} {}, {}", country_flag(country), city, country)
}

pub fn feels_like(celsius: f64) -> String {
    format!("🤔 Feels like: {}", temperature(celsius))
}

pub fn humidity(percent: u8) -> String {
    format!("💧 Humidity: {}%", percent)
}

pub fn wind(speed: f64) -> String {
    format!("💨 Wind: {} m/s", speed)
}

/// Short weekday name of a forecast day, e.g. `Mon`
pub fn day_name(date: NaiveDate) -> String {
    date.format("%a").to_string()
}

/// `max° / min°`, rounded
pub fn day_range(max: f64, min: f64) -> String {
    format!("{}° / {}°", round_temp(max), round_temp(min))
}

/// Date and time lines of the clock at `utc_offset_secs` from UTC.
pub fn clock_lines(now: DateTime<Utc>, utc_offset_secs: i32) -> (String, String) {
    let local = now + Duration::seconds(i64::from(utc_offset_secs));
    (
        local.format("%d %B %Y, %A").to_string(),
        local.format("%H:%M:%S").to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_country_flag() {
        assert_eq!(country_flag("TR"), "🇹🇷");
        assert_eq!(country_flag("jp"), "🇯🇵");
        assert_eq!(country_flag(""), WHITE_FLAG);
        assert_eq!(country_flag("USA"), WHITE_FLAG);
        assert_eq!(country_flag("1A"), WHITE_FLAG);
    }

    #[test]
    fn test_temperature() {
        assert_eq!(temperature(18.4), "18°C");
        assert_eq!(temperature(-0.4), "0°C");
        assert_eq!(temperature(-3.6), "-4°C");
        assert_eq!(temperature(2.5), "2°C");
        assert_eq!(temperature(3.5), "4°C");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("scattered CLOUDS"), "Scattered clouds");
        assert_eq!(capitalize("ışık"), "Işık");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_detail_lines() {
        assert_eq!(city_line("Ankara", "TR"), "🇹🇷 Ankara, TR");
        assert_eq!(humidity(52), "💧 Humidity: 52%");
        assert_eq!(wind(4.6), "💨 Wind: 4.6 m/s");
        assert_eq!(feels_like(17.2), "🤔 Feels like: 17°C");
    }

    #[test]
    fn test_forecast_card_text() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
        assert_eq!(day_name(date), "Mon");
        assert_eq!(day_range(16.6, 6.4), "17° / 6°");
    }

    #[test]
    fn test_clock_lines_use_offset() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 22, 30, 5).unwrap();
        assert_eq!(
            clock_lines(now, 0),
            ("10 March 2024, Sunday".to_string(), "22:30:05".to_string())
        );
        assert_eq!(
            clock_lines(now, 3 * 3600),
            ("11 March 2024, Monday".to_string(), "01:30:05".to_string())
        );
    }
}
