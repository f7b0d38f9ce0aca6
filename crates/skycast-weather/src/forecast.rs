//! Day bucketing of the 3-hourly forecast.
//!
//! Timestamps arrive in UTC; the queried city's offset decides which local
//! calendar day an entry belongs to. The city's current day is always left out.

use chrono::{DateTime, NaiveDate, Utc};

use crate::types::{day_variant, DaySummary, ForecastEntry};

/// Number of forecast days kept for display
pub const MAX_FORECAST_DAYS: usize = 5;

/// Forecast entries sharing one local calendar date
#[derive(Debug, Clone, PartialEq)]
pub struct DailyBucket {
    pub date: NaiveDate,
    pub entries: Vec<ForecastEntry>,
}

impl DailyBucket {
    /// Lowest minimum, highest maximum and the day's most frequent icon.
    ///
    /// Icon ties go to the code seen first; night codes are shown as day codes.
    pub fn summarize(&self) -> DaySummary {
        let min = self
            .entries
            .iter()
            .map(|e| e.temp_min)
            .fold(f64::INFINITY, f64::min);
        let max = self
            .entries
            .iter()
            .map(|e| e.temp_max)
            .fold(f64::NEG_INFINITY, f64::max);

        let mut counts: Vec<(&str, usize)> = Vec::new();
        for entry in &self.entries {
            match counts.iter_mut().find(|(icon, _)| *icon == entry.icon) {
                Some((_, count)) => *count += 1,
                None => counts.push((entry.icon.as_str(), 1)),
            }
        }

        let mut best: Option<(&str, usize)> = None;
        for (icon, count) in counts {
            if best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((icon, count));
            }
        }

        DaySummary {
            date: self.date,
            min,
            max,
            icon: best.map(|(icon, _)| day_variant(icon)).unwrap_or_default(),
        }
    }
}

/// Local calendar date of a UTC timestamp shifted by `utc_offset_secs`.
/// `None` when the shifted instant is out of range.
pub fn local_date(timestamp: i64, utc_offset_secs: i32) -> Option<NaiveDate> {
    let shifted = timestamp.checked_add(i64::from(utc_offset_secs))?;
    DateTime::from_timestamp(shifted, 0).map(|dt| dt.date_naive())
}

/// Group entries by local date, skipping the city's current day.
///
/// Groups keep the order in which their date first appears; only the first
/// [`MAX_FORECAST_DAYS`] groups are returned.
pub fn group_by_local_day(
    entries: &[ForecastEntry],
    utc_offset_secs: i32,
    now: DateTime<Utc>,
) -> Vec<DailyBucket> {
    let Some(today) = local_date(now.timestamp(), utc_offset_secs) else {
        tracing::warn!("Cannot compute local date for offset {}", utc_offset_secs);
        return Vec::new();
    };

    let mut buckets: Vec<DailyBucket> = Vec::new();
    for entry in entries {
        let Some(date) = local_date(entry.timestamp, utc_offset_secs) else {
            tracing::debug!("Skipping forecast entry with timestamp {}", entry.timestamp);
            continue;
        };

        if date == today {
            continue;
        }

        match buckets.iter_mut().find(|b| b.date == date) {
            Some(bucket) => bucket.entries.push(entry.clone()),
            None => buckets.push(DailyBucket {
                date,
                entries: vec![entry.clone()],
            }),
        }
    }

    buckets.truncate(MAX_FORECAST_DAYS);
    buckets
}

/// Per-day min/max/icon for the forecast strip.
pub fn daily_summaries(
    entries: &[ForecastEntry],
    utc_offset_secs: i32,
    now: DateTime<Utc>,
) -> Vec<DaySummary> {
    group_by_local_day(entries, utc_offset_secs, now)
        .iter()
        .map(DailyBucket::summarize)
        .collect()
}
