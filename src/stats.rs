use crate::models::WeeklyStats;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;

const MIN_BAR_HEIGHT: f64 = 10.0;
const MAX_BAR_HEIGHT: f64 = 100.0;

/// Week window requested from the stats endpoint, e.g. `last4w`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsRange {
    weeks: u32,
}

impl Default for StatsRange {
    fn default() -> Self {
        Self {
            weeks: Self::DEFAULT_WEEKS,
        }
    }
}

impl StatsRange {
    pub const DEFAULT_WEEKS: u32 = 4;
    pub const MAX_WEEKS: u32 = 52;

    /// Accepts `lastNw` or a bare `N`. Anything unreadable or outside
    /// `1..=52` weeks falls back to the default window.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(|value| value.trim().to_ascii_lowercase()) else {
            return Self::default();
        };
        let number = raw
            .strip_prefix("last")
            .and_then(|rest| rest.strip_suffix('w'))
            .unwrap_or(raw.as_str());

        match number.parse::<u32>() {
            Ok(weeks) if (1..=Self::MAX_WEEKS).contains(&weeks) => Self { weeks },
            _ => Self::default(),
        }
    }

    pub fn weeks(&self) -> u32 {
        self.weeks
    }

    pub fn as_param(&self) -> String {
        format!("last{}w", self.weeks)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekBar {
    pub week: String,
    pub label: String,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySummary {
    pub total_weeks: usize,
    pub total_workouts: u32,
    pub total_volume: f64,
    pub average_volume: f64,
    pub bars: Vec<WeekBar>,
}

pub fn summarize(stats: &[WeeklyStats]) -> WeeklySummary {
    let total_workouts = stats
        .iter()
        .fold(0u32, |sum, week| sum.saturating_add(week.total_workouts));
    let total_volume: f64 = stats.iter().map(|week| week.volume).sum();
    let average_volume = if stats.is_empty() {
        0.0
    } else {
        total_volume / stats.len() as f64
    };
    let best = stats.iter().map(|week| week.volume).fold(0.0, f64::max);

    let bars = stats
        .iter()
        .map(|week| {
            let relative = if best > 0.0 {
                week.volume / best * MAX_BAR_HEIGHT
            } else {
                0.0
            };
            WeekBar {
                week: week.week.clone(),
                label: week
                    .week
                    .split_once("-W")
                    .map(|(_, number)| number.to_string())
                    .unwrap_or_else(|| week.week.clone()),
                height: relative.max(MIN_BAR_HEIGHT).round() as u32,
            }
        })
        .collect();

    WeeklySummary {
        total_weeks: stats.len(),
        total_workouts,
        total_volume,
        average_volume,
        bars,
    }
}

/// ISO week label such as `2025-W39`.
pub fn week_label(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}

/// Parses `YYYY-Www` (or `YYYY-ww`) into an ISO year and week number.
pub fn parse_week(raw: &str) -> Result<(i32, u32), String> {
    let invalid = || format!("invalid week '{raw}', expected YYYY-Www");
    let raw = raw.trim();
    let (year, week) = raw
        .split_once("-W")
        .or_else(|| raw.split_once("-w"))
        .or_else(|| raw.split_once('-'))
        .ok_or_else(invalid)?;

    let year = year.parse::<i32>().map_err(|_| invalid())?;
    let week = week.parse::<u32>().map_err(|_| invalid())?;
    if NaiveDate::from_isoywd_opt(year, week, Weekday::Mon).is_none() {
        return Err(invalid());
    }
    Ok((year, week))
}

/// Monday and Sunday of an ISO week.
pub fn week_bounds(year: i32, week: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)?;
    Some((start, start + Duration::days(6)))
}
