//! Consecutive-day workout streaks.
//!
//! A streak is computed from the distinct calendar days that carry at least
//! one workout. Only the `YYYY-MM-DD` prefix of a workout date is looked at;
//! time-of-day and offsets are dropped before any comparison, and "today"
//! always comes from an injected [`Clock`].

use crate::clock::Clock;
use crate::models::Workout;
use chrono::NaiveDate;
use serde::Serialize;
use std::{collections::BTreeSet, sync::Arc};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StreakError {
    #[error("invalid workout date '{0}', expected YYYY-MM-DD")]
    Validation(String),
    #[error("no clock configured for streak computation")]
    Configuration,
}

/// Rule deciding when a streak is still alive and which gaps keep it going.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StreakPolicy {
    /// Alive while the last workout was today or yesterday. Inside the
    /// streak a single rest day (a two-day gap) is forgiven.
    #[default]
    RestDayTolerant,
    /// Alive while the last workout lies between one day ahead and seven
    /// days behind today. Inside the streak every day must be consecutive.
    StrictDaily,
}

impl StreakPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RestDayTolerant => "rest-day-tolerant",
            Self::StrictDaily => "strict-daily",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "rest-day-tolerant" => Some(Self::RestDayTolerant),
            "strict-daily" => Some(Self::StrictDaily),
            _ => None,
        }
    }

    /// `gap_to_today` is today minus the most recent active day; negative
    /// when the most recent workout is dated in the future.
    fn is_alive(self, gap_to_today: i64) -> bool {
        match self {
            Self::RestDayTolerant => gap_to_today <= 1,
            Self::StrictDaily => (-1..=7).contains(&gap_to_today),
        }
    }

    fn continues(self, gap: i64) -> bool {
        match self {
            Self::RestDayTolerant => gap == 1 || gap == 2,
            Self::StrictDaily => gap == 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StreakResult {
    pub current_streak: u32,
    pub total_active_days: u32,
}

/// Distinct calendar days with at least one workout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveDays {
    days: BTreeSet<NaiveDate>,
}

impl ActiveDays {
    /// Builds the set from raw workout dates. Dates that cannot be read are
    /// returned alongside the set instead of failing the whole collection.
    pub fn collect<'a, I>(dates: I) -> (Self, Vec<StreakError>)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut days = BTreeSet::new();
        let mut rejected = Vec::new();
        for raw in dates {
            match calendar_day(raw) {
                Ok(day) => {
                    days.insert(day);
                }
                Err(err) => rejected.push(err),
            }
        }
        (Self { days }, rejected)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn most_recent(&self) -> Option<NaiveDate> {
        self.days.last().copied()
    }

    /// Most recent day first.
    pub fn iter_desc(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.iter().rev().copied()
    }
}

/// Truncates a workout date or timestamp to its calendar day.
///
/// Accepts `YYYY-MM-DD` optionally followed by a time part starting with
/// `T` or a space (`2025-09-25T18:30:00+02:00`, `2025-09-25 07:00`).
pub fn calendar_day(raw: &str) -> Result<NaiveDate, StreakError> {
    let invalid = || StreakError::Validation(raw.to_string());
    let trimmed = raw.trim();
    let Some(day) = trimmed.get(..10) else {
        return Err(invalid());
    };
    let rest = &trimmed[10..];
    if !rest.is_empty() && !rest.starts_with(['T', ' ']) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|_| invalid())
}

pub fn compute_streak(today: NaiveDate, days: &ActiveDays, policy: StreakPolicy) -> StreakResult {
    let total_active_days = u32::try_from(days.len()).unwrap_or(u32::MAX);
    let Some(most_recent) = days.most_recent() else {
        return StreakResult::default();
    };

    if !policy.is_alive((today - most_recent).num_days()) {
        return StreakResult {
            current_streak: 0,
            total_active_days,
        };
    }

    let mut current_streak = 1u32;
    let mut later = most_recent;
    for earlier in days.iter_desc().skip(1) {
        if !policy.continues((later - earlier).num_days()) {
            break;
        }
        current_streak += 1;
        later = earlier;
    }

    StreakResult {
        current_streak,
        total_active_days,
    }
}

/// Streak computation bound to a policy and a clock.
#[derive(Clone, Default)]
pub struct StreakEngine {
    policy: StreakPolicy,
    clock: Option<Arc<dyn Clock>>,
}

impl StreakEngine {
    pub fn new(policy: StreakPolicy) -> Self {
        Self {
            policy,
            clock: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn policy(&self) -> StreakPolicy {
        self.policy
    }

    pub fn today(&self) -> Result<NaiveDate, StreakError> {
        self.clock
            .as_ref()
            .map(|clock| clock.today())
            .ok_or(StreakError::Configuration)
    }

    pub fn compute(&self, workouts: &[Workout]) -> Result<StreakResult, StreakError> {
        Ok(self.compute_at(self.today()?, workouts))
    }

    pub fn compute_at(&self, today: NaiveDate, workouts: &[Workout]) -> StreakResult {
        let (days, rejected) = ActiveDays::collect(workouts.iter().map(|w| w.date.as_str()));
        for err in &rejected {
            warn!("skipping workout in streak: {err}");
        }
        compute_streak(today, &days, self.policy)
    }
}

pub fn streak_emoji(streak: u32) -> &'static str {
    match streak {
        0 => "💤",
        s if s < 3 => "🔥",
        s if s < 7 => "🔥🔥",
        s if s < 14 => "🔥🔥🔥",
        s if s < 30 => "🚀",
        _ => "👑",
    }
}

pub fn streak_message(streak: u32) -> String {
    match streak {
        0 => "Start your streak today!".to_string(),
        1 => "Great start! Keep it going!".to_string(),
        s if s < 7 => format!("{s} days strong! 💪"),
        s if s < 14 => format!("Amazing! {s} days of dedication!"),
        s if s < 30 => format!("Incredible! {s} days streak!"),
        s => format!("LEGENDARY! {s} days of pure dedication!"),
    }
}
