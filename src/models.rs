use crate::stats::parse_week;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A logged workout as returned by the workouts API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: i64,
    pub date: String,
    pub exercise: String,
    pub sets: u32,
    pub reps: u32,
    pub weight: f64,
    pub rpe: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Workout {
    pub fn volume(&self) -> f64 {
        f64::from(self.sets) * f64::from(self.reps) * self.weight
    }
}

/// Body of create and update requests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutInput {
    pub date: NaiveDate,
    pub exercise: String,
    pub sets: u32,
    pub reps: u32,
    pub weight: f64,
    pub rpe: f64,
}

/// Raw add/edit form fields, validated into a [`WorkoutInput`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkoutForm {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub exercise: String,
    #[serde(default)]
    pub sets: String,
    #[serde(default)]
    pub reps: String,
    #[serde(default)]
    pub weight: String,
    #[serde(default)]
    pub rpe: String,
}

impl WorkoutForm {
    pub fn validate(&self) -> Result<WorkoutInput, Vec<String>> {
        let mut errors = Vec::new();

        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .map_err(|_| errors.push("date must be a valid YYYY-MM-DD date".to_string()))
            .ok();

        let exercise = self.exercise.trim().to_string();
        let exercise_len = exercise.chars().count();
        if !(2..=100).contains(&exercise_len) {
            errors.push("exercise name must be between 2 and 100 characters".to_string());
        }

        let sets = parse_in_range(&self.sets, 1, 50, "sets", &mut errors);
        let reps = parse_in_range(&self.reps, 1, 1000, "reps", &mut errors);

        let weight = match self.weight.trim().parse::<f64>() {
            Ok(value) if value.is_finite() && value > 0.0 && value <= 1000.0 => Some(value),
            _ => {
                errors.push("weight must be greater than 0 and at most 1000 kg".to_string());
                None
            }
        };

        let rpe = match self.rpe.trim().parse::<f64>() {
            Ok(value) if (1.0..=10.0).contains(&value) => Some(value),
            _ => {
                errors.push("rpe must be between 1 and 10".to_string());
                None
            }
        };

        match (date, sets, reps, weight, rpe) {
            (Some(date), Some(sets), Some(reps), Some(weight), Some(rpe)) if errors.is_empty() => {
                Ok(WorkoutInput {
                    date,
                    exercise,
                    sets,
                    reps,
                    weight,
                    rpe,
                })
            }
            _ => Err(errors),
        }
    }
}

impl From<&Workout> for WorkoutForm {
    fn from(workout: &Workout) -> Self {
        Self {
            date: workout.date.get(..10).unwrap_or(workout.date.as_str()).to_string(),
            exercise: workout.exercise.clone(),
            sets: workout.sets.to_string(),
            reps: workout.reps.to_string(),
            weight: workout.weight.to_string(),
            rpe: workout.rpe.to_string(),
        }
    }
}

fn parse_in_range(raw: &str, min: u32, max: u32, field: &str, errors: &mut Vec<String>) -> Option<u32> {
    match raw.trim().parse::<u32>() {
        Ok(value) if (min..=max).contains(&value) => Some(value),
        _ => {
            errors.push(format!("{field} must be between {min} and {max}"));
            None
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateWorkoutResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub workout: Workout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyStats {
    pub week: String,
    pub volume: f64,
    pub total_workouts: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub timestamp: serde_json::Value,
    #[serde(default)]
    pub version: String,
}

/// Query string of the workouts list page.
#[derive(Debug, Default, Deserialize)]
pub struct WorkoutQuery {
    pub week: Option<String>,
    pub exercise: Option<String>,
    pub days: Option<String>,
}

/// Validated workouts filter; blank parameters are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkoutFilter {
    pub week: Option<String>,
    pub exercise: Option<String>,
    pub days: Option<u32>,
}

impl WorkoutFilter {
    pub fn from_query(query: &WorkoutQuery) -> Result<Self, String> {
        let week = match non_blank(&query.week) {
            Some(raw) => {
                let (year, week) = parse_week(raw)?;
                Some(format!("{year}-W{week:02}"))
            }
            None => None,
        };

        let days = match non_blank(&query.days) {
            Some(raw) => match raw.parse::<u32>() {
                Ok(days) if days > 0 => Some(days),
                _ => return Err(format!("days must be a positive number, got '{raw}'")),
            },
            None => None,
        };

        Ok(Self {
            week,
            exercise: non_blank(&query.exercise).map(str::to_string),
            days,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.week.is_none() && self.exercise.is_none() && self.days.is_none()
    }

    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(week) = &self.week {
            params.push(("week", week.clone()));
        }
        if let Some(exercise) = &self.exercise {
            params.push(("exercise", exercise.clone()));
        }
        if let Some(days) = self.days {
            params.push(("days", days.to_string()));
        }
        params
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Default, Deserialize)]
pub struct ProgressQuery {
    pub range: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StreakResponse {
    pub current_streak: u32,
    pub total_active_days: u32,
    pub emoji: String,
    pub message: String,
    pub policy: String,
    pub today: String,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream: Option<HealthResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
