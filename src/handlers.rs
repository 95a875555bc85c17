use crate::errors::AppError;
use crate::models::{
    HealthStatus, ProgressQuery, StreakResponse, Workout, WorkoutFilter, WorkoutForm, WorkoutQuery,
};
use crate::state::AppState;
use crate::stats::{StatsRange, summarize, week_label};
use crate::streak::{StreakResult, streak_emoji, streak_message};
use crate::ui::{render_new_workout, render_progress, render_workout_detail, render_workouts};
use axum::{
    Form, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::{info, warn};

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<WorkoutQuery>,
) -> Result<Html<String>, AppError> {
    let filter = WorkoutFilter::from_query(&query).map_err(AppError::bad_request)?;
    let workouts = state.api.list_workouts(&filter).await?;

    // The streak always spans the full history, not the filtered view.
    let streak = if filter.is_empty() {
        current_streak(&state, &workouts)?
    } else {
        let all = state.api.list_workouts(&WorkoutFilter::default()).await?;
        current_streak(&state, &all)?
    };

    let current_week = week_label(state.clock.today());
    Ok(Html(render_workouts(&workouts, &filter, &current_week, streak)))
}

pub async fn new_workout(State(state): State<AppState>) -> Html<String> {
    let form = WorkoutForm {
        date: state.clock.today().to_string(),
        sets: "3".to_string(),
        reps: "10".to_string(),
        rpe: "7".to_string(),
        ..Default::default()
    };
    Html(render_new_workout(&form, &[]))
}

pub async fn create_workout(
    State(state): State<AppState>,
    Form(form): Form<WorkoutForm>,
) -> Result<Response, AppError> {
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            warn!("rejected new workout: {}", errors.join("; "));
            return Ok((StatusCode::BAD_REQUEST, Html(render_new_workout(&form, &errors))).into_response());
        }
    };

    let created = state.api.create_workout(&input).await?;
    info!(id = created.id, exercise = %created.exercise, "workout created");
    Ok(Redirect::to(&format!("/workouts/{}", created.id)).into_response())
}

pub async fn workout_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, AppError> {
    let workout = state.api.get_workout(id).await?;
    Ok(Html(render_workout_detail(&workout, &WorkoutForm::from(&workout), &[])))
}

pub async fn update_workout(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<WorkoutForm>,
) -> Result<Response, AppError> {
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            warn!(id, "rejected workout update: {}", errors.join("; "));
            let workout = state.api.get_workout(id).await?;
            let page = render_workout_detail(&workout, &form, &errors);
            return Ok((StatusCode::BAD_REQUEST, Html(page)).into_response());
        }
    };

    let updated = state.api.update_workout(id, &input).await?;
    info!(id = updated.id, "workout updated");
    Ok(Redirect::to(&format!("/workouts/{}", updated.id)).into_response())
}

pub async fn delete_workout(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    state.api.delete_workout(id).await?;
    info!(id, "workout deleted");
    Ok(Redirect::to("/"))
}

pub async fn progress(
    State(state): State<AppState>,
    Query(query): Query<ProgressQuery>,
) -> Result<Html<String>, AppError> {
    let range = StatsRange::parse(query.range.as_deref());
    let stats = state.api.weekly_stats(&range).await?;
    let workouts = state.api.list_workouts(&WorkoutFilter::default()).await?;
    let streak = current_streak(&state, &workouts)?;

    let summary = summarize(&stats);
    Ok(Html(render_progress(range, &stats, &summary, streak)))
}

pub async fn get_streak(State(state): State<AppState>) -> Result<Json<StreakResponse>, AppError> {
    let workouts = state.api.list_workouts(&WorkoutFilter::default()).await?;
    let engine = state.streak_engine();
    let today = engine.today()?;
    let result = engine.compute_at(today, &workouts);

    Ok(Json(StreakResponse {
        current_streak: result.current_streak,
        total_active_days: result.total_active_days,
        emoji: streak_emoji(result.current_streak).to_string(),
        message: streak_message(result.current_streak),
        policy: engine.policy().as_str().to_string(),
        today: today.to_string(),
    }))
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    match state.api.health().await {
        Ok(upstream) => (
            StatusCode::OK,
            Json(HealthStatus {
                status: "UP".to_string(),
                upstream: Some(upstream),
                error: None,
            }),
        ),
        Err(err) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthStatus {
                status: "DEGRADED".to_string(),
                upstream: None,
                error: Some(err.to_string()),
            }),
        ),
    }
}

fn current_streak(state: &AppState, workouts: &[Workout]) -> Result<StreakResult, AppError> {
    Ok(state.streak_engine().compute(workouts)?)
}
