use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/workouts", post(handlers::create_workout))
        .route("/workouts/new", get(handlers::new_workout))
        .route("/workouts/:id", get(handlers::workout_detail).post(handlers::update_workout))
        .route("/workouts/:id/delete", post(handlers::delete_workout))
        .route("/progress", get(handlers::progress))
        .route("/api/streak", get(handlers::get_streak))
        .route("/api/health", get(handlers::health))
        .with_state(state)
}
