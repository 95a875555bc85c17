//! HTTP client for the workouts REST API.

use crate::models::{CreateWorkoutResponse, HealthResponse, WeeklyStats, Workout, WorkoutFilter, WorkoutInput};
use crate::stats::StatsRange;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("workouts API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("workouts API request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn list_workouts(&self, filter: &WorkoutFilter) -> Result<Vec<Workout>, ApiError> {
        let request = self.http.get(self.url("/workouts")).query(&filter.to_params());
        self.send_json("/workouts", request).await
    }

    pub async fn get_workout(&self, id: i64) -> Result<Workout, ApiError> {
        let path = format!("/workouts/{id}");
        self.send_json(&path, self.http.get(self.url(&path))).await
    }

    pub async fn create_workout(&self, input: &WorkoutInput) -> Result<Workout, ApiError> {
        let request = self.http.post(self.url("/workouts")).json(input);
        let created: CreateWorkoutResponse = self.send_json("/workouts", request).await?;
        debug!(id = created.workout.id, "{}", created.message);
        Ok(created.workout)
    }

    pub async fn update_workout(&self, id: i64, input: &WorkoutInput) -> Result<Workout, ApiError> {
        let path = format!("/workouts/{id}");
        self.send_json(&path, self.http.put(self.url(&path)).json(input)).await
    }

    pub async fn delete_workout(&self, id: i64) -> Result<(), ApiError> {
        let path = format!("/workouts/{id}");
        self.send(&path, self.http.delete(self.url(&path))).await?;
        Ok(())
    }

    pub async fn weekly_stats(&self, range: &StatsRange) -> Result<Vec<WeeklyStats>, ApiError> {
        let request = self
            .http
            .get(self.url("/stats"))
            .query(&[("range", range.as_param())]);
        self.send_json("/stats", request).await
    }

    pub async fn health(&self) -> Result<HealthResponse, ApiError> {
        self.send_json("/health", self.http.get(self.url("/health"))).await
    }

    async fn send_json<T: DeserializeOwned>(&self, path: &str, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(path, request).await?;
        response.json::<T>().await.map_err(|err| {
            error!("failed to decode response from {path}: {err}");
            ApiError::Transport(err)
        })
    }

    async fn send(&self, path: &str, request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        debug!("calling workouts API {path}");
        let response = request.send().await.map_err(|err| {
            error!("request to {path} failed: {err}");
            ApiError::Transport(err)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(path.to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        error!("workouts API {path} returned {status}");
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_drops_trailing_slash() {
        let client = ApiClient::new("http://127.0.0.1:8081/api/");
        assert_eq!(client.base_url(), "http://127.0.0.1:8081/api");
        assert_eq!(client.url("/workouts/3"), "http://127.0.0.1:8081/api/workouts/3");
    }
}
