use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::{Duration, Instant};
use sync_fit_web::models::Workout;
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct StreakResponse {
    current_streak: u32,
    total_active_days: u32,
    emoji: String,
    message: String,
    policy: String,
    today: String,
}

#[derive(Debug, Deserialize)]
struct HealthStatus {
    status: String,
    upstream: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct FakeInput {
    date: String,
    exercise: String,
    sets: u32,
    reps: u32,
    weight: f64,
    rpe: f64,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

type FakeStore = Arc<StdMutex<Vec<Workout>>>;

fn seed_workouts() -> Vec<Workout> {
    let workout = |id: i64, date: &str, exercise: &str| Workout {
        id,
        date: date.to_string(),
        exercise: exercise.to_string(),
        sets: 3,
        reps: 10,
        weight: 100.0,
        rpe: 8.0,
        created_at: Some(date[..10].to_string()),
    };
    vec![
        workout(1, "2025-09-25", "Bench Press"),
        workout(2, "2025-09-24T07:30:00", "Squats"),
        workout(3, "2025-09-20", "Deadlift"),
    ]
}

async fn fake_list(
    State(store): State<FakeStore>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Vec<Workout>> {
    let workouts = store.lock().unwrap().clone();
    let filtered = match params.get("exercise") {
        Some(needle) => workouts
            .into_iter()
            .filter(|w| w.exercise.to_lowercase().contains(&needle.to_lowercase()))
            .collect(),
        None => workouts,
    };
    Json(filtered)
}

async fn fake_get(State(store): State<FakeStore>, Path(id): Path<i64>) -> Result<Json<Workout>, StatusCode> {
    let workouts = store.lock().unwrap();
    workouts
        .iter()
        .find(|w| w.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn fake_create(
    State(store): State<FakeStore>,
    Json(input): Json<FakeInput>,
) -> (StatusCode, Json<serde_json::Value>) {
    let mut workouts = store.lock().unwrap();
    let id = workouts.iter().map(|w| w.id).max().unwrap_or(0) + 1;
    let workout = Workout {
        id,
        date: input.date.clone(),
        exercise: input.exercise,
        sets: input.sets,
        reps: input.reps,
        weight: input.weight,
        rpe: input.rpe,
        created_at: Some(input.date),
    };
    workouts.push(workout.clone());
    (
        StatusCode::CREATED,
        Json(json!({ "success": true, "message": "Workout created successfully", "workout": workout })),
    )
}

async fn fake_update(
    State(store): State<FakeStore>,
    Path(id): Path<i64>,
    Json(input): Json<FakeInput>,
) -> Result<Json<Workout>, StatusCode> {
    let mut workouts = store.lock().unwrap();
    let workout = workouts.iter_mut().find(|w| w.id == id).ok_or(StatusCode::NOT_FOUND)?;
    workout.date = input.date;
    workout.exercise = input.exercise;
    workout.sets = input.sets;
    workout.reps = input.reps;
    workout.weight = input.weight;
    workout.rpe = input.rpe;
    Ok(Json(workout.clone()))
}

async fn fake_delete(
    State(store): State<FakeStore>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let mut workouts = store.lock().unwrap();
    let before = workouts.len();
    workouts.retain(|w| w.id != id);
    if workouts.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({ "success": true, "message": "Workout deleted successfully" })))
}

async fn fake_stats(Query(params): Query<HashMap<String, String>>) -> Json<serde_json::Value> {
    let weeks: u32 = params
        .get("range")
        .and_then(|range| range.trim_start_matches("last").trim_end_matches('w').parse().ok())
        .unwrap_or(4);
    let stats: Vec<serde_json::Value> = (1..=weeks)
        .map(|i| json!({ "week": format!("2025-W{:02}", 39 - weeks + i), "volume": 1000.0 * i as f64, "totalWorkouts": i }))
        .collect();
    Json(json!(stats))
}

async fn fake_health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "UP",
        "service": "SyncFit Backend API",
        "timestamp": "2025-09-25T10:00:00",
        "version": "1.0.0"
    }))
}

fn fake_api() -> Router {
    let store: FakeStore = Arc::new(StdMutex::new(seed_workouts()));
    Router::new()
        .route("/workouts", get(fake_list).post(fake_create))
        .route("/workouts/:id", get(fake_get).put(fake_update).delete(fake_delete))
        .route("/stats", get(fake_stats))
        .route("/health", get(fake_health))
        .with_state(store)
}

/// Runs the fake workouts API on its own thread so it outlives any single
/// test runtime.
fn spawn_fake_api() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind fake api");
    listener.set_nonblocking(true).expect("nonblocking listener");
    let addr = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .expect("fake api runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).expect("fake api listener");
            axum::serve(listener, fake_api()).await.expect("fake api server");
        });
    });

    format!("http://{addr}")
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/health")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let api_url = spawn_fake_api();
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_sync_fit_web"))
        .env("PORT", port.to_string())
        .env("SYNC_FIT_API_URL", api_url)
        .env("SYNC_FIT_TODAY", "2025-09-25")
        .env_remove("SYNC_FIT_STREAK_POLICY")
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

fn workout_form(date: &str, exercise: &str, sets: &str) -> Vec<(&'static str, String)> {
    vec![
        ("date", date.to_string()),
        ("exercise", exercise.to_string()),
        ("sets", sets.to_string()),
        ("reps", "5".to_string()),
        ("weight", "120".to_string()),
        ("rpe", "9".to_string()),
    ]
}

#[tokio::test]
async fn http_streak_uses_rest_day_tolerant_policy() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let streak: StreakResponse = client
        .get(format!("{}/api/streak", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(streak.today, "2025-09-25");
    assert_eq!(streak.policy, "rest-day-tolerant");
    assert_eq!(streak.current_streak, 2);
    assert_eq!(streak.total_active_days, 3);
    assert_eq!(streak.emoji, "🔥");
    assert_eq!(streak.message, "2 days strong! 💪");
}

#[tokio::test]
async fn http_index_filters_by_exercise() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/?exercise=squat", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let body = response.text().await.unwrap();

    assert!(body.contains("Squats"));
    assert!(!body.contains("Deadlift"));
    assert!(body.contains(r#"exercise matching "squat""#));
    assert!(body.contains("2 days strong! 💪"));
}

#[tokio::test]
async fn http_index_rejects_invalid_week() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/?week=2025-W60", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_create_workout_redirects_to_detail() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/workouts", server.base_url))
        .form(&workout_form("2025-09-24", "Overhead Press", "4"))
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert!(response.url().path().starts_with("/workouts/"));
    let body = response.text().await.unwrap();
    assert!(body.contains("Overhead Press"));
    assert!(body.contains("2400.0 kg"));
}

#[tokio::test]
async fn http_create_workout_rejects_invalid_form() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/workouts", server.base_url))
        .form(&workout_form("2025-09-24", "Lunges", "0"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let body = response.text().await.unwrap();
    assert!(body.contains("sets must be between 1 and 50"));
    assert!(body.contains(r#"value="Lunges""#));
}

#[tokio::test]
async fn http_update_workout_shows_new_values() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/workouts/1", server.base_url))
        .form(&workout_form("2025-09-25", "Bench Press", "5"))
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert_eq!(response.url().path(), "/workouts/1");
    let body = response.text().await.unwrap();
    assert!(body.contains("3000.0 kg"));
}

#[tokio::test]
async fn http_delete_created_workout() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let created = client
        .post(format!("{}/workouts", server.base_url))
        .form(&workout_form("2025-09-24", "Farmer Carry", "2"))
        .send()
        .await
        .unwrap();
    let detail_path = created.url().path().to_string();

    let deleted = client
        .post(format!("{}{detail_path}/delete", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(deleted.status().is_success());
    assert_eq!(deleted.url().path(), "/");

    let missing = client
        .get(format!("{}{detail_path}", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_delete_unknown_workout_is_not_found() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/workouts/999/delete", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_progress_renders_weekly_summary() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let body = client
        .get(format!("{}/progress?range=last8w", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains(r#"<option value="last8w" selected>"#));
    assert!(body.contains("2025-W32"));
    assert!(body.contains("36000.0 kg"));
    assert!(body.contains("4500.0 kg"));
    assert!(body.contains("Total active days: 3"));
}

#[tokio::test]
async fn http_health_reports_upstream() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let health: HealthStatus = client
        .get(format!("{}/api/health", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(health.status, "UP");
    let upstream = health.upstream.expect("upstream health");
    assert_eq!(upstream["service"], "SyncFit Backend API");
}
