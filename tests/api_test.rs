use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    extract::Extension,
    http::{Request, StatusCode, header},
    routing::{get, post},
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use exercise_tracker::api;
use exercise_tracker::handler::errors::handler_404;
use exercise_tracker::repository::{
    Exercise, ExerciseRepository, LogFilter, NewExercise, NewUser, User, UserRepository,
};
use exercise_tracker::services::{exercise_service::ExerciseService, user_service::UserService};

// Mock repository implementations
struct MockUserRepo {
    users: Mutex<Vec<User>>,
}

impl MockUserRepo {
    fn new() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl UserRepository for MockUserRepo {
    async fn insert_user(&self, new_user: NewUser) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        let user = User {
            user_id: (users.len() + 1) as i64,
            external_id: new_user.external_id,
            username: new_user.username,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_external_id(&self, external_id: Uuid) -> Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().cloned().find(|u| u.external_id == external_id))
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.users.lock().unwrap().clone())
    }
}

struct MockExerciseRepo {
    exercises: Mutex<Vec<Exercise>>,
}

impl MockExerciseRepo {
    fn new() -> Self {
        Self {
            exercises: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ExerciseRepository for MockExerciseRepo {
    async fn insert_exercise(&self, new_exercise: NewExercise) -> Result<Exercise> {
        let mut exercises = self.exercises.lock().unwrap();
        let exercise = Exercise {
            exercise_id: (exercises.len() + 1) as i64,
            external_id: new_exercise.external_id,
            user_id: new_exercise.user_id,
            description: new_exercise.description,
            duration: new_exercise.duration,
            date: new_exercise.date,
        };
        exercises.push(exercise.clone());
        Ok(exercise)
    }

    async fn find_log(&self, user_id: i64, filter: LogFilter) -> Result<Vec<Exercise>> {
        let exercises = self.exercises.lock().unwrap();
        let mut log: Vec<Exercise> = exercises
            .iter()
            .filter(|e| e.user_id == user_id)
            .filter(|e| filter.from.map_or(true, |from| e.date >= from))
            .filter(|e| filter.to.map_or(true, |to| e.date <= to))
            .cloned()
            .collect();
        if let Some(limit) = filter.limit {
            log.truncate(limit as usize);
        }
        Ok(log)
    }
}

// Helper to create test app
fn create_test_app() -> Router {
    let user_repo = Arc::new(MockUserRepo::new());
    let exercise_repo = Arc::new(MockExerciseRepo::new());
    let user_service = Arc::new(UserService::new(user_repo.clone()));
    let exercise_service = Arc::new(ExerciseService::new(user_repo, exercise_repo));

    Router::new()
        .route(
            "/api/users",
            get(api::users::list_users::<MockUserRepo>)
                .post(api::users::create_user::<MockUserRepo>),
        )
        .route(
            "/api/users/{_id}/exercises",
            post(api::exercises::create_exercise::<MockUserRepo, MockExerciseRepo>),
        )
        .route(
            "/api/users/{_id}/logs",
            get(api::exercises::get_logs::<MockUserRepo, MockExerciseRepo>),
        )
        .fallback(handler_404)
        .layer(Extension(user_service))
        .layer(Extension(exercise_service))
}

async fn post_form(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body_bytes).unwrap())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body_bytes).unwrap())
}

async fn create_user(app: &Router, username: &str) -> String {
    let (status, body) = post_form(app, "/api/users", &format!("username={username}")).await;
    assert_eq!(status, StatusCode::OK);
    body["_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn create_user_returns_username_and_id() {
    let app = create_test_app();

    let (status, body) = post_form(&app, "/api/users", "username=alice").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
    let id = body["_id"].as_str().unwrap();
    assert!(Uuid::parse_str(id).is_ok());
}

#[tokio::test]
async fn create_user_with_empty_username_reports_the_error() {
    let app = create_test_app();

    let (status, body) = post_form(&app, "/api/users", "username=").await;

    // Business failures still answer 200.
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "error": "Username is required" }));
}

#[tokio::test]
async fn create_user_with_missing_field_reports_the_error() {
    let app = create_test_app();

    let (status, body) = post_form(&app, "/api/users", "").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], "Username is required");
}

#[tokio::test]
async fn list_users_returns_the_projection() {
    let app = create_test_app();
    create_user(&app, "alice").await;
    create_user(&app, "bob").await;

    let (status, body) = get_json(&app, "/api/users").await;

    assert_eq!(status, StatusCode::OK);
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 2);
    for user in users {
        let fields = user.as_object().unwrap();
        assert_eq!(fields.len(), 2);
        assert!(fields.contains_key("_id"));
        assert!(fields.contains_key("username"));
    }
    assert_eq!(users[0]["username"], "alice");
    assert_eq!(users[1]["username"], "bob");
}

#[tokio::test]
async fn create_exercise_returns_the_full_entry() {
    let app = create_test_app();
    let user_id = create_user(&app, "alice").await;

    let (status, body) = post_form(
        &app,
        &format!("/api/users/{user_id}/exercises"),
        "description=Running&duration=30&date=2024-01-01",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["description"], "Running");
    assert_eq!(body["duration"], 30);
    assert_eq!(body["date"], "Mon Jan 01 2024");
    assert!(Uuid::parse_str(body["_id"].as_str().unwrap()).is_ok());
    assert_eq!(body.as_object().unwrap().len(), 5);
}

#[tokio::test]
async fn create_exercise_escapes_markup_in_description() {
    let app = create_test_app();
    let user_id = create_user(&app, "alice").await;

    let (status, body) = post_form(
        &app,
        &format!("/api/users/{user_id}/exercises"),
        "description=%3Cb%3Erun%3C%2Fb%3E&duration=10",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["description"], "&lt;b&gt;run&lt;&#x2F;b&gt;");
}

#[tokio::test]
async fn create_exercise_for_unknown_user_reports_the_error() {
    let app = create_test_app();

    let (status, body) = post_form(
        &app,
        &format!("/api/users/{}/exercises", Uuid::new_v4()),
        "description=Running&duration=30",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "error": "User Id not found" }));
}

#[tokio::test]
async fn create_exercise_reports_the_first_invalid_field() {
    let app = create_test_app();
    let user_id = create_user(&app, "alice").await;
    let uri = format!("/api/users/{user_id}/exercises");

    let (_, body) = post_form(&app, &uri, "description=&duration=30").await;
    assert_eq!(body["error"], "Description cannot be empty");

    let (_, body) = post_form(&app, &uri, "description=Running&duration=").await;
    assert_eq!(body["error"], "Duration cannot be empty");

    let (_, body) = post_form(&app, &uri, "description=Running&duration=abc").await;
    assert_eq!(body["error"], "Invalid duration");
}

#[tokio::test]
async fn logs_filter_by_range_and_limit() {
    let app = create_test_app();
    let user_id = create_user(&app, "alice").await;
    let uri = format!("/api/users/{user_id}/exercises");
    for day in 1..=5 {
        let (status, _) = post_form(
            &app,
            &uri,
            &format!("description=day+{day}&duration=10&date=2024-01-0{day}"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = get_json(&app, &format!("/api/users/{user_id}/logs")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["_id"], user_id);
    assert_eq!(body["count"], 5);
    assert_eq!(body["log"].as_array().unwrap().len(), 5);

    let (_, body) = get_json(
        &app,
        &format!("/api/users/{user_id}/logs?from=2024-01-02&to=2024-01-04"),
    )
    .await;
    assert_eq!(body["count"], 3);
    assert_eq!(body["log"][0]["description"], "day 2");
    assert_eq!(body["log"][0]["date"], "Tue Jan 02 2024");

    let (_, body) = get_json(&app, &format!("/api/users/{user_id}/logs?limit=2")).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["log"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn log_entries_carry_only_description_duration_and_date() {
    let app = create_test_app();
    let user_id = create_user(&app, "alice").await;
    post_form(
        &app,
        &format!("/api/users/{user_id}/exercises"),
        "description=Running&duration=30&date=2024-01-01",
    )
    .await;

    let (_, body) = get_json(&app, &format!("/api/users/{user_id}/logs")).await;
    let entry = body["log"][0].as_object().unwrap();
    assert_eq!(entry.len(), 3);
    assert_eq!(entry["description"], "Running");
    assert_eq!(entry["duration"], 30);
    assert_eq!(entry["date"], "Mon Jan 01 2024");
}

#[tokio::test]
async fn logs_for_unknown_user_report_the_error() {
    let app = create_test_app();

    let (status, body) = get_json(&app, &format!("/api/users/{}/logs", Uuid::new_v4())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "error": "User Id not found" }));
}

#[tokio::test]
async fn logs_reject_malformed_query_parameters() {
    let app = create_test_app();
    let user_id = create_user(&app, "alice").await;

    let (_, body) = get_json(&app, &format!("/api/users/{user_id}/logs?from=banana")).await;
    assert_eq!(body["error"], "Invalid 'from' date");

    let (_, body) = get_json(&app, &format!("/api/users/{user_id}/logs?limit=many")).await;
    assert_eq!(body["error"], "Invalid limit");
}

#[tokio::test]
async fn unmatched_route_returns_404_with_fixed_body() {
    let app = create_test_app();

    let (status, body) = get_json(&app, "/bogus").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, serde_json::json!("API endpoint not found"));

    let (status, body) = get_json(&app, "/api/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, serde_json::json!("API endpoint not found"));
}
