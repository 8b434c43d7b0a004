use axum::{
    extract::{Extension, Form, Json, Path, Query},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::repository::{ExerciseRepository, UserRepository};
use crate::services::exercise_service::{AddExerciseRequest, ExerciseService, LogQueryRequest};

#[derive(Debug, Deserialize)]
pub struct ExerciseForm {
    pub description: Option<String>,
    pub duration: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LogQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<String>,
}

/// POST /api/users/{_id}/exercises
pub async fn create_exercise<U: UserRepository, E: ExerciseRepository>(
    Extension(service): Extension<Arc<ExerciseService<U, E>>>,
    Path(user_id): Path<String>,
    Form(form): Form<ExerciseForm>,
) -> impl IntoResponse {
    let req = AddExerciseRequest {
        description: form.description,
        duration: form.duration,
        date: form.date,
    };
    match service.add_exercise(&user_id, req).await {
        Ok(exercise) => (StatusCode::OK, Json(exercise)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /api/users/{_id}/logs
pub async fn get_logs<U: UserRepository, E: ExerciseRepository>(
    Extension(service): Extension<Arc<ExerciseService<U, E>>>,
    Path(user_id): Path<String>,
    Query(query): Query<LogQuery>,
) -> impl IntoResponse {
    let req = LogQueryRequest {
        from: query.from,
        to: query.to,
        limit: query.limit,
    };
    match service.log_for_user(&user_id, req).await {
        Ok(log) => (StatusCode::OK, Json(log)).into_response(),
        Err(e) => e.into_response(),
    }
}
