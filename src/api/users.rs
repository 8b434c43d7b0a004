use axum::{
    extract::{Extension, Form, Json},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::repository::UserRepository;
use crate::services::user_service::UserService;

#[derive(Debug, Deserialize)]
pub struct CreateUserForm {
    pub username: Option<String>,
}

/// POST /api/users
pub async fn create_user<U: UserRepository>(
    Extension(service): Extension<Arc<UserService<U>>>,
    Form(form): Form<CreateUserForm>,
) -> impl IntoResponse {
    match service.create_user(form.username.as_deref()).await {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /api/users
pub async fn list_users<U: UserRepository>(
    Extension(service): Extension<Arc<UserService<U>>>,
) -> impl IntoResponse {
    match service.list_users().await {
        Ok(users) => (StatusCode::OK, Json(users)).into_response(),
        Err(e) => e.into_response(),
    }
}
