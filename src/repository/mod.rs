use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    pub user_id: i64,
    pub external_id: Uuid,
    pub username: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub external_id: Uuid,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct Exercise {
    pub exercise_id: i64,
    pub external_id: Uuid,
    pub user_id: i64,
    pub description: String,
    pub duration: i32,
    pub date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct NewExercise {
    pub external_id: Uuid,
    pub user_id: i64,
    pub description: String,
    pub duration: i32,
    pub date: NaiveDate,
}

/// Optional bounds applied when reading a user's exercise log. `from`
/// and `to` are inclusive; `limit` caps the number of entries returned.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<i64>,
}

#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    async fn insert_user(&self, new_user: NewUser) -> Result<User>;
    async fn find_by_external_id(&self, external_id: Uuid) -> Result<Option<User>>;
    async fn list_users(&self) -> Result<Vec<User>>;
}

#[async_trait]
pub trait ExerciseRepository: Send + Sync + 'static {
    async fn insert_exercise(&self, new_exercise: NewExercise) -> Result<Exercise>;
    async fn find_log(&self, user_id: i64, filter: LogFilter) -> Result<Vec<Exercise>>;
}

pub mod sqlx_impl;
