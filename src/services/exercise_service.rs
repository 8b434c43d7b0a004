use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::exercise::{Description, Duration, ExerciseDate};
use crate::handler::errors::ApiError;
use crate::repository::{ExerciseRepository, LogFilter, NewExercise, User, UserRepository};

/// How dates are rendered in responses, e.g. "Mon Jan 01 2024".
const DATE_DISPLAY_FORMAT: &str = "%a %b %d %Y";

/// Raw form fields of `POST /api/users/{_id}/exercises`, before
/// validation.
#[derive(Debug, Clone, Default)]
pub struct AddExerciseRequest {
    pub description: Option<String>,
    pub duration: Option<String>,
    pub date: Option<String>,
}

/// Raw query parameters of `GET /api/users/{_id}/logs`.
#[derive(Debug, Clone, Default)]
pub struct LogQueryRequest {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExerciseResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    pub date: String,
    pub duration: i32,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LogEntry {
    pub description: String,
    pub duration: i32,
    pub date: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LogResponse {
    pub username: String,
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub count: usize,
    pub log: Vec<LogEntry>,
}

#[derive(Clone)]
pub struct ExerciseService<U: UserRepository, E: ExerciseRepository> {
    pub user_repo: Arc<U>,
    pub exercise_repo: Arc<E>,
}

impl<U: UserRepository, E: ExerciseRepository> ExerciseService<U, E> {
    pub fn new(user_repo: Arc<U>, exercise_repo: Arc<E>) -> Self {
        Self {
            user_repo,
            exercise_repo,
        }
    }

    pub async fn add_exercise(
        &self,
        user_id: &str,
        req: AddExerciseRequest,
    ) -> Result<ExerciseResponse, ApiError> {
        // The owning user is resolved before any field check, so an
        // unknown id wins over invalid fields.
        let user = self.resolve_user(user_id).await?;

        let description = Description::try_from(req.description.as_deref().unwrap_or_default())
            .map_err(|e| ApiError::Validation(e.to_string()))?;
        let duration = Duration::try_from(req.duration.as_deref().unwrap_or_default())
            .map_err(|e| ApiError::Validation(e.to_string()))?;
        let date = parse_form_date(req.date.as_deref())?;

        let new_exercise = NewExercise {
            external_id: Uuid::new_v4(),
            user_id: user.user_id,
            description: description.into_inner(),
            duration: duration.minutes(),
            date,
        };
        let exercise = self.exercise_repo.insert_exercise(new_exercise).await?;

        Ok(ExerciseResponse {
            id: exercise.external_id,
            username: user.username,
            date: exercise.date.format(DATE_DISPLAY_FORMAT).to_string(),
            duration: exercise.duration,
            description: exercise.description,
        })
    }

    pub async fn log_for_user(
        &self,
        user_id: &str,
        query: LogQueryRequest,
    ) -> Result<LogResponse, ApiError> {
        let user = self.resolve_user(user_id).await?;
        let filter = parse_log_filter(&query)?;

        let exercises = self.exercise_repo.find_log(user.user_id, filter).await?;
        let log: Vec<LogEntry> = exercises
            .into_iter()
            .map(|exercise| LogEntry {
                description: exercise.description,
                duration: exercise.duration,
                date: exercise.date.format(DATE_DISPLAY_FORMAT).to_string(),
            })
            .collect();

        Ok(LogResponse {
            username: user.username,
            id: user.external_id,
            // Entries actually returned, not the user's total.
            count: log.len(),
            log,
        })
    }

    async fn resolve_user(&self, user_id: &str) -> Result<User, ApiError> {
        // An id that does not parse can never match a stored user.
        let external_id = Uuid::parse_str(user_id)
            .map_err(|_| ApiError::NotFound("User Id not found".to_string()))?;
        self.user_repo
            .find_by_external_id(external_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User Id not found".to_string()))
    }
}

fn parse_form_date(raw: Option<&str>) -> Result<NaiveDate, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Local::now().date_naive()),
        Some(value) => ExerciseDate::try_from(value)
            .map(ExerciseDate::into_inner)
            .map_err(|e| ApiError::Validation(e.to_string())),
    }
}

fn parse_log_filter(query: &LogQueryRequest) -> Result<LogFilter, ApiError> {
    let from = parse_date_bound(query.from.as_deref(), "Invalid 'from' date")?;
    let to = parse_date_bound(query.to.as_deref(), "Invalid 'to' date")?;
    let limit = match query.limit.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(value) => Some(
            value
                .parse::<i64>()
                .ok()
                .filter(|limit| *limit >= 0)
                .ok_or_else(|| ApiError::Validation("Invalid limit".to_string()))?,
        ),
    };
    Ok(LogFilter { from, to, limit })
}

fn parse_date_bound(raw: Option<&str>, message: &str) -> Result<Option<NaiveDate>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ApiError::Validation(message.to_string())),
    }
}
