use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::user::Username;
use crate::handler::errors::ApiError;
use crate::repository::{NewUser, UserRepository};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserResponse {
    pub username: String,
    #[serde(rename = "_id")]
    pub id: Uuid,
}

/// Projection of a stored user: only the id and the username.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
}

#[derive(Clone)]
pub struct UserService<U: UserRepository> {
    pub user_repo: Arc<U>,
}

impl<U: UserRepository> UserService<U> {
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn create_user(&self, username: Option<&str>) -> Result<UserResponse, ApiError> {
        let username = Username::try_from(username.unwrap_or_default())
            .map_err(|e| ApiError::Validation(e.to_string()))?;

        let new_user = NewUser {
            external_id: Uuid::new_v4(),
            username: username.into_inner(),
        };
        let user = self.user_repo.insert_user(new_user).await?;

        Ok(UserResponse {
            username: user.username,
            id: user.external_id,
        })
    }

    pub async fn list_users(&self) -> Result<Vec<UserSummary>, ApiError> {
        let users = self.user_repo.list_users().await?;
        Ok(users
            .into_iter()
            .map(|user| UserSummary {
                id: user.external_id,
                username: user.username,
            })
            .collect())
    }
}
