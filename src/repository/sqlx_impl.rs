use super::{Exercise, ExerciseRepository, LogFilter, NewExercise, NewUser, User, UserRepository};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

pub struct PgUserRepository {
    pub pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert_user(&self, new_user: NewUser) -> Result<User> {
        let rec = sqlx::query_as::<_, User>(
            r#"INSERT INTO users (external_id, username) VALUES ($1, $2) RETURNING user_id, external_id, username"#,
        )
        .bind(new_user.external_id)
        .bind(&new_user.username)
        .fetch_one(&self.pool)
        .await?;
        Ok(rec)
    }

    async fn find_by_external_id(&self, external_id: Uuid) -> Result<Option<User>> {
        let rec = sqlx::query_as::<_, User>(
            r#"SELECT user_id, external_id, username FROM users WHERE external_id = $1"#,
        )
        .bind(external_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(rec)
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let recs = sqlx::query_as::<_, User>(
            r#"SELECT user_id, external_id, username FROM users ORDER BY user_id"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(recs)
    }
}

pub struct PgExerciseRepository {
    pub pool: PgPool,
}

impl PgExerciseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExerciseRepository for PgExerciseRepository {
    async fn insert_exercise(&self, new_exercise: NewExercise) -> Result<Exercise> {
        let rec = sqlx::query_as::<_, Exercise>(
            r#"INSERT INTO exercises (external_id, user_id, description, duration, date) VALUES ($1, $2, $3, $4, $5) RETURNING exercise_id, external_id, user_id, description, duration, date"#,
        )
        .bind(new_exercise.external_id)
        .bind(new_exercise.user_id)
        .bind(&new_exercise.description)
        .bind(new_exercise.duration)
        .bind(new_exercise.date)
        .fetch_one(&self.pool)
        .await?;
        Ok(rec)
    }

    async fn find_log(&self, user_id: i64, filter: LogFilter) -> Result<Vec<Exercise>> {
        let mut query: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "SELECT exercise_id, external_id, user_id, description, duration, date \
             FROM exercises WHERE user_id = ",
        );
        query.push_bind(user_id);
        if let Some(from) = filter.from {
            query.push(" AND date >= ");
            query.push_bind(from);
        }
        if let Some(to) = filter.to {
            query.push(" AND date <= ");
            query.push_bind(to);
        }
        // Insertion order, not date order.
        query.push(" ORDER BY exercise_id");
        if let Some(limit) = filter.limit {
            query.push(" LIMIT ");
            query.push_bind(limit);
        }

        let recs = query
            .build_query_as::<Exercise>()
            .fetch_all(&self.pool)
            .await?;
        Ok(recs)
    }
}
