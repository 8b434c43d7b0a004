use std::sync::Arc;

use anyhow::Context;
use axum::middleware::from_fn;
use axum::{
    Router,
    extract::Extension,
    routing::{get, post},
};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeFile;

use exercise_tracker::api;
use exercise_tracker::handler::errors::handler_404;
use exercise_tracker::handler::logging::request_logging_middleware;
use exercise_tracker::repository::sqlx_impl::{PgExerciseRepository, PgUserRepository};
use exercise_tracker::services::{exercise_service::ExerciseService, user_service::UserService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Database
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to the database")?;
    tracing::info!("Database connected");

    sqlx::migrate!()
        .run(&pool)
        .await
        .context("failed to run migrations")?;

    // Initialize repositories
    let user_repo = Arc::new(PgUserRepository::new(pool.clone()));
    let exercise_repo = Arc::new(PgExerciseRepository::new(pool.clone()));

    // Initialize services
    let user_service = Arc::new(UserService::new(user_repo.clone()));
    let exercise_service = Arc::new(ExerciseService::new(user_repo, exercise_repo));

    let app = Router::new()
        .route_service("/", ServeFile::new("static/index.html"))
        .route(
            "/api/users",
            get(api::users::list_users::<PgUserRepository>)
                .post(api::users::create_user::<PgUserRepository>),
        )
        .route(
            "/api/users/{_id}/exercises",
            post(api::exercises::create_exercise::<PgUserRepository, PgExerciseRepository>),
        )
        .route(
            "/api/users/{_id}/logs",
            get(api::exercises::get_logs::<PgUserRepository, PgExerciseRepository>),
        )
        .fallback(handler_404)
        .layer(from_fn(request_logging_middleware))
        .layer(CorsLayer::permissive())
        .layer(Extension(user_service))
        .layer(Extension(exercise_service));

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".into());
    let listener = TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    tracing::info!("Your app is listening on port {port}");
    tracing::info!("📚 Available endpoints:");
    tracing::info!("  • POST /api/users, GET /api/users");
    tracing::info!("  • POST /api/users/{{_id}}/exercises");
    tracing::info!("  • GET /api/users/{{_id}}/logs?from&to&limit");

    axum::serve(listener, app).await?;

    Ok(())
}
