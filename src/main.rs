mod analytics;
mod config;
mod db;
mod domain;
mod middleware;
mod services;
mod state;
mod uploads;
mod web;

use crate::config::AppConfig;
use crate::db::seed;
use crate::middleware::RateLimiter;
use crate::services::workout::WorkoutGenerator;
use crate::state::SharedState;
use crate::uploads::UploadStore;
use axum::{routing::get_service, Router};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Login and registration attempts allowed per IP per window.
const AUTH_ATTEMPTS: usize = 5;
const AUTH_WINDOW_SECS: u64 = 60;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .map_err(|e| {
            tracing::error!("Failed to connect to database: {}", e);
            e
        })?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to run database migrations: {}", e);
            e
        })?;
    tracing::info!("Database migrations completed");

    seed::seed_admin(&pool, &config).await?;

    let uploads = UploadStore::new(config.upload_dir.clone(), config.max_upload_bytes);
    uploads.ensure_dir().await?;

    let generator = WorkoutGenerator::new(config.workout_descriptions);
    if !config.workout_descriptions {
        tracing::info!("Exercise descriptions disabled");
    }

    let shared: SharedState = Arc::new(state::AppState {
        pool,
        session_key: config.session_key.clone(),
        uploads,
        generator,
        auth_limiter: RateLimiter::new(AUTH_ATTEMPTS, AUTH_WINDOW_SECS),
        config: Arc::new(config),
    });

    let scheduler = JobScheduler::new().await?;

    // Forget idle rate-limit entries every hour
    let shared_for_cleanup = shared.clone();
    scheduler
        .add(Job::new_async("0 0 * * * *", move |_uuid, _l| {
            let state = shared_for_cleanup.clone();
            Box::pin(async move {
                let remaining = state.auth_limiter.cleanup().await;
                tracing::info!("Rate limiter pruned, {} identifiers still tracked", remaining);
            })
        })?)
        .await?;

    scheduler.start().await?;
    tracing::info!("Scheduler started: rate limiter cleanup hourly");

    let static_dir = shared.config.static_dir.clone();
    let static_handler = ServeDir::new(&static_dir).not_found_service(ServeFile::new(static_dir.join("index.html")));

    let app = Router::new()
        .merge(web::routes(shared.clone()))
        .nest_service("/uploads", ServeDir::new(shared.uploads.dir()))
        .fallback_service(get_service(static_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        );

    let addr = shared.config.bind_addr.clone();
    tracing::info!("Listening on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
    Ok(())
}
