pub mod admin;
pub mod api;
pub mod auth;
pub mod nutrition;
pub mod session;
pub mod users;
pub mod workouts;

use crate::state::SharedState;
use axum::{routing::get, Router};

async fn health() -> &'static str {
    "OK"
}

pub fn routes(state: SharedState) -> Router {
    let api = Router::new()
        .nest("/auth", auth::router(state.clone()))
        .nest("/users", users::router(state.clone()))
        .nest("/workouts", workouts::router(state.clone()))
        .nest("/nutrition", nutrition::router(state.clone()))
        .nest("/admin", admin::router(state));

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
}
