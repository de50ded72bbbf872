use crate::config::AppConfig;
use crate::middleware::RateLimiter;
use crate::services::workout::WorkoutGenerator;
use crate::uploads::UploadStore;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
    pub session_key: Vec<u8>,
    pub uploads: UploadStore,
    pub generator: WorkoutGenerator,
    pub auth_limiter: RateLimiter,
}

pub type SharedState = Arc<AppState>;
