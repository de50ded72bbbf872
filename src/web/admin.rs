use crate::analytics::dashboard::{self, DailyUsers, DashboardStats, WeeklyCompletion};
use crate::db::{self, UserListing, UserWorkoutRecord};
use crate::domain::models::UserRole;
use crate::state::SharedState;
use crate::web::api::{ApiError, ApiResult, Envelope};
use crate::web::session::AdminSession;
use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Json, Router,
};
use chrono::Utc;
use uuid::Uuid;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/dashboard/stats", get(stats))
        .route("/dashboard/daily-users", get(daily_users))
        .route("/dashboard/weekly-completion", get(weekly_completion))
        .route("/users", get(list_members))
        .route("/users/:id", delete(delete_member))
        .route("/workouts", get(list_workouts))
        .with_state(state)
}

async fn stats(_admin: AdminSession, State(state): State<SharedState>) -> ApiResult<DashboardStats> {
    let stats = dashboard::build_stats(&state.pool, Utc::now())
        .await
        .map_err(|e| ApiError::internal("Dashboard stats failed", e))?;
    Ok(Json(Envelope::data(stats)))
}

async fn daily_users(_admin: AdminSession, State(state): State<SharedState>) -> ApiResult<Vec<DailyUsers>> {
    let days = dashboard::build_daily_users(&state.pool, Utc::now())
        .await
        .map_err(|e| ApiError::internal("Daily users failed", e))?;
    Ok(Json(Envelope::data(days)))
}

async fn weekly_completion(
    _admin: AdminSession,
    State(state): State<SharedState>,
) -> ApiResult<Vec<WeeklyCompletion>> {
    let weeks = dashboard::build_weekly_completion(&state.pool, Utc::now())
        .await
        .map_err(|e| ApiError::internal("Weekly completion failed", e))?;
    Ok(Json(Envelope::data(weeks)))
}

async fn list_members(_admin: AdminSession, State(state): State<SharedState>) -> ApiResult<Vec<UserListing>> {
    let users = db::list_members(&state.pool)
        .await
        .map_err(|e| ApiError::internal("Member listing failed", e))?;
    Ok(Json(Envelope::data(users)))
}

async fn delete_member(
    AdminSession(admin_id): AdminSession,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    let user = db::find_user_by_id(&state.pool, id)
        .await
        .map_err(|e| ApiError::internal("User lookup failed", e))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if user.role == UserRole::Admin {
        return Err(ApiError::forbidden("Cannot delete admin users"));
    }

    db::delete_user(&state.pool, id)
        .await
        .map_err(|e| ApiError::internal("User deletion failed", e))?;
    tracing::info!("Admin {} deleted user {}", admin_id, id);

    Ok(Json(Envelope::message("User deleted successfully")))
}

async fn list_workouts(_admin: AdminSession, State(state): State<SharedState>) -> ApiResult<Vec<UserWorkoutRecord>> {
    let workouts = db::get_all_user_workouts(&state.pool)
        .await
        .map_err(|e| ApiError::internal("Workout listing failed", e))?;
    Ok(Json(Envelope::data(workouts)))
}
