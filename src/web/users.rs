use crate::db::{self, DbUser, PlanAssignment};
use crate::domain::validation::ProfileUpdateRequest;
use crate::state::SharedState;
use crate::web::api::{ApiError, ApiJson, ApiResult, Envelope};
use crate::web::session::{AdminSession, UserSession};
use axum::{
    extract::{Path, State},
    routing::{get, patch},
    Json, Router,
};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

pub const SUSPENDED_MESSAGE: &str = "Your account has been suspended. Please contact support.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedPlan {
    pub id: Uuid,
    pub name: String,
    pub goal: String,
    pub fitness_level: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWithPlans {
    #[serde(flatten)]
    pub user: DbUser,
    pub workout_plans: Vec<AssignedPlan>,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/me", get(get_me).put(update_me).delete(delete_me))
        .route("/", get(list_users))
        .route("/:id", get(get_user).delete(delete_user))
        .route("/:id/toggle-status", patch(toggle_status))
        .with_state(state)
}

/// Groups assignment rows under each user, keeping the user order.
pub fn attach_plans(users: Vec<DbUser>, assignments: Vec<PlanAssignment>) -> Vec<UserWithPlans> {
    let mut by_user: HashMap<Uuid, Vec<AssignedPlan>> = HashMap::new();
    for a in assignments {
        by_user.entry(a.user_id).or_default().push(AssignedPlan {
            id: a.plan_id,
            name: a.name,
            goal: a.goal,
            fitness_level: a.fitness_level,
        });
    }
    users
        .into_iter()
        .map(|user| {
            let workout_plans = by_user.remove(&user.id).unwrap_or_default();
            UserWithPlans { user, workout_plans }
        })
        .collect()
}

/// Suspended accounts get a 403 with the support message.
pub fn ensure_active(is_active: bool) -> Result<(), ApiError> {
    if is_active {
        Ok(())
    } else {
        Err(ApiError::forbidden(SUSPENDED_MESSAGE))
    }
}

async fn get_me(session: UserSession, State(state): State<SharedState>) -> ApiResult<DbUser> {
    ensure_active(session.is_active)?;
    let user = db::find_user_by_id(&state.pool, session.user_id)
        .await
        .map_err(|e| ApiError::internal("Profile lookup failed", e))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(Envelope::data(user)))
}

async fn update_me(
    session: UserSession,
    State(state): State<SharedState>,
    ApiJson(payload): ApiJson<ProfileUpdateRequest>,
) -> ApiResult<DbUser> {
    let changes = payload.validate()?;

    let taken = db::contact_taken(
        &state.pool,
        changes.email.as_deref(),
        changes.phone.as_deref(),
        Some(session.user_id),
    )
    .await
    .map_err(|e| ApiError::internal("Profile uniqueness check failed", e))?;
    if taken {
        return Err(ApiError::conflict("Email or phone is already in use"));
    }

    let user = db::update_profile(&state.pool, session.user_id, &changes)
        .await
        .map_err(|e| ApiError::internal("Profile update failed", e))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(Envelope::data(user).with_message("Profile updated successfully")))
}

async fn delete_me(session: UserSession, State(state): State<SharedState>) -> ApiResult<()> {
    let deleted = db::delete_user(&state.pool, session.user_id)
        .await
        .map_err(|e| ApiError::internal("Account deletion failed", e))?;
    if !deleted {
        return Err(ApiError::not_found("User not found"));
    }
    tracing::info!("User {} deleted their account", session.user_id);
    Ok(Json(Envelope::message("Account deleted successfully")))
}

async fn list_users(_admin: AdminSession, State(state): State<SharedState>) -> ApiResult<Vec<UserWithPlans>> {
    let users = db::get_all_users(&state.pool)
        .await
        .map_err(|e| ApiError::internal("User listing failed", e))?;
    let assignments = db::get_all_assignments(&state.pool)
        .await
        .map_err(|e| ApiError::internal("Assignment listing failed", e))?;
    Ok(Json(Envelope::list(attach_plans(users, assignments))))
}

async fn get_user(_admin: AdminSession, State(state): State<SharedState>, Path(id): Path<Uuid>) -> ApiResult<DbUser> {
    let user = db::find_user_by_id(&state.pool, id)
        .await
        .map_err(|e| ApiError::internal("User lookup failed", e))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(Envelope::data(user)))
}

async fn delete_user(
    AdminSession(admin_id): AdminSession,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    let deleted = db::delete_user(&state.pool, id)
        .await
        .map_err(|e| ApiError::internal("User deletion failed", e))?;
    if !deleted {
        return Err(ApiError::not_found("User not found"));
    }
    tracing::info!("Admin {} deleted user {}", admin_id, id);
    Ok(Json(Envelope::message("User deleted successfully")))
}

async fn toggle_status(
    AdminSession(admin_id): AdminSession,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    let active = db::toggle_user_active(&state.pool, id)
        .await
        .map_err(|e| ApiError::internal("Status toggle failed", e))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    let status = if active { "active" } else { "inactive" };
    tracing::info!("Admin {} set user {} {}", admin_id, id, status);
    Ok(Json(Envelope::message(format!("User is now {}", status))))
}
