use crate::db::{self, StoredNutrition};
use crate::domain::validation::NutritionRequest;
use crate::services::nutrition::{calculate_nutrition, NutritionPlan};
use crate::state::SharedState;
use crate::web::api::{ApiError, ApiJson, ApiResult, Envelope};
use crate::web::session::UserSession;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/calculate", post(calculate))
        .route("/my-plan", get(my_plan))
        .with_state(state)
}

async fn calculate(
    session: UserSession,
    State(state): State<SharedState>,
    ApiJson(payload): ApiJson<NutritionRequest>,
) -> ApiResult<NutritionPlan> {
    let input = payload.validate()?;
    let plan = calculate_nutrition(&input);

    let saved = db::save_nutrition(&state.pool, session.user_id, &input, &plan)
        .await
        .map_err(|e| ApiError::internal("Failed to save nutrition plan", e))?;
    if !saved {
        return Err(ApiError::not_found("User not found"));
    }
    tracing::info!(
        "Nutrition plan for user {}: {} kcal ({})",
        session.user_id,
        plan.daily_calories,
        input.goal.as_str()
    );

    Ok(Json(
        Envelope::data(plan).with_message("Nutrition plan calculated and saved successfully"),
    ))
}

async fn my_plan(session: UserSession, State(state): State<SharedState>) -> ApiResult<StoredNutrition> {
    let user = db::find_user_by_id(&state.pool, session.user_id)
        .await
        .map_err(|e| ApiError::internal("Nutrition lookup failed", e))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let plan = user.nutrition_plan().ok_or_else(|| {
        ApiError::not_found("No nutrition plan found. Please calculate your nutrition plan first.")
    })?;
    Ok(Json(
        Envelope::data(plan).with_message("Nutrition plan retrieved successfully"),
    ))
}
