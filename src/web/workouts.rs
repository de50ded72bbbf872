use crate::db::{self, DbUser, WorkoutPlanRecord};
use crate::domain::models::{FitnessLevel, Goal, UserRole};
use crate::domain::validation::{AssignPlanRequest, CustomizeRequest, WorkoutPlanFields, WorkoutPlanForm};
use crate::services::workout::WorkoutPlan;
use crate::state::SharedState;
use crate::uploads::{UploadError, UploadStore};
use crate::web::api::{ApiError, ApiJson, ApiResult, Envelope};
use crate::web::session::{AdminSession, UserSession};
use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

/// Multipart field carrying the spreadsheet.
const FILE_FIELD: &str = "fileUrl";
/// Room for the text fields and multipart framing on top of the file itself.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

struct UploadedFile {
    name: String,
    content_type: String,
    bytes: Vec<u8>,
}

struct PlanUpload {
    form: WorkoutPlanForm,
    file: Option<UploadedFile>,
}

pub fn router(state: SharedState) -> Router {
    let body_limit = state.config.max_upload_bytes + FORM_OVERHEAD_BYTES;
    Router::new()
        .route("/", post(create_plan))
        .route("/all", get(list_plans))
        .route("/my-plans", get(my_plans))
        .route("/customize", post(customize))
        .route("/assign-plan", post(assign_plan))
        .route("/assign-auto-plan", post(assign_auto_plan))
        .route("/:id", get(get_plan).put(update_plan).delete(delete_plan))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Io(e) => ApiError::internal("Upload storage failed", e),
            other => ApiError::bad_request(other.to_string()),
        }
    }
}

fn multipart_error(err: MultipartError) -> ApiError {
    tracing::warn!("Rejected multipart body: {}", err);
    ApiError::new(err.status(), err.body_text())
}

/// Removes a freshly stored upload when the plan write that references it failed.
async fn discard_upload_on_error<T>(
    store: &UploadStore,
    stored: Option<&str>,
    outcome: Result<T, ApiError>,
) -> Result<T, ApiError> {
    if outcome.is_err() {
        if let Some(stored) = stored {
            if let Err(e) = store.remove(stored).await {
                tracing::warn!("Could not remove orphaned upload {}: {}", stored, e);
            }
        }
    }
    outcome
}

async fn read_plan_upload(mut multipart: Multipart) -> Result<PlanUpload, ApiError> {
    let mut form = WorkoutPlanForm::default();
    let mut file = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if name == FILE_FIELD {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().unwrap_or_default().to_string();
            let bytes = field.bytes().await.map_err(multipart_error)?;
            if !file_name.is_empty() {
                file = Some(UploadedFile {
                    name: file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            continue;
        }

        let value = field.text().await.map_err(multipart_error)?;
        let value = Some(value).filter(|v| !v.trim().is_empty());
        match name.as_str() {
            "name" => form.name = value,
            "description" => form.description = value,
            "goal" => form.goal = value,
            "activityLevel" => form.activity_level = value,
            other => tracing::debug!("Ignoring multipart field {}", other),
        }
    }

    Ok(PlanUpload { form, file })
}

async fn create_plan(
    AdminSession(admin_id): AdminSession,
    State(state): State<SharedState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Envelope<WorkoutPlanRecord>>), ApiError> {
    let upload = read_plan_upload(multipart).await?;
    let fields = upload.form.validate_new()?;
    let file = upload
        .file
        .ok_or_else(|| ApiError::bad_request("Workout plan file is required"))?;

    let name = fields.name.as_deref().unwrap_or_default();
    let taken = db::plan_name_taken(&state.pool, name, None)
        .await
        .map_err(|e| ApiError::internal("Plan name lookup failed", e))?;
    if taken {
        return Err(ApiError::conflict("A workout plan with this name already exists"));
    }

    let stored = state.uploads.save(&file.name, &file.content_type, &file.bytes).await?;
    let inserted = db::insert_workout_plan(&state.pool, &fields, &stored)
        .await
        .map_err(|e| ApiError::internal("Failed to create workout plan", e));
    let plan = discard_upload_on_error(&state.uploads, Some(stored.as_str()), inserted).await?;
    tracing::info!("Admin {} created workout plan {}", admin_id, plan.id);

    Ok((
        StatusCode::CREATED,
        Json(Envelope::data(plan).with_message("Workout plan created successfully")),
    ))
}

async fn list_plans(_admin: AdminSession, State(state): State<SharedState>) -> ApiResult<Vec<WorkoutPlanRecord>> {
    let plans = db::get_all_workout_plans(&state.pool)
        .await
        .map_err(|e| ApiError::internal("Plan listing failed", e))?;
    Ok(Json(Envelope::list(plans)))
}

async fn get_plan(_session: UserSession, State(state): State<SharedState>, Path(id): Path<Uuid>) -> ApiResult<WorkoutPlanRecord> {
    let plan = db::get_workout_plan(&state.pool, id)
        .await
        .map_err(|e| ApiError::internal("Plan lookup failed", e))?
        .ok_or_else(|| ApiError::not_found("Workout plan not found"))?;
    Ok(Json(Envelope::data(plan)))
}

async fn update_plan(
    AdminSession(admin_id): AdminSession,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> ApiResult<WorkoutPlanRecord> {
    let upload = read_plan_upload(multipart).await?;
    let fields: WorkoutPlanFields = upload.form.validate_update()?;

    let existing = db::get_workout_plan(&state.pool, id)
        .await
        .map_err(|e| ApiError::internal("Plan lookup failed", e))?
        .ok_or_else(|| ApiError::not_found("Workout plan not found"))?;

    if let Some(name) = fields.name.as_deref() {
        let taken = db::plan_name_taken(&state.pool, name, Some(id))
            .await
            .map_err(|e| ApiError::internal("Plan name lookup failed", e))?;
        if taken {
            return Err(ApiError::conflict("A workout plan with this name already exists"));
        }
    }

    let new_file = match &upload.file {
        Some(file) => Some(state.uploads.save(&file.name, &file.content_type, &file.bytes).await?),
        None => None,
    };

    let updated = db::update_workout_plan(&state.pool, id, &fields, new_file.as_deref())
        .await
        .map_err(|e| ApiError::internal("Failed to update workout plan", e))
        .and_then(|plan| plan.ok_or_else(|| ApiError::not_found("Workout plan not found")));
    let plan = discard_upload_on_error(&state.uploads, new_file.as_deref(), updated).await?;

    if new_file.is_some() {
        if let Err(e) = state.uploads.remove(&existing.file_name).await {
            tracing::warn!("Could not remove replaced upload {}: {}", existing.file_name, e);
        }
    }
    tracing::info!("Admin {} updated workout plan {}", admin_id, id);

    Ok(Json(Envelope::data(plan).with_message("Workout plan updated successfully")))
}

async fn delete_plan(
    AdminSession(admin_id): AdminSession,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    let plan = db::delete_workout_plan(&state.pool, id)
        .await
        .map_err(|e| ApiError::internal("Failed to delete workout plan", e))?
        .ok_or_else(|| ApiError::not_found("Workout plan not found"))?;

    if let Err(e) = state.uploads.remove(&plan.file_name).await {
        tracing::warn!("Could not remove upload {}: {}", plan.file_name, e);
    }
    tracing::info!("Admin {} deleted workout plan {}", admin_id, id);

    Ok(Json(Envelope::message("Workout plan deleted successfully")))
}

async fn my_plans(session: UserSession, State(state): State<SharedState>) -> ApiResult<Vec<WorkoutPlanRecord>> {
    let plans = db::plans_for_user(&state.pool, session.user_id)
        .await
        .map_err(|e| ApiError::internal("Assigned plan lookup failed", e))?;
    Ok(Json(Envelope::list(plans)))
}

async fn assign_plan(
    AdminSession(admin_id): AdminSession,
    State(state): State<SharedState>,
    ApiJson(payload): ApiJson<AssignPlanRequest>,
) -> ApiResult<DbUser> {
    let (user_id, plan_id) = payload.validate()?;

    let user = db::find_user_by_id(&state.pool, user_id)
        .await
        .map_err(|e| ApiError::internal("User lookup failed", e))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    db::get_workout_plan(&state.pool, plan_id)
        .await
        .map_err(|e| ApiError::internal("Plan lookup failed", e))?
        .ok_or_else(|| ApiError::not_found("Workout plan not found"))?;

    let assigned = db::assign_plan(&state.pool, user_id, plan_id)
        .await
        .map_err(|e| ApiError::internal("Plan assignment failed", e))?;
    if !assigned {
        return Err(ApiError::bad_request("Plan already assigned to this user"));
    }
    tracing::info!("Admin {} assigned plan {} to user {}", admin_id, plan_id, user_id);

    Ok(Json(Envelope::data(user).with_message("Plan assigned successfully")))
}

async fn assign_auto_plan(session: UserSession, State(state): State<SharedState>) -> ApiResult<DbUser> {
    if session.role != UserRole::User {
        return Err(ApiError::forbidden("Forbidden"));
    }

    let user = db::find_user_by_id(&state.pool, session.user_id)
        .await
        .map_err(|e| ApiError::internal("User lookup failed", e))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let (Some(goal), Some(level)) = (user.goal.as_deref(), user.fitness_level.as_deref()) else {
        return Err(ApiError::not_found("No suitable workout plan found"));
    };
    let plan = db::find_matching_plan(&state.pool, Goal::from(goal), FitnessLevel::from(level))
        .await
        .map_err(|e| ApiError::internal("Plan matching failed", e))?
        .ok_or_else(|| ApiError::not_found("No suitable workout plan found"))?;

    let assigned = db::assign_plan(&state.pool, user.id, plan.id)
        .await
        .map_err(|e| ApiError::internal("Plan assignment failed", e))?;
    if !assigned {
        return Ok(Json(Envelope::data(user).with_message("User already has this workout plan")));
    }
    tracing::info!("Auto-assigned plan {} to user {}", plan.id, user.id);

    Ok(Json(Envelope::data(user).with_message("Workout plan assigned successfully")))
}

async fn customize(
    session: UserSession,
    State(state): State<SharedState>,
    ApiJson(payload): ApiJson<CustomizeRequest>,
) -> ApiResult<WorkoutPlan> {
    let input = payload.validate()?;
    let plan = state.generator.generate(&input);

    db::save_workout_preferences(&state.pool, session.user_id, &input)
        .await
        .map_err(|e| ApiError::internal("Failed to save workout preferences", e))?;

    let user = db::find_user_by_id(&state.pool, session.user_id)
        .await
        .map_err(|e| ApiError::internal("User lookup failed", e))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    let record_id = db::insert_user_workout(&state.pool, user.id, &user.full_name(), &plan)
        .await
        .map_err(|e| ApiError::internal("Failed to store generated workout", e))?;
    tracing::info!(
        "Generated {} plan {} for user {}",
        plan.summary.workout_split,
        record_id,
        user.id
    );

    Ok(Json(
        Envelope::data(plan).with_message("Workout plan customized and saved successfully"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_errors_map_to_statuses() {
        let err: ApiError = UploadError::UnsupportedType.into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Only Excel files are allowed");

        let err: ApiError = UploadError::TooLarge(10).into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ApiError = UploadError::Io(io).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "An error occurred");
    }

    #[tokio::test]
    async fn test_failed_plan_write_discards_new_upload() {
        let store = UploadStore::new(
            std::env::temp_dir().join(format!("fittrack-plans-{}", Uuid::new_v4())),
            1024,
        );
        let xlsx = crate::uploads::EXCEL_MIME_TYPES[1];

        let kept = store.save("kept.xlsx", xlsx, b"rows").await.unwrap();
        let ok: Result<u8, ApiError> = Ok(1);
        assert_eq!(discard_upload_on_error(&store, Some(kept.as_str()), ok).await.unwrap(), 1);
        assert!(store.dir().join(&kept).exists());

        let orphan = store.save("orphan.xlsx", xlsx, b"rows").await.unwrap();
        let missing: Result<u8, ApiError> = Err(ApiError::not_found("Workout plan not found"));
        let err = discard_upload_on_error(&store, Some(orphan.as_str()), missing).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert!(!store.dir().join(&orphan).exists());

        let failed: Result<u8, ApiError> = Err(ApiError::internal("Failed to update workout plan", "db down"));
        let err = discard_upload_on_error(&store, None, failed).await.unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(store.dir().join(&kept).exists());

        let _ = tokio::fs::remove_dir_all(store.dir()).await;
    }
}
