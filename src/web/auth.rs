use crate::db::{self, DbUser};
use crate::domain::models::UserRole;
use crate::domain::validation::{AdminRequest, LoginRequest, PasswordUpdateRequest, RegisterRequest};
use crate::middleware::rate_limit_middleware;
use crate::state::SharedState;
use crate::web::api::{ApiError, ApiJson, ApiResult, Envelope};
use crate::web::session::{self, AdminSession, UserSession};
use crate::web::users;
use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{post, put},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;

#[derive(Serialize)]
pub struct LoginResponse {
    pub user: DbUser,
    pub token: String,
}

pub fn router(state: SharedState) -> Router {
    let limited = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route_layer(middleware::from_fn_with_state(
            state.auth_limiter.clone(),
            rate_limit_middleware,
        ));

    Router::new()
        .merge(limited)
        .route("/admin", post(create_admin))
        .route("/update-password", put(update_password))
        .with_state(state)
}

async fn register(
    State(state): State<SharedState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<Envelope<DbUser>>), ApiError> {
    let account = payload.validate(Utc::now().date_naive())?;

    let taken = db::contact_taken(&state.pool, Some(&account.email), account.phone.as_deref(), None)
        .await
        .map_err(|e| ApiError::internal("Registration lookup failed", e))?;
    if taken {
        return Err(ApiError::conflict("User with this email or phone already exists"));
    }

    let user = db::insert_user(&state.pool, &account, UserRole::User)
        .await
        .map_err(|e| ApiError::internal("Failed to create user", e))?;
    tracing::info!("Registered user {}", user.id);

    Ok((
        StatusCode::CREATED,
        Json(Envelope::data(user).with_message("User registered successfully")),
    ))
}

async fn create_admin(
    AdminSession(admin_id): AdminSession,
    State(state): State<SharedState>,
    ApiJson(payload): ApiJson<AdminRequest>,
) -> Result<(StatusCode, Json<Envelope<DbUser>>), ApiError> {
    let account = payload.validate()?;

    let taken = db::contact_taken(&state.pool, Some(&account.email), account.phone.as_deref(), None)
        .await
        .map_err(|e| ApiError::internal("Admin lookup failed", e))?;
    if taken {
        return Err(ApiError::conflict("User with this email or phone already exists"));
    }

    let admin = db::insert_user(&state.pool, &account, UserRole::Admin)
        .await
        .map_err(|e| ApiError::internal("Failed to create admin", e))?;
    tracing::info!("Admin {} created admin {}", admin_id, admin.id);

    Ok((
        StatusCode::CREATED,
        Json(Envelope::data(admin).with_message("Admin created successfully")),
    ))
}

async fn login(
    State(state): State<SharedState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (email, password) = payload.validate()?;

    let user = db::find_user_by_email(&state.pool, &email)
        .await
        .map_err(|e| ApiError::internal("Login lookup failed", e))?
        .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    if !db::verify_password(&password, &user.hash) {
        tracing::warn!("Failed login for user {}", user.id);
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    users::ensure_active(user.is_active)?;

    let ttl = state.config.session_ttl_hours;
    let token = session::sign_session(user.id, user.role, &state.session_key, ttl)
        .map_err(|e| ApiError::internal("Failed to sign session", e))?;

    let cookie = session::session_cookie(&token, ttl, state.config.secure_cookies);
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie).map_err(|e| ApiError::internal("Invalid session cookie", e))?,
    );

    tracing::info!("User {} logged in", user.id);
    let body = Envelope::data(LoginResponse { user, token }).with_message("Login successful");
    Ok((headers, Json(body)))
}

async fn update_password(
    UserSession { user_id, .. }: UserSession,
    State(state): State<SharedState>,
    ApiJson(payload): ApiJson<PasswordUpdateRequest>,
) -> ApiResult<()> {
    let (old_password, new_password) = payload.validate()?;

    let user = db::find_user_by_id(&state.pool, user_id)
        .await
        .map_err(|e| ApiError::internal("Password lookup failed", e))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if !db::verify_password(&old_password, &user.hash) {
        return Err(ApiError::unauthorized("Old password is incorrect"));
    }

    db::update_password(&state.pool, user.id, &new_password)
        .await
        .map_err(|e| ApiError::internal("Failed to update password", e))?;
    tracing::info!("User {} changed password", user.id);

    Ok(Json(Envelope::message("Password updated successfully")))
}
