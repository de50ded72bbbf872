use crate::db;
use crate::domain::models::UserRole;
use crate::web::api::ApiError;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use base64::{engine::general_purpose, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    pub user_id: Uuid,
    pub role: UserRole,
    pub exp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid token format")]
    Invalid,
    #[error("signature mismatch")]
    Signature,
    #[error("expired")]
    Expired,
    #[error("bad role")]
    Role,
}

pub fn sign_session(user_id: Uuid, role: UserRole, key: &[u8], ttl_hours: i64) -> Result<String, SessionError> {
    let exp = Utc::now() + Duration::hours(ttl_hours);
    sign_claims(
        &SessionClaims {
            user_id,
            role,
            exp: exp.timestamp(),
        },
        key,
    )
}

fn sign_claims(claims: &SessionClaims, key: &[u8]) -> Result<String, SessionError> {
    let payload = format!("{}|{}|{}", claims.user_id, role_string(claims.role), claims.exp);
    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| SessionError::Invalid)?;
    mac.update(payload.as_bytes());
    let sig = mac.finalize().into_bytes();
    Ok(format!(
        "{}.{}",
        general_purpose::URL_SAFE_NO_PAD.encode(payload.as_bytes()),
        general_purpose::URL_SAFE_NO_PAD.encode(sig)
    ))
}

pub fn verify_session(token: &str, key: &[u8]) -> Result<SessionClaims, SessionError> {
    let (payload_b64, sig_b64) = token.split_once('.').ok_or(SessionError::Invalid)?;
    let payload_bytes = general_purpose::URL_SAFE_NO_PAD
        .decode(payload_b64)
        .map_err(|_| SessionError::Invalid)?;
    let sig_bytes = general_purpose::URL_SAFE_NO_PAD
        .decode(sig_b64)
        .map_err(|_| SessionError::Invalid)?;

    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| SessionError::Invalid)?;
    mac.update(&payload_bytes);
    mac.verify_slice(&sig_bytes).map_err(|_| SessionError::Signature)?;

    let payload = String::from_utf8(payload_bytes).map_err(|_| SessionError::Invalid)?;
    let pieces: Vec<&str> = payload.split('|').collect();
    if pieces.len() != 3 {
        return Err(SessionError::Invalid);
    }
    let user_id = Uuid::parse_str(pieces[0]).map_err(|_| SessionError::Invalid)?;
    let role = parse_role(pieces[1])?;
    let exp: i64 = pieces[2].parse().map_err(|_| SessionError::Invalid)?;
    if Utc::now().timestamp() > exp {
        return Err(SessionError::Expired);
    }
    Ok(SessionClaims { user_id, role, exp })
}

pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(auth) = headers.get(axum::http::header::AUTHORIZATION) {
        if let Ok(val) = auth.to_str() {
            if let Some(bearer) = val.strip_prefix("Bearer ") {
                return Some(bearer.trim().to_string());
            }
        }
    }
    if let Some(cookie) = headers.get(axum::http::header::COOKIE) {
        if let Ok(val) = cookie.to_str() {
            for pair in val.split(';') {
                if let Some(rest) = pair.trim().strip_prefix("session=") {
                    return Some(rest.to_string());
                }
            }
        }
    }
    None
}

pub fn session_cookie(token: &str, ttl_hours: i64, secure: bool) -> String {
    let secure_flag = if secure { "; Secure" } else { "" };
    format!(
        "session={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}{}",
        token,
        ttl_hours * 3600,
        secure_flag
    )
}

fn role_string(role: UserRole) -> &'static str {
    match role {
        UserRole::User => "user",
        UserRole::Admin => "admin",
    }
}

fn parse_role(raw: &str) -> Result<UserRole, SessionError> {
    match raw {
        "user" => Ok(UserRole::User),
        "admin" => Ok(UserRole::Admin),
        _ => Err(SessionError::Role),
    }
}

/// Authenticated caller. The role is the one currently stored for the user,
/// not the one baked into the token.
#[derive(Debug, Clone)]
pub struct UserSession {
    pub user_id: Uuid,
    pub role: UserRole,
    pub is_active: bool,
}

#[async_trait]
impl<S> FromRequestParts<S> for UserSession
where
    S: Send + Sync,
    crate::state::SharedState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let shared_state = crate::state::SharedState::from_ref(state);

        let token = extract_token(&parts.headers).ok_or_else(|| ApiError::unauthorized("Unauthorized"))?;

        let claims = verify_session(&token, &shared_state.session_key).map_err(|e| {
            tracing::warn!("Session verification failed: {}", e);
            ApiError::unauthorized(format!("Invalid session: {}", e))
        })?;

        let user = db::find_user_by_id(&shared_state.pool, claims.user_id)
            .await
            .map_err(|e| ApiError::internal("User lookup failed for session", e))?
            .ok_or_else(|| ApiError::unauthorized("Unauthorized"))?;

        Ok(UserSession {
            user_id: user.id,
            role: user.role,
            is_active: user.is_active,
        })
    }
}

/// Authenticated caller with the admin role.
#[derive(Debug, Clone)]
pub struct AdminSession(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
    crate::state::SharedState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = UserSession::from_request_parts(parts, state).await?;
        if session.role != UserRole::Admin {
            tracing::warn!("Non-admin {} attempted an admin route {}", session.user_id, parts.uri.path());
            return Err(ApiError::forbidden("Forbidden"));
        }
        Ok(AdminSession(session.user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    const KEY: &[u8] = b"0123456789abcdef0123456789abcdef";

    #[test]
    fn test_sign_and_verify_round_trip() {
        let user_id = Uuid::new_v4();
        let token = sign_session(user_id, UserRole::Admin, KEY, 24).unwrap();
        let claims = verify_session(&token, KEY).unwrap();
        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.role, UserRole::Admin);
    }

    #[test]
    fn test_rejects_wrong_key_and_tampering() {
        let token = sign_session(Uuid::new_v4(), UserRole::User, KEY, 1).unwrap();
        assert!(matches!(
            verify_session(&token, b"another-key-another-key-another!"),
            Err(SessionError::Signature)
        ));

        let (_, sig) = token.split_once('.').unwrap();
        let forged_payload = general_purpose::URL_SAFE_NO_PAD.encode(format!("{}|admin|9999999999", Uuid::new_v4()));
        let forged = format!("{}.{}", forged_payload, sig);
        assert!(matches!(verify_session(&forged, KEY), Err(SessionError::Signature)));

        assert!(matches!(verify_session("garbage", KEY), Err(SessionError::Invalid)));
    }

    #[test]
    fn test_expired_token() {
        let claims = SessionClaims {
            user_id: Uuid::new_v4(),
            role: UserRole::User,
            exp: Utc::now().timestamp() - 10,
        };
        let token = sign_claims(&claims, KEY).unwrap();
        assert!(matches!(verify_session(&token, KEY), Err(SessionError::Expired)));
    }

    #[test]
    fn test_extract_token_sources() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer abc.def".parse().unwrap());
        assert_eq!(extract_token(&headers).as_deref(), Some("abc.def"));

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, "theme=dark; session=tok.sig".parse().unwrap());
        assert_eq!(extract_token(&headers).as_deref(), Some("tok.sig"));

        assert!(extract_token(&HeaderMap::new()).is_none());
    }

    #[test]
    fn test_session_cookie_flags() {
        let cookie = session_cookie("t.s", 2, true);
        assert!(cookie.starts_with("session=t.s; HttpOnly"));
        assert!(cookie.contains("Max-Age=7200"));
        assert!(cookie.ends_with("; Secure"));
        assert!(!session_cookie("t.s", 2, false).contains("Secure"));
    }
}
