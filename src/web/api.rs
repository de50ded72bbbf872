use crate::domain::validation::ValidationError;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;

/// Handler error rendered as `{"success": false, "message", "code"}`.
#[derive(Debug, thiserror::Error)]
#[error("{status}: {message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Logs the underlying cause and hides it from the client.
    pub fn internal(context: &str, err: impl std::fmt::Display) -> Self {
        tracing::error!("{}: {}", context, err);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "An error occurred")
    }
}

impl From<StatusCode> for ApiError {
    fn from(status: StatusCode) -> Self {
        let message = status.canonical_reason().unwrap_or("Request failed");
        Self::new(status, message)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected JSON body: {}", rejection);
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "success": false,
            "message": self.message,
            "code": self.status.as_u16(),
        });
        (self.status, Json(body)).into_response()
    }
}

/// Success envelope shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            count: None,
            data: Some(data),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T: Serialize> Envelope<Vec<T>> {
    pub fn list(items: Vec<T>) -> Self {
        Self {
            success: true,
            message: None,
            count: Some(items.len()),
            data: Some(items),
        }
    }
}

impl Envelope<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            count: None,
            data: None,
        }
    }
}

pub type ApiResult<T> = Result<Json<Envelope<T>>, ApiError>;

/// `Json` body extractor whose rejections use the error envelope.
pub struct ApiJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::header::CONTENT_TYPE};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Measurement {
        weight: f64,
    }

    fn json_request(body: &'static str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_api_json_accepts_well_typed_body() {
        let ApiJson(m) = ApiJson::<Measurement>::from_request(json_request(r#"{"weight":80}"#), &())
            .await
            .unwrap();
        assert_eq!(m.weight, 80.0);
    }

    #[tokio::test]
    async fn test_api_json_rejections_use_error_envelope() {
        for body in [r#"{"weight":[1]}"#, r#"{"weight":"#, ""] {
            let err = match ApiJson::<Measurement>::from_request(json_request(body), &()).await {
                Ok(_) => panic!("body {body:?} should be rejected"),
                Err(err) => err,
            };
            assert_eq!(err.status, StatusCode::BAD_REQUEST);

            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(
                response.headers().get(CONTENT_TYPE).unwrap(),
                "application/json"
            );
            let json = body_json(response).await;
            assert_eq!(json["success"], false);
            assert_eq!(json["code"], 400);
            assert!(json["message"].as_str().is_some_and(|m| !m.is_empty()));
        }
    }

    #[tokio::test]
    async fn test_api_json_without_content_type_is_bad_request() {
        let req = axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(r#"{"weight":80}"#))
            .unwrap();
        let err = match ApiJson::<Measurement>::from_request(req, &()).await {
            Ok(_) => panic!("missing content type should be rejected"),
            Err(err) => err,
        };
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_envelope_shapes() {
        let list = serde_json::to_value(Envelope::list(vec![1, 2, 3])).unwrap();
        assert_eq!(list, json!({"success": true, "count": 3, "data": [1, 2, 3]}));

        let msg = serde_json::to_value(Envelope::message("done")).unwrap();
        assert_eq!(msg, json!({"success": true, "message": "done"}));

        let data = serde_json::to_value(Envelope::data("x").with_message("ok")).unwrap();
        assert_eq!(data, json!({"success": true, "message": "ok", "data": "x"}));
    }

    #[test]
    fn test_validation_error_maps_to_bad_request() {
        let err: ApiError = ValidationError(vec!["Age is required".into(), "Gender is required".into()]).into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Age is required, Gender is required");
    }

    #[test]
    fn test_status_code_conversion() {
        let err: ApiError = StatusCode::FORBIDDEN.into();
        assert_eq!(err.message, "Forbidden");
        assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
    }
}
