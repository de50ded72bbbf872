//! In-memory sliding-window limiter for the unauthenticated auth endpoints.
use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct RateLimiter {
    requests: Arc<RwLock<HashMap<String, Vec<Instant>>>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window_secs: u64) -> Self {
        Self {
            requests: Arc::new(RwLock::new(HashMap::new())),
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }

    /// Records a hit for `identifier` and reports whether it is still under the limit.
    pub async fn check(&self, identifier: &str) -> bool {
        let now = Instant::now();
        let mut requests = self.requests.write().await;

        let history = requests.entry(identifier.to_string()).or_default();
        history.retain(|&ts| now.duration_since(ts) < self.window);

        if history.len() < self.max_requests {
            history.push(now);
            true
        } else {
            false
        }
    }

    /// Drops identifiers whose hits have all left the window.
    pub async fn cleanup(&self) -> usize {
        let now = Instant::now();
        let mut requests = self.requests.write().await;

        requests.retain(|_, history| {
            history.retain(|&ts| now.duration_since(ts) < self.window);
            !history.is_empty()
        });

        tracing::debug!("Rate limiter cleanup: {} active identifiers", requests.len());
        requests.len()
    }
}

/// Per-IP limit; needs the router served with `into_make_service_with_connect_info`.
pub async fn rate_limit_middleware(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(limiter): State<RateLimiter>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let ip = addr.ip().to_string();

    if !limiter.check(&ip).await {
        tracing::warn!("Rate limit exceeded for IP {} on {}", ip, request.uri().path());
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "success": false,
                "message": "Too many requests. Please try again later.",
                "code": StatusCode::TOO_MANY_REQUESTS.as_u16(),
            })),
        )
            .into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_limit_per_identifier() {
        let limiter = RateLimiter::new(3, 60);

        assert!(limiter.check("10.0.0.1").await);
        assert!(limiter.check("10.0.0.1").await);
        assert!(limiter.check("10.0.0.1").await);
        assert!(!limiter.check("10.0.0.1").await);

        assert!(limiter.check("10.0.0.2").await);
    }

    #[tokio::test]
    async fn test_clones_share_history() {
        let limiter = RateLimiter::new(1, 60);
        let clone = limiter.clone();

        assert!(limiter.check("ip").await);
        assert!(!clone.check("ip").await);
    }

    #[tokio::test]
    async fn test_cleanup_drops_expired_entries() {
        let limiter = RateLimiter::new(5, 1);

        limiter.check("ip1").await;
        limiter.check("ip2").await;
        assert_eq!(limiter.requests.read().await.len(), 2);

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(limiter.cleanup().await, 0);
        assert!(limiter.requests.read().await.is_empty());
    }
}
