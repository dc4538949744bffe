//! Rate limiting middleware
//!
//! Fixed-window counter per client: at most `max_requests` requests within
//! each `window` per client IP, then 429 until the window rolls over.

use axum::{
    body::Body,
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::Mutex;

#[derive(Debug)]
struct WindowState {
    window_start: Instant,
    count: u32,
}

/// Shared rate limiter state
#[derive(Clone)]
pub struct RateLimiter {
    windows: Arc<Mutex<HashMap<String, WindowState>>>,
    window: Duration,
    max_requests: u32,
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            windows: Arc::new(Mutex::new(HashMap::new())),
            window,
            max_requests,
        }
    }

    /// Count a request against a client's current window. Returns false once
    /// the window's budget is spent.
    pub async fn check(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;

        let state = windows.entry(key.to_string()).or_insert(WindowState {
            window_start: now,
            count: 0,
        });

        if now.duration_since(state.window_start) >= self.window {
            state.window_start = now;
            state.count = 0;
        }

        if state.count >= self.max_requests {
            return false;
        }

        state.count += 1;
        true
    }

    /// Drop windows that have been idle longer than one full window.
    pub async fn cleanup(&self) {
        let now = Instant::now();
        let window = self.window;
        let mut windows = self.windows.lock().await;
        windows.retain(|_, state| now.duration_since(state.window_start) < window * 2);
    }
}

/// Create rate limiting middleware
pub fn rate_limit_layer(
    rate_limiter: RateLimiter,
) -> impl Fn(
    Request<Body>,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Response> + Send>>
       + Clone
       + Send {
    move |request: Request<Body>, next: Next| {
        let rate_limiter = rate_limiter.clone();
        Box::pin(async move {
            let client_key = extract_client_ip(&request);

            if !rate_limiter.check(&client_key).await {
                tracing::warn!(client = %client_key, "Rate limit exceeded");
                return (
                    StatusCode::TOO_MANY_REQUESTS,
                    [(header::RETRY_AFTER, "60")],
                    "Too many requests. Please try again later.",
                )
                    .into_response();
            }

            next.run(request).await
        })
    }
}

/// Extract client IP from proxy headers, falling back to a shared bucket.
fn extract_client_ip(request: &Request<Body>) -> String {
    if let Some(forwarded) = request.headers().get("x-forwarded-for") {
        if let Ok(s) = forwarded.to_str() {
            if let Some(ip) = s.split(',').next() {
                return ip.trim().to_string();
            }
        }
    }

    if let Some(real_ip) = request.headers().get("x-real-ip") {
        if let Ok(s) = real_ip.to_str() {
            return s.to_string();
        }
    }

    "unknown".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_window_budget_is_enforced() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 3);

        assert!(limiter.check("client").await);
        assert!(limiter.check("client").await);
        assert!(limiter.check("client").await);
        assert!(!limiter.check("client").await);
    }

    #[tokio::test]
    async fn test_clients_have_separate_windows() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 1);

        assert!(limiter.check("client-a").await);
        assert!(limiter.check("client-b").await);
        assert!(!limiter.check("client-a").await);
    }

    #[tokio::test]
    async fn test_window_rolls_over() {
        let limiter = RateLimiter::new(Duration::from_millis(20), 1);

        assert!(limiter.check("client").await);
        assert!(!limiter.check("client").await);

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(limiter.check("client").await);
    }

    #[tokio::test]
    async fn test_cleanup_drops_idle_windows() {
        let limiter = RateLimiter::new(Duration::from_millis(10), 5);

        limiter.check("idle-client").await;
        tokio::time::sleep(Duration::from_millis(30)).await;
        limiter.cleanup().await;

        let windows = limiter.windows.lock().await;
        assert!(windows.is_empty());
    }
}
