//! Best-effort in-memory rate limiting.
//!
//! Counters live in process memory and reset on restart — this dampens abuse,
//! it is not a hard security boundary. A horizontally scaled deployment gets
//! per-instance windows.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Duration, Utc};

/// Entry count above which `check` sweeps fully-expired keys from the map.
const SWEEP_THRESHOLD: usize = 1024;

/// Sliding-window rate limiter keyed by an arbitrary string (subject, IP).
///
/// `check` records the hit when it is admitted, so callers get exactly one
/// decision per request: admitted and counted, or rejected and not counted.
#[derive(Debug)]
pub struct SlidingWindowLimiter {
    max_hits: usize,
    window: Duration,
    hits: Mutex<HashMap<String, Vec<DateTime<Utc>>>>,
}

impl SlidingWindowLimiter {
    pub fn new(max_hits: usize, window_secs: i64) -> Self {
        Self {
            max_hits,
            window: Duration::seconds(window_secs),
            hits: Mutex::new(HashMap::new()),
        }
    }

    /// Returns `true` and records the hit if `key` is under its limit,
    /// `false` otherwise. Hits older than the window are pruned on access.
    pub fn check(&self, key: &str) -> bool {
        let now = Utc::now();
        let cutoff = now - self.window;
        let mut hits = self.hits.lock().unwrap_or_else(PoisonError::into_inner);

        if hits.len() > SWEEP_THRESHOLD {
            hits.retain(|_, stamps| stamps.iter().any(|t| *t > cutoff));
        }

        let stamps = hits.entry(key.to_owned()).or_default();
        stamps.retain(|t| *t > cutoff);
        if stamps.len() >= self.max_hits {
            return false;
        }
        stamps.push(now);
        true
    }
}

/// Extract a client IP for rate limiting from common proxy headers.
pub fn client_ip(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());
    if forwarded.is_some() {
        return forwarded.map(str::to_string);
    }
    headers
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Per-IP middleware. Apply with
/// `axum::middleware::from_fn_with_state(limiter, ip_rate_limit)`.
pub async fn ip_rate_limit(
    State(limiter): State<Arc<SlidingWindowLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let ip = client_ip(request.headers()).unwrap_or_else(|| "unknown".to_owned());
    if !limiter.check(&ip) {
        let body = serde_json::json!({
            "error": "Too many requests. Please try again later.",
        });
        return (StatusCode::TOO_MANY_REQUESTS, axum::Json(body)).into_response();
    }
    next.run(request).await
}
