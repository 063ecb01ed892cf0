use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::Mutex;

use crate::auth::middleware::AuthUser;
use crate::error::AppError;
use crate::AppState;

/// Window for the per-user coach budget.
const WINDOW_SECS: u64 = 60;
const CLEANUP_INTERVAL_SECS: u64 = 300;

/// In-memory rate limit state (for single-instance deployments)
/// For multi-instance, use Redis or similar
#[derive(Clone, Default)]
pub struct RateLimitState {
    entries: Arc<Mutex<HashMap<String, RateLimitEntry>>>,
}

struct RateLimitEntry {
    count: u32,
    window_start: Instant,
}

impl RateLimitState {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns Ok(remaining) or Err(retry_after) once the budget is spent.
    pub async fn check_with_limits(
        &self,
        key: &str,
        max_requests: u32,
        window_secs: u64,
    ) -> Result<u32, Duration> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        let window = Duration::from_secs(window_secs);

        let entry = entries.entry(key.to_string()).or_insert(RateLimitEntry {
            count: 0,
            window_start: now,
        });

        if now.duration_since(entry.window_start) > window {
            entry.count = 0;
            entry.window_start = now;
        }

        if entry.count >= max_requests {
            let retry_after = window.saturating_sub(now.duration_since(entry.window_start));
            return Err(retry_after);
        }

        entry.count += 1;
        Ok(max_requests - entry.count)
    }

    /// Drop entries idle for more than two windows.
    pub async fn cleanup(&self) {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        let window = Duration::from_secs(WINDOW_SECS * 2);

        entries.retain(|_, entry| now.duration_since(entry.window_start) < window);
    }

    async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

pub fn spawn_cleanup_worker(limiter: RateLimitState) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(CLEANUP_INTERVAL_SECS));
        loop {
            interval.tick().await;
            limiter.cleanup().await;
            let tracked = limiter.len().await;
            tracing::debug!(tracked_keys = tracked, "Rate limit entries pruned");
        }
    });
}

/// Per-user budget for the coach endpoints. Must run after `require_auth`.
pub async fn rate_limit_coach(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = req
        .extensions()
        .get::<AuthUser>()
        .map(|u| u.id)
        .ok_or(AppError::Unauthorized)?;
    let key = format!("coach:{}", user_id);

    match state
        .rate_limiter
        .check_with_limits(&key, state.config.chat_rate_limit_per_minute, WINDOW_SECS)
        .await
    {
        Ok(remaining) => {
            tracing::debug!(user_id = %user_id, remaining = remaining, "Coach rate limit check passed");
            Ok(next.run(req).await)
        }
        Err(retry_after) => {
            tracing::warn!(
                user_id = %user_id,
                retry_after_secs = retry_after.as_secs(),
                "Coach rate limit exceeded"
            );
            Err(AppError::RateLimited)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: u32 = 5;

    #[tokio::test]
    async fn test_cleanup_worker_runs_on_runtime() {
        let limiter = RateLimitState::new();
        limiter.check_with_limits("coach:active", LIMIT, WINDOW_SECS).await.unwrap();

        spawn_cleanup_worker(limiter.clone());
        tokio::task::yield_now().await;

        // Fresh entries survive the first sweep.
        assert_eq!(limiter.len().await, 1);
    }

    #[tokio::test]
    async fn test_rate_limit_allows_under_limit() {
        let limiter = RateLimitState::new();

        for i in 0..LIMIT {
            let result = limiter.check_with_limits("test_key", LIMIT, WINDOW_SECS).await;
            assert!(result.is_ok(), "Request {} should be allowed", i + 1);
        }
    }

    #[tokio::test]
    async fn test_rate_limit_blocks_over_limit() {
        let limiter = RateLimitState::new();

        for _ in 0..LIMIT {
            let _ = limiter.check_with_limits("test_key", LIMIT, WINDOW_SECS).await;
        }

        let result = limiter.check_with_limits("test_key", LIMIT, WINDOW_SECS).await;
        assert!(result.is_err(), "Request over limit should be blocked");
    }

    #[tokio::test]
    async fn test_remaining_counts_down() {
        let limiter = RateLimitState::new();
        assert_eq!(limiter.check_with_limits("k", 3, WINDOW_SECS).await, Ok(2));
        assert_eq!(limiter.check_with_limits("k", 3, WINDOW_SECS).await, Ok(1));
        assert_eq!(limiter.check_with_limits("k", 3, WINDOW_SECS).await, Ok(0));
    }

    #[tokio::test]
    async fn test_different_keys_have_separate_limits() {
        let limiter = RateLimitState::new();

        for _ in 0..LIMIT {
            let _ = limiter.check_with_limits("key1", LIMIT, WINDOW_SECS).await;
        }

        let result = limiter.check_with_limits("key2", LIMIT, WINDOW_SECS).await;
        assert!(result.is_ok(), "Different key should have separate limit");
    }

    #[tokio::test]
    async fn test_cleanup_keeps_fresh_entries() {
        let limiter = RateLimitState::new();
        let _ = limiter.check_with_limits("fresh", LIMIT, WINDOW_SECS).await;
        limiter.cleanup().await;
        assert_eq!(limiter.len().await, 1);
    }
}
