//! Rate limiting middleware
//!
//! Fixed-window counters in Redis, keyed by client IP and endpoint group.
//! If Redis is unavailable the request is let through.

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use redis::AsyncCommands;
use tracing::warn;

use crate::{constants::rate_limits, error::AppError, state::AppState};

/// Rate limit middleware
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path();
    let bucket = path_bucket(path);
    let (limit, window) = limit_for(bucket);
    let key = format!("rate_limit:{}:{}", addr.ip(), bucket);

    let mut redis = state.redis();
    let count: i64 = match redis.incr(&key, 1).await {
        Ok(count) => count,
        Err(e) => {
            warn!(error = %e, "Rate limiter unavailable, allowing request");
            0
        }
    };

    if count == 1 {
        if let Err(e) = redis.expire::<_, ()>(&key, window).await {
            warn!(error = %e, key = %key, "Failed to set rate limit window");
        }
    }

    if count > limit {
        warn!(ip = %addr.ip(), bucket, count, "Rate limit exceeded");
        return Err(AppError::TooManyRequests);
    }

    Ok(next.run(request).await)
}

/// Endpoint group for a request path
fn path_bucket(path: &str) -> &'static str {
    let path = path.strip_prefix("/api/v1").unwrap_or(path);
    if path.starts_with("/auth") {
        "auth"
    } else if path.starts_with("/files/upload") {
        "files"
    } else {
        "general"
    }
}

fn limit_for(bucket: &str) -> (i64, i64) {
    match bucket {
        "auth" => (
            rate_limits::AUTH_MAX_REQUESTS,
            rate_limits::AUTH_WINDOW_SECS,
        ),
        "files" => (
            rate_limits::FILES_MAX_REQUESTS,
            rate_limits::FILES_WINDOW_SECS,
        ),
        _ => (
            rate_limits::GENERAL_MAX_REQUESTS,
            rate_limits::GENERAL_WINDOW_SECS,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_bucket() {
        assert_eq!(path_bucket("/api/v1/auth/login"), "auth");
        assert_eq!(path_bucket("/api/v1/files/upload/pdf"), "files");
        assert_eq!(path_bucket("/api/v1/files/123"), "general");
        assert_eq!(path_bucket("/api/v1/cars"), "general");
    }

    #[test]
    fn test_auth_is_stricter_than_general() {
        assert!(limit_for("auth").0 < limit_for("general").0);
    }
}
