//! Demo services whose response behaviour is driven by tunable attributes.
mod mock;
mod user;

use std::time::Duration;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::warn;

pub use mock::MockService;
pub use user::UserService;

/// Sleep for `delay_ms`; negative delays are treated as zero.
async fn pause(delay_ms: i64) {
    let ms = u64::try_from(delay_ms).unwrap_or(0);
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

/// JSON reply with the configured status code.
///
/// Codes outside `100..=999` cannot be sent and are replaced by 500.
fn reply(code: i32, body: Value) -> Response {
    let status = u16::try_from(code)
        .ok()
        .and_then(|c| StatusCode::from_u16(c).ok())
        .unwrap_or_else(|| {
            warn!(code, "configured status code is not a valid HTTP status, sending 500");
            StatusCode::INTERNAL_SERVER_ERROR
        });
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn reply_uses_configured_code() {
        assert_eq!(reply(418, json!({})).status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(reply(503, json!({})).status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn reply_rejects_impossible_codes() {
        for code in [-1, 0, 42, 1000, i32::MAX] {
            assert_eq!(
                reply(code, json!({})).status(),
                StatusCode::INTERNAL_SERVER_ERROR,
                "{code}"
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn negative_pause_returns_immediately() {
        let started = tokio::time::Instant::now();
        pause(-50).await;
        assert_eq!(started.elapsed(), Duration::ZERO);
    }
}
