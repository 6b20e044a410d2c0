use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
};
use tune_prometheus::TEXT_FORMAT;

use crate::{error::ApiError, handler::ApiHandler};

/// HTTP API service builder.
pub struct HttpApi<H> {
    handler: Arc<H>,
    status_paths: Vec<String>,
}

impl<H> HttpApi<H>
where
    H: ApiHandler,
{
    /// Create new HTTP API with the given handler.
    pub fn new(handler: Arc<H>) -> Self {
        Self {
            handler,
            status_paths: vec!["/config/status".to_string()],
        }
    }

    /// Serve the status snapshot on an additional path.
    pub fn status_alias(mut self, path: impl Into<String>) -> Self {
        self.status_paths.push(path.into());
        self
    }

    /// Build axum router with mounted endpoints.
    ///
    /// Routes:
    /// - GET /config/status (and aliases) - Sync status snapshot
    /// - GET /metrics - Prometheus exposition
    pub fn router(self) -> Router {
        let mut router = Router::new().route("/metrics", get(metrics::<H>));
        for path in &self.status_paths {
            router = router.route(path, get(sync_status::<H>));
        }
        router.with_state(self.handler)
    }
}

/// GET /config/status
async fn sync_status<H>(State(handler): State<Arc<H>>) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    Ok(Json(handler.sync_status().await?))
}

/// GET /metrics
async fn metrics<H>(State(handler): State<Arc<H>>) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let body = handler.metrics().await?;
    Ok(([(header::CONTENT_TYPE, TEXT_FORMAT)], body))
}
