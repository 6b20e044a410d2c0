use std::sync::Arc;

use async_trait::async_trait;
use tune_core::{SyncEngine, SyncStatus};
use tune_prometheus::PrometheusMetrics;

use crate::error::ApiError;
use crate::handler::ApiHandler;

/// Adapter that serves a [`SyncEngine`] and, optionally, its Prometheus backend.
pub struct EngineAdapter {
    engine: Arc<SyncEngine>,
    metrics: Option<PrometheusMetrics>,
}

impl EngineAdapter {
    pub fn new(engine: Arc<SyncEngine>) -> Self {
        Self {
            engine,
            metrics: None,
        }
    }

    /// Expose `metrics` on `/metrics`.
    pub fn with_metrics(mut self, metrics: PrometheusMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }
}

#[async_trait]
impl ApiHandler for EngineAdapter {
    async fn sync_status(&self) -> Result<SyncStatus, ApiError> {
        Ok(self.engine.status())
    }

    async fn metrics(&self) -> Result<String, ApiError> {
        let Some(metrics) = &self.metrics else {
            return Err(ApiError::Unavailable("metrics are disabled".into()));
        };
        metrics
            .encode()
            .map_err(|e| ApiError::Internal(e.to_string()))
    }
}
