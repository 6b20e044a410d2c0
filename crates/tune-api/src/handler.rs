use async_trait::async_trait;
use tune_core::SyncStatus;

use crate::error::ApiError;

/// Backend of the HTTP surface.
///
/// [`crate::EngineAdapter`] is the provided implementation; custom handlers can add
/// auth or caching in front of the engine.
#[async_trait]
pub trait ApiHandler: Send + Sync + 'static {
    /// Read-only snapshot of the sync engine.
    async fn sync_status(&self) -> Result<SyncStatus, ApiError>;

    /// Metrics in the Prometheus text format.
    async fn metrics(&self) -> Result<String, ApiError>;
}
