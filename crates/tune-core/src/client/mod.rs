//! Controller protocol seam.
//!
//! The engine talks to the controller only through [`ControllerClient`], which keeps
//! the orchestrator testable without a network.
use async_trait::async_trait;
use tune_model::{CheckUpdateRequest, CheckUpdateResponse, ConfigResponse};

use crate::error::SyncError;

mod http;
pub use http::HttpControllerClient;

/// The three exchanges of the sync protocol.
#[async_trait]
pub trait ControllerClient: Send + Sync + 'static {
    /// Call the health endpoint and return the HTTP status code.
    ///
    /// Only transport failures (refused, timed out) are errors; any status is returned as is.
    async fn probe(&self) -> Result<u16, SyncError>;

    /// Send the local snapshot and ask whether a newer version exists.
    async fn check_update(
        &self,
        request: &CheckUpdateRequest,
    ) -> Result<CheckUpdateResponse, SyncError>;

    /// Fetch the document of `version`. `Ok(None)` means the controller answered with an empty body.
    async fn fetch_config(
        &self,
        system_name: &str,
        version: &str,
    ) -> Result<Option<ConfigResponse>, SyncError>;
}
