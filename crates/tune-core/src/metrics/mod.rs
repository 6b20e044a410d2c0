//! Metrics collection abstraction for the sync loops.
//!
//! Backends (prometheus, statsd, etc) implement [`SyncMetrics`] and are injected via
//! [`crate::SyncEngine::with_metrics`].
mod backend;
pub use backend::{MetricsHandle, SyncMetrics, SyncStage};

mod noop;
pub use noop::NoOpMetrics;

use std::sync::Arc;

/// Create a no-op metrics handle.
#[inline]
pub fn noop_metrics() -> MetricsHandle {
    Arc::new(NoOpMetrics)
}
