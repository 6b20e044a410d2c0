use crate::metrics::backend::{SyncMetrics, SyncStage};

/// No-op metrics backend that compiles to nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl SyncMetrics for NoOpMetrics {
    #[inline(always)]
    fn record_probe(&self, _: bool, _: u64) {}

    #[inline(always)]
    fn record_check(&self, _: &str) {}

    #[inline(always)]
    fn record_error(&self, _: SyncStage, _: &str) {}

    #[inline(always)]
    fn record_applied(&self, _: usize, _: usize) {}

    #[inline(always)]
    fn set_controller_healthy(&self, _: bool) {}
}
