use std::sync::Arc;

/// Exchange with the controller that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStage {
    /// Health probe.
    Probe,
    /// `checkUpdate` negotiation.
    Negotiate,
    /// Per-system config fetch.
    Fetch,
}

impl SyncStage {
    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            SyncStage::Probe => "probe",
            SyncStage::Negotiate => "negotiate",
            SyncStage::Fetch => "fetch",
        }
    }
}

/// Sync metrics collection interface.
///
/// Implementations are injected into [`crate::SyncEngine`] and called from both periodic loops.
pub trait SyncMetrics: Send + Sync + 'static {
    /// Record a finished health probe.
    ///
    /// # Arguments
    /// - `healthy`: Whether the controller answered 200
    /// - `duration_ms`: Probe round-trip in milliseconds
    fn record_probe(&self, healthy: bool, duration_ms: u64);
    /// Record a finished config-check cycle.
    ///
    /// # Arguments
    /// - `outcome`: Label of [`crate::CheckOutcome`]
    fn record_check(&self, outcome: &str);
    /// Record a failed exchange with the controller.
    ///
    /// # Arguments
    /// - `stage`: Which exchange failed
    /// - `error_kind`: Label of [`crate::SyncError`]
    fn record_error(&self, stage: SyncStage, error_kind: &str);
    /// Record attribute writes of one distribution.
    fn record_applied(&self, applied: usize, failed: usize);
    /// Mirror the current health gate.
    fn set_controller_healthy(&self, healthy: bool);
}

/// Shared handle to metrics backend.
pub type MetricsHandle = Arc<dyn SyncMetrics>;
