use time::OffsetDateTime;

/// Controller health as last observed by the probe loop.
///
/// Starts healthy so the first config check is not suppressed before any probe ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthState {
    pub healthy: bool,
    /// Failed probes since the last 200.
    pub consecutive_failures: u32,
    /// Probes issued so far.
    pub probe_count: u64,
    pub last_probe: Option<OffsetDateTime>,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            healthy: true,
            consecutive_failures: 0,
            probe_count: 0,
            last_probe: None,
        }
    }
}

impl HealthState {
    pub(crate) fn record_success(&mut self, at: OffsetDateTime) {
        self.probe_count += 1;
        self.last_probe = Some(at);
        self.healthy = true;
        self.consecutive_failures = 0;
    }

    pub(crate) fn record_failure(&mut self, at: OffsetDateTime) {
        self.probe_count += 1;
        self.last_probe = Some(at);
        self.healthy = false;
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
    }
}

/// Counters of the config-check loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct CheckStats {
    pub last_check: Option<OffsetDateTime>,
    pub check_count: u64,
    pub error_count: u64,
    pub last_error: Option<String>,
}
