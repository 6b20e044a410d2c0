use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Read-only operator snapshot of the sync engine.
///
/// Timestamps are RFC 3339 or `"Never"`; elapsed seconds are `-1` when the event never happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub last_check_update_time: String,
    pub check_update_count: u64,
    pub error_count: u64,
    pub last_error: String,
    pub current_version: String,
    pub check_interval_seconds: u64,
    pub mock_controller_url: String,
    pub seconds_since_last_check: i64,
    pub services_count: usize,
    /// No check error yet, or the last check started less than ten seconds ago.
    pub is_mock_controller_available: bool,
    pub is_mock_controller_healthy: bool,
    pub last_healthcheck_time: String,
    pub healthcheck_count: u64,
    /// Consecutive failed probes.
    pub healthcheck_failure_count: u32,
    pub healthcheck_path: String,
    pub healthcheck_interval_seconds: u64,
    pub seconds_since_last_healthcheck: i64,
}

pub(crate) fn format_time(at: Option<OffsetDateTime>) -> String {
    at.and_then(|t| t.format(&Rfc3339).ok())
        .unwrap_or_else(|| "Never".to_string())
}

pub(crate) fn seconds_since(at: Option<OffsetDateTime>, now: OffsetDateTime) -> i64 {
    at.map(|t| (now - t).whole_seconds()).unwrap_or(-1)
}
