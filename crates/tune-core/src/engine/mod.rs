//! Sync orchestrator: version cursor, health gate and the two loop bodies.
mod state;
pub use state::HealthState;

mod status;
pub use status::SyncStatus;

use std::{
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::Instant,
};

use time::OffsetDateTime;
use tracing::{debug, info, instrument, warn};
use tune_model::{CheckUpdateRequest, INITIAL_VERSION, Version};

use crate::{
    client::ControllerClient,
    config::SyncConfig,
    error::SyncError,
    fleet::{DistributeReport, Fleet},
    level::LevelSink,
    metrics::{MetricsHandle, SyncStage, noop_metrics},
};
use state::CheckStats;

/// Result of one health probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Controller answered 200.
    Healthy,
    /// Any other status, a timeout or a transport failure.
    Unhealthy(SyncError),
}

impl ProbeOutcome {
    #[inline]
    pub fn is_healthy(&self) -> bool {
        matches!(self, ProbeOutcome::Healthy)
    }

    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            ProbeOutcome::Healthy => "healthy",
            ProbeOutcome::Unhealthy(_) => "unhealthy",
        }
    }
}

/// Result of one config-check cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Health gate closed; no request was sent.
    Skipped,
    /// Negotiation done, nothing to fetch. `version` is the cursor afterwards.
    NoUpdate { version: Version },
    /// A document was fetched and distributed.
    Applied {
        version: Version,
        report: DistributeReport,
    },
    /// Fetch for `target` returned no document. Nothing was applied; the miss is
    /// counted as a protocol error.
    EmptyFetch { target: Version },
    /// An exchange failed; the cursor was not advanced by it.
    Failed(SyncError),
}

impl CheckOutcome {
    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            CheckOutcome::Skipped => "skipped",
            CheckOutcome::NoUpdate { .. } => "no_update",
            CheckOutcome::Applied { .. } => "applied",
            CheckOutcome::EmptyFetch { .. } => "empty_fetch",
            CheckOutcome::Failed(_) => "failed",
        }
    }
}

/// Synchronizes a [`Fleet`] with the remote controller.
///
/// Shared between the health-probe loop, the config-check loop and the status surface.
/// Locks are never held across an await point.
pub struct SyncEngine {
    config: SyncConfig,
    fleet: Fleet,
    client: Arc<dyn ControllerClient>,
    levels: Arc<dyn LevelSink>,
    metrics: MetricsHandle,

    version: RwLock<Version>,
    health: RwLock<HealthState>,
    stats: RwLock<CheckStats>,
}

impl SyncEngine {
    pub fn new(
        config: SyncConfig,
        fleet: Fleet,
        client: Arc<dyn ControllerClient>,
        levels: Arc<dyn LevelSink>,
    ) -> Self {
        Self {
            config,
            fleet,
            client,
            levels,
            metrics: noop_metrics(),
            version: RwLock::new(INITIAL_VERSION.to_string()),
            health: RwLock::new(HealthState::default()),
            stats: RwLock::new(CheckStats::default()),
        }
    }

    /// Replace the metrics backend.
    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    /// Current version cursor.
    pub fn version(&self) -> Version {
        read(&self.version).clone()
    }

    /// Consistent snapshot of the health state.
    pub fn health(&self) -> HealthState {
        read(&self.health).clone()
    }

    /// Probe the controller once and update the health state.
    ///
    /// Only this method changes health; it runs regardless of the current state.
    #[instrument(level = "debug", skip(self))]
    pub async fn probe_health(&self) -> ProbeOutcome {
        let started = Instant::now();
        let outcome = match self.client.probe().await {
            Ok(200) => ProbeOutcome::Healthy,
            Ok(status) => ProbeOutcome::Unhealthy(SyncError::Status(status)),
            Err(e) => ProbeOutcome::Unhealthy(e),
        };
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let now = OffsetDateTime::now_utc();

        let (was_healthy, failures) = {
            let mut health = write(&self.health);
            let was_healthy = health.healthy;
            match outcome {
                ProbeOutcome::Healthy => health.record_success(now),
                ProbeOutcome::Unhealthy(_) => health.record_failure(now),
            }
            (was_healthy, health.consecutive_failures)
        };

        match &outcome {
            ProbeOutcome::Healthy if !was_healthy => {
                info!(duration_ms = elapsed_ms, "controller is healthy again")
            }
            ProbeOutcome::Healthy => debug!(duration_ms = elapsed_ms, "healthcheck succeeded"),
            ProbeOutcome::Unhealthy(e) => {
                warn!(error = %e, failures, duration_ms = elapsed_ms, "healthcheck failed");
                self.metrics.record_error(SyncStage::Probe, e.kind());
            }
        }
        self.metrics.record_probe(outcome.is_healthy(), elapsed_ms);
        self.metrics.set_controller_healthy(outcome.is_healthy());
        outcome
    }

    /// Run one config-check cycle behind the health gate.
    ///
    /// Never fails: errors are logged, counted and returned as [`CheckOutcome::Failed`].
    #[instrument(level = "debug", skip(self))]
    pub async fn check_for_update(&self) -> CheckOutcome {
        if !read(&self.health).healthy {
            debug!("controller is not healthy, skipping config check");
            self.metrics.record_check(CheckOutcome::Skipped.as_label());
            return CheckOutcome::Skipped;
        }

        let count = {
            let mut stats = write(&self.stats);
            stats.last_check = Some(OffsetDateTime::now_utc());
            stats.check_count += 1;
            stats.check_count
        };
        debug!(check = count, "config check started");

        let outcome = self.synchronize().await;
        self.metrics.record_check(outcome.as_label());
        outcome
    }

    /// Startup pass: one probe, then one config check if the controller is healthy.
    pub async fn on_ready(&self) -> CheckOutcome {
        self.probe_health().await;
        self.check_for_update().await
    }

    /// Operator snapshot; does not mutate any state.
    pub fn status(&self) -> SyncStatus {
        let now = OffsetDateTime::now_utc();
        let health = self.health();
        let stats = read(&self.stats).clone();
        let since_check = status::seconds_since(stats.last_check, now);

        SyncStatus {
            last_check_update_time: status::format_time(stats.last_check),
            check_update_count: stats.check_count,
            error_count: stats.error_count,
            last_error: stats.last_error.unwrap_or_else(|| "None".to_string()),
            current_version: self.version(),
            check_interval_seconds: self.config.check_interval_secs,
            mock_controller_url: self.config.url.clone(),
            seconds_since_last_check: since_check,
            services_count: self.fleet.len(),
            is_mock_controller_available: stats.error_count == 0 || (0..10).contains(&since_check),
            is_mock_controller_healthy: health.healthy,
            last_healthcheck_time: status::format_time(health.last_probe),
            healthcheck_count: health.probe_count,
            healthcheck_failure_count: health.consecutive_failures,
            healthcheck_path: self.config.healthcheck_path.clone(),
            healthcheck_interval_seconds: self.config.healthcheck_interval_secs,
            seconds_since_last_healthcheck: status::seconds_since(health.last_probe, now),
        }
    }

    /// Negotiate, then fetch and distribute if the controller asks for it.
    async fn synchronize(&self) -> CheckOutcome {
        let system_name = &self.config.system_name;
        let request = CheckUpdateRequest {
            system_name: system_name.clone(),
            version: self.version(),
            config: self.fleet.build_document(Some(self.levels.current())),
        };

        let response = match self.client.check_update(&request).await {
            Ok(r) => r,
            Err(e) => return self.fail(SyncStage::Negotiate, e),
        };

        if let Some(current) = &response.current_version {
            if *current != request.version {
                info!(from = %request.version, to = %current, "controller reports new current version");
            }
            *write(&self.version) = current.clone();
        }

        if !response.need_update {
            debug!(version = %self.version(), "configuration is up to date");
            return CheckOutcome::NoUpdate {
                version: self.version(),
            };
        }
        let Some(target) = response.target_version().map(str::to_owned) else {
            warn!("controller requested an update without a target version");
            return CheckOutcome::NoUpdate {
                version: self.version(),
            };
        };

        let fetched = match self.client.fetch_config(system_name, &target).await {
            Ok(f) => f,
            Err(e) => return self.fail(SyncStage::Fetch, e),
        };
        let Some((doc, version)) = fetched.and_then(|r| r.config.map(|c| (c, r.version))) else {
            self.record_failure(
                SyncStage::Fetch,
                &SyncError::Protocol(format!("no configuration returned for version {target}")),
            );
            return CheckOutcome::EmptyFetch { target };
        };

        let report = self.fleet.distribute(&doc, self.levels.as_ref());
        let version = version.unwrap_or(target);
        *write(&self.version) = version.clone();

        self.metrics
            .record_applied(report.applied, report.failed.len());
        info!(
            %version,
            applied = report.applied,
            failed = report.failed.len(),
            unknown = report.unknown.len(),
            "configuration applied"
        );
        CheckOutcome::Applied { version, report }
    }

    fn fail(&self, stage: SyncStage, error: SyncError) -> CheckOutcome {
        self.record_failure(stage, &error);
        CheckOutcome::Failed(error)
    }

    /// Count `error` in the check statistics and metrics; the cursor is not touched.
    fn record_failure(&self, stage: SyncStage, error: &SyncError) {
        let errors = {
            let mut stats = write(&self.stats);
            stats.error_count += 1;
            stats.last_error = Some(error.to_string());
            stats.error_count
        };
        warn!(stage = stage.as_label(), %error, errors, "config check failed");
        self.metrics.record_error(stage, error.kind());
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
