//! Periodic sync loops as taskvisor controller specs.
//!
//! Each task body runs one cycle and returns; the supervisor restarts it after
//! `success_delay`, so the fixed period is the only retry mechanism. A cycle never
//! reports failure: the engine records its own errors.
//!
//! The first invocation of each task only arms it. The startup pass in
//! [`crate::SyncSupervisor::start`] already covered that slot.
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use taskvisor::{
    BackoffPolicy, AdmissionPolicy as ControllerAdmission, ControllerSpec, JitterPolicy, RestartPolicy, TaskError,
    TaskFn, TaskRef, TaskSpec,
};
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::engine::SyncEngine;

pub const HEALTH_PROBE_TASK: &str = "tune-sync-healthcheck";
pub const CONFIG_CHECK_TASK: &str = "tune-sync-check-update";

/// Health-probe loop, every `healthcheck_interval_secs`.
pub fn health_probe(engine: Arc<SyncEngine>) -> ControllerSpec {
    let period = engine.config().healthcheck_interval();
    let armed = Arc::new(AtomicBool::new(false));

    let task: TaskRef = TaskFn::arc(HEALTH_PROBE_TASK, move |ctx: CancellationToken| {
        let engine = Arc::clone(&engine);
        let armed = Arc::clone(&armed);
        async move {
            if ctx.is_cancelled() {
                return Err(TaskError::Canceled);
            }
            if !armed.swap(true, Ordering::AcqRel) {
                trace!(task = HEALTH_PROBE_TASK, "armed");
                return Ok(());
            }
            engine.probe_health().await;
            Ok(())
        }
    });
    periodic(task, period)
}

/// Config-check loop, every `check_interval_secs`.
pub fn config_check(engine: Arc<SyncEngine>) -> ControllerSpec {
    let period = engine.config().check_interval();
    let armed = Arc::new(AtomicBool::new(false));

    let task: TaskRef = TaskFn::arc(CONFIG_CHECK_TASK, move |ctx: CancellationToken| {
        let engine = Arc::clone(&engine);
        let armed = Arc::clone(&armed);
        async move {
            if ctx.is_cancelled() {
                return Err(TaskError::Canceled);
            }
            if !armed.swap(true, Ordering::AcqRel) {
                trace!(task = CONFIG_CHECK_TASK, "armed");
                return Ok(());
            }
            engine.check_for_update().await;
            Ok(())
        }
    });
    periodic(task, period)
}

fn periodic(task: TaskRef, period: Duration) -> ControllerSpec {
    ControllerSpec {
        admission: ControllerAdmission::DropIfRunning,
        task_spec: TaskSpec::new(task, RestartPolicy::Always, fixed_period(period), None),
    }
}

/// Constant delay between runs whatever the outcome.
fn fixed_period(period: Duration) -> BackoffPolicy {
    BackoffPolicy {
        success_delay: Some(period),
        jitter: JitterPolicy::None,
        factor: 1.0,

        first: period,
        max: period,
    }
}
