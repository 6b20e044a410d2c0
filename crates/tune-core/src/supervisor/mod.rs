//! High-level API over taskvisor `Supervisor` used by the sync engine.
//! - Owns a `Supervisor` instance.
//! - Runs the startup pass in the background so callers can serve requests meanwhile.
//! - Submits the health-probe and config-check loops once the startup pass is done.
use std::sync::Arc;

use taskvisor::{ControllerConfig, Subscribe, Supervisor, SupervisorConfig};
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::{engine::SyncEngine, error::CoreError, tasks};

/// Thin wrapper around taskvisor [`Supervisor`] driving one [`SyncEngine`].
pub struct SyncSupervisor {
    sup: Arc<Supervisor>,
    engine: Arc<SyncEngine>,
    scheduled: watch::Receiver<bool>,
}

impl SyncSupervisor {
    /// Start the supervisor and return once it accepts tasks.
    ///
    /// The startup pass and the scheduling of both loops continue on a spawned task;
    /// use [`SyncSupervisor::wait_scheduled`] to wait for them.
    ///
    /// `subscribers`: supervisor event subscribers
    pub async fn start(
        engine: Arc<SyncEngine>,
        subscribers: Vec<Arc<dyn Subscribe>>,
    ) -> Result<Self, CoreError> {
        let sup = Supervisor::builder(SupervisorConfig::default())
            .with_subscribers(subscribers)
            .with_controller(ControllerConfig::default())
            .build();

        let runner = Arc::clone(&sup);
        tokio::spawn(async move {
            if let Err(e) = runner.run(Vec::new()).await {
                error!(error = %e, "supervisor run loop exited with error");
            }
        });
        sup.wait_ready().await;
        debug!("supervisor is ready to accept tasks");

        let (done, scheduled) = watch::channel(false);
        let startup_sup = Arc::clone(&sup);
        let startup_engine = Arc::clone(&engine);
        tokio::spawn(async move {
            match startup(&startup_sup, startup_engine).await {
                Ok(()) => {
                    done.send_replace(true);
                }
                Err(e) => error!(error = %e, "failed to schedule sync loops"),
            }
        });

        Ok(Self {
            sup,
            engine,
            scheduled,
        })
    }

    /// Wait until the startup pass has run and both loops are submitted.
    ///
    /// Returns early if scheduling failed; the failure is logged.
    pub async fn wait_scheduled(&self) {
        let mut scheduled = self.scheduled.clone();
        let _ = scheduled.wait_for(|done| *done).await;
    }

    /// `true` once both loops are submitted.
    pub fn is_scheduled(&self) -> bool {
        *self.scheduled.borrow()
    }

    /// Get a clone of the underlying supervisor handle.
    pub fn supervisor(&self) -> Arc<Supervisor> {
        Arc::clone(&self.sup)
    }

    pub fn engine(&self) -> Arc<SyncEngine> {
        Arc::clone(&self.engine)
    }
}

/// One startup sync, then both periodic loops.
async fn startup(sup: &Supervisor, engine: Arc<SyncEngine>) -> Result<(), CoreError> {
    let outcome = engine.on_ready().await;
    info!(
        outcome = outcome.as_label(),
        version = %engine.version(),
        "startup sync finished"
    );

    for spec in [
        tasks::health_probe(Arc::clone(&engine)),
        tasks::config_check(Arc::clone(&engine)),
    ] {
        sup.submit(spec)
            .await
            .map_err(|e| CoreError::Supervisor(e.to_string()))?;
    }
    info!(
        healthcheck_interval_secs = engine.config().healthcheck_interval_secs,
        check_interval_secs = engine.config().check_interval_secs,
        "sync loops scheduled"
    );
    Ok(())
}
