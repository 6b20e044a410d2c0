use std::sync::{Arc, PoisonError, RwLock};

use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, Registry, reload};
use tune_core::{LevelError, LevelSink};

use crate::logger::object::level::resolve;

/// Handle to the live log filter of the process.
///
/// Returned by [`crate::init_logger`]; cheap to clone. Implements [`LevelSink`] so the
/// sync engine can switch the level when the controller sends `loggingLv`.
#[derive(Clone)]
pub struct LevelHandle {
    filter: reload::Handle<EnvFilter, Registry>,
    current: Arc<RwLock<String>>,
}

impl LevelHandle {
    pub(crate) fn new(filter: reload::Handle<EnvFilter, Registry>, current: String) -> Self {
        Self {
            filter,
            current: Arc::new(RwLock::new(current)),
        }
    }
}

impl LevelSink for LevelHandle {
    fn current(&self) -> String {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn apply(&self, level: &str) -> Result<(), LevelError> {
        let resolved = resolve(level);
        if resolved.fallback {
            warn!(requested = %level, "unknown logging level, using INFO");
        }

        let filter = EnvFilter::try_new(&resolved.directive)
            .map_err(|e| LevelError::Invalid(format!("{}: {e}", resolved.directive)))?;
        self.filter
            .reload(filter)
            .map_err(|e| LevelError::Reload(e.to_string()))?;

        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if *current != resolved.display {
            info!(from = %*current, to = %resolved.display, "log filter reloaded");
        }
        *current = resolved.display;
        Ok(())
    }
}

impl std::fmt::Debug for LevelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LevelHandle")
            .field("current", &self.current())
            .finish()
    }
}
