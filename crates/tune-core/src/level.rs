use std::sync::{PoisonError, RwLock};

use crate::error::LevelError;

/// Process-wide logging level capability.
///
/// The aggregation layer is the only caller of [`LevelSink::apply`]; it does so at most
/// once per distribution, after every instance has been updated.
pub trait LevelSink: Send + Sync {
    /// Level attached to outgoing configuration documents.
    fn current(&self) -> String;

    /// Switch the live level and persist it for subsequent [`LevelSink::current`] calls.
    fn apply(&self, level: &str) -> Result<(), LevelError>;
}

/// Level sink that only remembers the value.
///
/// Used where no reloadable subscriber is installed (tests, embedded use).
#[derive(Debug)]
pub struct StaticLevel {
    level: RwLock<String>,
}

impl StaticLevel {
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: RwLock::new(level.into()),
        }
    }
}

impl Default for StaticLevel {
    fn default() -> Self {
        Self::new("INFO")
    }
}

impl LevelSink for StaticLevel {
    fn current(&self) -> String {
        self.level
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn apply(&self, level: &str) -> Result<(), LevelError> {
        if level.trim().is_empty() {
            return Err(LevelError::Invalid(level.to_string()));
        }
        *self.level.write().unwrap_or_else(PoisonError::into_inner) = level.to_string();
        Ok(())
    }
}
