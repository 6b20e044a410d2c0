use thiserror::Error;
use tune_model::CoercionError;

use super::AccessError;

/// Why a single attribute was not updated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    #[error(transparent)]
    Coercion(#[from] CoercionError),

    #[error(transparent)]
    Access(#[from] AccessError),
}

/// Per-attribute failure recorded while applying a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeFailure {
    pub owner: String,
    pub name: String,
    pub error: ApplyError,
}

/// Result of applying one mapping to one attribute table.
///
/// Failures never abort the batch; they are collected here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Entries written successfully.
    pub applied: usize,
    /// Keys that name no attribute of the table.
    pub unknown: Vec<String>,
    /// Entries whose value could not be coerced or written.
    pub failed: Vec<AttributeFailure>,
}

impl ApplyReport {
    /// Fold another report into this one.
    pub fn merge(&mut self, other: ApplyReport) {
        self.applied += other.applied;
        self.unknown.extend(other.unknown);
        self.failed.extend(other.failed);
    }

    #[inline]
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}
