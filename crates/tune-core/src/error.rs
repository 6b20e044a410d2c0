use thiserror::Error;
use tune_model::{AttrType, Category};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("supervisor error: {0}")]
    Supervisor(String),
}

/// Rejected attribute registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("{owner}: attribute '{name}' has no known category prefix (delay|int|string|is)")]
    UnknownCategory { owner: String, name: String },

    #[error("{owner}: attribute '{name}' of type {ty} cannot belong to category '{category}'")]
    TypeMismatch {
        owner: String,
        name: String,
        category: Category,
        ty: AttrType,
    },

    #[error("{owner}: attribute '{name}' registered twice")]
    Duplicate { owner: String, name: String },
}

/// Failure of a single exchange with the controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("controller responded with status {0}")]
    Status(u16),

    #[error("protocol error: {0}")]
    Protocol(String),
}

impl SyncError {
    /// Stable label used for metrics and logs.
    #[inline]
    pub fn kind(&self) -> &'static str {
        match self {
            SyncError::Transport(_) => "transport",
            SyncError::Timeout(_) => "timeout",
            SyncError::Status(_) => "status",
            SyncError::Protocol(_) => "protocol",
        }
    }

    /// Returns `true` for connection, timeout and non-2xx failures.
    #[inline]
    pub fn is_transport(&self) -> bool {
        !matches!(self, SyncError::Protocol(_))
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SyncError::Timeout(e.to_string())
        } else if e.is_decode() {
            SyncError::Protocol(e.to_string())
        } else if let Some(status) = e.status() {
            SyncError::Status(status.as_u16())
        } else {
            SyncError::Transport(e.to_string())
        }
    }
}

/// Failure to change the process logging level.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("invalid logging level: {0}")]
    Invalid(String),

    #[error("failed to reload logging filter: {0}")]
    Reload(String),
}
