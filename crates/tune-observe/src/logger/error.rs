use thiserror::Error;

/// Failures while parsing logger settings or installing the global subscriber.
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("invalid log format '{0}' (expected text, json or journald)")]
    InvalidFormat(String),

    #[error("journald output is not available on this platform")]
    JournaldNotSupported,

    #[error("journald layer could not be created: {0}")]
    JournaldInitFailed(String),

    /// A global subscriber was installed before [`crate::init_logger`].
    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized,

    #[error("invalid timezone '{0}' (expected utc or local)")]
    InvalidTimeZone(String),

    /// Startup level that neither names a level nor parses as a filter directive.
    #[error("invalid log level '{0}'")]
    InvalidLevel(String),
}

pub type LoggerResult<T> = Result<T, LoggerError>;
