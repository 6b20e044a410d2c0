mod config;
mod error;
mod handle;
mod log;
mod object;

pub use config::LoggerConfig;
pub use error::LoggerError;
pub use handle::LevelHandle;
pub use object::level::{ResolvedLevel, resolve as resolve_level};
pub use object::{LoggerFormat, LoggerLevel, LoggerTimeZone, init_local_offset};

/// Initializes the global tracing subscriber with the given configuration.
///
/// Returns the [`LevelHandle`] of the installed filter. Hand it to the sync engine
/// as its level sink so controller-sent `loggingLv` values take effect at runtime.
///
/// For [`LoggerTimeZone::Local`] call [`init_local_offset`] in `main()` before the
/// runtime spawns threads.
///
/// # Examples
/// ```no_run
/// use tune_core::LevelSink;
/// use tune_observe::{LoggerConfig, init_logger};
///
/// let levels = init_logger(&LoggerConfig::default()).unwrap();
/// tracing::info!(level = %levels.current(), "logger initialized");
/// ```
pub fn init_logger(cfg: &LoggerConfig) -> Result<LevelHandle, LoggerError> {
    match cfg.format {
        LoggerFormat::Text => log::logger_text(cfg),
        LoggerFormat::Json => log::logger_json(cfg),
        LoggerFormat::Journald => log::logger_journald(cfg),
    }
}
