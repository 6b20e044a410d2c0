use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt,
    layer::{Layered, SubscriberExt},
    reload,
    util::SubscriberInitExt,
};

use crate::logger::{
    config::LoggerConfig,
    error::{LoggerError, LoggerResult},
    handle::LevelHandle,
    object::LoggerRfc3339,
};

/// Registry with the reloadable filter applied; output layers stack on top of it.
type Filtered = Layered<reload::Layer<EnvFilter, Registry>, Registry>;

/// Initializes text logger.
pub fn logger_text(cfg: &LoggerConfig) -> LoggerResult<LevelHandle> {
    let layer = fmt::layer::<Filtered>()
        .with_ansi(cfg.should_use_color())
        .with_target(cfg.with_targets)
        .with_timer(LoggerRfc3339::new(cfg.tz));
    install(cfg, layer)
}

/// Initializes JSON (structured) logger.
pub fn logger_json(cfg: &LoggerConfig) -> LoggerResult<LevelHandle> {
    let layer = fmt::layer::<Filtered>()
        .json()
        .with_ansi(false)
        .with_target(cfg.with_targets)
        .with_timer(LoggerRfc3339::new(cfg.tz));
    install(cfg, layer)
}

/// Initializes journald logger (Linux only).
#[cfg(target_os = "linux")]
pub fn logger_journald(cfg: &LoggerConfig) -> LoggerResult<LevelHandle> {
    let layer =
        tracing_journald::layer().map_err(|e| LoggerError::JournaldInitFailed(e.to_string()))?;
    install(cfg, layer)
}

/// Stub for journald on non-Linux platforms.
#[cfg(not(target_os = "linux"))]
pub fn logger_journald(_cfg: &LoggerConfig) -> LoggerResult<LevelHandle> {
    Err(LoggerError::JournaldNotSupported)
}

/// Installs `output` behind a reloadable filter as the global default.
fn install<L>(cfg: &LoggerConfig, output: L) -> LoggerResult<LevelHandle>
where
    L: Layer<Filtered> + Send + Sync + 'static,
{
    let (filter, handle) = reload::Layer::new(cfg.level.to_env_filter());
    tracing_subscriber::registry()
        .with(filter)
        .with(output)
        .try_init()
        .map_err(|_| LoggerError::AlreadyInitialized)?;
    Ok(LevelHandle::new(handle, cfg.level.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::object::LoggerFormat;

    #[test]
    #[cfg(not(target_os = "linux"))]
    fn journald_is_rejected_off_linux() {
        let config = LoggerConfig {
            format: LoggerFormat::Journald,
            ..Default::default()
        };
        assert!(matches!(
            logger_journald(&config),
            Err(LoggerError::JournaldNotSupported)
        ));
    }

    #[test]
    fn second_install_is_rejected() {
        let config = LoggerConfig {
            format: LoggerFormat::Text,
            use_color: false,
            ..Default::default()
        };

        let first = logger_text(&config);
        let second = logger_json(&config);
        assert!(first.is_ok() || matches!(first, Err(LoggerError::AlreadyInitialized)));
        assert!(matches!(second, Err(LoggerError::AlreadyInitialized)));
    }
}
