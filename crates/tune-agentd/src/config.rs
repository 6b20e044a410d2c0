use std::{
    fs,
    net::SocketAddr,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;
use tune_core::SyncConfig;
use tune_observe::{LoggerConfig, LoggerLevel};

/// Command line of the daemon. Every flag can also be set through its environment
/// variable and wins over the config file.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "tune-agentd")]
#[command(about = "Mock services kept in sync with a remote configuration controller")]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(long, env = "TUNE_CONFIG")]
    pub config: Option<PathBuf>,

    /// HTTP listen address (overrides config)
    #[arg(long, env = "TUNE_LISTEN")]
    pub listen: Option<String>,

    /// Controller base URL (overrides config)
    #[arg(long, env = "TUNE_CONTROLLER_URL")]
    pub controller_url: Option<String>,

    /// System name sent to the controller (overrides config)
    #[arg(long, env = "TUNE_SYSTEM_NAME")]
    pub system_name: Option<String>,

    #[arg(long, env = "TUNE_CHECK_INTERVAL_SECS")]
    pub check_interval_secs: Option<u64>,

    #[arg(long, env = "TUNE_HEALTHCHECK_INTERVAL_SECS")]
    pub healthcheck_interval_secs: Option<u64>,

    #[arg(long, env = "TUNE_CONNECT_TIMEOUT_SECS")]
    pub connect_timeout_secs: Option<u64>,

    #[arg(long, env = "TUNE_READ_TIMEOUT_SECS")]
    pub read_timeout_secs: Option<u64>,

    #[arg(long, env = "TUNE_HEALTHCHECK_TIMEOUT_SECS")]
    pub healthcheck_timeout_secs: Option<u64>,

    /// Startup log level or filter expression (overrides config)
    #[arg(long, env = "TUNE_LOG_LEVEL")]
    pub log_level: Option<LoggerLevel>,
}

impl Cli {
    /// Write every given flag over `cfg`.
    pub fn apply(&self, cfg: &mut AgentConfig) {
        let ctl = &mut cfg.controller;
        if let Some(listen) = &self.listen {
            cfg.listen = listen.clone();
        }
        if let Some(url) = &self.controller_url {
            ctl.url = url.clone();
        }
        if let Some(name) = &self.system_name {
            ctl.system_name = name.clone();
        }
        for (target, value) in [
            (&mut ctl.check_interval_secs, self.check_interval_secs),
            (&mut ctl.healthcheck_interval_secs, self.healthcheck_interval_secs),
            (&mut ctl.connect_timeout_secs, self.connect_timeout_secs),
            (&mut ctl.read_timeout_secs, self.read_timeout_secs),
            (&mut ctl.healthcheck_timeout_secs, self.healthcheck_timeout_secs),
        ] {
            if let Some(value) = value {
                *target = value;
            }
        }
        if let Some(level) = &self.log_level {
            cfg.logger.level = level.clone();
        }
    }
}

/// Daemon configuration: HTTP listener, controller connection and logger.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub listen: String,
    pub controller: SyncConfig,
    pub logger: LoggerConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8081".into(),
            controller: SyncConfig::default(),
            logger: LoggerConfig::default(),
        }
    }
}

impl AgentConfig {
    /// Read the config file named by `cli` if any, apply the command line over it
    /// and validate the result.
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let mut cfg = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        cli.apply(&mut cfg);
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.listen_addr()?;
        self.controller.validate()?;
        Ok(())
    }

    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        self.listen
            .parse()
            .with_context(|| format!("invalid listen address: {}", self.listen))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tune_core::ProbeMethod;

    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("tune-agentd").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_are_valid() {
        let cfg = AgentConfig::default();
        assert_eq!(cfg.listen, "0.0.0.0:8081");
        assert_eq!(cfg.controller, SyncConfig::default());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = AgentConfig::from_toml(
            r#"
            listen = "127.0.0.1:9000"

            [controller]
            url = "http://controller:8080"
            check_interval_secs = 30
            healthcheck_method = "post"

            [logger]
            format = "json"
            level = "DEBUG"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.listen, "127.0.0.1:9000");
        assert_eq!(cfg.controller.url, "http://controller:8080");
        assert_eq!(cfg.controller.check_interval_secs, 30);
        assert_eq!(cfg.controller.healthcheck_method, ProbeMethod::Post);
        assert_eq!(cfg.controller.healthcheck_interval_secs, 10);
        assert_eq!(cfg.logger.level.display(), "DEBUG");
    }

    #[test]
    fn flags_override_every_setting() {
        let args = cli(&[
            "--listen",
            "127.0.0.1:8090",
            "--controller-url",
            "http://other:7000",
            "--system-name",
            "billing-mock",
            "--check-interval-secs",
            "15",
            "--healthcheck-interval-secs",
            "20",
            "--connect-timeout-secs",
            "2",
            "--read-timeout-secs",
            "3",
            "--healthcheck-timeout-secs",
            "4",
            "--log-level",
            "warn",
        ]);
        let mut cfg = AgentConfig::default();
        args.apply(&mut cfg);

        assert_eq!(cfg.listen, "127.0.0.1:8090");
        assert_eq!(cfg.controller.url, "http://other:7000");
        assert_eq!(cfg.controller.system_name, "billing-mock");
        assert_eq!(cfg.controller.check_interval_secs, 15);
        assert_eq!(cfg.controller.healthcheck_interval_secs, 20);
        assert_eq!(cfg.controller.connect_timeout_secs, 2);
        assert_eq!(cfg.controller.read_timeout_secs, 3);
        assert_eq!(cfg.controller.healthcheck_timeout_secs, 4);
        assert_eq!(cfg.logger.level.display(), "WARN");
    }

    #[test]
    fn absent_flags_leave_file_values() {
        let mut cfg = AgentConfig::from_toml("[controller]\nread_timeout_secs = 30\n").unwrap();
        Cli::default().apply(&mut cfg);

        assert_eq!(cfg.controller.read_timeout_secs, 30);
        assert_eq!(cfg.listen, "0.0.0.0:8081");
    }

    #[test]
    fn load_merges_flags_over_file() {
        let path = std::env::temp_dir().join(format!("tune-agentd-{}.toml", std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "[controller]\nsystem_name = \"from-file\"\ncheck_interval_secs = 30").unwrap();

        let args = Cli {
            config: Some(path.clone()),
            check_interval_secs: Some(7),
            ..Cli::default()
        };
        let cfg = AgentConfig::load(&args).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(cfg.controller.system_name, "from-file");
        assert_eq!(cfg.controller.check_interval_secs, 7);
    }

    #[test]
    fn non_numeric_interval_is_rejected() {
        let parsed = Cli::try_parse_from(["tune-agentd", "--check-interval-secs", "soon"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let parsed = Cli::try_parse_from(["tune-agentd", "--log-level", "chatty"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn zero_interval_fails_validation() {
        let args = Cli {
            healthcheck_timeout_secs: Some(0),
            ..Cli::default()
        };
        assert!(AgentConfig::load(&args).is_err());
    }

    #[test]
    fn bad_listen_address_fails_validation() {
        let cfg = AgentConfig {
            listen: "localhost".into(),
            ..AgentConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
