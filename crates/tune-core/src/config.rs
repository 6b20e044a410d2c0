use std::{fmt, time::Duration};

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// HTTP method used for the controller health probe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeMethod {
    #[default]
    Get,
    Post,
}

impl fmt::Display for ProbeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeMethod::Get => f.write_str("GET"),
            ProbeMethod::Post => f.write_str("POST"),
        }
    }
}

/// Controller connection and scheduling settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Controller base URL.
    pub url: String,
    /// System identifier sent with every negotiation and fetch.
    pub system_name: String,
    /// Period of the config-check loop.
    pub check_interval_secs: u64,
    /// Period of the health-probe loop.
    pub healthcheck_interval_secs: u64,
    /// Connect timeout for negotiation and fetch.
    pub connect_timeout_secs: u64,
    /// Response timeout for negotiation and fetch.
    pub read_timeout_secs: u64,
    /// Connect and response timeout for the health probe.
    pub healthcheck_timeout_secs: u64,
    /// Probe path relative to `url`.
    pub healthcheck_path: String,
    pub healthcheck_method: ProbeMethod,
    /// Append `systemName` and `instanceId` query parameters to the probe.
    pub identify_instance: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080".into(),
            system_name: "test-mock".into(),
            check_interval_secs: 5,
            healthcheck_interval_secs: 10,
            connect_timeout_secs: 5,
            read_timeout_secs: 10,
            healthcheck_timeout_secs: 5,
            healthcheck_path: "/service/healthcheck".into(),
            healthcheck_method: ProbeMethod::Get,
            identify_instance: false,
        }
    }
}

impl SyncConfig {
    /// Check that every period and timeout is positive and that `url` is an absolute http(s) URL.
    pub fn validate(&self) -> Result<(), CoreError> {
        let url = self.base_url()?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(CoreError::Config(format!(
                "controller url must be http(s): {}",
                self.url
            )));
        }
        if self.system_name.trim().is_empty() {
            return Err(CoreError::Config("system_name must not be empty".into()));
        }

        for (name, value) in [
            ("check_interval_secs", self.check_interval_secs),
            ("healthcheck_interval_secs", self.healthcheck_interval_secs),
            ("connect_timeout_secs", self.connect_timeout_secs),
            ("read_timeout_secs", self.read_timeout_secs),
            ("healthcheck_timeout_secs", self.healthcheck_timeout_secs),
        ] {
            if value == 0 {
                return Err(CoreError::Config(format!("{name} must be greater than 0")));
            }
        }
        Ok(())
    }

    /// Parsed controller base URL.
    pub fn base_url(&self) -> Result<Url, CoreError> {
        Url::parse(&self.url)
            .map_err(|e| CoreError::Config(format!("invalid controller url '{}': {e}", self.url)))
    }

    #[inline]
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }

    #[inline]
    pub fn healthcheck_interval(&self) -> Duration {
        Duration::from_secs(self.healthcheck_interval_secs)
    }

    #[inline]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    #[inline]
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    #[inline]
    pub fn healthcheck_timeout(&self) -> Duration {
        Duration::from_secs(self.healthcheck_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let cfg = SyncConfig::default();

        assert_eq!(cfg.url, "http://localhost:8080");
        assert_eq!(cfg.system_name, "test-mock");
        assert_eq!(cfg.check_interval(), Duration::from_secs(5));
        assert_eq!(cfg.healthcheck_interval(), Duration::from_secs(10));
        assert_eq!(cfg.healthcheck_path, "/service/healthcheck");
        assert_eq!(cfg.healthcheck_method, ProbeMethod::Get);
        assert!(!cfg.identify_instance);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_deserialization() {
        let cfg: SyncConfig = serde_json::from_str(
            r#"{"url":"http://controller:9000","check_interval_secs":30,"healthcheck_method":"post"}"#,
        )
        .unwrap();

        assert_eq!(cfg.url, "http://controller:9000");
        assert_eq!(cfg.check_interval_secs, 30);
        assert_eq!(cfg.healthcheck_method, ProbeMethod::Post);
        assert_eq!(cfg.read_timeout_secs, 10);
    }

    #[test]
    fn validate_rejects_zero_periods() {
        let cfg = SyncConfig {
            healthcheck_interval_secs: 0,
            ..SyncConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("healthcheck_interval_secs"));
    }

    #[test]
    fn validate_rejects_bad_url() {
        for url in ["not a url", "ftp://controller", "mailto:ops@example.com"] {
            let cfg = SyncConfig {
                url: url.into(),
                ..SyncConfig::default()
            };
            assert!(matches!(cfg.validate(), Err(CoreError::Config(_))), "{url}");
        }
    }
}
