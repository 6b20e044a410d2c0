use std::{convert::TryFrom, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::logger::LoggerError;

/// Startup filter expression, validated with `EnvFilter::try_new`.
///
/// Accepts a plain level (`"info"`, `"DEBUG"`) or a full directive list
/// (`"tune_core=debug,info"`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String")]
#[serde(into = "String")]
pub struct LoggerLevel(String);

impl LoggerLevel {
    /// # Examples
    /// ```
    /// use tune_observe::LoggerLevel;
    ///
    /// let lvl = LoggerLevel::new("info").unwrap();
    /// assert_eq!(lvl.as_str(), "info");
    /// ```
    pub fn new(s: impl Into<String>) -> Result<Self, LoggerError> {
        Self::try_from(s.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Operator-facing name of this level, as reported in configuration documents.
    pub fn display(&self) -> String {
        resolve(&self.0).display
    }

    pub fn to_env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(resolve(&self.0).directive).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

impl Default for LoggerLevel {
    fn default() -> Self {
        Self("info".to_string())
    }
}

impl FromStr for LoggerLevel {
    type Err = LoggerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_owned())
    }
}

impl TryFrom<String> for LoggerLevel {
    type Error = LoggerError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        let resolved = resolve(&s);
        if resolved.fallback {
            return Err(LoggerError::InvalidLevel(s));
        }
        match EnvFilter::try_new(&resolved.directive) {
            Ok(_) => Ok(LoggerLevel(s)),
            Err(e) => Err(LoggerError::InvalidLevel(format!("{s}: {e}"))),
        }
    }
}

impl From<LoggerLevel> for String {
    fn from(l: LoggerLevel) -> Self {
        l.0
    }
}

/// Level text received at runtime, mapped onto a filter directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLevel {
    /// `EnvFilter` directive to install.
    pub directive: String,
    /// Value reported back to the controller.
    pub display: String,
    /// `true` if the input was not understood and `INFO` was substituted.
    pub fallback: bool,
}

/// Map operator level text onto a filter directive.
///
/// Level names are matched case-insensitively (`ALL`, `TRACE`, `DEBUG`, `INFO`,
/// `WARN`/`WARNING`, `ERROR`, `OFF`). Text containing `=` or `,` is taken as a
/// directive list if it parses. Anything else resolves to `INFO` with `fallback` set.
pub fn resolve(raw: &str) -> ResolvedLevel {
    let trimmed = raw.trim();
    let named = match trimmed.to_ascii_uppercase().as_str() {
        "ALL" | "TRACE" => Some("TRACE"),
        "DEBUG" => Some("DEBUG"),
        "INFO" => Some("INFO"),
        "WARN" | "WARNING" => Some("WARN"),
        "ERROR" => Some("ERROR"),
        "OFF" => Some("OFF"),
        _ => None,
    };
    if let Some(name) = named {
        return ResolvedLevel {
            directive: name.to_ascii_lowercase(),
            display: name.to_string(),
            fallback: false,
        };
    }

    if (trimmed.contains('=') || trimmed.contains(',')) && EnvFilter::try_new(trimmed).is_ok() {
        return ResolvedLevel {
            directive: trimmed.to_string(),
            display: trimmed.to_string(),
            fallback: false,
        };
    }

    ResolvedLevel {
        directive: "info".to_string(),
        display: "INFO".to_string(),
        fallback: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_levels() {
        for lvl in ["info", "WARN", "error", "Trace", "debug", "tune_core=trace,info"] {
            assert!(lvl.parse::<LoggerLevel>().is_ok(), "{lvl}");
        }
    }

    #[test]
    fn rejects_invalid_levels() {
        for lvl in ["loud", "my_crate=lol", "other=trace,another=wat"] {
            assert!(LoggerLevel::from_str(lvl).is_err(), "{lvl}");
        }
    }

    #[test]
    fn serde_from_plain_string() {
        let lvl: LoggerLevel = serde_json::from_str(r#""debug""#).unwrap();
        assert_eq!(lvl.as_str(), "debug");
        assert_eq!(lvl.display(), "DEBUG");
        assert_eq!(serde_json::to_string(&lvl).unwrap(), r#""debug""#);
    }

    #[test]
    fn default_is_info() {
        let lvl = LoggerLevel::default();
        assert_eq!(lvl.as_str(), "info");
        assert_eq!(lvl.display(), "INFO");
        let _ = lvl.to_env_filter();
    }

    #[test]
    fn resolves_operator_names_in_any_case() {
        for (raw, display) in [
            ("debug", "DEBUG"),
            ("Warning", "WARN"),
            (" ERROR ", "ERROR"),
            ("all", "TRACE"),
            ("off", "OFF"),
        ] {
            let r = resolve(raw);
            assert_eq!(r.display, display);
            assert_eq!(r.directive, display.to_ascii_lowercase());
            assert!(!r.fallback);
        }
    }

    #[test]
    fn resolves_directive_lists_verbatim() {
        let r = resolve("tune_core=debug,info");
        assert_eq!(r.directive, "tune_core=debug,info");
        assert_eq!(r.display, "tune_core=debug,info");
        assert!(!r.fallback);
    }

    #[test]
    fn unknown_text_falls_back_to_info() {
        for raw in ["VERBOSE", "", "tune_core=loud"] {
            let r = resolve(raw);
            assert_eq!(r.directive, "info");
            assert_eq!(r.display, "INFO");
            assert!(r.fallback, "{raw:?}");
        }
    }
}
