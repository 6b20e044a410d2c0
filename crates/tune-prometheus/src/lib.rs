//! Prometheus metrics backend for the config sync engine.
//!
//! [`PrometheusMetrics`] implements [`tune_core::SyncMetrics`]; inject it with
//! [`tune_core::SyncEngine::with_metrics`] and expose [`PrometheusMetrics::encode`]
//! from an HTTP handler.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use tune_core::SyncMetrics;
//! use tune_prometheus::PrometheusMetrics;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = PrometheusMetrics::new()?;
//! let handle: Arc<dyn SyncMetrics> = Arc::new(metrics.clone());
//!
//! handle.set_controller_healthy(true);
//! assert!(metrics.encode()?.contains("tune_controller_healthy 1"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Metrics
//! - `tune_probes_total{result}` - Counter
//! - `tune_probe_duration_seconds` - Histogram
//! - `tune_checks_total{outcome}` - Counter
//! - `tune_sync_errors_total{stage, error_kind}` - Counter
//! - `tune_attributes_total{result}` - Counter
//! - `tune_controller_healthy` - Gauge

mod backend;
pub use backend::PrometheusMetrics;

pub use prometheus::{Encoder, Registry, TEXT_FORMAT, TextEncoder};
