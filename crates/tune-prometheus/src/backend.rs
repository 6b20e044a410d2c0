use std::sync::Arc;

use prometheus::{
    CounterVec, Encoder, Histogram, HistogramOpts, IntGauge, Opts, Registry, TextEncoder,
    proto::MetricFamily,
};

use tune_core::{SyncMetrics, SyncStage};

const NAMESPACE: &str = "tune";

/// Prometheus metrics backend for the sync loops.
///
/// ## Label cardinality
/// All labels are bounded:
/// - `result`: "healthy", "unhealthy" for probes; "applied", "failed" for attributes
/// - `outcome`: "skipped", "no_update", "applied", "empty_fetch", "failed"
/// - `stage`: "probe", "negotiate", "fetch"
/// - `error_kind`: "transport", "timeout", "status", "protocol"
#[derive(Clone)]
pub struct PrometheusMetrics {
    probes: CounterVec,
    probe_duration: Histogram,
    checks: CounterVec,
    errors: CounterVec,
    attributes: CounterVec,
    controller_healthy: IntGauge,
    registry: Arc<Registry>,
}

impl PrometheusMetrics {
    /// Create a backend registering into `registry`.
    pub fn new_with_registry(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        let probes = CounterVec::new(
            Opts::new("probes_total", "Controller health probes by result").namespace(NAMESPACE),
            &["result"],
        )?;
        registry.register(Box::new(probes.clone()))?;

        let probe_duration = Histogram::with_opts(
            HistogramOpts::new("probe_duration_seconds", "Controller health probe round-trip")
                .namespace(NAMESPACE)
                .buckets(vec![0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        )?;
        registry.register(Box::new(probe_duration.clone()))?;

        let checks = CounterVec::new(
            Opts::new("checks_total", "Config-check cycles by outcome").namespace(NAMESPACE),
            &["outcome"],
        )?;
        registry.register(Box::new(checks.clone()))?;

        let errors = CounterVec::new(
            Opts::new("sync_errors_total", "Failed exchanges with the controller")
                .namespace(NAMESPACE),
            &["stage", "error_kind"],
        )?;
        registry.register(Box::new(errors.clone()))?;

        let attributes = CounterVec::new(
            Opts::new("attributes_total", "Attribute writes from distributed documents")
                .namespace(NAMESPACE),
            &["result"],
        )?;
        registry.register(Box::new(attributes.clone()))?;

        let controller_healthy = IntGauge::with_opts(
            Opts::new("controller_healthy", "1 if the last health probe succeeded")
                .namespace(NAMESPACE),
        )?;
        registry.register(Box::new(controller_healthy.clone()))?;

        Ok(Self {
            probes,
            probe_duration,
            checks,
            errors,
            attributes,
            controller_healthy,
            registry,
        })
    }

    /// Create a backend with its own registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::new_with_registry(Arc::new(Registry::new()))
    }

    /// Gather all metrics for exposition.
    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Render all metrics in the Prometheus text format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    /// Underlying registry, for registering application metrics alongside.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

impl SyncMetrics for PrometheusMetrics {
    fn record_probe(&self, healthy: bool, duration_ms: u64) {
        let result = if healthy { "healthy" } else { "unhealthy" };
        self.probes.with_label_values(&[result]).inc();
        self.probe_duration.observe(duration_ms as f64 / 1000.0);
    }

    fn record_check(&self, outcome: &str) {
        self.checks.with_label_values(&[outcome]).inc();
    }

    fn record_error(&self, stage: SyncStage, error_kind: &str) {
        self.errors
            .with_label_values(&[stage.as_label(), error_kind])
            .inc();
    }

    fn record_applied(&self, applied: usize, failed: usize) {
        self.attributes
            .with_label_values(&["applied"])
            .inc_by(applied as f64);
        self.attributes
            .with_label_values(&["failed"])
            .inc_by(failed as f64);
    }

    fn set_controller_healthy(&self, healthy: bool) {
        self.controller_healthy.set(i64::from(healthy));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family<'a>(families: &'a [MetricFamily], name: &str) -> &'a MetricFamily {
        families
            .iter()
            .find(|f| f.name() == name)
            .unwrap_or_else(|| panic!("metric {name} not found"))
    }

    #[test]
    fn probes_are_counted_by_result() {
        let metrics = PrometheusMetrics::new().unwrap();

        metrics.record_probe(true, 12);
        metrics.record_probe(false, 5000);
        metrics.record_probe(false, 40);

        assert_eq!(metrics.probes.with_label_values(&["healthy"]).get(), 1.0);
        assert_eq!(metrics.probes.with_label_values(&["unhealthy"]).get(), 2.0);
        assert_eq!(metrics.probe_duration.get_sample_count(), 3);

        let families = metrics.gather();
        assert_eq!(family(&families, "tune_probes_total").get_metric().len(), 2);
    }

    #[test]
    fn checks_and_errors_use_bounded_labels() {
        let metrics = PrometheusMetrics::new().unwrap();

        metrics.record_check("applied");
        metrics.record_check("skipped");
        metrics.record_check("skipped");
        metrics.record_error(SyncStage::Negotiate, "timeout");
        metrics.record_error(SyncStage::Fetch, "protocol");

        assert_eq!(metrics.checks.with_label_values(&["skipped"]).get(), 2.0);
        let families = metrics.gather();
        assert_eq!(family(&families, "tune_sync_errors_total").get_metric().len(), 2);
    }

    #[test]
    fn applied_attributes_accumulate() {
        let metrics = PrometheusMetrics::new().unwrap();

        metrics.record_applied(4, 1);
        metrics.record_applied(2, 0);

        assert_eq!(metrics.attributes.with_label_values(&["applied"]).get(), 6.0);
        assert_eq!(metrics.attributes.with_label_values(&["failed"]).get(), 1.0);
    }

    #[test]
    fn health_gauge_follows_last_probe() {
        let metrics = PrometheusMetrics::new().unwrap();

        metrics.set_controller_healthy(true);
        assert_eq!(metrics.controller_healthy.get(), 1);
        metrics.set_controller_healthy(false);
        assert_eq!(metrics.controller_healthy.get(), 0);
    }

    #[test]
    fn encode_renders_text_format() {
        let metrics = PrometheusMetrics::new().unwrap();
        metrics.record_check("no_update");

        let text = metrics.encode().unwrap();
        assert!(text.contains("# TYPE tune_checks_total counter"));
        assert!(text.contains(r#"tune_checks_total{outcome="no_update"} 1"#));
    }

    #[test]
    fn can_use_custom_registry() {
        let registry = Arc::new(Registry::new());
        let metrics = PrometheusMetrics::new_with_registry(registry.clone()).unwrap();

        metrics.record_check("failed");
        assert!(!registry.gather().is_empty());
        assert!(PrometheusMetrics::new_with_registry(registry).is_err());
    }
}
