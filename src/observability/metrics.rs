//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define request metrics (count, latency) keyed by method, route, status
//! - Render Prometheus text exposition for the scrape endpoint
//!
//! # Metrics
//! - `http_requests_total` (counter): completed requests
//! - `http_request_duration_seconds` (histogram): wall-clock latency
//!
//! # Design Decisions
//! - The registry owns its recorder and is passed around explicitly; it is
//!   never installed as the process-global recorder, so each instance is
//!   isolated
//! - Histogram buckets tuned for typical web latencies
//! - Rendering reads a snapshot and never resets counters

use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle, PrometheusRecorder};

pub const REQUESTS_TOTAL: &str = "http_requests_total";
pub const REQUEST_DURATION: &str = "http_request_duration_seconds";

/// Latency buckets in seconds.
const LATENCY_BUCKETS: &[f64] = &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

/// One completed request, folded into the aggregates on record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub method: String,
    /// Route template (e.g. `/api/users`), not the raw URI.
    pub route: String,
    pub status: u16,
    pub latency: Duration,
}

/// Request metrics registry.
pub struct MetricsRegistry {
    recorder: PrometheusRecorder,
    handle: PrometheusHandle,
}

impl MetricsRegistry {
    /// Build a fresh registry with no observations.
    pub fn new() -> Result<Self, BuildError> {
        let recorder = PrometheusBuilder::new()
            .set_buckets_for_metric(Matcher::Full(REQUEST_DURATION.to_string()), LATENCY_BUCKETS)?
            .build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            describe_counter!(REQUESTS_TOTAL, "Total HTTP requests");
            describe_histogram!(REQUEST_DURATION, Unit::Seconds, "HTTP request latency");
        });

        Ok(Self { recorder, handle })
    }

    /// Record exactly one counter increment and one latency observation.
    pub fn record(&self, observation: &Observation) {
        let status = observation.status.to_string();
        metrics::with_local_recorder(&self.recorder, || {
            let labels = [
                ("method", observation.method.clone()),
                ("path", observation.route.clone()),
                ("status", status),
            ];
            counter!(REQUESTS_TOTAL, &labels).increment(1);
            histogram!(REQUEST_DURATION, &labels).record(observation.latency.as_secs_f64());
        });
    }

    /// Prometheus text exposition of everything recorded so far.
    pub fn render(&self) -> String {
        self.handle.render()
    }

    /// Exporter housekeeping (drains histogram buffers).
    pub fn run_upkeep(&self) {
        self.handle.run_upkeep();
    }
}

impl std::fmt::Debug for MetricsRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsRegistry").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation(route: &str, status: u16, millis: u64) -> Observation {
        Observation {
            method: "GET".into(),
            route: route.into(),
            status,
            latency: Duration::from_millis(millis),
        }
    }

    fn counter_line<'a>(text: &'a str, fragments: &[&str]) -> Option<&'a str> {
        text.lines()
            .filter(|l| l.starts_with("http_requests_total{"))
            .find(|l| fragments.iter().all(|f| l.contains(f)))
    }

    #[test]
    fn counts_per_label_set() {
        let registry = MetricsRegistry::new().unwrap();
        registry.record(&observation("/health", 200, 3));
        registry.record(&observation("/health", 200, 4));
        registry.record(&observation("/health", 503, 2001));

        let text = registry.render();
        let ok = counter_line(&text, &["path=\"/health\"", "status=\"200\""]).unwrap();
        assert!(ok.ends_with(" 2"), "unexpected line: {ok}");
        let degraded = counter_line(&text, &["status=\"503\""]).unwrap();
        assert!(degraded.ends_with(" 1"), "unexpected line: {degraded}");
    }

    #[test]
    fn histogram_is_summable() {
        let registry = MetricsRegistry::new().unwrap();
        registry.record(&observation("/api/users", 201, 20));

        let text = registry.render();
        assert!(text.contains("http_request_duration_seconds_bucket{"));
        assert!(text.contains("http_request_duration_seconds_sum{"));
        assert!(text.contains("http_request_duration_seconds_count{"));
    }

    #[test]
    fn registries_are_isolated() {
        let first = MetricsRegistry::new().unwrap();
        let second = MetricsRegistry::new().unwrap();
        first.record(&observation("/health", 200, 1));

        assert!(counter_line(&first.render(), &["/health"]).is_some());
        assert!(counter_line(&second.render(), &["/health"]).is_none());
    }

    #[test]
    fn render_does_not_reset() {
        let registry = MetricsRegistry::new().unwrap();
        registry.record(&observation("/health", 200, 1));

        let first = registry.render();
        let second = registry.render();
        assert_eq!(
            counter_line(&first, &["/health"]),
            counter_line(&second, &["/health"])
        );
    }
}
