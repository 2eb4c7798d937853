//! Metrics collection and exposition.
//!
//! # Metrics
//! - `console_proxy_requests_total` (counter): forwards by rule, status
//! - `console_proxy_duration_seconds` (histogram): forward latency by rule
//! - `console_navigations_total` (counter): navigations by outcome
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Serve Prometheus metrics on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_forward(rule: &str, status: u16, start: Instant) {
    metrics::counter!(
        "console_proxy_requests_total",
        "rule" => rule.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("console_proxy_duration_seconds", "rule" => rule.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_navigation(outcome: &'static str) {
    metrics::counter!("console_navigations_total", "outcome" => outcome).increment(1);
}
