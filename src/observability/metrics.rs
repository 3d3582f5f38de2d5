//! Metrics collection and exposition.
//!
//! # Metrics
//! - `flow_trace_requests_total` (counter): traces by outcome
//! - `flow_trace_duration_seconds` (histogram): wall-clock time per trace
//! - `flow_trace_paths_total` (counter): paths returned
//! - `flow_provider_requests_total` (counter): explorer calls by chain, outcome
//! - `flow_provider_request_duration_seconds` (histogram): explorer latency

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus scrape endpoint. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished trace request.
pub fn record_trace(outcome: &'static str, paths: usize, start: Instant) {
    metrics::counter!("flow_trace_requests_total", "outcome" => outcome).increment(1);
    metrics::counter!("flow_trace_paths_total").increment(paths as u64);
    metrics::histogram!("flow_trace_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record one explorer HTTP attempt.
pub fn record_provider_request(chain_id: u64, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "flow_provider_requests_total",
        "chain_id" => chain_id.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("flow_provider_request_duration_seconds")
        .record(start.elapsed().as_secs_f64());
}
