//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): inbound requests by route, status
//! - `relay_request_duration_seconds` (histogram): inbound latency by route
//! - `relay_upstream_calls_total` (counter): upstream calls by upstream, outcome
//! - `relay_upstream_duration_seconds` (histogram): upstream latency
//!
//! # Design Decisions
//! - Recording is always on; without an installed recorder it is a no-op
//! - The Prometheus exporter is only installed when enabled in config

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one inbound request.
pub fn record_request(route: String, status: u16, start: Instant) {
    metrics::counter!(
        "relay_requests_total",
        "route" => route.clone(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("relay_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

/// Record one upstream call.
pub fn record_upstream(upstream: &'static str, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "relay_upstream_calls_total",
        "upstream" => upstream,
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("relay_upstream_duration_seconds", "upstream" => upstream)
        .record(start.elapsed().as_secs_f64());
}
