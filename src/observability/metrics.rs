//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define gateway metrics (requests, latency, upstream failures, links)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `giftperch_requests_total` (counter): requests by route, status
//! - `giftperch_request_duration_seconds` (histogram): latency by route
//! - `giftperch_downstream_failures_total` (counter): failed upstream calls by service
//! - `giftperch_affiliate_links_total` (counter): rewritten links by path
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed, so tests need no setup
//! - Labels are low-cardinality static strings

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(route: &str, status: u16, start: Instant) {
    metrics::counter!(
        "giftperch_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("giftperch_request_duration_seconds", "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_downstream_failure(service: &'static str) {
    metrics::counter!("giftperch_downstream_failures_total", "service" => service).increment(1);
}

pub fn record_affiliate_link(path: &'static str) {
    metrics::counter!("giftperch_affiliate_links_total", "path" => path).increment(1);
}
