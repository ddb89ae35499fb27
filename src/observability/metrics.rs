//! Metrics collection and exposition.
//!
//! # Metrics
//! - `onramp_provider_requests_total` (counter): outbound calls by endpoint, status
//! - `onramp_provider_request_duration_seconds` (histogram): outbound latency
//! - `onramp_flow_outcomes_total` (counter): flow results by flow, outcome
//!
//! Status `0` means no response was received.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one outbound provider call.
pub fn record_provider_request(endpoint: &str, status: u16, start: Instant) {
    let endpoint = endpoint.to_string();
    counter!(
        "onramp_provider_requests_total",
        "endpoint" => endpoint.clone(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("onramp_provider_request_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}

/// Record how a user-facing flow ended.
pub fn record_flow_outcome(flow: &'static str, outcome: &'static str) {
    counter!("onramp_flow_outcomes_total", "flow" => flow, "outcome" => outcome).increment(1);
}
