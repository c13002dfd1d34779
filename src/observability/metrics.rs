//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, status, outcome
//! - `gateway_request_duration_seconds` (histogram): time to response head
//! - `gateway_signature_denials_total` (counter): rejected tokens by reason
//! - `gateway_upstream_calls_total` (counter): link/fetch calls by result
//!
//! # Design Decisions
//! - Without an installed recorder every call is a no-op
//! - Labels stay low-cardinality: no paths, no tokens

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, outcome: &'static str, start: Instant) {
    counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    histogram!("gateway_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_denial(reason: &'static str) {
    counter!("gateway_signature_denials_total", "reason" => reason).increment(1);
}

/// `call` is `link` or `fetch`.
pub fn record_upstream_call(call: &'static str, result: &'static str) {
    counter!("gateway_upstream_calls_total", "call" => call, "result" => result).increment(1);
}
