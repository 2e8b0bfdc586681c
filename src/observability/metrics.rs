//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by operation, gateway status
//! - `gateway_request_duration_seconds` (histogram): latency by operation
//! - `gateway_upstream_failures_total` (counter): failed upstream calls by kind
//!
//! Without an installed recorder every call is a no-op, so tests and
//! metrics-disabled deployments pay nothing.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::routing::Operation;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one handled request.
pub fn record_request(operation: Operation, status: u16, start: Instant) {
    metrics::counter!(
        "gateway_requests_total",
        "operation" => operation.name(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("gateway_request_duration_seconds", "operation" => operation.name())
        .record(start.elapsed().as_secs_f64());
}

/// Record an upstream call that produced no response.
pub fn record_upstream_failure(operation: Operation, kind: &'static str) {
    metrics::counter!(
        "gateway_upstream_failures_total",
        "operation" => operation.name(),
        "kind" => kind
    )
    .increment(1);
}
