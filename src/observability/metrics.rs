//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): requests by method, route, status
//! - `relay_request_duration_seconds` (histogram): time to response head
//! - `relay_upstream_errors_total` (counter): upstream transport failures
//! - `relay_rewritten_chunks_total` (counter): chunks modified, by body kind
//! - `relay_accounts` (gauge): accounts held in the credential store
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed, so library code and
//!   tests never need to initialise anything

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    describe_counter!("relay_requests_total", "Total number of requests handled");
    describe_histogram!(
        "relay_request_duration_seconds",
        "Time from request arrival to response head in seconds"
    );
    describe_counter!(
        "relay_upstream_errors_total",
        "Upstream requests that failed at the transport level"
    );
    describe_counter!(
        "relay_rewritten_chunks_total",
        "Response chunks modified by the rewriter"
    );
    describe_gauge!("relay_accounts", "Accounts in the credential store");

    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record a handled request.
pub fn record_request(method: &str, route: &'static str, status: u16, start: Instant) {
    counter!(
        "relay_requests_total",
        "method" => method.to_string(),
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("relay_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_upstream_error() {
    counter!("relay_upstream_errors_total").increment(1);
}

pub fn record_rewrite(kind: &'static str) {
    counter!("relay_rewritten_chunks_total", "kind" => kind).increment(1);
}

pub fn record_account_count(count: usize) {
    gauge!("relay_accounts").set(count as f64);
}
