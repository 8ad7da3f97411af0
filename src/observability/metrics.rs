//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define gateway metrics (request counts, latency)
//! - Expose a Prometheus-compatible metrics endpoint
//! - Track per-(operation, outcome) series
//!
//! # Metrics
//! - `gateway_requests_total` (counter): invocations by operation, outcome
//! - `gateway_request_duration_seconds` (histogram): latency distribution
//!   by operation, outcome
//!
//! # Design Decisions
//! - Labels carry only the logical operation name and the binary outcome,
//!   keeping cardinality bounded by the route table
//! - Histogram buckets tuned for gateway-to-backend round trips
//! - Registration is idempotent: the metrics macros create a series on first
//!   use and reuse it afterwards

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};

use crate::observability::Outcome;

/// Counter of completed invocations, labelled by operation and outcome.
pub const REQUESTS_TOTAL: &str = "gateway_requests_total";

/// Latency histogram, labelled by operation and outcome.
pub const REQUEST_DURATION_SECONDS: &str = "gateway_request_duration_seconds";

/// Bucket boundaries for [`REQUEST_DURATION_SECONDS`], in seconds.
const DURATION_BUCKETS: &[f64] = &[
    0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Install the Prometheus exporter and start its scrape listener.
///
/// Must run inside a Tokio runtime. Failure to install is logged and the
/// gateway keeps serving without exposition; recording macros become no-ops.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr).set_buckets_for_metric(
        Matcher::Full(REQUEST_DURATION_SECONDS.to_string()),
        DURATION_BUCKETS,
    );

    match builder {
        Ok(builder) => match builder.install() {
            Ok(()) => {
                tracing::info!(address = %addr, "metrics exporter listening");
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install metrics exporter");
            }
        },
        Err(err) => {
            tracing::error!(error = %err, "invalid histogram bucket configuration");
        }
    }
}

/// Record the completion of one operation invocation.
///
/// Increments the request counter and observes `elapsed` in the latency
/// histogram, both keyed by `(operation, outcome)`. Called exactly once per
/// invocation by [`crate::observability::OperationSpan`].
pub fn record_operation(operation: &'static str, outcome: Outcome, elapsed: Duration) {
    metrics::counter!(
        REQUESTS_TOTAL,
        "operation" => operation,
        "outcome" => outcome.as_str()
    )
    .increment(1);

    metrics::histogram!(
        REQUEST_DURATION_SECONDS,
        "operation" => operation,
        "outcome" => outcome.as_str()
    )
    .record(elapsed.as_secs_f64());
}
