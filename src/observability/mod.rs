//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Every dispatched operation produces:
//!     → span.rs (one tracing span per invocation, closed exactly once)
//!     → metrics.rs (one counter increment + one latency observation)
//!
//! Consumers:
//!     → Log aggregation (stdout via tracing-subscriber)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Span close and metric record share one completion path (RAII guard)
//! - Outcome is binary; the same value feeds both the span and the metric
//! - Metric updates are atomic increments, no locking in handlers

pub mod metrics;
pub mod span;

pub use span::OperationSpan;

/// Final classification of one operation invocation.
///
/// The same value must reach both the span close and the metric record of a
/// given invocation; [`OperationSpan`] enforces this by doing both itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Error,
}

impl Outcome {
    /// Stable label value for metrics and span fields.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}
