//! Per-invocation span guard.
//!
//! # Responsibilities
//! - Open one tracing span per operation invocation
//! - Carry the invocation timer from open to close
//! - Close the span exactly once, with a binary outcome and a reason
//! - Record the metric observation on the same completion path as the close
//!
//! # Design Decisions
//! - RAII: dropping an unfinished guard closes the span as an error, so a
//!   cancelled or panicked handler still produces exactly one close and one
//!   metric record
//! - The guard owns both side effects; callers cannot produce a span close
//!   and a metric record that disagree on the outcome

use std::time::Instant;

use tracing::field::Empty;
use tracing::Span;

use crate::observability::metrics::record_operation;
use crate::observability::Outcome;

/// Guard for one in-flight operation invocation.
///
/// Created by [`OperationSpan::open`], consumed by [`OperationSpan::finish`].
/// If the guard is dropped without `finish` (early return, cancellation), the
/// invocation is closed as an error with reason `"abandoned"`.
pub struct OperationSpan {
    span: Span,
    operation: &'static str,
    started: Instant,
    finished: bool,
}

impl OperationSpan {
    /// Open a span for `operation` and start the invocation timer.
    pub fn open(operation: &'static str) -> Self {
        let span = tracing::info_span!(
            "gateway_operation",
            operation = operation,
            outcome = Empty,
            reason = Empty,
        );
        Self {
            span,
            operation,
            started: Instant::now(),
            finished: false,
        }
    }

    /// Handle to the underlying tracing span, for instrumenting the work
    /// future so events emitted inside it attach here.
    pub fn handle(&self) -> Span {
        self.span.clone()
    }

    /// Attach a debug-level event to the span.
    pub fn add_event(&self, message: &str) {
        tracing::debug!(parent: &self.span, operation = self.operation, "{message}");
    }

    /// Attach an error-level event carrying the full failure detail.
    pub fn record_error(&self, err: &dyn std::fmt::Display) {
        tracing::error!(
            parent: &self.span,
            operation = self.operation,
            error = %err,
            "operation failed"
        );
    }

    /// Close the span with `outcome` and record the metric observation.
    ///
    /// Consumes the guard; this is the only way to close with a success
    /// outcome, and it can happen at most once.
    pub fn finish(mut self, outcome: Outcome, reason: &str) {
        self.span.record("outcome", outcome.as_str());
        self.span.record("reason", reason);
        record_operation(self.operation, outcome, self.started.elapsed());
        self.finished = true;
    }
}

impl Drop for OperationSpan {
    fn drop(&mut self) {
        if !self.finished {
            self.span.record("outcome", Outcome::Error.as_str());
            self.span.record("reason", "abandoned");
            record_operation(self.operation, Outcome::Error, self.started.elapsed());
        }
    }
}
