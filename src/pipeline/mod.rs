//! Instrumented request-dispatch pipeline.
//!
//! # Data Flow
//! ```text
//! handler
//!     → dispatch(operation, work)
//!         open span + timer
//!         → work: extract params → invoke backend → map response
//!         record metric + close span (same outcome, exactly once)
//!     → Result<payload, ApiError> → HTTP response
//! ```
//!
//! # Design Decisions
//! - One generic function instead of per-endpoint copies of the open/record/
//!   close choreography; handlers only supply the operation name and the work
//! - The recorder/tracer handles are reached through the span guard, not
//!   through per-handler globals
//! - Extraction runs inside the dispatched work, so a fast-fail on a bad
//!   parameter is still observed as an error outcome for that operation

use std::future::Future;

use tracing::Instrument;

use crate::http::error::ApiError;
use crate::observability::{OperationSpan, Outcome};

/// Run one operation invocation under full instrumentation.
///
/// Opens a span named after `operation`, awaits `work` inside it, then closes
/// the span and records the `(operation, outcome)` metric exactly once with a
/// single shared outcome. Success is logged at debug level; failure at error
/// level with the failure detail attached to the span.
///
/// If the returned future is dropped before completion (client disconnect,
/// timeout layer), the span guard closes the invocation as an error.
pub async fn dispatch<T, F>(operation: &'static str, work: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    let span = OperationSpan::open(operation);
    let result = work.instrument(span.handle()).await;

    match result {
        Ok(value) => {
            span.add_event("operation completed");
            span.finish(Outcome::Success, "ok");
            Ok(value)
        }
        Err(err) => {
            span.record_error(&err);
            let reason = err.to_string();
            span.finish(Outcome::Error, &reason);
            Err(err)
        }
    }
}
