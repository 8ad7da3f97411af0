//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Load config → Validate → Init tracing + metrics → Bind → Serve
//!
//! Shutdown (signals.rs):
//!     SIGTERM/SIGINT → axum graceful shutdown → drain → exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Shutdown stops accepting, then drains in-flight requests

pub mod signals;

pub use signals::shutdown_signal;
