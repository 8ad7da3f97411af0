//! HTTP surface of the gateway.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, identity claim)
//!     → cards.rs / withdraws.rs / topups.rs (per-operation handlers)
//!         → params.rs (typed extraction, fail fast)
//!         → pipeline::dispatch (span + metrics around the backend call)
//!         → response.rs (typed payload) | error.rs (typed error body)
//!     → JSON response
//! ```

pub mod cards;
pub mod error;
pub mod params;
pub mod request;
pub mod response;
pub mod server;
pub mod topups;
pub mod withdraws;

pub use error::ApiError;
pub use request::{RequestIdLayer, UserClaim, X_REQUEST_ID};
pub use server::{build_router, AppState, HttpServer};
