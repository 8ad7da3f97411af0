//! Payment Platform REST Gateway Library

pub mod backend;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod pipeline;

pub use config::GatewayConfig;
pub use http::{ApiError, AppState, HttpServer};
pub use observability::Outcome;
