//! service-core: Shared infrastructure for the product API.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
pub mod shutdown;

pub use axum;
pub use mongodb;
pub use tower_http;
pub use tracing;
