//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, graceful shutdown)
//!     → middleware/ (request id, logging, metrics, timeout, recovery)
//!     → health::health | users.rs | metrics scrape
//!     → response.rs (error mapping)
//!     → Send to client
//! ```

pub mod middleware;
pub mod response;
pub mod server;
pub mod users;

pub use response::ApiError;
pub use server::{build_router, with_middleware, AppState, HttpServer};

/// Header carrying the per-request correlation id.
pub const X_REQUEST_ID: &str = "x-request-id";
