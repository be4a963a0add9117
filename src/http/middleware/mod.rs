//! Middleware chain.
//!
//! # Data Flow
//! ```text
//! request
//!     → request id (assign x-request-id)
//!     → logging.rs (start clock)
//!     → metrics.rs (start clock)
//!     → timeout (408 on expiry)
//!     → recovery.rs (panic guard)
//!     → handler
//!     ← response unwinds: status/latency recorded, one log line emitted
//! ```
//!
//! # Design Decisions
//! - Every stage calls the next exactly once; no retries
//! - The panic guard is innermost so the substituted 500 is what logging
//!   and metrics see
//! - Labels use the route template, never the raw URI

pub mod logging;
pub mod metrics;
pub mod recovery;

use axum::{body::Body, extract::MatchedPath, http::Request};

/// Route label for requests that matched no route.
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Route template of the matched route, or [`UNMATCHED_ROUTE`].
pub fn route_label(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string())
}
