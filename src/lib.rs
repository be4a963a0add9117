//! Users service library.
//!
//! # Architecture Overview
//!
//! ```text
//!   request ──▶ middleware chain ──▶ handler ──▶ storage gateway ──▶ PostgreSQL
//!               (id, log, metrics,    (health,     (optional;
//!                timeout, recovery)    users)       degraded when absent)
//!
//!   lifecycle: startup → serve on a task → await SIGINT/SIGTERM
//!              → bounded drain → close store → stopped
//! ```

pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod store;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::{Lifecycle, Shutdown};
