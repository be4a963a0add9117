//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Connect store (degrade on failure) → Build metrics registry
//!
//! Manager (manager.rs):
//!     Spawn server task → Running → await termination
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → resolve the termination future
//!
//! Shutdown (shutdown.rs):
//!     Broadcast → Stop accepting → Drain (bounded) → Close store → Stopped
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then store and metrics, then listener
//! - Ordered shutdown: stop accept, drain, close
//! - Shutdown has timeout: in-flight requests abandoned after deadline

pub mod manager;
pub mod shutdown;
pub mod signals;
pub mod startup;
pub mod state;

pub use manager::{Lifecycle, LifecycleError};
pub use shutdown::Shutdown;
pub use startup::Startup;
pub use state::{ServerState, StateTracker};
