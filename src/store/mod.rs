//! Storage gateway.
//!
//! # Data Flow
//! ```text
//! startup: DATABASE_URL
//!     → postgres::connect (lazy pool → bounded ping → schema)
//!     → Option<Arc<dyn UserStore>> (None = degraded mode)
//!
//! per request:
//!     handler → UserStore::{ping_within, list_users, create_user}
//!
//! shutdown:
//!     lifecycle → UserStore::close (exactly once)
//! ```
//!
//! # Design Decisions
//! - Handlers depend on the `UserStore` contract, not on the driver
//! - Every store interaction is bounded by a timeout
//! - Absence of a store is a valid state, modelled as `Option`

pub mod postgres;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use postgres::{connect, PgStore};

/// A persisted user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Errors raised by the storage gateway.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store unreachable or address malformed.
    #[error("connection error: {0}")]
    Connection(#[source] sqlx::Error),

    /// Idempotent schema creation failed.
    #[error("schema error: {0}")]
    Schema(#[source] sqlx::Error),

    /// Runtime read/write failure.
    #[error("query error: {0}")]
    Query(#[source] sqlx::Error),

    /// A bounded operation did not finish in time.
    #[error("{operation} timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Contract every backing store implements.
///
/// Implementations are shared across concurrent requests and must do their
/// own synchronization (a connection pool, typically).
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Liveness probe.
    async fn ping(&self) -> StoreResult<()>;

    /// All users ordered by ascending id.
    async fn list_users(&self) -> StoreResult<Vec<User>>;

    /// Insert a user and return it with its storage-assigned id.
    async fn create_user(&self, name: &str, email: &str) -> StoreResult<User>;

    /// Release the underlying resources. Calling it twice is harmless.
    async fn close(&self);

    /// `ping` bounded by `timeout`; expiry is reported as a failure.
    async fn ping_within(&self, timeout: Duration) -> StoreResult<()> {
        bounded("ping", timeout, self.ping()).await
    }
}

/// Run `fut` with a deadline, mapping expiry to [`StoreError::Timeout`].
pub async fn bounded<T, F>(operation: &'static str, timeout: Duration, fut: F) -> StoreResult<T>
where
    F: Future<Output = StoreResult<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout { operation, timeout }),
    }
}
