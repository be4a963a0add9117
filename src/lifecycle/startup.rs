//! Startup orchestration.
//!
//! # Responsibilities
//! - Connect the store (degraded mode on failure)
//! - Build the metrics registry
//!
//! # Design Decisions
//! - Store failures never abort startup; they are logged and the service
//!   runs without persistence
//! - Metrics registry construction errors are fatal

use std::sync::Arc;

use metrics_exporter_prometheus::BuildError;

use crate::config::ServiceConfig;
use crate::observability::MetricsRegistry;
use crate::store::{self, UserStore};

/// Shared resources produced by startup and consumed by the server.
pub struct Startup {
    pub store: Option<Arc<dyn UserStore>>,
    pub metrics: Arc<MetricsRegistry>,
}

/// Initialize subsystems in dependency order.
pub async fn initialize(config: &ServiceConfig) -> Result<Startup, BuildError> {
    let metrics = Arc::new(MetricsRegistry::new()?);

    let store: Option<Arc<dyn UserStore>> = match store::connect(&config.database).await {
        Ok(Some(pg)) => Some(Arc::new(pg)),
        Ok(None) => {
            tracing::warn!("No database configured; running in degraded mode");
            None
        }
        Err(e) => {
            tracing::error!(error = %e, "Database connect failed; running in degraded mode");
            None
        }
    };

    Ok(Startup { store, metrics })
}
