//! Server lifecycle manager.
//!
//! # Responsibilities
//! - Drive `Starting → Running → ShuttingDown → Stopped`
//! - Serve on a spawned task while the caller's path waits for termination
//! - Bound the drain, then release the store exactly once
//!
//! # Design Decisions
//! - The serving task and the waiting path share one `Shutdown` broadcast
//! - Shutdown problems are logged, never escalated
//! - An abandoned drain aborts the serving task instead of hanging

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use metrics_exporter_prometheus::BuildError;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinError;
use tokio::time::Instant;

use crate::config::ServiceConfig;
use crate::http::{AppState, HttpServer};
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::startup::{self, Startup};
use crate::lifecycle::state::{ServerState, StateTracker};
use crate::observability::MetricsRegistry;

/// Errors that prevent the service from starting at all.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("failed to build metrics registry: {0}")]
    Metrics(#[from] BuildError),
}

/// Owns the server state and coordinates startup and shutdown.
pub struct Lifecycle {
    config: ServiceConfig,
    state: StateTracker,
    shutdown: Shutdown,
}

impl Lifecycle {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            config,
            state: StateTracker::new(),
            shutdown: Shutdown::new(),
        }
    }

    /// Observe state transitions.
    pub fn state(&self) -> watch::Receiver<ServerState> {
        self.state.subscribe()
    }

    /// Connect the store, then serve until `signal` resolves.
    pub async fn run<S>(self, listener: TcpListener, signal: S) -> Result<(), LifecycleError>
    where
        S: Future<Output = ()> + Send,
    {
        let startup = startup::initialize(&self.config).await?;
        self.serve(listener, startup, signal).await;
        Ok(())
    }

    /// Serve with already-initialized resources until `signal` resolves.
    pub async fn serve<S>(self, listener: TcpListener, startup: Startup, signal: S)
    where
        S: Future<Output = ()> + Send,
    {
        let Startup { store, metrics } = startup;
        let grace = self.config.timeouts.shutdown_grace();

        let state = AppState {
            store: store.clone(),
            metrics: metrics.clone(),
            health_timeout: self.config.timeouts.health_check(),
        };
        let server = HttpServer::new(&self.config, state);

        let upkeep = tokio::spawn(metrics_upkeep(
            metrics,
            Duration::from_secs(self.config.observability.metrics_upkeep_secs),
            self.shutdown.subscribe(),
        ));
        let mut server_task = tokio::spawn(server.run(listener, self.shutdown.subscribe()));
        self.state.advance(ServerState::Running);

        let mut server_finished = false;
        tokio::select! {
            _ = signal => {}
            result = &mut server_task => {
                server_finished = true;
                tracing::error!("HTTP server exited before shutdown was requested");
                log_server_exit(result);
            }
        }

        self.state.advance(ServerState::ShuttingDown);
        self.shutdown.trigger();
        // One deadline covers both the drain and the store release.
        let deadline = Instant::now() + grace;

        if !server_finished {
            match tokio::time::timeout_at(deadline, &mut server_task).await {
                Ok(result) => log_server_exit(result),
                Err(_) => {
                    tracing::warn!(
                        grace_secs = grace.as_secs(),
                        "Shutdown deadline exceeded; abandoning in-flight requests"
                    );
                    server_task.abort();
                }
            }
        }

        if let Err(e) = upkeep.await {
            tracing::error!(error = %e, "Metrics upkeep task failed");
        }

        if let Some(store) = store {
            if tokio::time::timeout_at(deadline, store.close()).await.is_err() {
                tracing::warn!("Store did not close within the shutdown deadline");
            }
        }

        self.state.advance(ServerState::Stopped);
    }
}

fn log_server_exit(result: Result<Result<(), std::io::Error>, JoinError>) {
    match result {
        Ok(Ok(())) => tracing::info!("HTTP server drained"),
        Ok(Err(e)) => tracing::error!(error = %e, "HTTP server error"),
        Err(e) => tracing::error!(error = %e, "HTTP server task failed"),
    }
}

async fn metrics_upkeep(metrics: Arc<MetricsRegistry>, every: Duration, mut shutdown: broadcast::Receiver<()>) {
    let mut ticker = tokio::time::interval(every);
    loop {
        tokio::select! {
            _ = ticker.tick() => metrics.run_upkeep(),
            _ = shutdown.recv() => break,
        }
    }
}
