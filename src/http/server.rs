//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, timeout, logging, metrics, recovery)
//! - Bind server to listener
//! - Stop accepting and drain on the shutdown signal

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderName, StatusCode},
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};

use crate::config::ServiceConfig;
use crate::health;
use crate::http::middleware::{logging::log_request, metrics::track_metrics, recovery};
use crate::http::response::ErrorBody;
use crate::http::users;
use crate::http::X_REQUEST_ID;
use crate::observability::MetricsRegistry;
use crate::store::UserStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// `None` in degraded mode.
    pub store: Option<Arc<dyn UserStore>>,
    pub metrics: Arc<MetricsRegistry>,
    pub health_timeout: Duration,
}

/// HTTP server for the users service.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &ServiceConfig, state: AppState) -> Self {
        Self {
            router: build_router(config, state),
        }
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    ///
    /// The listener stops accepting as soon as the signal arrives. Bounding
    /// the drain is the caller's job.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all routes and middleware layers.
pub fn build_router(config: &ServiceConfig, state: AppState) -> Router {
    let mut routes = Router::new()
        .route("/health", get(health::health))
        .route("/api/users", get(users::list_users).post(users::create_user));

    if config.observability.metrics_enabled {
        routes = routes.route("/metrics", get(scrape_metrics));
    }

    let routes = routes.fallback(not_found).with_state(state.clone());

    with_middleware(routes, state.metrics, config.timeouts.request())
}

/// Wrap `routes` in the full middleware chain.
///
/// Exposed separately so additional routes get the same treatment.
#[allow(deprecated)]
pub fn with_middleware(routes: Router, metrics: Arc<MetricsRegistry>, request_timeout: Duration) -> Router {
    let request_id = HeaderName::from_static(X_REQUEST_ID);

    // Last layer added runs first. The timeout sits under logging and
    // metrics so an expired request is still observed (as 408).
    routes
        .layer(recovery::layer())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::from_fn_with_state(metrics, track_metrics))
        .layer(middleware::from_fn(log_request))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
}

/// `GET /metrics`
async fn scrape_metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: "not found".to_string(),
        }),
    )
}
