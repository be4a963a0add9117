//! Request metrics middleware.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::http::middleware::route_label;
use crate::observability::{MetricsRegistry, Observation};

/// Records one counter increment and one latency observation per request,
/// keyed by the final status code.
pub async fn track_metrics(
    State(registry): State<Arc<MetricsRegistry>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = route_label(&request);

    let response = next.run(request).await;

    registry.record(&Observation {
        method,
        route,
        status: response.status().as_u16(),
        latency: start.elapsed(),
    });

    response
}
