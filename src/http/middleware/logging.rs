//! Request logging middleware.

use std::time::Instant;

use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::http::middleware::route_label;
use crate::http::X_REQUEST_ID;

/// Emits one structured record per request once the response is known.
pub async fn log_request(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let route = route_label(&request);
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let response = next.run(request).await;

    let status = response.status();
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

    if status.is_server_error() {
        tracing::warn!(
            request_id = %request_id,
            method = %method,
            route = %route,
            uri = %uri,
            status = status.as_u16(),
            latency_ms,
            "request"
        );
    } else {
        tracing::info!(
            request_id = %request_id,
            method = %method,
            route = %route,
            uri = %uri,
            status = status.as_u16(),
            latency_ms,
            "request"
        );
    }

    response
}
