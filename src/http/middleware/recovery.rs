//! Panic recovery.
//!
//! Converts a panicking handler into a 500 response and an error-level log
//! record. The guard sits directly around the handlers, underneath logging
//! and metrics, so both of those observe the substituted 500.

use std::any::Any;

use axum::response::Response;
use tower_http::catch_panic::CatchPanicLayer;

use crate::http::response::internal_error;

type PanicHandler = fn(Box<dyn Any + Send + 'static>) -> Response;

/// Layer installing the recovery guard.
pub fn layer() -> CatchPanicLayer<PanicHandler> {
    CatchPanicLayer::custom(recover as PanicHandler)
}

fn recover(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic_message(payload.as_ref());
    tracing::error!(panic = %message, "Handler panicked; responding with 500");
    internal_error()
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic payload"
    }
}
