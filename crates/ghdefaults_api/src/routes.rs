//! HTTP routing configuration
//!
//! # Route Structure
//!
//! - POST   /webhook  - GitHub App webhook deliveries
//! - GET    /-/ready  - Readiness probe

use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

use crate::{handlers, middleware as api_middleware, AppState};

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;

/// GitHub caps webhook payloads at 25 MB.
pub const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Create the service router.
///
/// This function sets up:
/// - The webhook and readiness routes
/// - A request body limit
/// - Request ids and request tracing
/// - A per-request deadline. Dropping the handler on timeout also cancels its
///   outstanding GitHub calls.
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    // Headers are not included: the signature header would end up in the logs.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new())
        .on_response(DefaultOnResponse::new());

    Router::new()
        .route("/webhook", post(handlers::receive_webhook))
        .route("/-/ready", get(handlers::ready))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(middleware::from_fn(api_middleware::tracing_middleware))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(trace_layer)
        .with_state(state)
}
