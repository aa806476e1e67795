//! Request tracing middleware
//!
//! Every request gets a UUID that is attached to a tracing span, so all logs produced
//! while handling it carry the id, and is echoed back in the `x-request-id` header.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use ghdefaults_core::webhook::DELIVERY_ID_HEADER;
use tracing::Instrument;

#[cfg(test)]
#[path = "middleware_tests.rs"]
mod tests;

/// Response header carrying the generated request id
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Request tracing middleware.
///
/// Adds request ID and logging context for observability.
pub async fn tracing_middleware(request: Request, next: Next) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();
    let delivery_id = request
        .headers()
        .get(DELIVERY_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let span = tracing::info_span!("request", request_id = %request_id);

    async move {
        tracing::info!(
            method = %request.method(),
            uri = %request.uri(),
            delivery_id = %delivery_id,
            "Request started"
        );

        let mut response = next.run(request).await;

        tracing::info!(status = %response.status(), "Request completed");

        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        response
    }
    .instrument(span)
    .await
}
