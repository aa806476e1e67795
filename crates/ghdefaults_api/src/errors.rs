//! Error handling and HTTP error conversion
//!
//! Pipeline errors are mapped onto status codes at the HTTP boundary. Response bodies
//! are fixed strings; details only go to the log.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ghdefaults_core::WebhookError;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Body returned for deliveries that fail verification
pub const INVALID_PAYLOAD_BODY: &str = "invalid payload";

/// Body returned when reconciliation failed
pub const INTERNAL_ERROR_BODY: &str = "internal server error";

/// Errors a webhook delivery can end in
#[derive(Error, Debug)]
pub enum WebhookResponseError {
    /// Signature or payload rejected (400)
    #[error("Invalid webhook delivery: {0}")]
    InvalidPayload(#[from] WebhookError),

    /// At least one repository could not be reconciled (500)
    #[error("{failed} of {attempted} repositories failed to reconcile")]
    ReconcileFailed { attempted: usize, failed: usize },
}

impl WebhookResponseError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookResponseError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            WebhookResponseError::ReconcileFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> &'static str {
        match self {
            WebhookResponseError::InvalidPayload(_) => INVALID_PAYLOAD_BODY,
            WebhookResponseError::ReconcileFailed { .. } => INTERNAL_ERROR_BODY,
        }
    }
}

impl IntoResponse for WebhookResponseError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            WebhookResponseError::InvalidPayload(_) => {
                tracing::warn!(status = status.as_u16(), error = %self, "Rejected webhook delivery");
            }
            WebhookResponseError::ReconcileFailed { attempted, failed } => {
                tracing::error!(
                    status = status.as_u16(),
                    attempted,
                    failed,
                    "Webhook delivery failed"
                );
            }
        }

        (status, self.body()).into_response()
    }
}
