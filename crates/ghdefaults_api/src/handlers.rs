//! HTTP request handlers
//!
//! Handlers translate between HTTP and the reconciliation pipeline:
//! 1. Pull the body and GitHub headers out of the request
//! 2. Verify and decode the delivery
//! 3. Dispatch the event
//! 4. Map the outcome to a status code

use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap},
};
use ghdefaults_core::webhook::{DELIVERY_ID_HEADER, EVENT_TYPE_HEADER, SIGNATURE_HEADER};
use ghdefaults_core::{DispatchOutcome, WebhookDelivery};
use tracing::{debug, field::Empty, info, instrument, Span};

use crate::{errors::WebhookResponseError, AppState};

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;

/// Body returned for handled and ignored deliveries
pub const OK_BODY: &str = "ok";

/// Readiness probe. The service holds no connections, so it is ready once it listens.
pub async fn ready() -> &'static str {
    OK_BODY
}

/// Receives a GitHub webhook delivery.
///
/// - 400 `invalid payload` if the signature or payload is rejected
/// - 200 `ok` if the event was ignored or every targeted repository was reconciled
/// - 500 `internal server error` if any targeted repository failed
#[instrument(
    name = "webhook",
    skip_all,
    fields(delivery_id = Empty, event_type = Empty, action = Empty, owner = Empty, repo = Empty)
)]
pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<&'static str, WebhookResponseError> {
    let span = Span::current();
    if let Some(delivery_id) = header_value(&headers, DELIVERY_ID_HEADER) {
        span.record("delivery_id", delivery_id);
    }

    let delivery = WebhookDelivery {
        body: &body[..],
        signature: header_value(&headers, SIGNATURE_HEADER),
        event_type: header_value(&headers, EVENT_TYPE_HEADER),
        content_type: header_value(&headers, CONTENT_TYPE.as_str()),
    };

    let (event_type, event) = state.verifier.verify(&delivery)?;

    span.record("event_type", event_type.as_str());
    if let Some(action) = event.action() {
        span.record("action", action);
    }
    if let Some(owner) = event.owner() {
        span.record("owner", owner);
    }
    if let Some(repo) = event.repository() {
        span.record("repo", repo);
    }

    match state.dispatcher.dispatch(&event).await {
        DispatchOutcome::Ignored(reason) => {
            debug!(?reason, "Webhook ignored");
            Ok(OK_BODY)
        }
        DispatchOutcome::Succeeded { repositories } => {
            info!(repositories, "Webhook processed");
            Ok(OK_BODY)
        }
        DispatchOutcome::PartiallyFailed { attempted, failed } => {
            Err(WebhookResponseError::ReconcileFailed { attempted, failed })
        }
    }
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}
