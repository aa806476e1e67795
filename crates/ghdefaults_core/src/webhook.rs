//! Webhook delivery verification.
//!
//! GitHub signs every delivery with the App's webhook secret and sends the result in
//! the `X-Hub-Signature-256` header as `sha256=<hex HMAC-SHA256 of the body>`. The
//! signature is always checked against the raw body bytes, before anything is
//! decoded.

use std::borrow::Cow;

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use tracing::{debug, warn};

use crate::errors::WebhookError;
use crate::events::Event;

#[cfg(test)]
#[path = "webhook_tests.rs"]
mod tests;

/// Header carrying the HMAC-SHA256 signature of the body.
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

/// Header carrying the event type, e.g. `installation`.
pub const EVENT_TYPE_HEADER: &str = "x-github-event";

/// Header carrying the unique delivery id.
pub const DELIVERY_ID_HEADER: &str = "x-github-delivery";

const SIGNATURE_PREFIX: &str = "sha256=";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const FORM_PAYLOAD_FIELD: &str = "payload";

type HmacSha256 = Hmac<Sha256>;

/// A raw webhook delivery: the body exactly as received plus the relevant headers.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebhookDelivery<'a> {
    pub body: &'a [u8],
    /// Value of `X-Hub-Signature-256`
    pub signature: Option<&'a str>,
    /// Value of `X-GitHub-Event`
    pub event_type: Option<&'a str>,
    /// Value of `Content-Type`
    pub content_type: Option<&'a str>,
}

/// Turns a verified payload into an [`Event`].
pub trait EventDecoder: Send + Sync {
    /// # Errors
    /// Returns [`WebhookError::MalformedPayload`] when the payload cannot be decoded.
    fn decode(&self, event_type: &str, payload: &[u8]) -> Result<Event, WebhookError>;
}

/// Decodes GitHub's JSON payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEventDecoder;

impl EventDecoder for JsonEventDecoder {
    fn decode(&self, event_type: &str, payload: &[u8]) -> Result<Event, WebhookError> {
        Event::decode(event_type, payload).map_err(|e| WebhookError::MalformedPayload(e.to_string()))
    }
}

/// Authenticates webhook deliveries with the shared webhook secret.
#[derive(Debug)]
pub struct WebhookVerifier<D = JsonEventDecoder> {
    secret: SecretString,
    decoder: D,
}

impl WebhookVerifier {
    /// Creates a verifier that decodes GitHub's JSON payloads.
    pub fn new(secret: SecretString) -> Self {
        Self::with_decoder(secret, JsonEventDecoder)
    }
}

impl<D: EventDecoder> WebhookVerifier<D> {
    pub fn with_decoder(secret: SecretString, decoder: D) -> Self {
        Self { secret, decoder }
    }

    /// Verifies the signature of `delivery` and decodes its payload.
    ///
    /// Returns the event type header value alongside the decoded event. Payloads
    /// posted as `application/x-www-form-urlencoded` have their JSON taken from the
    /// `payload` form field; the signature still covers the raw form body.
    ///
    /// # Errors
    ///
    /// * [`WebhookError::InvalidSignature`] if the signature header is missing, is not
    ///   in `sha256=<hex>` form, or does not match. The payload is not looked at.
    /// * [`WebhookError::MalformedPayload`] if the event type header is missing or the
    ///   payload cannot be decoded.
    pub fn verify(&self, delivery: &WebhookDelivery<'_>) -> Result<(String, Event), WebhookError> {
        let Some(signature) = delivery.signature else {
            warn!("Webhook delivery has no signature header");
            return Err(WebhookError::InvalidSignature);
        };

        verify_signature(
            delivery.body,
            signature,
            self.secret.expose_secret().as_bytes(),
        )?;

        let event_type = delivery
            .event_type
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| WebhookError::MalformedPayload("missing event type header".to_string()))?;

        let payload = extract_payload(delivery.body, delivery.content_type)?;
        let event = self.decoder.decode(event_type, &payload)?;

        debug!(event_type, "Webhook delivery verified");
        Ok((event_type.to_string(), event))
    }
}

/// Computes the `X-Hub-Signature-256` header value for `body`.
///
/// # Errors
/// Returns [`WebhookError::InvalidSignature`] if `secret` cannot key the MAC.
pub fn compute_signature(body: &[u8], secret: &[u8]) -> Result<String, WebhookError> {
    let mut mac = HmacSha256::new_from_slice(secret).map_err(|_| WebhookError::InvalidSignature)?;
    mac.update(body);
    Ok(format!(
        "{SIGNATURE_PREFIX}{}",
        hex::encode(mac.finalize().into_bytes())
    ))
}

/// Checks a `sha256=<hex>` signature header against `body`.
///
/// The comparison is constant time.
///
/// # Errors
/// Returns [`WebhookError::InvalidSignature`] for any mismatch or malformed header.
pub fn verify_signature(body: &[u8], signature_header: &str, secret: &[u8]) -> Result<(), WebhookError> {
    let Some(hex_part) = signature_header.strip_prefix(SIGNATURE_PREFIX) else {
        warn!("Webhook signature header has an unsupported scheme");
        return Err(WebhookError::InvalidSignature);
    };

    let Ok(received) = hex::decode(hex_part) else {
        warn!("Webhook signature is not valid hex");
        return Err(WebhookError::InvalidSignature);
    };

    let mut mac = HmacSha256::new_from_slice(secret).map_err(|_| WebhookError::InvalidSignature)?;
    mac.update(body);

    mac.verify_slice(&received).map_err(|_| {
        warn!("Webhook signature does not match payload");
        WebhookError::InvalidSignature
    })
}

fn extract_payload<'a>(body: &'a [u8], content_type: Option<&str>) -> Result<Cow<'a, [u8]>, WebhookError> {
    if !is_form_content_type(content_type) {
        return Ok(Cow::Borrowed(body));
    }

    url::form_urlencoded::parse(body)
        .find(|(key, _)| key == FORM_PAYLOAD_FIELD)
        .map(|(_, value)| Cow::Owned(value.into_owned().into_bytes()))
        .ok_or_else(|| WebhookError::MalformedPayload("form body has no payload field".to_string()))
}

fn is_form_content_type(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|value| value.split(';').next())
        .map(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
        .unwrap_or(false)
}
