//! Shared helpers for the HTTP tests.

use std::net::SocketAddr;
use std::sync::OnceLock;
use std::time::Duration;

use auth_handler::AppCredentials;
use axum::{body::Body, http::Request};
use ghdefaults_core::webhook::compute_signature;
use ghdefaults_core::OwnerPolicy;
use http_body_util::BodyExt;
use rand::thread_rng;
use rsa::{pkcs8::EncodePrivateKey, RsaPrivateKey};
use secrecy::SecretString;

use crate::{AppState, ServiceSettings};

pub(crate) const TEST_SECRET: &str = "It's a Secret to Everybody";
pub(crate) const TEST_APP_ID: u64 = 62448;

/// A throwaway App key, generated once per test binary.
pub(crate) fn test_pem() -> String {
    static PEM: OnceLock<String> = OnceLock::new();
    PEM.get_or_init(|| {
        let mut rng = thread_rng();
        let private_key = RsaPrivateKey::new(&mut rng, 2048).expect("Failed to generate key");
        private_key
            .to_pkcs8_pem(Default::default())
            .unwrap()
            .to_string()
    })
    .clone()
}

pub(crate) fn settings_for(api_url: &str) -> ServiceSettings {
    ServiceSettings {
        listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        credentials: AppCredentials::new(TEST_APP_ID, SecretString::from(test_pem())),
        webhook_secret: SecretString::from(TEST_SECRET.to_string()),
        github_api_url: Some(api_url.to_string()),
        policy: OwnerPolicy::builtin(),
        request_timeout: Duration::from_secs(30),
    }
}

pub(crate) fn state_for(api_url: &str) -> AppState {
    AppState::from_settings(settings_for(api_url))
}

/// A `POST /webhook` request signed with [`TEST_SECRET`].
pub(crate) fn signed_delivery(event_type: &str, body: &serde_json::Value) -> Request<Body> {
    let bytes = serde_json::to_vec(body).unwrap();
    let signature = compute_signature(&bytes, TEST_SECRET.as_bytes()).unwrap();

    Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "application/json")
        .header("x-github-event", event_type)
        .header("x-github-delivery", "72d3162e-cc78-11e3-81ab-4c9367dc0958")
        .header("x-hub-signature-256", signature)
        .body(Body::from(bytes))
        .unwrap()
}

pub(crate) async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
