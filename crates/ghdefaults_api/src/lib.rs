//! ghdefaults HTTP service
//!
//! Receives GitHub App webhook deliveries and hands them to the reconciliation
//! pipeline in `ghdefaults_core`.
//!
//! # Architecture
//!
//! This crate is the HTTP layer and handles:
//! - Configuration and startup
//! - Routing, request tracing and timeouts
//! - Mapping pipeline results onto status codes
//!
//! Business logic never depends on this crate.

use std::sync::Arc;

use auth_handler::GitHubAppTokenBroker;
use ghdefaults_core::{EventDispatcher, SettingsReconciler, WebhookVerifier};
use github_client::InstallationClientFactory;

pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;

pub use config::{Config, ConfigError, LogFormat, ServiceSettings};
pub use errors::WebhookResponseError;
pub use server::{ApiConfig, ApiServer};

/// Default port when neither `HTTP_ADDR` nor `PORT` is set
pub const DEFAULT_PORT: u16 = 8080;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<WebhookVerifier>,
    pub dispatcher: Arc<EventDispatcher>,
}

impl AppState {
    pub fn new(verifier: WebhookVerifier, dispatcher: EventDispatcher) -> Self {
        Self {
            verifier: Arc::new(verifier),
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// Wires the production pipeline: the App token broker and installation clients
    /// talking to `settings.github_api_url`.
    pub fn from_settings(settings: ServiceSettings) -> Self {
        let ServiceSettings {
            credentials,
            webhook_secret,
            github_api_url,
            policy,
            ..
        } = settings;

        let broker = GitHubAppTokenBroker::new(credentials, github_api_url.clone());
        let clients = InstallationClientFactory::new(github_api_url);
        let reconciler =
            SettingsReconciler::new(Arc::new(policy), Arc::new(broker), Arc::new(clients));

        Self::new(
            WebhookVerifier::new(webhook_secret),
            EventDispatcher::new(reconciler),
        )
    }
}

#[cfg(test)]
mod test_support;
