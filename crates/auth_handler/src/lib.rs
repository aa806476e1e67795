//! Installation token broker for ghdefaults
//!
//! This crate turns the GitHub App identity (App ID + private key) into short-lived
//! access tokens scoped to one App installation.
//!
//! ## Architecture
//!
//! The reconciliation logic depends on the [`InstallationTokenBroker`] trait only:
//! - [`GitHubAppTokenBroker`] implements it against the GitHub API
//! - tests substitute their own implementation
//!
//! Every call to [`InstallationTokenBroker::mint`] produces a new token. Nothing is
//! cached; a caching broker (short TTL keyed by installation ID, one in-flight mint
//! per installation) can be layered on by implementing the same trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::SecretString;

mod github_auth_service;

pub use github_auth_service::{AppCredentials, GitHubAppTokenBroker};

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Result type for authentication operations
pub type AuthResult<T> = std::result::Result<T, AuthError>;

/// Errors that can occur while minting an installation token
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The App credentials are unusable, e.g. the private key does not parse.
    #[error("GitHub App credentials are invalid: {0}")]
    AuthConfigInvalid(#[source] github_client::Error),

    /// GitHub did not hand out a token for the installation.
    #[error("Failed to request an access token for installation {installation_id}")]
    TokenRequestFailed {
        installation_id: u64,
        #[source]
        source: github_client::Error,
    },
}

/// A short-lived bearer credential scoped to a single App installation.
#[derive(Debug)]
pub struct InstallationToken {
    installation_id: u64,
    token: SecretString,
    expires_at: Option<DateTime<Utc>>,
}

impl InstallationToken {
    /// Creates a token for `installation_id`.
    pub fn new(
        installation_id: u64,
        token: SecretString,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            installation_id,
            token,
            expires_at,
        }
    }

    /// The installation this token is scoped to.
    pub fn installation_id(&self) -> u64 {
        self.installation_id
    }

    /// The bearer token. Use `ExposeSecret` to read it; never log it.
    pub fn secret(&self) -> &SecretString {
        &self.token
    }

    /// When GitHub will stop accepting the token, if known.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }
}

/// Installation token service interface
///
/// Produces access tokens that let API calls act with the permissions of one App
/// installation.
#[async_trait]
pub trait InstallationTokenBroker: Send + Sync {
    /// Mint a fresh access token for an installation
    ///
    /// # Parameters
    /// - `installation_id`: Installation ID taken from the webhook payload
    ///
    /// # Errors
    /// Returns `AuthError::AuthConfigInvalid` if the App credentials cannot be used,
    /// `AuthError::TokenRequestFailed` if GitHub refuses or cannot be reached. No
    /// retry is attempted.
    async fn mint(&self, installation_id: u64) -> AuthResult<InstallationToken>;
}
