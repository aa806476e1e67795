//! GitHub App token broker implementation
//!
//! Provides the concrete implementation of `InstallationTokenBroker` that talks to the
//! GitHub API.

use crate::{AuthError, AuthResult, InstallationToken, InstallationTokenBroker};
use async_trait::async_trait;
use github_client::{create_app_client, GitHubClient};
use secrecy::{ExposeSecret, SecretString};
use tracing::{error, info, instrument};

#[cfg(test)]
#[path = "github_auth_service_tests.rs"]
mod tests;

/// The identity of the GitHub App.
///
/// Loaded once at startup. The private key is held as a secret and redacted from
/// `Debug` output.
pub struct AppCredentials {
    app_id: u64,
    private_key: SecretString,
}

impl AppCredentials {
    /// Create credentials from an App ID and a PEM encoded private key
    pub fn new(app_id: u64, private_key: SecretString) -> Self {
        Self {
            app_id,
            private_key,
        }
    }

    /// The App ID
    pub fn app_id(&self) -> u64 {
        self.app_id
    }
}

impl std::fmt::Debug for AppCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppCredentials")
            .field("app_id", &self.app_id)
            .field("private_key", &"<REDACTED>")
            .finish()
    }
}

/// GitHub App token broker
///
/// Mints installation tokens in two steps: build a client that authenticates as the
/// App with a signed JWT, then exchange that for a token scoped to the installation.
///
/// # Examples
///
/// ```rust,no_run
/// use auth_handler::{AppCredentials, GitHubAppTokenBroker, InstallationTokenBroker};
/// use secrecy::SecretString;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let private_key = std::fs::read_to_string("app-key.pem")?;
/// let credentials = AppCredentials::new(62448, SecretString::from(private_key));
///
/// let broker = GitHubAppTokenBroker::new(credentials, None);
///
/// let token = broker.mint(1234).await?;
/// println!("Token expires at {:?}", token.expires_at());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct GitHubAppTokenBroker {
    credentials: AppCredentials,
    base_uri: Option<String>,
}

impl GitHubAppTokenBroker {
    /// Create a new broker
    ///
    /// # Parameters
    /// - `credentials`: GitHub App ID and private key
    /// - `base_uri`: GitHub API base URI, `None` for `https://api.github.com`
    pub fn new(credentials: AppCredentials, base_uri: Option<String>) -> Self {
        Self {
            credentials,
            base_uri,
        }
    }
}

#[async_trait]
impl InstallationTokenBroker for GitHubAppTokenBroker {
    #[instrument(skip(self), fields(app_id = self.credentials.app_id))]
    async fn mint(&self, installation_id: u64) -> AuthResult<InstallationToken> {
        let app_client = create_app_client(
            self.credentials.app_id,
            self.credentials.private_key.expose_secret(),
            self.base_uri.as_deref(),
        )
        .await
        .map_err(|e| {
            error!(
                installation_id,
                error = %e,
                "Could not authenticate as the GitHub App"
            );
            AuthError::AuthConfigInvalid(e)
        })?;

        let client = GitHubClient::new(app_client);

        let access_token = client
            .create_installation_token(installation_id)
            .await
            .map_err(|e| {
                error!(
                    installation_id,
                    error = %e,
                    "Failed to mint installation token"
                );
                AuthError::TokenRequestFailed {
                    installation_id,
                    source: e,
                }
            })?;

        info!(installation_id, "Minted installation token");

        Ok(InstallationToken::new(
            installation_id,
            access_token.token,
            access_token.expires_at,
        ))
    }
}
