//! GitHub App installation token types.
//!
//! An installation access token is what GitHub hands out in exchange for an App
//! JWT. It is scoped to one installation and expires after about an hour.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::Deserialize;

#[cfg(test)]
#[path = "installation_tests.rs"]
mod tests;

/// An access token for a single GitHub App installation.
///
/// The token value is kept in a [`SecretString`] so it is redacted from `Debug`
/// output and never ends up in logs by accident.
#[derive(Debug)]
pub struct InstallationAccessToken {
    /// The bearer token
    pub token: SecretString,
    /// When GitHub will stop accepting the token
    pub expires_at: Option<DateTime<Utc>>,
}

/// Wire format of `POST /app/installations/{id}/access_tokens`.
///
/// Only the fields ghdefaults needs are read; permissions and the repository
/// list are ignored.
#[derive(Deserialize)]
pub(crate) struct AccessTokenResponse {
    pub(crate) token: String,
    #[serde(default)]
    pub(crate) expires_at: Option<DateTime<Utc>>,
}

impl From<AccessTokenResponse> for InstallationAccessToken {
    fn from(value: AccessTokenResponse) -> Self {
        Self {
            token: SecretString::from(value.token),
            expires_at: value.expires_at,
        }
    }
}
