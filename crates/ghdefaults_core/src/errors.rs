//! Error types for the reconciliation pipeline.
//!
//! Each stage has its own error type so the HTTP layer can map them onto status codes
//! without looking at messages:
//!
//! - [`WebhookError`]: the delivery itself is bad (client side, 400)
//! - [`ReconcileError`]: applying settings failed (server side, 500), except
//!   [`ReconcileError::UnknownOwner`] which means "not ours, ignore"
//! - [`PolicyError`]: the owner policy could not be loaded at startup

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors produced while verifying and decoding a webhook delivery.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WebhookError {
    /// The signature header is missing, malformed, or does not match the body.
    #[error("Webhook signature is missing or does not match the payload")]
    InvalidSignature,

    /// The signature matched but the payload could not be decoded.
    #[error("Webhook payload is malformed: {0}")]
    MalformedPayload(String),
}

/// The API call that failed while reconciling a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStep {
    /// Building the installation-authenticated client
    CreateClient,
    /// `PATCH /repos/{owner}/{repo}`
    UpdateSettings,
    /// `PUT /repos/{owner}/{repo}/actions/permissions`
    DisableActions,
}

impl UpdateStep {
    /// Short name used in structured log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateStep::CreateClient => "create_client",
            UpdateStep::UpdateSettings => "update_settings",
            UpdateStep::DisableActions => "disable_actions",
        }
    }
}

impl fmt::Display for UpdateStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            UpdateStep::CreateClient => "create an API client",
            UpdateStep::UpdateSettings => "update repository settings",
            UpdateStep::DisableActions => "disable actions",
        };
        f.write_str(text)
    }
}

/// Errors produced while reconciling a single repository.
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// The owner has no entry in the policy table. Not a failure.
    #[error("Owner '{owner}' is not managed")]
    UnknownOwner { owner: String },

    /// No installation token could be minted.
    #[error("Failed to authenticate for {owner}/{repo} using installation {installation_id}")]
    AuthFailed {
        owner: String,
        repo: String,
        installation_id: u64,
        #[source]
        source: auth_handler::AuthError,
    },

    /// A settings API call failed.
    #[error("Failed to {step} for {owner}/{repo}")]
    ApiUpdateFailed {
        owner: String,
        repo: String,
        step: UpdateStep,
        #[source]
        source: github_client::Error,
    },
}

impl ReconcileError {
    /// Returns `true` for [`ReconcileError::UnknownOwner`], which callers treat as
    /// "ignore" rather than as a failure.
    pub fn is_unknown_owner(&self) -> bool {
        matches!(self, ReconcileError::UnknownOwner { .. })
    }

    /// The step that failed, for API failures.
    pub fn step(&self) -> Option<UpdateStep> {
        match self {
            ReconcileError::ApiUpdateFailed { step, .. } => Some(*step),
            _ => None,
        }
    }
}

/// Errors produced while loading an owner policy table.
#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("Failed to read policy file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse policy: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Policy for owner '{owner}' does not set any repository settings")]
    EmptySettings { owner: String },
}
