//! # ghdefaults core
//!
//! The webhook-to-reconciliation pipeline of ghdefaults: a GitHub App that applies
//! a fixed set of repository settings to repositories as soon as the App can see
//! them.
//!
//! ## Pipeline
//!
//! 1. [`WebhookVerifier`] checks the delivery signature and decodes the payload into
//!    an [`Event`].
//! 2. [`EventDispatcher`] decides whether the event warrants action and, for
//!    installation events, fans out over every repository in the payload.
//! 3. [`SettingsReconciler`] looks the owner up in the [`OwnerPolicy`], mints an
//!    installation token and pushes the settings document to GitHub. Forks also get
//!    GitHub Actions disabled.
//!
//! Nothing is persisted. Every decision is made from the delivery alone.

pub mod dispatcher;
pub mod errors;
pub mod events;
pub mod policy;
pub mod reconciler;
pub mod webhook;

pub use dispatcher::{DispatchOutcome, EventDispatcher, IgnoreReason};
pub use errors::{PolicyError, ReconcileError, UpdateStep, WebhookError};
pub use events::{Event, InstallationEvent, InstallationRepository, RepositoryEvent};
pub use policy::OwnerPolicy;
pub use reconciler::SettingsReconciler;
pub use webhook::{EventDecoder, JsonEventDecoder, WebhookDelivery, WebhookVerifier};

#[cfg(test)]
mod test_support;
