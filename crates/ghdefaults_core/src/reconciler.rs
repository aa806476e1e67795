//! Applies an owner's settings document to one repository.

use std::sync::Arc;

use auth_handler::InstallationTokenBroker;
use github_client::RepositoryClientFactory;
use tracing::{debug, info, instrument};

use crate::errors::{ReconcileError, UpdateStep};
use crate::policy::OwnerPolicy;

#[cfg(test)]
#[path = "reconciler_tests.rs"]
mod tests;

/// Brings a single repository in line with its owner's policy.
///
/// Every reconciliation mints a fresh installation token; nothing is cached between
/// calls. Updates are forward only: when disabling Actions on a fork fails, the
/// settings that were already applied stay applied and the error is still returned.
pub struct SettingsReconciler {
    policy: Arc<OwnerPolicy>,
    broker: Arc<dyn InstallationTokenBroker>,
    clients: Arc<dyn RepositoryClientFactory>,
}

impl SettingsReconciler {
    pub fn new(
        policy: Arc<OwnerPolicy>,
        broker: Arc<dyn InstallationTokenBroker>,
        clients: Arc<dyn RepositoryClientFactory>,
    ) -> Self {
        Self {
            policy,
            broker,
            clients,
        }
    }

    pub fn policy(&self) -> &OwnerPolicy {
        &self.policy
    }

    /// Applies the policy for `owner` to `owner/repo`.
    ///
    /// # Errors
    ///
    /// * [`ReconcileError::UnknownOwner`] if `owner` is not in the policy. No call is
    ///   made to GitHub.
    /// * [`ReconcileError::AuthFailed`] if no installation token could be minted.
    /// * [`ReconcileError::ApiUpdateFailed`] if a settings call failed. `step` tells
    ///   which one.
    #[instrument(skip(self, is_fork), fields(fork = is_fork))]
    pub async fn reconcile(
        &self,
        installation_id: u64,
        owner: &str,
        repo: &str,
        is_fork: bool,
    ) -> Result<(), ReconcileError> {
        let Some(settings) = self.policy.settings_for(owner) else {
            debug!("Owner is not managed");
            return Err(ReconcileError::UnknownOwner {
                owner: owner.to_string(),
            });
        };

        let token = self.broker.mint(installation_id).await.map_err(|source| {
            ReconcileError::AuthFailed {
                owner: owner.to_string(),
                repo: repo.to_string(),
                installation_id,
                source,
            }
        })?;

        let api_failure = |step: UpdateStep| {
            move |source: github_client::Error| ReconcileError::ApiUpdateFailed {
                owner: owner.to_string(),
                repo: repo.to_string(),
                step,
                source,
            }
        };

        let client = self
            .clients
            .client_for_token(token.secret())
            .map_err(api_failure(UpdateStep::CreateClient))?;

        let updated = client
            .update_repository_settings(owner, repo, settings)
            .await
            .map_err(api_failure(UpdateStep::UpdateSettings))?;
        info!(
            full_name = updated.full_name(),
            archived = ?updated.is_archived(),
            "Repository settings applied"
        );

        if is_fork {
            client
                .disable_actions(owner, repo)
                .await
                .map_err(api_failure(UpdateStep::DisableActions))?;
            info!("Actions disabled for fork");
        }

        Ok(())
    }
}
