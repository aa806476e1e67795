//! Routes verified events to the reconciler.

use futures_util::future::join_all;
use tracing::{debug, error, info, instrument};

use crate::errors::ReconcileError;
use crate::events::{Event, InstallationEvent, RepositoryEvent};
use crate::reconciler::SettingsReconciler;

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;

/// Why an event did not lead to any reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The event type is not one ghdefaults acts on.
    UnhandledEventType,
    /// The event type is handled but this action is not.
    UnhandledAction,
    /// The owner is not in the policy table.
    UnknownOwner,
}

/// The result of dispatching one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Ignored(IgnoreReason),
    /// Every targeted repository was reconciled.
    Succeeded { repositories: usize },
    /// At least one targeted repository failed. All of them were attempted.
    PartiallyFailed { attempted: usize, failed: usize },
}

impl DispatchOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, DispatchOutcome::PartiallyFailed { .. })
    }
}

/// Decides which repositories an event targets and reconciles them.
///
/// | Event          | Action                      | Result                                |
/// |----------------|-----------------------------|---------------------------------------|
/// | `installation` | `created`                   | every listed repository, concurrently |
/// | `repository`   | `created`, `transferred`    | that repository                       |
/// | anything else  |                             | ignored                               |
pub struct EventDispatcher {
    reconciler: SettingsReconciler,
}

impl EventDispatcher {
    pub fn new(reconciler: SettingsReconciler) -> Self {
        Self { reconciler }
    }

    #[instrument(skip(self, event), fields(event_type = event.event_type(), action = event.action()))]
    pub async fn dispatch(&self, event: &Event) -> DispatchOutcome {
        match event {
            Event::Installation(installation) => self.installation(installation).await,
            Event::Repository(repository) => self.repository(repository).await,
            Event::Other { event_type } => {
                debug!(%event_type, "Ignoring unhandled event type");
                DispatchOutcome::Ignored(IgnoreReason::UnhandledEventType)
            }
        }
    }

    async fn installation(&self, event: &InstallationEvent) -> DispatchOutcome {
        if event.action != "created" {
            debug!(action = %event.action, "Ignoring installation action");
            return DispatchOutcome::Ignored(IgnoreReason::UnhandledAction);
        }

        let owner = event.account_login.as_str();
        if !self.reconciler.policy().is_managed(owner) {
            debug!(owner, "Ignoring installation for unmanaged owner");
            return DispatchOutcome::Ignored(IgnoreReason::UnknownOwner);
        }

        info!(
            owner,
            installation_id = event.installation_id,
            repositories = event.repositories.len(),
            "Reconciling repositories of new installation"
        );

        let attempts = event.repositories.iter().map(|repository| {
            self.reconcile_logged(
                event.installation_id,
                owner,
                &repository.name,
                repository.is_fork,
                &event.action,
            )
        });
        let results = join_all(attempts).await;

        aggregate(results)
    }

    async fn repository(&self, event: &RepositoryEvent) -> DispatchOutcome {
        if !matches!(event.action.as_str(), "created" | "transferred") {
            debug!(action = %event.action, "Ignoring repository action");
            return DispatchOutcome::Ignored(IgnoreReason::UnhandledAction);
        }

        if !self.reconciler.policy().is_managed(&event.owner_login) {
            debug!(owner = %event.owner_login, "Ignoring repository of unmanaged owner");
            return DispatchOutcome::Ignored(IgnoreReason::UnknownOwner);
        }

        let result = self
            .reconcile_logged(
                event.installation_id,
                &event.owner_login,
                &event.repo_name,
                event.is_fork,
                &event.action,
            )
            .await;

        aggregate(vec![result])
    }

    async fn reconcile_logged(
        &self,
        installation_id: u64,
        owner: &str,
        repo: &str,
        is_fork: bool,
        action: &str,
    ) -> Result<(), ReconcileError> {
        let result = self
            .reconciler
            .reconcile(installation_id, owner, repo, is_fork)
            .await;

        if let Err(e) = &result {
            if e.is_unknown_owner() {
                debug!(owner, repo, "Skipped repository of unmanaged owner");
            } else {
                error!(
                    owner,
                    repo,
                    installation_id,
                    action,
                    step = e.step().map(|s| s.as_str()),
                    error = %e,
                    cause = ?std::error::Error::source(e).map(|s| s.to_string()),
                    "Failed to reconcile repository"
                );
            }
        }

        result
    }
}

/// Folds per-repository results into an outcome. Unknown-owner results count as
/// neither attempted nor failed.
fn aggregate(results: Vec<Result<(), ReconcileError>>) -> DispatchOutcome {
    let mut attempted = 0;
    let mut failed = 0;

    for result in &results {
        match result {
            Ok(()) => attempted += 1,
            Err(e) if e.is_unknown_owner() => {}
            Err(_) => {
                attempted += 1;
                failed += 1;
            }
        }
    }

    if failed > 0 {
        DispatchOutcome::PartiallyFailed { attempted, failed }
    } else if attempted == 0 && !results.is_empty() {
        DispatchOutcome::Ignored(IgnoreReason::UnknownOwner)
    } else {
        DispatchOutcome::Succeeded {
            repositories: attempted,
        }
    }
}
