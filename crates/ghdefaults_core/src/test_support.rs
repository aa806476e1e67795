//! In-memory GitHub used by the reconciler and dispatcher tests.
//!
//! One [`MockGitHub`] plays the token broker, the client factory and the repository
//! client. It records every call and keeps the applied settings per repository so
//! tests can assert on the resulting remote state.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use auth_handler::{AuthError, AuthResult, InstallationToken, InstallationTokenBroker};
use github_client::{models, Error, RepositoryClient, RepositoryClientFactory, RepositorySettingsUpdate};
use secrecy::SecretString;
use serde_json::{Map, Value};

use crate::{OwnerPolicy, SettingsReconciler};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Mint(u64),
    UpdateSettings {
        owner: String,
        repo: String,
        settings: RepositorySettingsUpdate,
    },
    DisableActions {
        owner: String,
        repo: String,
    },
}

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    repositories: HashMap<String, Map<String, Value>>,
    actions_disabled: HashSet<String>,
    fail_mint: bool,
    fail_update: HashSet<String>,
    fail_disable_actions: HashSet<String>,
}

#[derive(Clone, Default)]
pub(crate) struct MockGitHub {
    state: Arc<Mutex<State>>,
}

impl MockGitHub {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fail_mint(&self) {
        self.state.lock().unwrap().fail_mint = true;
    }

    /// Makes the settings PATCH for `owner/repo` fail.
    pub(crate) fn fail_update(&self, full_name: &str) {
        self.state
            .lock()
            .unwrap()
            .fail_update
            .insert(full_name.to_string());
    }

    pub(crate) fn fail_disable_actions(&self, full_name: &str) {
        self.state
            .lock()
            .unwrap()
            .fail_disable_actions
            .insert(full_name.to_string());
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub(crate) fn mint_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Mint(_)))
            .count()
    }

    pub(crate) fn settings_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::Mint(_)))
            .collect()
    }

    /// The settings applied so far to `owner/repo`, as the API would report them.
    pub(crate) fn repository_state(&self, full_name: &str) -> Option<Map<String, Value>> {
        self.state
            .lock()
            .unwrap()
            .repositories
            .get(full_name)
            .cloned()
    }

    pub(crate) fn actions_disabled(&self, full_name: &str) -> bool {
        self.state
            .lock()
            .unwrap()
            .actions_disabled
            .contains(full_name)
    }

    pub(crate) fn reconciler(&self, policy: OwnerPolicy) -> SettingsReconciler {
        SettingsReconciler::new(
            Arc::new(policy),
            Arc::new(self.clone()),
            Arc::new(self.clone()),
        )
    }
}

fn api_error() -> Error {
    Error::ApiError()
}

#[async_trait]
impl InstallationTokenBroker for MockGitHub {
    async fn mint(&self, installation_id: u64) -> AuthResult<InstallationToken> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Mint(installation_id));
        if state.fail_mint {
            return Err(AuthError::TokenRequestFailed {
                installation_id,
                source: api_error(),
            });
        }

        Ok(InstallationToken::new(
            installation_id,
            SecretString::from(format!("ghs_{installation_id}")),
            None,
        ))
    }
}

impl RepositoryClientFactory for MockGitHub {
    fn client_for_token(&self, _token: &SecretString) -> Result<Box<dyn RepositoryClient>, Error> {
        Ok(Box::new(self.clone()))
    }
}

#[async_trait]
impl RepositoryClient for MockGitHub {
    async fn update_repository_settings(
        &self,
        owner: &str,
        repo: &str,
        settings: &RepositorySettingsUpdate,
    ) -> Result<models::Repository, Error> {
        let full_name = format!("{owner}/{repo}");
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::UpdateSettings {
            owner: owner.to_string(),
            repo: repo.to_string(),
            settings: settings.clone(),
        });
        if state.fail_update.contains(&full_name) {
            return Err(api_error());
        }

        let patch = serde_json::to_value(settings).unwrap();
        let current = state.repositories.entry(full_name.clone()).or_default();
        for (key, value) in patch.as_object().unwrap() {
            current.insert(key.clone(), value.clone());
        }

        let repository = serde_json::json!({
            "name": repo,
            "full_name": full_name,
            "archived": current.get("archived"),
        });
        Ok(serde_json::from_value(repository).unwrap())
    }

    async fn disable_actions(&self, owner: &str, repo: &str) -> Result<(), Error> {
        let full_name = format!("{owner}/{repo}");
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::DisableActions {
            owner: owner.to_string(),
            repo: repo.to_string(),
        });
        if state.fail_disable_actions.contains(&full_name) {
            return Err(api_error());
        }

        state.actions_disabled.insert(full_name);
        Ok(())
    }
}
