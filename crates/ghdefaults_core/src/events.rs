//! Decoded webhook events.
//!
//! Only the fields needed to reconcile settings are kept. The wire structs are private;
//! the rest of the crate works with [`Event`].

use serde::Deserialize;

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;

/// Value of the `X-GitHub-Event` header for installation events.
pub const INSTALLATION_EVENT: &str = "installation";

/// Value of the `X-GitHub-Event` header for repository events.
pub const REPOSITORY_EVENT: &str = "repository";

/// A verified webhook event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Installation(InstallationEvent),
    Repository(RepositoryEvent),
    /// Any other event type. Carries the header value so it can be logged.
    Other { event_type: String },
}

impl Event {
    /// Decodes a JSON payload according to its `X-GitHub-Event` value.
    ///
    /// Event types other than `installation` and `repository` are not parsed at all
    /// and come back as [`Event::Other`].
    ///
    /// # Errors
    /// Returns the `serde_json` error when a handled event type has a payload that
    /// lacks a required field.
    pub fn decode(event_type: &str, payload: &[u8]) -> Result<Self, serde_json::Error> {
        match event_type {
            INSTALLATION_EVENT => {
                let wire: InstallationPayload = serde_json::from_slice(payload)?;
                Ok(Event::Installation(wire.into()))
            }
            REPOSITORY_EVENT => {
                let wire: RepositoryPayload = serde_json::from_slice(payload)?;
                Ok(Event::Repository(wire.into()))
            }
            other => Ok(Event::Other {
                event_type: other.to_string(),
            }),
        }
    }

    /// The `X-GitHub-Event` value this event was decoded from.
    pub fn event_type(&self) -> &str {
        match self {
            Event::Installation(_) => INSTALLATION_EVENT,
            Event::Repository(_) => REPOSITORY_EVENT,
            Event::Other { event_type } => event_type,
        }
    }

    /// The payload `action`, if the event type has one we decoded.
    pub fn action(&self) -> Option<&str> {
        match self {
            Event::Installation(e) => Some(&e.action),
            Event::Repository(e) => Some(&e.action),
            Event::Other { .. } => None,
        }
    }

    /// The account the event is about.
    pub fn owner(&self) -> Option<&str> {
        match self {
            Event::Installation(e) => Some(&e.account_login),
            Event::Repository(e) => Some(&e.owner_login),
            Event::Other { .. } => None,
        }
    }

    /// The repository name, for repository events.
    pub fn repository(&self) -> Option<&str> {
        match self {
            Event::Repository(e) => Some(&e.repo_name),
            _ => None,
        }
    }
}

/// The App was installed, uninstalled, suspended, etc.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallationEvent {
    pub action: String,
    pub installation_id: u64,
    /// Login of the account the App was installed on.
    pub account_login: String,
    /// Repositories the installation was granted. Empty when the payload omits them.
    pub repositories: Vec<InstallationRepository>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallationRepository {
    pub name: String,
    pub is_fork: bool,
}

/// A repository visible to the installation was created, transferred, etc.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryEvent {
    pub action: String,
    pub installation_id: u64,
    pub owner_login: String,
    pub repo_name: String,
    pub is_fork: bool,
}

#[derive(Debug, Deserialize)]
struct InstallationPayload {
    action: String,
    installation: InstallationWire,
    #[serde(default)]
    repositories: Option<Vec<InstallationRepositoryWire>>,
}

#[derive(Debug, Deserialize)]
struct InstallationWire {
    id: u64,
    account: AccountWire,
}

#[derive(Debug, Deserialize)]
struct AccountWire {
    login: String,
}

#[derive(Debug, Deserialize)]
struct InstallationRepositoryWire {
    name: String,
    // Installation payloads list repositories in a reduced form that may lack `fork`.
    #[serde(default)]
    fork: bool,
}

#[derive(Debug, Deserialize)]
struct RepositoryPayload {
    action: String,
    repository: RepositoryWire,
    installation: InstallationIdWire,
}

#[derive(Debug, Deserialize)]
struct RepositoryWire {
    name: String,
    #[serde(default)]
    fork: bool,
    owner: AccountWire,
}

#[derive(Debug, Deserialize)]
struct InstallationIdWire {
    id: u64,
}

impl From<InstallationPayload> for InstallationEvent {
    fn from(wire: InstallationPayload) -> Self {
        Self {
            action: wire.action,
            installation_id: wire.installation.id,
            account_login: wire.installation.account.login,
            repositories: wire
                .repositories
                .unwrap_or_default()
                .into_iter()
                .map(|r| InstallationRepository {
                    name: r.name,
                    is_fork: r.fork,
                })
                .collect(),
        }
    }
}

impl From<RepositoryPayload> for RepositoryEvent {
    fn from(wire: RepositoryPayload) -> Self {
        Self {
            action: wire.action,
            installation_id: wire.installation.id,
            owner_login: wire.repository.owner.login,
            repo_name: wire.repository.name,
            is_fork: wire.repository.fork,
        }
    }
}
