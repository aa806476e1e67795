//! Owner policy table.
//!
//! Maps an owner login to the repository settings that ghdefaults enforces for it. An
//! owner without an entry is not managed and none of its repositories are touched.
//!
//! The table is either the built-in one or loaded once from a TOML file with one table
//! per owner:
//!
//! ```toml
//! [seankhliao]
//! allow_merge_commit = false
//! delete_branch_on_merge = true
//! ```

use std::collections::HashMap;
use std::path::Path;

use github_client::RepositorySettingsUpdate;
use tracing::info;

use crate::errors::PolicyError;

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;

/// Immutable mapping from owner login to the settings document enforced for it.
///
/// Owner lookups are exact and case sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnerPolicy {
    owners: HashMap<String, RepositorySettingsUpdate>,
}

impl OwnerPolicy {
    pub fn new(owners: HashMap<String, RepositorySettingsUpdate>) -> Self {
        Self { owners }
    }

    /// The policy ghdefaults ships with: `seankhliao` and `erred`.
    ///
    /// Both owners get squash-only merging with auto-merge, update-branch and
    /// branch deletion on merge, and every optional feature (issues, wiki, pages,
    /// projects, downloads, discussions) turned off. Repositories under `erred` are
    /// also archived.
    pub fn builtin() -> Self {
        let base = RepositorySettingsUpdate {
            allow_merge_commit: Some(false),
            allow_squash_merge: Some(true),
            allow_rebase_merge: Some(false),
            allow_auto_merge: Some(true),
            allow_update_branch: Some(true),
            delete_branch_on_merge: Some(true),
            has_issues: Some(false),
            has_wiki: Some(false),
            has_pages: Some(false),
            has_projects: Some(false),
            has_downloads: Some(false),
            has_discussions: Some(false),
            is_template: Some(false),
            ..Default::default()
        };

        let erred = RepositorySettingsUpdate {
            archived: Some(true),
            ..base.clone()
        };

        let mut owners = HashMap::new();
        owners.insert("seankhliao".to_string(), base);
        owners.insert("erred".to_string(), erred);
        Self { owners }
    }

    /// Parses a policy table from TOML.
    ///
    /// # Errors
    /// Returns [`PolicyError::Parse`] for invalid TOML or unknown setting names and
    /// [`PolicyError::EmptySettings`] for an owner table that sets nothing.
    pub fn from_toml_str(content: &str) -> Result<Self, PolicyError> {
        let owners: HashMap<String, RepositorySettingsUpdate> = toml::from_str(content)?;

        if let Some(owner) = owners
            .iter()
            .find_map(|(owner, settings)| settings.is_empty().then_some(owner))
        {
            return Err(PolicyError::EmptySettings {
                owner: owner.clone(),
            });
        }

        Ok(Self { owners })
    }

    /// Reads and parses a policy file.
    ///
    /// # Errors
    /// Returns [`PolicyError::Read`] if the file cannot be read, otherwise the errors of
    /// [`OwnerPolicy::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self, PolicyError> {
        let content = std::fs::read_to_string(path).map_err(|source| PolicyError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let policy = Self::from_toml_str(&content)?;
        info!(path = ?path, owners = policy.len(), "Loaded owner policy");
        Ok(policy)
    }

    /// The settings document for `owner`, or `None` if the owner is not managed.
    pub fn settings_for(&self, owner: &str) -> Option<&RepositorySettingsUpdate> {
        self.owners.get(owner)
    }

    pub fn is_managed(&self, owner: &str) -> bool {
        self.owners.contains_key(owner)
    }

    /// Managed owner logins, sorted.
    pub fn owners(&self) -> Vec<&str> {
        let mut owners: Vec<&str> = self.owners.keys().map(String::as_str).collect();
        owners.sort_unstable();
        owners
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}
