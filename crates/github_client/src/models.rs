//! # Models
//!
//! Data returned by the GitHub API that the rest of ghdefaults looks at.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;

/// Represents a GitHub repository after a settings update.
///
/// Only a handful of fields are kept: enough to log what GitHub reports back
/// after a PATCH.
///
/// # Examples
///
/// ```rust
/// use github_client::models::Repository;
///
/// let repo = Repository::new("my-repo".to_string(), "owner/my-repo".to_string());
///
/// assert_eq!(repo.name(), "my-repo");
/// assert_eq!(repo.full_name(), "owner/my-repo");
/// assert_eq!(repo.is_archived(), None);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Repository {
    /// The full name of the repository (owner/name)
    full_name: String,
    /// The name of the repository
    name: String,
    /// Whether the repository is archived, if GitHub reported it
    #[serde(default)]
    archived: Option<bool>,
}

impl Repository {
    /// Creates a new Repository instance.
    pub fn new(name: String, full_name: String) -> Self {
        Self {
            full_name,
            name,
            archived: None,
        }
    }

    /// Returns the name of the repository (without owner).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the full name of the repository (`owner/name`).
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Returns whether the repository is archived.
    ///
    /// `None` when the response did not include the field.
    pub fn is_archived(&self) -> Option<bool> {
        self.archived
    }
}

impl From<octocrab::models::Repository> for Repository {
    fn from(value: octocrab::models::Repository) -> Self {
        Self {
            name: value.name.clone(),
            full_name: value.full_name.unwrap_or(value.name),
            archived: value.archived,
        }
    }
}
