//! Error types for GitHub client operations.
//!
//! This module defines the error types that can occur when talking to the GitHub API
//! through the github_client crate. The variants are deliberately coarse: detailed
//! information about a failed call (GitHub's message, status code) is logged where the
//! call fails and is not carried upwards, so nothing sensitive can leak into responses.

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur during GitHub client operations.
///
/// ## Examples
///
/// ```rust,ignore
/// use github_client::Error;
///
/// match client.update_repository_settings("owner", "repo", &settings).await {
///     Ok(repo) => println!("Updated {}", repo.name()),
///     Err(Error::NotFound) => eprintln!("Repository is gone"),
///     Err(err) => eprintln!("Other error: {}", err),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A generic API request failure.
    ///
    /// GitHub answered with an error status that has no more specific variant, or
    /// the request never reached GitHub (transport failure).
    #[error("API request failed")]
    ApiError(),

    /// Authentication or GitHub client initialization failure.
    ///
    /// This error occurs when:
    /// - The GitHub App private key cannot be parsed
    /// - The API base URI is invalid
    /// - The underlying HTTP client cannot be built
    ///
    /// The contained string provides details about the failure. It never contains
    /// key material.
    #[error("Failed to authenticate or initialize GitHub client: {0}")]
    AuthError(String),

    /// Failed to create an access token for an App installation.
    ///
    /// Common causes:
    /// - The App was uninstalled or the installation suspended
    /// - The App JWT was rejected (wrong App ID or key, clock skew)
    ///
    /// Parameter: installation_id
    #[error("Failed to create an access token for installation with ID: {0}")]
    FailedToCreateAccessToken(u64),

    /// The GitHub API returned a response in an unexpected format.
    #[error("Invalid response format")]
    InvalidResponse,

    /// The requested resource was not found.
    ///
    /// GitHub answers 404 both for missing resources and for resources the
    /// current token cannot see.
    #[error("Resource not found")]
    NotFound,

    /// GitHub API rate limit has been exceeded.
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}
