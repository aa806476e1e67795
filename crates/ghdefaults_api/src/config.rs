//! Service configuration.
//!
//! Every setting can be given as a command line flag or an environment variable.
//! The GitHub App ID, private key and webhook secret are *value sources*:
//!
//! - `file:<path>` (or `file://<path>`) reads the value from a file
//! - `data:<value>` uses the rest of the string as the value
//! - anything else is used as is
//!
//! [`Config::into_settings`] resolves and validates everything once, at startup.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use auth_handler::AppCredentials;
use clap::{Parser, ValueEnum};
use ghdefaults_core::{OwnerPolicy, PolicyError};
use secrecy::SecretString;
use thiserror::Error;

use crate::DEFAULT_PORT;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

const FILE_SCHEME: &str = "file:";
const DATA_SCHEME: &str = "data:";

/// Output format of the log subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// ghdefaults: applies default repository settings from GitHub App webhooks
#[derive(Parser, Clone)]
#[command(name = "ghdefaults", version)]
#[command(about = "Applies default repository settings from GitHub App webhooks", long_about = None)]
pub struct Config {
    /// Address to listen on, e.g. `0.0.0.0:8080` or `:8080`
    #[arg(long, env = "HTTP_ADDR")]
    pub http_addr: Option<String>,

    /// Port to listen on when no address is given
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// GitHub App ID (value source)
    #[arg(long, env = "GH_APP_ID")]
    pub gh_app_id: String,

    /// PEM encoded GitHub App private key (value source)
    #[arg(long, env = "GH_APP_PRIVATE_KEY", hide_env_values = true)]
    pub gh_app_private_key: String,

    /// Webhook secret shared with GitHub (value source)
    #[arg(long, env = "GH_WEBHOOK_SECRET", hide_env_values = true)]
    pub gh_webhook_secret: String,

    /// GitHub API base URL, for GitHub Enterprise Server
    #[arg(long, env = "GITHUB_API_URL")]
    pub github_api_url: Option<String>,

    /// TOML file with the owner policy table. Replaces the built-in table.
    #[arg(long, env = "GHDEFAULTS_POLICY_FILE")]
    pub policy_file: Option<PathBuf>,

    /// Deadline for handling one webhook delivery, in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("http_addr", &self.http_addr)
            .field("port", &self.port)
            .field("gh_app_id", &self.gh_app_id)
            .field("gh_app_private_key", &"<REDACTED>")
            .field("gh_webhook_secret", &"<REDACTED>")
            .field("github_api_url", &self.github_api_url)
            .field("policy_file", &self.policy_file)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("log_format", &self.log_format)
            .finish()
    }
}

/// Validated settings the service runs with.
#[derive(Debug)]
pub struct ServiceSettings {
    pub listen_addr: SocketAddr,
    pub credentials: AppCredentials,
    pub webhook_secret: SecretString,
    pub github_api_url: Option<String>,
    pub policy: OwnerPolicy,
    pub request_timeout: Duration,
}

/// Errors raised while resolving configuration at startup
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {setting} from {path:?}: {source}")]
    ReadValue {
        setting: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid GitHub App ID '{value}': expected a positive integer")]
    InvalidAppId { value: String },

    #[error("GitHub App private key is empty")]
    EmptyPrivateKey,

    #[error("Webhook secret is empty; refusing to accept unsigned deliveries")]
    EmptyWebhookSecret,

    #[error("Invalid listen address '{value}'")]
    InvalidListenAddress { value: String },

    #[error("Request timeout must be at least one second")]
    InvalidRequestTimeout,

    #[error(transparent)]
    Policy(#[from] PolicyError),
}

impl Config {
    /// Resolves value sources, loads the policy and validates everything.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] encountered.
    pub fn into_settings(self) -> Result<ServiceSettings, ConfigError> {
        let listen_addr = self.listen_addr()?;

        let app_id = parse_app_id(&resolve_value("GitHub App ID", &self.gh_app_id)?)?;

        let private_key = normalize_private_key(resolve_value(
            "GitHub App private key",
            &self.gh_app_private_key,
        )?)?;

        let webhook_secret = resolve_value("webhook secret", &self.gh_webhook_secret)?
            .trim()
            .to_string();
        if webhook_secret.is_empty() {
            return Err(ConfigError::EmptyWebhookSecret);
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidRequestTimeout);
        }

        let policy = match &self.policy_file {
            Some(path) => OwnerPolicy::load(path)?,
            None => OwnerPolicy::builtin(),
        };

        let github_api_url = self
            .github_api_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        Ok(ServiceSettings {
            listen_addr,
            credentials: AppCredentials::new(app_id, SecretString::from(private_key)),
            webhook_secret: SecretString::from(webhook_secret),
            github_api_url,
            policy,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        })
    }

    /// The address to bind: `http_addr` if set, otherwise all interfaces on `port`
    /// (or the default port).
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidListenAddress`] if `http_addr` does not parse.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        match (&self.http_addr, self.port) {
            (Some(addr), _) => parse_listen_addr(addr),
            (None, Some(port)) => Ok(SocketAddr::from(([0, 0, 0, 0], port))),
            (None, None) => Ok(SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT))),
        }
    }
}

/// Resolves a `file:` / `data:` / plain value source.
///
/// # Errors
/// Returns [`ConfigError::ReadValue`] if a `file:` source cannot be read.
pub fn resolve_value(setting: &'static str, source: &str) -> Result<String, ConfigError> {
    if let Some(path) = source.strip_prefix(FILE_SCHEME) {
        let path = path.strip_prefix("//").unwrap_or(path);
        return std::fs::read_to_string(path).map_err(|source| ConfigError::ReadValue {
            setting,
            path: PathBuf::from(path),
            source,
        });
    }

    Ok(source.strip_prefix(DATA_SCHEME).unwrap_or(source).to_string())
}

/// PEM parsers want the key to end with a newline; secret stores often strip it.
fn normalize_private_key(mut key: String) -> Result<String, ConfigError> {
    if key.trim().is_empty() {
        return Err(ConfigError::EmptyPrivateKey);
    }
    if !key.ends_with('\n') {
        key.push('\n');
    }
    Ok(key)
}

fn parse_app_id(value: &str) -> Result<u64, ConfigError> {
    let trimmed = value.trim();
    match trimmed.parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ConfigError::InvalidAppId {
            value: trimmed.to_string(),
        }),
    }
}

fn parse_listen_addr(value: &str) -> Result<SocketAddr, ConfigError> {
    let value = value.trim();
    let candidate = if value.starts_with(':') {
        format!("0.0.0.0{value}")
    } else {
        value.to_string()
    };

    candidate
        .parse()
        .map_err(|_| ConfigError::InvalidListenAddress {
            value: value.to_string(),
        })
}
