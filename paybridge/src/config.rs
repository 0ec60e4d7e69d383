//! Configuration for the facade and its provider.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Credentials and connection settings for one payment provider.
///
/// `base_url`, `timeout`, and `retries` are passed through to the provider
/// untouched; this layer imposes no transport behavior of its own.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    /// Registered provider name (e.g. `"stripe"`, `"memory"`).
    pub provider: String,

    /// API key or equivalent credential.
    pub api_key: String,

    /// Secret used for webhook signature verification.
    pub webhook_secret: Option<String>,

    /// Override for the provider's API endpoint.
    pub base_url: Option<String>,

    /// Request timeout in milliseconds, enforced by the provider.
    pub timeout: Option<u64>,

    /// Retry count, enforced by the provider.
    pub retries: Option<u32>,
}

impl ProviderConfig {
    /// Creates a config with just a provider name and API key.
    #[must_use]
    pub fn new(provider: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            api_key: api_key.into(),
            webhook_secret: None,
            base_url: None,
            timeout: None,
            retries: None,
        }
    }

    /// Sets the webhook secret.
    #[must_use]
    pub fn with_webhook_secret(mut self, secret: impl Into<String>) -> Self {
        self.webhook_secret = Some(secret.into());
        self
    }
}

/// Log verbosity requested by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only.
    Error,
    /// Errors and warnings.
    Warn,
    /// Informational and above.
    Info,
    /// Everything.
    Debug,
}

/// Top-level configuration handed to [`Paybridge::try_new`](crate::client::Paybridge::try_new).
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeConfig {
    /// The provider to construct and route every operation through.
    pub provider: ProviderConfig,

    /// Emit diagnostics for swallowed failures (health checks, webhook
    /// verification).
    #[serde(default)]
    pub debug: bool,

    /// Requested log verbosity.
    pub log_level: Option<LogLevel>,

    /// User agent forwarded to the provider.
    pub user_agent: Option<String>,
}

impl BridgeConfig {
    /// Creates a config for the given provider with defaults elsewhere.
    #[must_use]
    pub const fn new(provider: ProviderConfig) -> Self {
        Self {
            provider,
            debug: false,
            log_level: None,
            user_agent: None,
        }
    }

    /// Enables debug diagnostics.
    #[must_use]
    pub const fn with_debug(mut self) -> Self {
        self.debug = true;
        self
    }
}
