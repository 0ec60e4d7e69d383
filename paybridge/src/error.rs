//! Error taxonomy for payment operations.
//!
//! Every failure that crosses the [`Paybridge`](crate::client::Paybridge)
//! boundary is one of the closed set of [`PaymentError`] kinds, regardless of
//! which backend produced it. Backends surface their native failures as
//! [`BoxError`]; [`classify`] maps any such value to exactly one taxonomy
//! member.

use std::fmt;
use std::io;

/// Boxed error type used at the provider boundary.
///
/// Providers return whatever error their SDK produces; the facade normalizes
/// it via [`classify`] before anything reaches the caller.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Normalized payment error.
///
/// Each variant carries a human-readable message and, where applicable, the
/// originating provider name. [`PaymentError::Provider`] is the universal
/// catch-all for failures that fit no other kind.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// The request was malformed or failed validation (HTTP 400).
    #[error("{message}")]
    Validation {
        /// Human-readable description of the validation failure.
        message: String,
    },

    /// Credentials were missing or rejected (HTTP 401).
    #[error("{message}")]
    Authentication {
        /// Human-readable description.
        message: String,
        /// The provider that rejected the credentials.
        provider: Option<String>,
    },

    /// The credentials lack permission for the operation (HTTP 403).
    #[error("{message}")]
    Permission {
        /// Human-readable description.
        message: String,
        /// The provider that refused the operation.
        provider: Option<String>,
    },

    /// The referenced resource does not exist (HTTP 404).
    #[error("{}", not_found_message(resource, id.as_deref()))]
    NotFound {
        /// The kind of resource that was looked up (e.g. `"Customer"`).
        resource: String,
        /// The identifier that was looked up, if known.
        id: Option<String>,
        /// The provider that reported the miss.
        provider: Option<String>,
    },

    /// The provider is throttling requests (HTTP 429).
    #[error("{message}")]
    RateLimit {
        /// Human-readable description.
        message: String,
        /// Seconds to wait before retrying, if the provider said.
        retry_after: Option<u64>,
        /// The provider that throttled the request.
        provider: Option<String>,
    },

    /// The provider failed internally (HTTP 5xx).
    #[error("{message}")]
    Server {
        /// Human-readable description.
        message: String,
        /// The provider that failed.
        provider: Option<String>,
    },

    /// The provider could not be reached (DNS failure, connection refused).
    #[error("{message}")]
    Network {
        /// Human-readable description.
        message: String,
        /// The provider that was unreachable.
        provider: Option<String>,
    },

    /// The request to the provider timed out.
    #[error("{message}")]
    Timeout {
        /// Human-readable description.
        message: String,
        /// The provider that timed out.
        provider: Option<String>,
    },

    /// Webhook signature verification or parsing failed (HTTP 400).
    #[error("{message}")]
    Webhook {
        /// Human-readable description.
        message: String,
        /// The provider whose webhook failed.
        provider: Option<String>,
    },

    /// Provider-specific failure that maps to no other kind.
    ///
    /// Carries the raw provider error opaquely so callers who need the
    /// original detail can still reach it.
    #[error("{message}")]
    Provider {
        /// Human-readable description.
        message: String,
        /// The provider responsible for the failure.
        provider: String,
        /// The HTTP status the provider reported, if any.
        status_code: Option<u16>,
        /// The original provider error, untouched.
        source: Option<BoxError>,
    },
}

fn not_found_message(resource: &str, id: Option<&str>) -> String {
    match id {
        Some(id) => format!("{resource} with id '{id}' not found"),
        None => format!("{resource} not found"),
    }
}

impl PaymentError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a validation error scoped to a single field.
    #[must_use]
    pub fn validation_field(field: &str, message: &str) -> Self {
        Self::Validation {
            message: format!("Validation error in field '{field}': {message}"),
        }
    }

    /// Creates an authentication error.
    #[must_use]
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
            provider: None,
        }
    }

    /// Creates a permission error.
    #[must_use]
    pub fn permission(message: impl Into<String>) -> Self {
        Self::Permission {
            message: message.into(),
            provider: None,
        }
    }

    /// Creates a not-found error for a resource kind.
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: None,
            provider: None,
        }
    }

    /// Creates a not-found error for a specific resource id.
    #[must_use]
    pub fn not_found_with_id(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: Some(id.into()),
            provider: None,
        }
    }

    /// Creates a rate-limit error.
    #[must_use]
    pub fn rate_limit(retry_after: Option<u64>) -> Self {
        Self::RateLimit {
            message: "Rate limit exceeded".to_owned(),
            retry_after,
            provider: None,
        }
    }

    /// Creates a server error.
    #[must_use]
    pub fn server(message: impl Into<String>) -> Self {
        Self::Server {
            message: message.into(),
            provider: None,
        }
    }

    /// Creates a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            provider: None,
        }
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
            provider: None,
        }
    }

    /// Creates a webhook error.
    #[must_use]
    pub fn webhook(message: impl Into<String>) -> Self {
        Self::Webhook {
            message: message.into(),
            provider: None,
        }
    }

    /// Creates a generic provider error with no further detail.
    #[must_use]
    pub fn provider_error(message: impl Into<String>, provider: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
            provider: provider.into(),
            status_code: None,
            source: None,
        }
    }

    /// Attaches the originating provider name, where the variant carries one.
    #[must_use]
    pub fn with_provider(mut self, name: &str) -> Self {
        match &mut self {
            Self::Authentication { provider, .. }
            | Self::Permission { provider, .. }
            | Self::NotFound { provider, .. }
            | Self::RateLimit { provider, .. }
            | Self::Server { provider, .. }
            | Self::Network { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::Webhook { provider, .. } => *provider = Some(name.to_owned()),
            Self::Provider { provider, .. } => *provider = name.to_owned(),
            Self::Validation { .. } => {}
        }
        self
    }

    /// Returns the stable machine code for this error kind.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Authentication { .. } => "AUTHENTICATION_ERROR",
            Self::Permission { .. } => "PERMISSION_ERROR",
            Self::NotFound { .. } => "NOT_FOUND_ERROR",
            Self::RateLimit { .. } => "RATE_LIMIT_ERROR",
            Self::Server { .. } => "SERVER_ERROR",
            Self::Network { .. } => "NETWORK_ERROR",
            Self::Timeout { .. } => "TIMEOUT_ERROR",
            Self::Webhook { .. } => "WEBHOOK_ERROR",
            Self::Provider { .. } => "PROVIDER_ERROR",
        }
    }

    /// Returns the HTTP-equivalent status for this error kind, if it has one.
    ///
    /// Network and timeout failures happen below the HTTP layer and carry no
    /// status; [`PaymentError::Provider`] carries whatever the backend
    /// reported.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Validation { .. } | Self::Webhook { .. } => Some(400),
            Self::Authentication { .. } => Some(401),
            Self::Permission { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::RateLimit { .. } => Some(429),
            Self::Server { .. } => Some(500),
            Self::Network { .. } | Self::Timeout { .. } => None,
            Self::Provider { status_code, .. } => *status_code,
        }
    }

    /// Returns the originating provider name, if recorded.
    #[must_use]
    pub fn provider(&self) -> Option<&str> {
        match self {
            Self::Validation { .. } => None,
            Self::Authentication { provider, .. }
            | Self::Permission { provider, .. }
            | Self::NotFound { provider, .. }
            | Self::RateLimit { provider, .. }
            | Self::Server { provider, .. }
            | Self::Network { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::Webhook { provider, .. } => provider.as_deref(),
            Self::Provider { provider, .. } => Some(provider),
        }
    }

    /// Returns the retry-after hint for rate-limit errors.
    #[must_use]
    pub const fn retry_after(&self) -> Option<u64> {
        match self {
            Self::RateLimit { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

/// Raw failure record a provider can surface for HTTP-shaped errors.
///
/// Backends that talk to REST APIs usually know the response status and
/// sometimes a transport-level code; returning a `ProviderFailure` lets
/// [`classify`] map the failure precisely instead of falling back to
/// [`PaymentError::Provider`].
#[derive(Debug, Clone)]
pub struct ProviderFailure {
    /// Human-readable message from the provider.
    pub message: String,
    /// HTTP status of the failed call, if any.
    pub status_code: Option<u16>,
    /// Transport-level code (e.g. `"ECONNREFUSED"`, `"ETIMEDOUT"`).
    pub code: Option<String>,
    /// Retry hint in seconds, for throttled calls.
    pub retry_after: Option<u64>,
}

impl ProviderFailure {
    /// Creates a failure with just a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: None,
            code: None,
            retry_after: None,
        }
    }

    /// Sets the HTTP status.
    #[must_use]
    pub const fn with_status(mut self, status: u16) -> Self {
        self.status_code = Some(status);
        self
    }

    /// Sets the transport-level code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Sets the retry-after hint.
    #[must_use]
    pub const fn with_retry_after(mut self, seconds: u64) -> Self {
        self.retry_after = Some(seconds);
        self
    }
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ProviderFailure {}

/// Maps an arbitrary provider error to exactly one [`PaymentError`].
///
/// The priority chain: already-classified errors pass through unchanged,
/// then HTTP status semantics, then transport-level codes, and finally
/// [`PaymentError::Provider`] as the unconditional fallback. No input
/// escapes unclassified.
#[must_use]
pub fn classify(err: BoxError, provider: &str) -> PaymentError {
    let err = match err.downcast::<PaymentError>() {
        Ok(classified) => return *classified,
        Err(err) => err,
    };

    let err = match err.downcast::<ProviderFailure>() {
        Ok(failure) => return classify_failure(*failure, provider),
        Err(err) => err,
    };

    let err = match err.downcast::<io::Error>() {
        Ok(io_err) => return classify_io(*io_err, provider),
        Err(err) => err,
    };

    PaymentError::Provider {
        message: err.to_string(),
        provider: provider.to_owned(),
        status_code: None,
        source: Some(err),
    }
}

fn classify_failure(failure: ProviderFailure, provider: &str) -> PaymentError {
    if let Some(status) = failure.status_code {
        return match status {
            400 => PaymentError::validation(failure.message),
            401 => PaymentError::authentication(failure.message).with_provider(provider),
            403 => PaymentError::permission(failure.message).with_provider(provider),
            404 => PaymentError::not_found("Resource").with_provider(provider),
            429 => PaymentError::RateLimit {
                message: failure.message,
                retry_after: failure.retry_after,
                provider: Some(provider.to_owned()),
            },
            500 | 502 | 503 | 504 => {
                PaymentError::server(failure.message).with_provider(provider)
            }
            other => PaymentError::Provider {
                message: failure.message,
                provider: provider.to_owned(),
                status_code: Some(other),
                source: None,
            },
        };
    }

    match failure.code.as_deref() {
        Some("ENOTFOUND" | "ECONNREFUSED") => {
            PaymentError::network(failure.message).with_provider(provider)
        }
        Some("ETIMEDOUT") => PaymentError::timeout(failure.message).with_provider(provider),
        _ => PaymentError::Provider {
            message: failure.message,
            provider: provider.to_owned(),
            status_code: None,
            source: None,
        },
    }
}

fn classify_io(err: io::Error, provider: &str) -> PaymentError {
    match err.kind() {
        io::ErrorKind::ConnectionRefused
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::NotConnected
        | io::ErrorKind::AddrNotAvailable => {
            PaymentError::network(err.to_string()).with_provider(provider)
        }
        io::ErrorKind::TimedOut => PaymentError::timeout(err.to_string()).with_provider(provider),
        _ => PaymentError::Provider {
            message: err.to_string(),
            provider: provider.to_owned(),
            status_code: None,
            source: Some(Box::new(err)),
        },
    }
}
