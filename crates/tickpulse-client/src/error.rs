//! Client error taxonomy.
//!
//! Every failure the client can surface is one variant of [`ClientError`].
//! The retry classifier and caller-facing branching both dispatch on the
//! same discriminant, so there is exactly one place that decides what a
//! given failure means.
//!
//! | Variant | Origin | Retriable |
//! |---------|--------|-----------|
//! | `Validation` | client-side precondition, never transmitted | no |
//! | `Network` | transport failure or per-attempt timeout | yes |
//! | `Api` | non-2xx response (other than 429) | no |
//! | `RateLimited` | 429 response, optional `Retry-After` hint | yes |

use std::time::Duration;

use thiserror::Error;

/// Structured error returned by every client operation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClientError {
    /// A call argument failed a pre-flight check. No request was sent.
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// The transport failed or a single attempt timed out.
    #[error("network failure: {message}")]
    Network { message: String },

    /// The service answered with a non-2xx status.
    #[error("api error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The service answered 429. `retry_after_secs` carries the server's
    /// `Retry-After` hint when one was present.
    #[error("rate limited: {message}")]
    RateLimited {
        message: String,
        retry_after_secs: Option<u64>,
    },
}

impl ClientError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// A single attempt exceeded the configured timeout.
    pub fn timeout(limit: Duration) -> Self {
        Self::Network {
            message: format!("request timeout after {}ms", limit.as_millis()),
        }
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn rate_limited(message: impl Into<String>, retry_after_secs: Option<u64>) -> Self {
        Self::RateLimited {
            message: message.into(),
            retry_after_secs,
        }
    }

    /// Whether the failure is transient and eligible for another attempt.
    pub const fn retryable(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::RateLimited { .. })
    }

    /// HTTP status associated with the failure, when one exists.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(429),
            Self::Validation { .. } | Self::Network { .. } => None,
        }
    }

    /// Offending field for validation failures.
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::Validation { field, .. } => Some(*field),
            _ => None,
        }
    }

    /// Server-provided rate-limit hint, as a duration.
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited {
                retry_after_secs: Some(secs),
                ..
            } => Some(Duration::from_secs(*secs)),
            _ => None,
        }
    }

    /// Stable machine-readable code for logs and envelope errors.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "client.validation",
            Self::Network { .. } => "client.network",
            Self::Api { .. } => "client.api",
            Self::RateLimited { .. } => "client.rate_limited",
        }
    }
}
