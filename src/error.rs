//! Error types for valorant-gateway.

use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

/// How the Riot API represents an error it encountered.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RiotError {
    /// Programmer-facing representation of the error, in `SCREAMING_SNAKE_CASE`.
    pub error_code: String,
    /// Human-readable description of the error.
    pub message: String,
}

/// The main error type for valorant-gateway.
#[derive(Debug, Error)]
pub enum Error {
    // ── Server-reported ──────────────────────────────────────────────────────
    /// 401 without any structured error body. Usually means reauthentication
    /// is needed.
    #[error("Unauthorized")]
    Unauthorized,

    /// The API rejected the token claims (`BAD_CLAIMS`); the access token has
    /// likely expired.
    #[error("Token failure: {message}")]
    TokenFailure {
        /// Message from the API.
        message: String,
    },

    /// The session has expired or otherwise been invalidated; a fresh login is
    /// required.
    #[error("Session expired (MFA required: {mfa_required})")]
    SessionExpired {
        /// True if resumption failed because an MFA code was required but
        /// unavailable.
        mfa_required: bool,
    },

    /// The session could not be resumed for a reason not recognized as clear
    /// expiry - possibly a transient server-side issue. Reauthenticating may
    /// still fix it.
    #[error("Session resumption failed: {cause}")]
    SessionResumptionFailure {
        /// The underlying failure, shared between every caller that waited on
        /// the same refresh.
        cause: Arc<Error>,
    },

    /// The service is down for scheduled maintenance.
    #[error("Scheduled downtime: {message}")]
    ScheduledDowntime {
        /// Message from the API.
        message: String,
    },

    /// The API could not find a resource at the given location.
    #[error("Resource not found")]
    ResourceNotFound,

    /// A non-200 response code with no more specific classification.
    #[error("Bad response code {status}")]
    BadResponseCode {
        /// HTTP status code.
        status: u16,
        /// Structured error body, if the API provided one.
        error: Option<RiotError>,
    },

    /// Rate limited for sending too many requests.
    #[error("Rate limited - retry after {retry_after:?} seconds")]
    RateLimited {
        /// Seconds until the limit should lift, from the `Retry-After` header.
        retry_after: Option<u64>,
    },

    // ── Login protocol ───────────────────────────────────────────────────────
    /// The auth service rejected the submitted credentials. Carries the
    /// server-provided message verbatim (e.g. `auth_failure`).
    #[error("Authentication failed: {message}")]
    AuthenticationFailed {
        /// Message from the auth service.
        message: String,
    },

    /// An auth response was missing the payload its type requires.
    #[error("Auth response missing expected {context} payload")]
    MissingAuthPayload {
        /// Which payload was absent.
        context: &'static str,
    },

    /// The token redirect could not be parsed into a complete access token.
    #[error("Malformed access token payload: missing {missing}")]
    MalformedAccessToken {
        /// The fragment field that was absent or unparsable.
        missing: &'static str,
    },

    /// The auth service reported an error response type.
    #[error("Unexpected auth error: {}", message.as_deref().unwrap_or("<no message>"))]
    UnexpectedAuthError {
        /// Message from the auth service, if any.
        message: Option<String>,
    },

    /// The affinity endpoint reported a region this library does not know.
    #[error("Unknown region: {region}")]
    UnknownRegion {
        /// The reported region.
        region: String,
    },

    // ── Storage ──────────────────────────────────────────────────────────────
    /// Storage I/O error.
    #[error("Storage I/O error at {path}: {message}")]
    StorageIo {
        /// Path that caused the error.
        path: std::path::PathBuf,
        /// Error description.
        message: String,
    },

    /// Storage serialization error.
    #[error("Storage serialization error: {0}")]
    StorageSerialization(String),

    // ── Infrastructure ───────────────────────────────────────────────────────
    /// Network/HTTP error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Classify a non-200 response into a typed error.
    ///
    /// A structured `{errorCode, message}` body takes priority; without one,
    /// the status code decides. `retry_after` is the parsed `Retry-After`
    /// header value in seconds, if the response carried one.
    #[must_use]
    pub fn classify(status: u16, retry_after: Option<u64>, body: &[u8]) -> Self {
        if let Ok(error) = serde_json::from_slice::<RiotError>(body) {
            match error.error_code.as_str() {
                "BAD_CLAIMS" => Error::TokenFailure {
                    message: error.message,
                },
                "SCHEDULED_DOWNTIME" => Error::ScheduledDowntime {
                    message: error.message,
                },
                "RESOURCE_NOT_FOUND" => Error::ResourceNotFound,
                _ => Error::BadResponseCode {
                    status,
                    error: Some(error),
                },
            }
        } else {
            match status {
                401 => Error::Unauthorized,
                429 => Error::RateLimited { retry_after },
                _ => Error::BadResponseCode {
                    status,
                    error: None,
                },
            }
        }
    }

    /// Returns true if this error indicates re-authentication is recommended.
    #[must_use]
    pub fn recommends_reauthentication(&self) -> bool {
        matches!(
            self,
            Error::Unauthorized
                | Error::TokenFailure { .. }
                | Error::SessionExpired { .. }
                | Error::SessionResumptionFailure { .. }
        )
    }

    /// Creates a storage I/O error.
    #[must_use]
    pub fn storage_io(path: impl Into<std::path::PathBuf>, message: impl Into<String>) -> Self {
        Self::StorageIo {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Convenience type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Parse the `Retry-After` header into whole seconds, if present.
pub(crate) fn retry_after_seconds(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
}
