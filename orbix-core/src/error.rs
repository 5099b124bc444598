//! Error handling for the orbix client.
//!
//! Every failure surfaced by the request execution layer is classified into
//! one of the variants of [`Error`]:
//!
//! ```text
//! Error
//! ├── Api           - upstream returned a non-success status (status + message)
//! ├── Network       - transport layer failure (via NetworkError)
//! ├── UserNotFound  - 404 on a user resource
//! ├── RateLimit     - local admission rejection or upstream 429
//! ├── InvalidRequest - local precondition failure, raised before any I/O
//! └── Parse         - response decoding failure (via ParseError)
//! ```
//!
//! Large variants are boxed to keep the enum small, and messages use
//! `Cow<'static, str>` so static strings allocate nothing.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Result type alias for all orbix operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Details for upstream API errors.
///
/// Extracted to a separate struct and boxed to keep the [`Error`] enum small.
#[derive(Debug)]
#[non_exhaustive]
pub struct ApiErrorDetails {
    /// HTTP status code returned by the upstream host.
    pub status: u16,
    /// Descriptive message, either from the error body or `"HTTP {status}"`.
    pub message: String,
    /// Optional raw response payload for debugging.
    pub data: Option<serde_json::Value>,
}

impl ApiErrorDetails {
    /// Creates new error details with the given status and message.
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            data: None,
        }
    }

    /// Creates new error details carrying the raw response payload.
    pub fn with_data(status: u16, message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            status,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl fmt::Display for ApiErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (status: {})", self.message, self.status)
    }
}

/// Encapsulated network errors hiding transport implementation details.
///
/// Wraps all transport-level failures without exposing `reqwest::Error` in
/// the public API, so the HTTP library can change without breaking callers.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum NetworkError {
    /// Request timed out.
    #[error("request timeout")]
    Timeout,

    /// Connection could not be established or was reset.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Opaque transport error preserving the original source.
    #[error("transport error")]
    Transport(#[source] Box<dyn StdError + Send + Sync + 'static>),
}

/// Errors produced while decoding upstream responses into typed models.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ParseError {
    /// Failed to deserialize JSON.
    #[error("failed to deserialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A required field was absent from the response.
    #[error("missing required field: {0}")]
    MissingField(Cow<'static, str>),

    /// A field was present but held an unusable value.
    #[error("invalid value for '{field}': {message}")]
    InvalidValue {
        /// Field name.
        field: Cow<'static, str>,
        /// What was wrong with it.
        message: Cow<'static, str>,
    },
}

impl ParseError {
    /// Creates a `MissingField` error from a static field name.
    #[must_use]
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField(Cow::Borrowed(field))
    }

    /// Creates an `InvalidValue` error.
    pub fn invalid_value(
        field: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Main error type for the orbix client.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Upstream API returned a non-success status. Boxed to reduce enum size.
    #[error("API error: {0}")]
    Api(Box<ApiErrorDetails>),

    /// Transport layer failure. Boxed to reduce enum size.
    #[error("network error: {0}")]
    Network(Box<NetworkError>),

    /// The requested user does not exist.
    #[error("requested user {0} not found")]
    UserNotFound(Cow<'static, str>),

    /// Rate limit exceeded, locally or upstream, with optional retry hint.
    #[error("rate limited: {message}")]
    RateLimit {
        /// Error message.
        message: Cow<'static, str>,
        /// Duration to wait before retrying, when known.
        retry_after: Option<Duration>,
    },

    /// Invalid request parameters; raised before any network I/O.
    #[error("invalid request: {0}")]
    InvalidRequest(Cow<'static, str>),

    /// Response decoding failure. Boxed to reduce enum size.
    #[error("parse error: {0}")]
    Parse(Box<ParseError>),
}

impl Error {
    /// Creates an upstream API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api(Box::new(ApiErrorDetails::new(status, message)))
    }

    /// Creates an upstream API error carrying the raw response payload.
    pub fn api_with_data(
        status: u16,
        message: impl Into<String>,
        data: serde_json::Value,
    ) -> Self {
        Self::Api(Box::new(ApiErrorDetails::with_data(status, message, data)))
    }

    /// Creates a network error from a message.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(Box::new(NetworkError::ConnectionFailed(msg.into())))
    }

    /// Creates a user-not-found error from a user identifier or URL.
    pub fn user_not_found(identifier: impl Into<Cow<'static, str>>) -> Self {
        Self::UserNotFound(identifier.into())
    }

    /// Creates a rate limit error with an optional retry duration.
    pub fn rate_limit(
        message: impl Into<Cow<'static, str>>,
        retry_after: Option<Duration>,
    ) -> Self {
        Self::RateLimit {
            message: message.into(),
            retry_after,
        }
    }

    /// Creates an invalid request error.
    pub fn invalid_request(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Returns `true` if retrying this error could plausibly succeed.
    ///
    /// The retry policy itself is deliberately kind-agnostic; this helper
    /// exists for callers that want classification-aware handling.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network(_) | Error::RateLimit { .. } => true,
            Error::Api(details) => details.status >= 500,
            _ => false,
        }
    }

    /// Returns the retry delay if this is a rate limit error.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Error::RateLimit { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Returns the upstream HTTP status code, when one applies.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api(details) => Some(details.status),
            Error::UserNotFound(_) => Some(404),
            _ => None,
        }
    }
}

impl From<NetworkError> for Error {
    fn from(err: NetworkError) -> Self {
        Self::Network(Box::new(err))
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Self::Parse(Box::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(Box::new(ParseError::Json(err)))
    }
}
