//! Error types for request construction and execution.

use thiserror::Error;

/// Result type for request operations.
pub type Result<T> = std::result::Result<T, RequestError>;

/// Errors raised while building or executing a request.
///
/// Upstream HTTP status codes are never represented here; a response with
/// status >= 400 is still a [`crate::Response`].
#[derive(Error, Debug)]
pub enum RequestError {
    /// The executor was created without a route descriptor
    #[error("route config is missing")]
    MissingRoute,

    /// HTTP method not expressible on the wire
    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// Auth type tag outside the supported set
    #[error("unsupported auth type: {0}")]
    UnsupportedAuthType(String),

    /// Credentials could not be applied to the request
    #[error("authentication failed: {0}")]
    Auth(String),

    /// URL parsing error
    #[error("invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// A configured header could not be encoded
    #[error("invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Network-level failure (connection, DNS, timeout)
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The caller's cancellation signal fired before the call completed
    #[error("request cancelled")]
    Cancelled,
}
