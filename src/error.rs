//! Error types for apiwrap

use thiserror::Error;

/// Errors produced by the client.
///
/// Every call fails fast: the first failing step aborts the request and
/// propagates a single descriptive error to the caller. Nothing is retried
/// or swallowed internally.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request payload could not be serialized to JSON
    #[error("failed to serialize request payload: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The request could not be constructed (malformed URL)
    #[error("failed to construct request: {0}")]
    RequestConstruction(String),

    /// Network-level failure surfaced from the underlying HTTP client
    /// (connection refusal, DNS failure, I/O error)
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body is not valid JSON or does not match the decode
    /// target. Carries the request URL, the raw body text and the decode
    /// target so a failing endpoint can be diagnosed from the error alone.
    #[error("failed to decode response from {url} into {target}: {reason} (body: {body})")]
    Decode {
        /// URL the request was sent to
        url: String,
        /// Type name of the envelope the body was decoded into
        target: &'static str,
        /// Underlying parse failure
        reason: String,
        /// Raw response body, verbatim
        body: String,
    },

    /// The envelope reported an application error (`code != 0`), or the
    /// payload carried its own embedded error
    #[error("{message} (code {code})")]
    Api {
        /// Envelope status code
        code: i32,
        /// Envelope message, used as the error text
        message: String,
    },

    /// The caller's cancel handle fired before the call completed
    #[error("request cancelled")]
    Cancelled,

    /// Client construction problem (missing base URL, invalid header name,
    /// invalid proxy URL)
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A query-parameter value of an unsupported type
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type for apiwrap operations
pub type Result<T> = std::result::Result<T, ClientError>;
