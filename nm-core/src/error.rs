//! Global error type for the NotionMail application.
//!
//! All error categories across the workspace are unified into a single
//! `NmError` enum with conversions from underlying library errors.

use thiserror::Error;

/// Convenience type alias for Results using NmError.
pub type NmResult<T> = Result<T, NmError>;

/// Unified error type covering all error categories in NotionMail.
#[derive(Error, Debug)]
pub enum NmError {
    // -- Configuration errors --
    /// Failed to load or parse application configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A required configuration value is missing.
    #[error("missing configuration: {0}")]
    MissingConfig(String),

    // -- Network errors --
    /// HTTP request failed.
    #[error("http error: {0}")]
    Http(String),

    /// HTTP request timed out.
    #[error("request timeout: {0}")]
    Timeout(String),

    /// Authentication with the mailbox store failed.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The store kept rejecting requests with 429 after all retries.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// The store returned an error envelope.
    #[error("api error (status {status}, {code}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Machine-readable error code from the store.
        code: String,
        /// Human-readable message from the store.
        message: String,
    },

    // -- Mailbox errors --
    /// The addressed message or database does not exist (or is not shared with the integration).
    #[error("not found: {0}")]
    NotFound(String),

    /// A row in the mailbox store does not have the expected message shape.
    #[error("malformed page {id}: {reason}")]
    MalformedPage {
        /// Page id of the offending row.
        id: String,
        /// What was missing or unreadable.
        reason: String,
    },

    /// Caller supplied an unusable value.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The mailbox database does not have the expected properties.
    #[error("schema mismatch: {0}")]
    Schema(String),

    // -- File/IO errors --
    /// File system operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    // -- Generic --
    /// An unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),

    /// Wrapping anyhow errors for interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<serde_json::Error> for NmError {
    fn from(e: serde_json::Error) -> Self {
        NmError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for NmError {
    fn from(e: toml::de::Error) -> Self {
        NmError::Config(e.to_string())
    }
}
