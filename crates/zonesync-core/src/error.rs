//! Error types for zonesync
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for zonesync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for zonesync
#[derive(Error, Debug)]
pub enum Error {
    /// The provider rejected the request parameters (HTTP 400)
    #[error("Bad request")]
    BadRequest,

    /// The provider rejected the credential (HTTP 401)
    #[error("Unauthorized")]
    Unauthorized,

    /// Any other non-2xx answer from the provider
    #[error("Request failed with status {status}: {body}")]
    RequestFailed {
        /// HTTP status code
        status: u16,
        /// Response body, as far as it could be read
        body: String,
    },

    /// Transport-level failure (connect, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Local I/O errors (config and plan files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The zone container refused a record
    #[error("Zone error: {0}")]
    Zone(String),

    /// An apply batch stopped before all of its changes were made
    #[error("Apply on {zone} stopped after {applied}/{total} changes: {source}")]
    PartialApply {
        /// Zone the plan targeted
        zone: String,
        /// Number of changes fully applied before the failure
        applied: usize,
        /// Number of changes in the plan
        total: usize,
        /// The failure that stopped the batch
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a "request failed" error
    pub fn request_failed(status: u16, body: impl Into<String>) -> Self {
        Self::RequestFailed {
            status,
            body: body.into(),
        }
    }

    /// Create a transport error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a zone container error
    pub fn zone(msg: impl Into<String>) -> Self {
        Self::Zone(msg.into())
    }

    /// Whether the error came from talking to the provider
    ///
    /// These are the failures a populate read degrades into an empty zone.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::BadRequest
                | Self::Unauthorized
                | Self::RequestFailed { .. }
                | Self::Http(_)
                | Self::Json(_)
        )
    }

    /// HTTP status behind the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest => Some(400),
            Self::Unauthorized => Some(401),
            Self::RequestFailed { status, .. } => Some(*status),
            Self::PartialApply { source, .. } => source.status(),
            _ => None,
        }
    }
}
