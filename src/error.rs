//! Error types for the Workers AI client

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The response body is not a JSON response shell
    #[error("failed to unmarshal initial response shell: {0}")]
    MalformedTopLevel(#[source] serde_json::Error),

    /// A request message carried a role no message variant accepts.
    /// Holds an empty string when the role was missing.
    #[error("unknown message role found: {0}")]
    UnknownRole(String),

    /// A recognized shape held a field of the wrong type
    #[error("failed to parse {shape} payload: {source}")]
    Decode {
        /// Which shape was being decoded ("standard", "hybrid", "legacy", "message", "request")
        shape: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// API error from the service
    #[error("API error: {0}")]
    Api(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a new config error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a new API error
    pub fn api(msg: impl Into<String>) -> Self {
        Error::Api(msg.into())
    }

    /// Create a new invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Create an unknown role error
    pub fn unknown_role(role: impl Into<String>) -> Self {
        Error::UnknownRole(role.into())
    }

    pub(crate) fn decode(shape: &'static str, source: serde_json::Error) -> Self {
        Error::Decode { shape, source }
    }
}
