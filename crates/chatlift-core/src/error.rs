//! Error types for the chatlift migration pipeline.

use thiserror::Error;

/// A shared error type for the whole chatlift workspace.
///
/// Typed, structured variants with automatic conversion from common
/// error types via the `From` trait.
#[derive(Error, Debug, Clone)]
pub enum ChatliftError {
    /// Transport-level failure (connection, timeout, malformed response body)
    #[error("HTTP error: {message}")]
    Http { message: String },

    /// The remote platform answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", "CSV"
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Roster/registry file store error
    #[error("Store error: {0}")]
    Store(String),
}

impl ChatliftError {
    /// Creates an Http error
    pub fn http(message: impl Into<String>) -> Self {
        Self::Http {
            message: message.into(),
        }
    }

    /// Creates an Api error from a status code and response body
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    /// Check if this is a transport or API-level error
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Http { .. } | Self::Api { .. })
    }
}

impl From<std::io::Error> for ChatliftError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ChatliftError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ChatliftError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, ChatliftError>`.
pub type Result<T> = std::result::Result<T, ChatliftError>;
