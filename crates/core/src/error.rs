//! Error types for Stowage
//!
//! Only the configuration and persistence paths return errors to callers.
//! Bridges and accessors degrade to absence instead: a value that fails to
//! encode or decode becomes `None`, and the failure is logged at the call
//! site. The variants below are what those paths log or return.
//!
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use std::io;
use thiserror::Error;

/// Result type alias for Stowage operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Stowage
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (snapshot or config file access)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A typed value could not be encoded into a store value
    #[error("Encode error: {0}")]
    Encode(String),

    /// A store value could not be decoded into the requested type
    #[error("Decode error: {0}")]
    Decode(String),

    /// A store value had a different shape than the one requested
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Shape the caller asked for
        expected: &'static str,
        /// Shape actually found
        actual: &'static str,
    },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Snapshot file is unreadable or corrupt
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl Error {
    /// Build an encode error from any displayable cause
    pub fn encode(cause: impl std::fmt::Display) -> Self {
        Error::Encode(cause.to_string())
    }

    /// Build a decode error from any displayable cause
    pub fn decode(cause: impl std::fmt::Display) -> Self {
        Error::Decode(cause.to_string())
    }
}

impl From<bincode::Error> for Error {
    fn from(e: bincode::Error) -> Self {
        Error::Decode(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}
