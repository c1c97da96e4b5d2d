//! Error types for the reconciliation core
//!
//! Only configuration errors are allowed to fail the process; everything
//! per-connection is logged and swallowed by the hook binary so the VPN
//! daemon's hook contract is never violated.

use thiserror::Error;

/// Result type alias for reconciliation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (fatal at startup)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unparsable address text
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// External updater failed (spawn failure, non-zero exit, timeout)
    #[error("Updater error: {0}")]
    Dispatch(String),

    /// I/O errors (config file access, subprocess plumbing)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON configuration parse errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid-address error
    pub fn invalid_address(msg: impl Into<String>) -> Self {
        Self::InvalidAddress(msg.into())
    }

    /// Create a dispatch error
    pub fn dispatch(msg: impl Into<String>) -> Self {
        Self::Dispatch(msg.into())
    }
}
