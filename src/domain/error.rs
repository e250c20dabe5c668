//! Error types for the marketplace client.
//!
//! This module defines the centralized error type [`MarketError`] and a type alias
//! [`Result`] used throughout the crate. All errors are implemented using the
//! `thiserror` crate for automatic `Error` trait implementation.

use thiserror::Error;

/// Unified error type for all marketplace operations.
///
/// Storage, worker and configuration failures are funnelled through this enum so
/// the event loop can degrade to "no results" plus a logged diagnostic instead of
/// aborting.
///
/// # Examples
///
/// ```
/// use listagain::domain::{MarketError, Result};
///
/// fn load_catalog() -> Result<()> {
///     Err(MarketError::Storage("catalog file is corrupt".to_string()))
/// }
///
/// assert!(load_catalog().is_err());
/// ```
#[derive(Debug, Error)]
pub enum MarketError {
    /// Data store operation failed (read, write, or decode).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem I/O failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Theme could not be loaded or parsed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// The background worker is gone or sent an unexpected reply.
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// Configuration value is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A referenced row does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The caller has no session or does not own the row it tried to change.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Caller input was rejected before reaching the store.
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Convenience alias for `Result<T, MarketError>`.
pub type Result<T> = std::result::Result<T, MarketError>;
