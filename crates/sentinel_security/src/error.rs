//! # Security Error Types
//!
//! Detection never fails. Only configuration loading returns errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating detector configuration.
#[derive(Error, Debug)]
pub enum SecurityError {
    /// The configuration file could not be read.
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid TOML or does not match the schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for security configuration operations.
pub type SecurityResult<T> = Result<T, SecurityError>;
