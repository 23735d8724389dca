//! Common error types for OCF
//!
//! Field validation problems are never errors: they are carried as data in
//! [`FormErrors`](crate::model::FormErrors). This type covers the plumbing
//! around the controller (configuration, I/O).

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for OCF operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across OCF crates
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed TOML configuration file
    #[error("Failed to parse config file {path}: {source}")]
    TomlParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
