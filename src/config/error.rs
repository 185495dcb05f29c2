//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors. All of these are fatal at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Routing rule for '{0}' has no primary and no fallback candidates")]
    EmptyRule(String),

    #[error("Duplicate routing category: {0}")]
    DuplicateCategory(String),

    #[error("Invalid value for '{field}': {message}")]
    Validation { field: String, message: String },
}
