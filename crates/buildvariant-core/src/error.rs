//! Error types for the buildvariant core library.

use std::path::PathBuf;

use thiserror::Error;

/// Core error type for build variant resolution.
#[derive(Error, Debug)]
pub enum VariantError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed properties file {path} (line {line}): {message}")]
    MalformedProperties {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Unknown flavor '{0}' (expected one of: dev, staging, prod)")]
    UnknownFlavor(String),

    #[error("Unknown build type '{0}' (expected one of: debug, release)")]
    UnknownBuildType(String),

    #[error("Release signing is incomplete, missing: {}", .missing.join(", "))]
    IncompleteSigning { missing: Vec<&'static str> },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type alias for buildvariant operations.
pub type Result<T> = std::result::Result<T, VariantError>;
