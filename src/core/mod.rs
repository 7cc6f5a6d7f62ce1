use std::{
    fmt, io,
    path::{Path, PathBuf},
    result,
};

use thiserror::Error;

use crate::services::{mpris::MediaError, remote::RemoteError};

/// Error types for the bridge.
///
/// Covers configuration loading and validation, plus the failures of the
/// services the bridge wires together.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// No serial device was configured by file, environment or flag
    #[error("no serial device configured: set [serial] device, TTY_PATH or --device")]
    MissingDevicePath,

    /// Configuration field missing or invalid
    #[error("invalid config field '{field}' in {component}: {reason}")]
    InvalidConfigField {
        /// The field that is invalid
        field: String,
        /// Component containing the field
        component: String,
        /// Reason why the field is invalid
        reason: String,
    },

    /// I/O operation error
    #[error("I/O error on '{path}': {details}")]
    IoError {
        /// Path where I/O error occurred
        path: PathBuf,
        /// I/O error details
        details: String,
    },

    /// Standard I/O operation error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// TOML parsing error with location context
    #[error("failed to parse TOML at '{location}': {details}")]
    TomlParseError {
        /// Location of TOML being parsed (file path or "string")
        location: String,
        /// Parse error details
        details: String,
    },

    /// Media player service error
    #[error(transparent)]
    Media(#[from] MediaError),

    /// Serial remote error
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// A specialized `Result` type for bridge operations.
pub type Result<T> = result::Result<T, BridgeError>;

impl BridgeError {
    /// Creates a TOML parsing error with optional file path context.
    ///
    /// # Arguments
    ///
    /// * `error` - The underlying parsing error
    /// * `path` - Optional path to the file that failed to parse
    pub fn toml_parse(error: impl fmt::Display, path: Option<&Path>) -> Self {
        let location = match path {
            Some(p) => {
                let clean_path = p.canonicalize().unwrap_or_else(|_| p.to_path_buf());
                clean_path.to_string_lossy().to_string()
            }
            None => "string".to_string(),
        };

        BridgeError::TomlParseError {
            location,
            details: error.to_string(),
        }
    }

    /// Creates an I/O error carrying the path it happened on.
    pub fn io(error: impl fmt::Display, path: &Path) -> Self {
        BridgeError::IoError {
            path: path.to_path_buf(),
            details: error.to_string(),
        }
    }
}
