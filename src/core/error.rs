//! Error types for config and enemy template loading.

use thiserror::Error;

/// Errors that can occur when loading RON data files.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// File could not be found.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// File could not be read.
    #[error("Failed to read file '{path}': {details}")]
    ReadError { path: String, details: String },

    /// RON parsing failed.
    #[error("Parse error in '{path}': {details}")]
    ParseError { path: String, details: String },

    /// Template parsed but its values make no sense.
    #[error("Invalid enemy template '{name}': {reason}")]
    InvalidTemplate { name: String, reason: String },
}
