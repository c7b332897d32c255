//! Error types for the doku-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the doku library.
#[derive(Error, Debug)]
pub enum DokuError {
    /// Template storage error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The requested group template is not available.
    #[error("group template not found: {0}")]
    GroupNotFound(String),

    /// JSON (de)serialization error outside of template storage.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to loading and saving templates.
///
/// A single unreadable or malformed file aborts the whole load.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The template directory or a template file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A template file does not contain a valid template.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A template could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A template could not be serialized.
    #[error("failed to serialize template {name}: {source}")]
    Serialize {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for the doku library.
pub type Result<T> = std::result::Result<T, DokuError>;
