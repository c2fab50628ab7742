//! Error types for the transform crate.
//!
//! The decision path itself never fails; these errors only cover loading
//! compilation units and type snapshots from disk.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Error loading a compilation unit or type snapshot.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Malformed snapshot JSON.
    #[error("Invalid snapshot JSON in {file}: {source}")]
    Json {
        file: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// IO error reading a snapshot.
    #[error("Failed to read {file}: {source}")]
    Io {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A type references a definition the snapshot does not contain.
    #[error("Type '{referenced_by}' references unknown type '{name}'")]
    UnknownReference { referenced_by: String, name: String },
}
