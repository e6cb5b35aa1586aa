//! Error types for loading import inputs.

use std::path::PathBuf;

use idef_model::DefinitionError;
use thiserror::Error;

/// Errors that can occur while loading definitions, mappings and source rows.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Parsing Errors ===
    #[error("failed to parse CSV {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The header row is missing or holds only blank names.
    #[error("no header row found in {path}")]
    EmptyHeader { path: PathBuf },

    #[error("failed to parse JSON {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    // === Definition Errors ===
    #[error("invalid import definition {path}: {source}")]
    InvalidDefinition {
        path: PathBuf,
        #[source]
        source: DefinitionError,
    },
}

impl IngestError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound { path }
        } else {
            Self::FileRead { path, source }
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
