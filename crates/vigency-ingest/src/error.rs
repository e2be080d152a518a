//! Error types for record ingestion.

use std::path::PathBuf;
use thiserror::Error;

use vigency_model::InputKind;

/// Errors that can occur while reading source tables.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// CSV file not found.
    #[error("CSV file not found for {input}: {path}")]
    FileNotFound { input: InputKind, path: PathBuf },

    /// Failed to read file.
    #[error("failed to read {input} file {path}: {source}")]
    FileRead {
        input: InputKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === CSV Parsing Errors ===
    /// Malformed CSV content.
    #[error("failed to parse {input} CSV {source_name}: {source}")]
    CsvParse {
        input: InputKind,
        source_name: String,
        #[source]
        source: ::csv::Error,
    },

    /// Header row is missing or blank.
    #[error("{input} CSV {source_name} has no header row")]
    NoHeader {
        input: InputKind,
        source_name: String,
    },

    // === Schema Errors ===
    /// A required column could not be matched by any alias.
    #[error("required {column} column not found in {input} CSV {source_name} (accepted: {aliases})")]
    MissingColumn {
        input: InputKind,
        column: &'static str,
        aliases: String,
        source_name: String,
    },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
