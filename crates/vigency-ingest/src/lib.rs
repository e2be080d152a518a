//! Ingestion of evaluation and visit records.
//!
//! Reads the two source tables (evaluations, visits) from CSV into untyped
//! raw records. Header names are matched against alias lists so that both
//! the English column names and the Portuguese names of the source
//! spreadsheets are accepted. No cleaning happens here beyond mapping
//! empty cells to `None`; normalization belongs to `vigency-core`.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use vigency_ingest::{read_evaluations, read_visits};
//!
//! let evaluations = read_evaluations(Path::new("data/avaliacoes.csv"))?;
//! let visits = read_visits(Path::new("data/atendimentos.csv"))?;
//! ```

mod csv;
mod error;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use csv::{
    ColumnRole, CsvHeaders, detect_delimiter, read_evaluations, read_evaluations_from_reader,
    read_visits, read_visits_from_reader,
};
