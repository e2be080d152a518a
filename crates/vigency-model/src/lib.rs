//! Data model for diagnosis vigency assignment.
//!
//! A patient's evaluations establish which diagnosis is current from a given
//! day onward. Visits are tagged with the diagnosis that was current on the
//! day they happened. This crate holds the record shapes exchanged between
//! the ingestion, core, validation and report crates.

pub mod audit;
pub mod error;
pub mod ids;
pub mod options;
pub mod qa;
pub mod records;
pub mod summary;
pub mod vigency;

pub use audit::{DropReason, InputKind, NormalizationAudit};
pub use error::{Result, VigencyError};
pub use ids::{EvaluationId, PatientId, VisitId};
pub use options::{DateOrder, ExecutionMode, VigencyOptions};
pub use qa::{QaCategory, QaItem, QaReport, QaSeverity};
pub use records::{Evaluation, RawEvaluation, RawVisit, Visit};
pub use summary::{SummaryKind, SummaryRow, SummaryTable, SummaryTables};
pub use vigency::{NO_DIAGNOSIS, ResolvedVisit, VigencyInterval, VigentDiagnosis};
