//! Raw and normalized input records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ids::{EvaluationId, PatientId, VisitId};

/// An evaluation row as supplied by ingestion: untyped text, any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvaluation {
    /// 1-based position in the source.
    pub row: usize,
    pub evaluation_id: Option<String>,
    pub patient_id: Option<String>,
    pub eval_date: Option<String>,
    pub diagnosis: Option<String>,
    pub clinician: Option<String>,
}

/// A visit row as supplied by ingestion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawVisit {
    /// 1-based position in the source.
    pub row: usize,
    pub visit_id: Option<String>,
    pub patient_id: Option<String>,
    pub visit_date: Option<String>,
    pub clinician: Option<String>,
    pub unit: Option<String>,
}

/// A normalized evaluation: every field populated, diagnosis in canonical case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub evaluation_id: EvaluationId,
    /// Row of the [`RawEvaluation`] this was cleaned from.
    pub source_row: usize,
    pub patient_id: PatientId,
    pub eval_date: NaiveDate,
    pub diagnosis: String,
    pub clinician: String,
}

/// A normalized visit. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    pub visit_id: VisitId,
    /// Row of the [`RawVisit`] this was cleaned from.
    pub source_row: usize,
    pub patient_id: PatientId,
    pub visit_date: NaiveDate,
    pub clinician: String,
    pub unit: String,
}
