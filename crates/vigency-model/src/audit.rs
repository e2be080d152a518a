//! Row accounting for the normalization stage.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Which of the two required inputs a record or count belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Evaluations,
    Visits,
}

impl InputKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Evaluations => "evaluations",
            Self::Visits => "visits",
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a raw row did not make it into the clean record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    MissingPatient,
    MissingDate,
    MissingDiagnosis,
    UnparseableDate,
    InvalidIdentifier,
    DuplicateIdentifier,
}

impl DropReason {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::MissingPatient => "missing patient",
            Self::MissingDate => "missing date",
            Self::MissingDiagnosis => "missing diagnosis",
            Self::UnparseableDate => "unparseable date",
            Self::InvalidIdentifier => "invalid identifier",
            Self::DuplicateIdentifier => "duplicate identifier",
        }
    }

    /// True for the reasons that amount to a required field being absent.
    pub const fn is_missing_field(&self) -> bool {
        matches!(
            self,
            Self::MissingPatient | Self::MissingDate | Self::MissingDiagnosis
        )
    }
}

/// Counts produced while normalizing one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationAudit {
    pub input: InputKind,
    /// Raw rows read.
    pub total_rows: usize,
    /// Rows in the clean output.
    pub kept_rows: usize,
    /// Rows dropped, by reason.
    pub dropped: BTreeMap<DropReason, usize>,
    /// Evaluations discarded by the same-day tie-break.
    pub same_day_discarded: usize,
    /// Distinct `(patient, day)` groups that had more than one evaluation.
    pub same_day_groups: usize,
}

impl NormalizationAudit {
    pub fn new(input: InputKind, total_rows: usize) -> Self {
        Self {
            input,
            total_rows,
            kept_rows: 0,
            dropped: BTreeMap::new(),
            same_day_discarded: 0,
            same_day_groups: 0,
        }
    }

    pub fn record_drop(&mut self, reason: DropReason) {
        *self.dropped.entry(reason).or_insert(0) += 1;
    }

    pub fn dropped_count(&self, reason: DropReason) -> usize {
        self.dropped.get(&reason).copied().unwrap_or(0)
    }

    pub fn total_dropped(&self) -> usize {
        self.dropped.values().sum()
    }

    pub fn missing_field_count(&self) -> usize {
        self.dropped
            .iter()
            .filter(|(reason, _)| reason.is_missing_field())
            .map(|(_, count)| count)
            .sum()
    }

    pub fn invalid_id_count(&self) -> usize {
        self.dropped_count(DropReason::InvalidIdentifier)
            + self.dropped_count(DropReason::DuplicateIdentifier)
    }
}
