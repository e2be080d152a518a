use serde::{Deserialize, Serialize};

/// Grouping used by a summary table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryKind {
    Diagnosis,
    DiagnosisUnit,
    DiagnosisClinician,
    DiagnosisUnitClinician,
}

impl SummaryKind {
    pub const fn all() -> &'static [SummaryKind] {
        &[
            Self::Diagnosis,
            Self::DiagnosisUnit,
            Self::DiagnosisClinician,
            Self::DiagnosisUnitClinician,
        ]
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Diagnosis => "diagnosis",
            Self::DiagnosisUnit => "diagnosis x unit",
            Self::DiagnosisClinician => "diagnosis x clinician",
            Self::DiagnosisUnitClinician => "diagnosis x unit x clinician",
        }
    }

    pub const fn has_unit(&self) -> bool {
        matches!(self, Self::DiagnosisUnit | Self::DiagnosisUnitClinician)
    }

    pub const fn has_clinician(&self) -> bool {
        matches!(self, Self::DiagnosisClinician | Self::DiagnosisUnitClinician)
    }
}

/// One group of diagnosed visits and its size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub diagnosis: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinician: Option<String>,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryTable {
    pub kind: SummaryKind,
    pub rows: Vec<SummaryRow>,
}

impl SummaryTable {
    pub fn total(&self) -> u64 {
        self.rows.iter().map(|row| row.count).sum()
    }
}

/// Derived count tables over a set of resolved visits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryTables {
    pub by_diagnosis: SummaryTable,
    pub by_diagnosis_unit: SummaryTable,
    pub by_diagnosis_clinician: SummaryTable,
    pub by_diagnosis_unit_clinician: SummaryTable,
    pub total_visits: u64,
    pub diagnosed_visits: u64,
    pub undiagnosed_visits: u64,
}

impl SummaryTables {
    pub fn table(&self, kind: SummaryKind) -> &SummaryTable {
        match kind {
            SummaryKind::Diagnosis => &self.by_diagnosis,
            SummaryKind::DiagnosisUnit => &self.by_diagnosis_unit,
            SummaryKind::DiagnosisClinician => &self.by_diagnosis_clinician,
            SummaryKind::DiagnosisUnitClinician => &self.by_diagnosis_unit_clinician,
        }
    }
}
