//! CSV header normalization and column alias resolution.

/// A column the ingestion layer knows how to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    EvaluationId,
    VisitId,
    Patient,
    EvaluationDate,
    VisitDate,
    Diagnosis,
    Clinician,
    Unit,
}

impl ColumnRole {
    /// Accepted header names, in priority order, already normalized.
    pub const fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::EvaluationId => &["evaluation_id", "avaliacao_id", "id"],
            Self::VisitId => &["visit_id", "atendimento_id", "id"],
            Self::Patient => &["patient_id", "patient", "paciente_id", "paciente"],
            Self::EvaluationDate => &["eval_date", "data_avaliacao", "date", "data"],
            Self::VisitDate => &["visit_date", "data_atendimento", "date", "data"],
            Self::Diagnosis => &["diagnosis", "diagnostico", "diagnóstico"],
            Self::Clinician => &[
                "clinician",
                "profissional_avaliacao",
                "profissional_atendimento",
                "profissional",
            ],
            Self::Unit => &["unit", "unidade"],
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::EvaluationId => "evaluation id",
            Self::VisitId => "visit id",
            Self::Patient => "patient",
            Self::EvaluationDate | Self::VisitDate => "date",
            Self::Diagnosis => "diagnosis",
            Self::Clinician => "clinician",
            Self::Unit => "unit",
        }
    }

    pub fn alias_list(&self) -> String {
        self.aliases().join(", ")
    }
}

/// Normalized header row of a source table.
#[derive(Debug, Clone)]
pub struct CsvHeaders {
    /// Normalized column names, in file order.
    pub columns: Vec<String>,
}

impl CsvHeaders {
    pub fn new<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            columns: raw
                .into_iter()
                .map(|value| normalize_header(value.as_ref()))
                .collect(),
        }
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if there are no named columns.
    pub fn is_empty(&self) -> bool {
        self.columns.iter().all(String::is_empty)
    }

    /// Position of the first column matching one of the role's aliases.
    ///
    /// Aliases are tried in priority order, so `visit_id` wins over a bare `id`.
    pub fn position(&self, role: ColumnRole) -> Option<usize> {
        role.aliases()
            .iter()
            .find_map(|alias| self.columns.iter().position(|column| column == alias))
    }
}

/// Normalizes a header: strips a BOM, trims, lowercases, and joins words with `_`.
pub fn normalize_header(value: &str) -> String {
    value
        .trim_matches('\u{feff}')
        .trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}
