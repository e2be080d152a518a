use std::path::PathBuf;

use chrono::NaiveDate;

use vigency_model::{
    NormalizationAudit, PatientId, QaReport, SummaryTables, VigencyInterval, VigentDiagnosis,
};

#[derive(Debug)]
pub struct RunResult {
    /// `None` on a dry run.
    pub output_dir: Option<PathBuf>,
    pub written: Vec<PathBuf>,
    pub evaluation_audit: NormalizationAudit,
    pub visit_audit: NormalizationAudit,
    pub patients: usize,
    pub intervals: usize,
    pub summaries: SummaryTables,
    pub qa: QaReport,
    pub sentinel: String,
}

#[derive(Debug)]
pub struct LookupResult {
    pub patient: PatientId,
    pub date: NaiveDate,
    pub vigent: VigentDiagnosis,
    /// The patient's full interval history.
    pub intervals: Vec<VigencyInterval>,
    pub sentinel: String,
}
