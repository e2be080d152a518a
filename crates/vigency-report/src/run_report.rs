//! Machine-readable summary of a run.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;

use vigency_model::{
    NormalizationAudit, QaCategory, QaReport, QaSeverity, SummaryTables, VigencyOptions,
};

use crate::error::{ReportError, Result};

pub const REPORT_SCHEMA: &str = "vigency.run-report";
pub const REPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub schema: &'static str,
    pub schema_version: u32,
    pub generated_at: String,
    pub inputs: InputCounts,
    pub visits: VisitCounts,
    pub options: VigencyOptions,
    pub qa: Vec<QaEntry>,
    pub outputs: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputCounts {
    pub evaluation_rows: usize,
    pub evaluations_kept: usize,
    pub evaluation_rows_dropped: usize,
    pub same_day_discarded: usize,
    pub visit_rows: usize,
    pub visits_kept: usize,
    pub visit_rows_dropped: usize,
    pub patients_with_intervals: usize,
    pub intervals: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct VisitCounts {
    pub total: u64,
    pub diagnosed: u64,
    pub undiagnosed: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct QaEntry {
    pub category: QaCategory,
    pub label: &'static str,
    pub count: u64,
    pub detail: String,
    pub severity: QaSeverity,
}

/// Counts gathered by the pipeline for the report header.
#[derive(Debug, Clone, Copy)]
pub struct RunCounts<'a> {
    pub evaluation_audit: &'a NormalizationAudit,
    pub visit_audit: &'a NormalizationAudit,
    pub patients_with_intervals: usize,
    pub intervals: usize,
}

pub fn build_run_report(
    counts: RunCounts<'_>,
    summaries: &SummaryTables,
    qa: &QaReport,
    options: &VigencyOptions,
    outputs: Vec<String>,
) -> RunReport {
    RunReport {
        schema: REPORT_SCHEMA,
        schema_version: REPORT_SCHEMA_VERSION,
        generated_at: Utc::now().to_rfc3339(),
        inputs: InputCounts {
            evaluation_rows: counts.evaluation_audit.total_rows,
            evaluations_kept: counts.evaluation_audit.kept_rows,
            evaluation_rows_dropped: counts.evaluation_audit.total_dropped(),
            same_day_discarded: counts.evaluation_audit.same_day_discarded,
            visit_rows: counts.visit_audit.total_rows,
            visits_kept: counts.visit_audit.kept_rows,
            visit_rows_dropped: counts.visit_audit.total_dropped(),
            patients_with_intervals: counts.patients_with_intervals,
            intervals: counts.intervals,
        },
        visits: VisitCounts {
            total: summaries.total_visits,
            diagnosed: summaries.diagnosed_visits,
            undiagnosed: summaries.undiagnosed_visits,
        },
        options: options.clone(),
        qa: qa
            .items
            .iter()
            .map(|item| QaEntry {
                category: item.category,
                label: item.category.label(),
                count: item.count,
                detail: item.detail.clone(),
                severity: item.severity,
            })
            .collect(),
        outputs,
    }
}

/// Write the report as pretty JSON with a trailing newline.
pub fn write_run_report_json(path: &Path, report: &RunReport) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, format!("{json}\n")).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(path.to_path_buf())
}
