//! Export of a vigency run.
//!
//! Writes the resolved visits, interval table, clean evaluations and visits,
//! the four summary tables and the QA checklist as CSV, plus a JSON run
//! report. CSV files optionally start with a UTF-8 byte order mark.

mod error;
mod run_report;
mod tables;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use vigency_model::{
    Evaluation, QaReport, RawEvaluation, RawVisit, ResolvedVisit, SummaryKind, SummaryTables,
    VigencyInterval, VigencyOptions, Visit,
};

pub use error::{ReportError, Result};
pub use run_report::{
    InputCounts, QaEntry, REPORT_SCHEMA, REPORT_SCHEMA_VERSION, RunCounts, RunReport,
    VisitCounts, build_run_report, write_run_report_json,
};
pub use tables::{
    write_clean_evaluations, write_clean_visits, write_intervals, write_qa_report,
    write_resolved_visits, write_summary_table,
};

pub const RESOLVED_VISITS_FILE: &str = "resolved_visits.csv";
pub const INTERVALS_FILE: &str = "vigency_intervals.csv";
pub const CLEAN_EVALUATIONS_FILE: &str = "clean_evaluations.csv";
pub const CLEAN_VISITS_FILE: &str = "clean_visits.csv";
pub const QA_REPORT_FILE: &str = "qa_report.csv";
pub const RUN_REPORT_FILE: &str = "run_report.json";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// File name for a summary table.
pub const fn summary_file_name(kind: SummaryKind) -> &'static str {
    match kind {
        SummaryKind::Diagnosis => "summary_diagnosis.csv",
        SummaryKind::DiagnosisUnit => "summary_diagnosis_unit.csv",
        SummaryKind::DiagnosisClinician => "summary_diagnosis_clinician.csv",
        SummaryKind::DiagnosisUnitClinician => "summary_diagnosis_unit_clinician.csv",
    }
}

/// Everything a run exports.
#[derive(Debug, Clone, Copy)]
pub struct ReportInputs<'a> {
    pub resolved: &'a [ResolvedVisit],
    pub intervals: &'a [VigencyInterval],
    pub evaluations: &'a [Evaluation],
    pub raw_evaluations: &'a [RawEvaluation],
    pub visits: &'a [Visit],
    pub raw_visits: &'a [RawVisit],
    pub summaries: &'a SummaryTables,
    pub qa: &'a QaReport,
    pub counts: RunCounts<'a>,
    pub options: &'a VigencyOptions,
}

/// Write every output into `output_dir`, creating it if needed.
///
/// Returns the written paths in write order, run report last.
pub fn write_all(output_dir: &Path, inputs: &ReportInputs<'_>) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir).map_err(|source| ReportError::CreateDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::new();
    let sentinel = inputs.options.sentinel_label.as_str();
    let bom = inputs.options.csv_bom;
    written.push(write_file(output_dir, RESOLVED_VISITS_FILE, bom, |file| {
        write_resolved_visits(file, inputs.resolved, sentinel)
    })?);
    written.push(write_file(output_dir, INTERVALS_FILE, bom, |file| {
        write_intervals(file, inputs.intervals)
    })?);
    written.push(write_file(output_dir, CLEAN_EVALUATIONS_FILE, bom, |file| {
        write_clean_evaluations(file, inputs.evaluations, inputs.raw_evaluations)
    })?);
    written.push(write_file(output_dir, CLEAN_VISITS_FILE, bom, |file| {
        write_clean_visits(file, inputs.visits, inputs.raw_visits)
    })?);
    for kind in SummaryKind::all() {
        let table = inputs.summaries.table(*kind);
        written.push(write_file(output_dir, summary_file_name(*kind), bom, |file| {
            write_summary_table(file, table)
        })?);
    }
    written.push(write_file(output_dir, QA_REPORT_FILE, bom, |file| {
        write_qa_report(file, inputs.qa)
    })?);

    let outputs = written
        .iter()
        .filter_map(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect();
    let report = build_run_report(
        inputs.counts,
        inputs.summaries,
        inputs.qa,
        inputs.options,
        outputs,
    );
    written.push(write_run_report_json(
        &output_dir.join(RUN_REPORT_FILE),
        &report,
    )?);

    debug!(files = written.len(), dir = %output_dir.display(), "wrote outputs");
    Ok(written)
}

fn write_file(
    dir: &Path,
    name: &str,
    bom: bool,
    write: impl FnOnce(BufWriter<File>) -> Result<()>,
) -> Result<PathBuf> {
    let path = dir.join(name);
    let io_error = |source: std::io::Error| ReportError::Write {
        path: path.clone(),
        source,
    };
    let mut file = BufWriter::new(File::create(&path).map_err(io_error)?);
    if bom {
        file.write_all(UTF8_BOM).map_err(io_error)?;
    }
    write(file).map_err(|error| error.at_path(&path))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_failures_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let error = write_file(dir.path(), "broken.csv", false, |_| {
            Err(csv::Error::from(std::io::Error::other("disk full")).into())
        })
        .unwrap_err();
        assert!(matches!(error, ReportError::WriteCsv { ref path, .. } if path.ends_with("broken.csv")));
        assert!(error.to_string().contains("broken.csv"), "{error}");
    }

    #[test]
    fn bom_precedes_the_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "t.csv", true, |mut file| {
            file.write_all(b"a,b\n").map_err(csv::Error::from)?;
            file.flush().map_err(csv::Error::from)?;
            Ok(())
        })
        .unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"\xEF\xBB\xBFa,b\n");
    }
}
