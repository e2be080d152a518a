//! CSV renderings of the run's record sets and summaries.
//!
//! Every writer takes any `io::Write`; dates render as `YYYY-MM-DD` and
//! absent values (open interval ends, missing provenance) as empty cells.
//! The clean evaluation and visit tables carry each source cell in a `*_raw`
//! column next to its cleaned value.

use std::collections::HashMap;
use std::io::Write;

use serde::Serialize;

use vigency_core::format_date;
use vigency_model::{
    Evaluation, QaCategory, QaReport, RawEvaluation, RawVisit, ResolvedVisit, SummaryKind,
    SummaryTable, VigencyInterval, VigentDiagnosis, Visit,
};

use crate::error::Result;

#[derive(Serialize)]
struct ResolvedVisitRow<'a> {
    visit_id: i64,
    patient_id: &'a str,
    visit_date: String,
    clinician: &'a str,
    unit: &'a str,
    vigent_diagnosis: &'a str,
    origin_eval_date: Option<String>,
    origin_clinician: Option<&'a str>,
    source_evaluation_id: Option<i64>,
}

#[derive(Serialize)]
struct IntervalRow<'a> {
    patient_id: &'a str,
    start: String,
    end: Option<String>,
    diagnosis: &'a str,
    clinician: &'a str,
    source_evaluation_id: i64,
}

#[derive(Serialize)]
struct EvaluationRow<'a> {
    evaluation_id: i64,
    patient_id: &'a str,
    patient_id_raw: Option<&'a str>,
    eval_date: String,
    eval_date_raw: Option<&'a str>,
    diagnosis: &'a str,
    diagnosis_raw: Option<&'a str>,
    clinician: &'a str,
    clinician_raw: Option<&'a str>,
}

const EVALUATION_HEADER: [&str; 9] = [
    "evaluation_id",
    "patient_id",
    "patient_id_raw",
    "eval_date",
    "eval_date_raw",
    "diagnosis",
    "diagnosis_raw",
    "clinician",
    "clinician_raw",
];

#[derive(Serialize)]
struct VisitRow<'a> {
    visit_id: i64,
    patient_id: &'a str,
    patient_id_raw: Option<&'a str>,
    visit_date: String,
    visit_date_raw: Option<&'a str>,
    clinician: &'a str,
    clinician_raw: Option<&'a str>,
    unit: &'a str,
    unit_raw: Option<&'a str>,
}

const VISIT_HEADER: [&str; 9] = [
    "visit_id",
    "patient_id",
    "patient_id_raw",
    "visit_date",
    "visit_date_raw",
    "clinician",
    "clinician_raw",
    "unit",
    "unit_raw",
];

#[derive(Serialize)]
struct QaRow<'a> {
    category: QaCategory,
    label: &'a str,
    count: u64,
    detail: &'a str,
    severity: &'a str,
}

/// One row per resolved visit; `sentinel` labels visits with no diagnosis.
pub fn write_resolved_visits<W: Write>(
    writer: W,
    resolved: &[ResolvedVisit],
    sentinel: &str,
) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for r in resolved {
        let source_evaluation_id = match &r.vigent {
            VigentDiagnosis::Diagnosed {
                source_evaluation_id,
                ..
            } => Some(source_evaluation_id.0),
            VigentDiagnosis::NoDiagnosis => None,
        };
        csv.serialize(ResolvedVisitRow {
            visit_id: r.visit.visit_id.0,
            patient_id: r.visit.patient_id.as_str(),
            visit_date: format_date(r.visit.visit_date),
            clinician: &r.visit.clinician,
            unit: &r.visit.unit,
            vigent_diagnosis: r.vigent.label(sentinel),
            origin_eval_date: r.vigent.origin_eval_date().map(format_date),
            origin_clinician: r.vigent.origin_clinician(),
            source_evaluation_id,
        })?;
    }
    if resolved.is_empty() {
        csv.write_record([
            "visit_id",
            "patient_id",
            "visit_date",
            "clinician",
            "unit",
            "vigent_diagnosis",
            "origin_eval_date",
            "origin_clinician",
            "source_evaluation_id",
        ])?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn write_intervals<W: Write>(writer: W, intervals: &[VigencyInterval]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for interval in intervals {
        csv.serialize(IntervalRow {
            patient_id: interval.patient_id.as_str(),
            start: format_date(interval.start),
            end: interval.end.map(format_date),
            diagnosis: &interval.diagnosis,
            clinician: &interval.clinician,
            source_evaluation_id: interval.source_evaluation_id.0,
        })?;
    }
    if intervals.is_empty() {
        csv.write_record([
            "patient_id",
            "start",
            "end",
            "diagnosis",
            "clinician",
            "source_evaluation_id",
        ])?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Clean evaluations beside their source cells, matched on source row.
pub fn write_clean_evaluations<W: Write>(
    writer: W,
    evaluations: &[Evaluation],
    raw: &[RawEvaluation],
) -> Result<()> {
    let sources = by_source_row(raw, |row| row.row);
    let mut csv = csv::Writer::from_writer(writer);
    for evaluation in evaluations {
        let source = sources.get(&evaluation.source_row).copied();
        csv.serialize(EvaluationRow {
            evaluation_id: evaluation.evaluation_id.0,
            patient_id: evaluation.patient_id.as_str(),
            patient_id_raw: source.and_then(|r| r.patient_id.as_deref()),
            eval_date: format_date(evaluation.eval_date),
            eval_date_raw: source.and_then(|r| r.eval_date.as_deref()),
            diagnosis: &evaluation.diagnosis,
            diagnosis_raw: source.and_then(|r| r.diagnosis.as_deref()),
            clinician: &evaluation.clinician,
            clinician_raw: source.and_then(|r| r.clinician.as_deref()),
        })?;
    }
    if evaluations.is_empty() {
        csv.write_record(EVALUATION_HEADER)?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Clean visits in input order beside their source cells.
pub fn write_clean_visits<W: Write>(writer: W, visits: &[Visit], raw: &[RawVisit]) -> Result<()> {
    let sources = by_source_row(raw, |row| row.row);
    let mut csv = csv::Writer::from_writer(writer);
    for visit in visits {
        let source = sources.get(&visit.source_row).copied();
        csv.serialize(VisitRow {
            visit_id: visit.visit_id.0,
            patient_id: visit.patient_id.as_str(),
            patient_id_raw: source.and_then(|r| r.patient_id.as_deref()),
            visit_date: format_date(visit.visit_date),
            visit_date_raw: source.and_then(|r| r.visit_date.as_deref()),
            clinician: &visit.clinician,
            clinician_raw: source.and_then(|r| r.clinician.as_deref()),
            unit: &visit.unit,
            unit_raw: source.and_then(|r| r.unit.as_deref()),
        })?;
    }
    if visits.is_empty() {
        csv.write_record(VISIT_HEADER)?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

fn by_source_row<T>(raw: &[T], row: impl Fn(&T) -> usize) -> HashMap<usize, &T> {
    raw.iter().map(|record| (row(record), record)).collect()
}

/// Write a summary table; the columns depend on its grouping.
pub fn write_summary_table<W: Write>(writer: W, table: &SummaryTable) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(summary_header(table.kind))?;
    for row in &table.rows {
        let mut record = vec![row.diagnosis.clone()];
        if table.kind.has_unit() {
            record.push(row.unit.clone().unwrap_or_default());
        }
        if table.kind.has_clinician() {
            record.push(row.clinician.clone().unwrap_or_default());
        }
        record.push(row.count.to_string());
        csv.write_record(&record)?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn write_qa_report<W: Write>(writer: W, report: &QaReport) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for item in &report.items {
        csv.serialize(QaRow {
            category: item.category,
            label: item.category.label(),
            count: item.count,
            detail: &item.detail,
            severity: item.severity.label(),
        })?;
    }
    if report.items.is_empty() {
        csv.write_record(["category", "label", "count", "detail", "severity"])?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

fn summary_header(kind: SummaryKind) -> Vec<&'static str> {
    let mut header = vec!["diagnosis"];
    if kind.has_unit() {
        header.push("unit");
    }
    if kind.has_clinician() {
        header.push("clinician");
    }
    header.push("count");
    header
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use vigency_model::{EvaluationId, PatientId, SummaryRow, VisitId};

    use super::*;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buffer = Vec::new();
        f(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn open_interval_end_is_an_empty_cell() {
        let interval = VigencyInterval {
            patient_id: PatientId::new("P1").unwrap(),
            start: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            end: None,
            diagnosis: "Anxiety".to_string(),
            clinician: "Dr. B".to_string(),
            source_evaluation_id: EvaluationId(2),
        };
        let out = render(|buf| write_intervals(buf, std::slice::from_ref(&interval)));
        assert_eq!(
            out,
            "patient_id,start,end,diagnosis,clinician,source_evaluation_id\n\
             P1,2023-06-01,,Anxiety,Dr. B,2\n"
        );
    }

    #[test]
    fn summary_columns_follow_grouping() {
        let table = SummaryTable {
            kind: SummaryKind::DiagnosisClinician,
            rows: vec![SummaryRow {
                diagnosis: "Anxiety".to_string(),
                unit: None,
                clinician: Some("Ana".to_string()),
                count: 4,
            }],
        };
        let out = render(|buf| write_summary_table(buf, &table));
        assert_eq!(out, "diagnosis,clinician,count\nAnxiety,Ana,4\n");
    }

    #[test]
    fn empty_tables_still_have_headers() {
        let out = render(|buf| write_clean_evaluations(buf, &[], &[]));
        assert_eq!(
            out,
            "evaluation_id,patient_id,patient_id_raw,eval_date,eval_date_raw,\
             diagnosis,diagnosis_raw,clinician,clinician_raw\n"
        );
        let out = render(|buf| write_clean_visits(buf, &[], &[]));
        assert_eq!(out, format!("{}\n", VISIT_HEADER.join(",")));
    }

    #[test]
    fn clean_visits_show_source_cells() {
        let visit = Visit {
            visit_id: VisitId(3),
            source_row: 7,
            patient_id: PatientId::new("P1").unwrap(),
            visit_date: NaiveDate::from_ymd_opt(2023, 4, 5).unwrap(),
            clinician: "Ana".to_string(),
            unit: String::new(),
        };
        let raw = RawVisit {
            row: 7,
            visit_id: Some("3.0".to_string()),
            patient_id: Some("P1".to_string()),
            visit_date: Some("05/04/2023 10:00".to_string()),
            clinician: Some("Ana".to_string()),
            unit: Some("nan".to_string()),
        };
        let out = render(|buf| write_clean_visits(buf, std::slice::from_ref(&visit), &[raw]));
        assert_eq!(
            out.lines().nth(1),
            Some("3,P1,P1,2023-04-05,05/04/2023 10:00,Ana,Ana,,nan")
        );
    }
}
