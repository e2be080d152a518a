//! Writing a full run to disk.

use std::fs;

use vigency_core::{
    NormalizedEvaluations, NormalizedVisits, VigencyIndex, normalize_evaluations,
    normalize_visits, resolve_visits, summarize,
};
use vigency_model::{
    QaCategory, QaItem, QaReport, RawEvaluation, RawVisit, ResolvedVisit, SummaryTables,
    VigencyOptions,
};
use vigency_report::{
    CLEAN_EVALUATIONS_FILE, CLEAN_VISITS_FILE, INTERVALS_FILE, REPORT_SCHEMA, ReportError,
    ReportInputs, RunCounts, summary_file_name, write_all,
};

fn raw_evaluation(row: usize, date: &str, diagnosis: &str, clinician: &str) -> RawEvaluation {
    RawEvaluation {
        row,
        evaluation_id: None,
        patient_id: Some("P".to_string()),
        eval_date: Some(date.to_string()),
        diagnosis: Some(diagnosis.to_string()),
        clinician: Some(clinician.to_string()),
    }
}

fn raw_visit(row: usize, date: &str) -> RawVisit {
    RawVisit {
        row,
        visit_id: Some((100 + row).to_string()),
        patient_id: Some("P".to_string()),
        visit_date: Some(date.to_string()),
        clinician: Some("Bia".to_string()),
        unit: Some("CAPS".to_string()),
    }
}

/// A small run: one patient, two evaluations, five visits.
struct Run {
    options: VigencyOptions,
    raw_evaluations: Vec<RawEvaluation>,
    raw_visits: Vec<RawVisit>,
    evaluations: NormalizedEvaluations,
    visits: NormalizedVisits,
    index: VigencyIndex,
    resolved: Vec<ResolvedVisit>,
    summaries: SummaryTables,
    qa: QaReport,
}

impl Run {
    fn new(options: VigencyOptions) -> Self {
        let raw_evaluations = vec![
            raw_evaluation(1, "2023-01-01", "DEPRESSION", "Dr. A"),
            raw_evaluation(2, "01/06/2023", "anxiety", "Dr. B"),
        ];
        let raw_visits = vec![
            raw_visit(1, "2022-12-01"),
            raw_visit(2, "2023-01-01"),
            raw_visit(3, "2023-05-01"),
            raw_visit(4, "2023-06-01"),
            raw_visit(5, "2023-12-01"),
        ];
        let evaluations = normalize_evaluations(&raw_evaluations, &options).unwrap();
        let visits = normalize_visits(&raw_visits, &options).unwrap();
        let index = VigencyIndex::build(&evaluations.evaluations, options.execution);
        let resolved = resolve_visits(&index, &visits.visits, options.execution);
        let summaries = summarize(&resolved);
        let qa = QaReport {
            items: vec![QaItem::flagged(
                QaCategory::UnresolvedVisits,
                1,
                "20.00% of 5 visits",
            )],
        };
        Self {
            options,
            raw_evaluations,
            raw_visits,
            evaluations,
            visits,
            index,
            resolved,
            summaries,
            qa,
        }
    }

    fn inputs(&self) -> ReportInputs<'_> {
        ReportInputs {
            resolved: &self.resolved,
            intervals: self.index.intervals(),
            evaluations: &self.evaluations.evaluations,
            raw_evaluations: &self.raw_evaluations,
            visits: &self.visits.visits,
            raw_visits: &self.raw_visits,
            summaries: &self.summaries,
            qa: &self.qa,
            counts: RunCounts {
                evaluation_audit: &self.evaluations.audit,
                visit_audit: &self.visits.audit,
                patients_with_intervals: self.index.patient_count(),
                intervals: self.index.len(),
            },
            options: &self.options,
        }
    }
}

#[test]
fn writes_every_output_file() {
    let run = Run::new(VigencyOptions::default());
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let written = write_all(&out, &run.inputs()).unwrap();

    assert_eq!(written.len(), 10);
    assert!(written.iter().all(|path| path.exists()));
    assert!(out.join(summary_file_name(vigency_model::SummaryKind::DiagnosisUnitClinician)).exists());

    let resolved_csv = fs::read_to_string(out.join("resolved_visits.csv")).unwrap();
    insta::assert_snapshot!(resolved_csv, @r"
    visit_id,patient_id,visit_date,clinician,unit,vigent_diagnosis,origin_eval_date,origin_clinician,source_evaluation_id
    101,P,2022-12-01,Bia,CAPS,NO_DIAGNOSIS,,,
    102,P,2023-01-01,Bia,CAPS,Depression,2023-01-01,Dr. A,1
    103,P,2023-05-01,Bia,CAPS,Depression,2023-01-01,Dr. A,1
    104,P,2023-06-01,Bia,CAPS,Anxiety,2023-06-01,Dr. B,2
    105,P,2023-12-01,Bia,CAPS,Anxiety,2023-06-01,Dr. B,2
    ");

    let intervals_csv = fs::read_to_string(out.join("vigency_intervals.csv")).unwrap();
    insta::assert_snapshot!(intervals_csv, @r"
    patient_id,start,end,diagnosis,clinician,source_evaluation_id
    P,2023-01-01,2023-06-01,Depression,Dr. A,1
    P,2023-06-01,,Anxiety,Dr. B,2
    ");

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("run_report.json")).unwrap()).unwrap();
    assert_eq!(report["schema"], REPORT_SCHEMA);
    assert_eq!(report["inputs"]["evaluation_rows"], 2);
    assert_eq!(report["visits"]["undiagnosed"], 1);
    assert_eq!(report["qa"][0]["category"], "unresolved_visits");
    assert_eq!(report["qa"][0]["severity"], "warning");
    assert_eq!(report["outputs"].as_array().map(Vec::len), Some(9));
}

#[test]
fn clean_tables_keep_source_cells() {
    let run = Run::new(VigencyOptions::default());
    let dir = tempfile::tempdir().unwrap();
    write_all(dir.path(), &run.inputs()).unwrap();

    let evaluations_csv = fs::read_to_string(dir.path().join(CLEAN_EVALUATIONS_FILE)).unwrap();
    insta::assert_snapshot!(evaluations_csv, @r"
    evaluation_id,patient_id,patient_id_raw,eval_date,eval_date_raw,diagnosis,diagnosis_raw,clinician,clinician_raw
    1,P,P,2023-01-01,2023-01-01,Depression,DEPRESSION,Dr. A,Dr. A
    2,P,P,2023-06-01,01/06/2023,Anxiety,anxiety,Dr. B,Dr. B
    ");

    let visits_csv = fs::read_to_string(dir.path().join(CLEAN_VISITS_FILE)).unwrap();
    let lines: Vec<&str> = visits_csv.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(
        lines[0],
        "visit_id,patient_id,patient_id_raw,visit_date,visit_date_raw,clinician,clinician_raw,unit,unit_raw"
    );
    assert_eq!(lines[1], "101,P,P,2022-12-01,2022-12-01,Bia,Bia,CAPS,CAPS");
}

#[test]
fn byte_order_mark_is_optional() {
    let dir = tempfile::tempdir().unwrap();
    let plain = dir.path().join("plain");
    let marked = dir.path().join("marked");
    write_all(&plain, &Run::new(VigencyOptions::default()).inputs()).unwrap();
    write_all(&marked, &Run::new(VigencyOptions::default().with_csv_bom(true)).inputs()).unwrap();

    let bom = [0xEF, 0xBB, 0xBF];
    let plain_csv = fs::read(plain.join(CLEAN_EVALUATIONS_FILE)).unwrap();
    let marked_csv = fs::read(marked.join(CLEAN_EVALUATIONS_FILE)).unwrap();
    assert!(!plain_csv.starts_with(&bom));
    assert!(marked_csv.starts_with(&bom));
    assert_eq!(&marked_csv[3..], plain_csv.as_slice());

    let report = fs::read(marked.join("run_report.json")).unwrap();
    assert!(report.starts_with(b"{"));
}

#[test]
fn blocked_output_dir_is_reported_with_its_path() {
    let run = Run::new(VigencyOptions::default());
    let dir = tempfile::tempdir().unwrap();
    let blocked = dir.path().join("out");
    fs::write(&blocked, "not a directory").unwrap();

    let error = write_all(&blocked, &run.inputs()).unwrap_err();
    assert!(matches!(error, ReportError::CreateDir { ref path, .. } if *path == blocked));
}

#[test]
fn unwritable_table_is_reported_with_its_path() {
    let run = Run::new(VigencyOptions::default());
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join(INTERVALS_FILE)).unwrap();

    let error = write_all(dir.path(), &run.inputs()).unwrap_err();
    match error {
        ReportError::Write { path, .. } => assert_eq!(path, dir.path().join(INTERVALS_FILE)),
        other => panic!("unexpected error: {other}"),
    }
    assert!(dir.path().join("resolved_visits.csv").exists());
}

#[test]
fn custom_sentinel_is_rendered() {
    let options = VigencyOptions::default().with_sentinel_label("SEM DIAGNÓSTICO");
    let evaluations =
        normalize_evaluations(&[raw_evaluation(1, "2023-01-01", "x", "")], &options).unwrap();
    let visits = normalize_visits(&[raw_visit(1, "2022-01-01")], &options).unwrap();
    let index = VigencyIndex::build(&evaluations.evaluations, options.execution);
    let resolved = resolve_visits(&index, &visits.visits, options.execution);

    let mut buffer = Vec::new();
    vigency_report::write_resolved_visits(&mut buffer, &resolved, &options.sentinel_label)
        .unwrap();
    let text = String::from_utf8(buffer).unwrap();
    assert!(text.contains(",SEM DIAGNÓSTICO,"));
}
