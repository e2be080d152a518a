//! Checklist behaviour over a small hand-built run.

use chrono::NaiveDate;

use vigency_model::{
    DropReason, Evaluation, EvaluationId, InputKind, NormalizationAudit, PatientId, QaCategory,
    QaSeverity, ResolvedVisit, VigencyOptions, VigentDiagnosis, Visit, VisitId,
};
use vigency_validate::{QaInput, run_qa};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn patient(id: &str) -> PatientId {
    PatientId::new(id).unwrap()
}

fn evaluation(id: i64, who: &str, on: NaiveDate) -> Evaluation {
    Evaluation {
        evaluation_id: EvaluationId(id),
        source_row: id as usize,
        patient_id: patient(who),
        eval_date: on,
        diagnosis: "Depression".to_string(),
        clinician: "Ana".to_string(),
    }
}

fn resolved(id: i64, who: &str, on: NaiveDate, diagnosed: bool) -> ResolvedVisit {
    ResolvedVisit {
        visit: Visit {
            visit_id: VisitId(id),
            source_row: id as usize,
            patient_id: patient(who),
            visit_date: on,
            clinician: "Bia".to_string(),
            unit: "CAPS".to_string(),
        },
        vigent: if diagnosed {
            VigentDiagnosis::Diagnosed {
                diagnosis: "Depression".to_string(),
                origin_eval_date: date(2023, 1, 1),
                origin_clinician: "Ana".to_string(),
                source_evaluation_id: EvaluationId(1),
            }
        } else {
            VigentDiagnosis::NoDiagnosis
        },
    }
}

struct Fixture {
    evaluations: Vec<Evaluation>,
    resolved: Vec<ResolvedVisit>,
    evaluation_audit: NormalizationAudit,
    visit_audit: NormalizationAudit,
    options: VigencyOptions,
}

impl Fixture {
    fn new() -> Self {
        let evaluations = vec![
            evaluation(1, "P1", date(2023, 1, 1)),
            evaluation(2, "P1", date(2023, 6, 1)),
        ];
        let resolved = vec![
            resolved(1, "P1", date(2022, 12, 1), false),
            resolved(2, "P1", date(2023, 2, 1), true),
            resolved(3, "P1", date(2023, 2, 1), true),
            resolved(4, "P1", date(2023, 2, 1), true),
            resolved(5, "P2", date(2023, 3, 1), false),
            resolved(6, "P1", date(2024, 8, 1), true),
        ];
        let mut evaluation_audit = NormalizationAudit::new(InputKind::Evaluations, 5);
        evaluation_audit.record_drop(DropReason::MissingDiagnosis);
        evaluation_audit.same_day_discarded = 2;
        evaluation_audit.same_day_groups = 1;
        evaluation_audit.kept_rows = 2;
        let mut visit_audit = NormalizationAudit::new(InputKind::Visits, 6);
        visit_audit.kept_rows = 6;
        Self {
            evaluations,
            resolved,
            evaluation_audit,
            visit_audit,
            options: VigencyOptions::default(),
        }
    }

    fn input(&self) -> QaInput<'_> {
        QaInput {
            resolved: &self.resolved,
            evaluations: &self.evaluations,
            evaluation_audit: &self.evaluation_audit,
            visit_audit: &self.visit_audit,
            options: &self.options,
        }
    }
}

#[test]
fn items_follow_checklist_order() {
    let fixture = Fixture::new();
    let report = run_qa(&fixture.input());
    let categories: Vec<QaCategory> = report.items.iter().map(|item| item.category).collect();
    assert_eq!(categories, QaCategory::all());
}

#[test]
fn counts_and_details() {
    let fixture = Fixture::new();
    let report = run_qa(&fixture.input());

    let unresolved = report.get(QaCategory::UnresolvedVisits).unwrap();
    assert_eq!(unresolved.count, 2);
    assert_eq!(unresolved.detail, "33.33% of 6 visits");
    assert_eq!(unresolved.severity, QaSeverity::Warning);

    let duplicates = report.get(QaCategory::DuplicateVisitKeys).unwrap();
    assert_eq!(duplicates.count, 1);
    assert_eq!(duplicates.detail, "2 surplus rows");

    assert_eq!(report.count(QaCategory::SameDayEvaluations), 2);

    let orphans = report.get(QaCategory::PatientsWithoutEvaluations).unwrap();
    assert_eq!(orphans.count, 1);
    assert_eq!(orphans.detail, "50.00% of 2 visit patients");

    let dropped = report.get(QaCategory::DroppedEvaluationRows).unwrap();
    assert_eq!(dropped.count, 1);
    assert_eq!(dropped.detail, "missing diagnosis: 1 of 5 rows");

    let dropped_visits = report.get(QaCategory::DroppedVisitRows).unwrap();
    assert_eq!(dropped_visits.count, 0);
    assert_eq!(dropped_visits.severity, QaSeverity::Info);

    let range = report.get(QaCategory::DateRangeSanity).unwrap();
    assert_eq!(range.count, 2);
    assert!(range.detail.starts_with("1 before first evaluation (2023-01-01); 1 more than 365 days"));

    let period = report.get(QaCategory::VisitPeriod).unwrap();
    assert_eq!(period.count, 609);
    assert_eq!(period.detail, "2022-12-01 to 2024-08-01");
    assert_eq!(period.severity, QaSeverity::Info);
}

#[test]
fn threshold_controls_late_visit_flag() {
    let mut fixture = Fixture::new();
    fixture.options = VigencyOptions::default().with_late_visit_threshold_days(500);
    let report = run_qa(&fixture.input());
    assert_eq!(report.count(QaCategory::DateRangeSanity), 1);
}

#[test]
fn negative_threshold_is_reported_as_zero() {
    let mut fixture = Fixture::new();
    fixture.options = VigencyOptions::default().with_late_visit_threshold_days(-5);
    let report = run_qa(&fixture.input());
    let range = report.get(QaCategory::DateRangeSanity).unwrap();
    assert_eq!(range.count, 2);
    assert_eq!(
        range.detail,
        "1 before first evaluation (2023-01-01); 1 more than 0 days after last evaluation (2023-06-01)"
    );
}
