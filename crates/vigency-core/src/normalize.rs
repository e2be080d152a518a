//! Evaluation and visit normalization.
//!
//! Rows that cannot be used are dropped and counted in a
//! [`NormalizationAudit`]; they never produce an error on their own. Only an
//! input that is empty, or whose rows are all dropped, is fatal.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::debug;

use vigency_model::{
    DropReason, Evaluation, EvaluationId, InputKind, NormalizationAudit, PatientId,
    RawEvaluation, RawVisit, Result, VigencyError, VigencyOptions, Visit, VisitId,
};

use crate::datetime::parse_date;
use crate::text::{clean_text, title_case};

/// Clean evaluations, sorted by `(patient, eval_date)`, one per patient-day.
#[derive(Debug, Clone)]
pub struct NormalizedEvaluations {
    pub evaluations: Vec<Evaluation>,
    pub audit: NormalizationAudit,
}

/// Clean visits in input order.
#[derive(Debug, Clone)]
pub struct NormalizedVisits {
    pub visits: Vec<Visit>,
    pub audit: NormalizationAudit,
}

/// Normalize raw evaluation rows.
///
/// Within a `(patient, day)` group only the evaluation with the highest
/// identifier survives; the others are counted as same-day discards.
pub fn normalize_evaluations(
    raw: &[RawEvaluation],
    options: &VigencyOptions,
) -> Result<NormalizedEvaluations> {
    let mut audit = NormalizationAudit::new(InputKind::Evaluations, raw.len());
    if raw.is_empty() {
        return Err(VigencyError::EmptyInput {
            input: InputKind::Evaluations,
        });
    }

    let generated_base = max_explicit_id(raw.iter().map(|row| row.evaluation_id.as_deref()));
    let mut seen_ids = HashSet::new();
    let mut cleaned = Vec::with_capacity(raw.len());
    for row in raw {
        match clean_evaluation(row, options, generated_base) {
            Ok((evaluation, Identifier::Explicit(_))) => {
                if seen_ids.insert(evaluation.evaluation_id) {
                    cleaned.push(evaluation);
                } else {
                    audit.record_drop(DropReason::DuplicateIdentifier);
                }
            }
            Ok((evaluation, Identifier::Generated(_))) => cleaned.push(evaluation),
            Err(reason) => audit.record_drop(reason),
        }
    }

    cleaned.sort_by(|a, b| {
        (&a.patient_id, a.eval_date, a.evaluation_id).cmp(&(
            &b.patient_id,
            b.eval_date,
            b.evaluation_id,
        ))
    });
    let evaluations = keep_last_per_day(cleaned, &mut audit);
    audit.kept_rows = evaluations.len();
    ensure_usable(&audit)?;

    debug!(
        total = audit.total_rows,
        kept = audit.kept_rows,
        dropped = audit.total_dropped(),
        same_day_discarded = audit.same_day_discarded,
        "normalized evaluations"
    );
    Ok(NormalizedEvaluations { evaluations, audit })
}

/// Normalize raw visit rows. Duplicate visits are kept.
pub fn normalize_visits(raw: &[RawVisit], options: &VigencyOptions) -> Result<NormalizedVisits> {
    let mut audit = NormalizationAudit::new(InputKind::Visits, raw.len());
    if raw.is_empty() {
        return Err(VigencyError::EmptyInput {
            input: InputKind::Visits,
        });
    }

    let generated_base = max_explicit_id(raw.iter().map(|row| row.visit_id.as_deref()));
    let mut visits = Vec::with_capacity(raw.len());
    for row in raw {
        match clean_visit(row, options, generated_base) {
            Ok(visit) => visits.push(visit),
            Err(reason) => audit.record_drop(reason),
        }
    }
    audit.kept_rows = visits.len();
    ensure_usable(&audit)?;

    debug!(
        total = audit.total_rows,
        kept = audit.kept_rows,
        dropped = audit.total_dropped(),
        "normalized visits"
    );
    Ok(NormalizedVisits { visits, audit })
}

fn clean_evaluation(
    row: &RawEvaluation,
    options: &VigencyOptions,
    generated_base: i64,
) -> std::result::Result<(Evaluation, Identifier), DropReason> {
    let patient_id = clean_patient(row.patient_id.as_deref())?;
    let date_text = clean_text(row.eval_date.as_deref()).ok_or(DropReason::MissingDate)?;
    let diagnosis =
        clean_text(row.diagnosis.as_deref()).ok_or(DropReason::MissingDiagnosis)?;
    let eval_date = parse_required_date(&date_text, options)?;
    let id = identifier(row.evaluation_id.as_deref(), row.row, generated_base)?;
    let diagnosis = if options.title_case_diagnoses {
        title_case(&diagnosis)
    } else {
        diagnosis
    };
    let evaluation = Evaluation {
        evaluation_id: EvaluationId(id.value()),
        source_row: row.row,
        patient_id,
        eval_date,
        diagnosis,
        clinician: clean_text(row.clinician.as_deref()).unwrap_or_default(),
    };
    Ok((evaluation, id))
}

fn clean_visit(
    row: &RawVisit,
    options: &VigencyOptions,
    generated_base: i64,
) -> std::result::Result<Visit, DropReason> {
    let patient_id = clean_patient(row.patient_id.as_deref())?;
    let date_text = clean_text(row.visit_date.as_deref()).ok_or(DropReason::MissingDate)?;
    let visit_date = parse_required_date(&date_text, options)?;
    let visit_id = VisitId(identifier(row.visit_id.as_deref(), row.row, generated_base)?.value());
    Ok(Visit {
        visit_id,
        source_row: row.row,
        patient_id,
        visit_date,
        clinician: clean_text(row.clinician.as_deref()).unwrap_or_default(),
        unit: clean_text(row.unit.as_deref()).unwrap_or_default(),
    })
}

fn clean_patient(value: Option<&str>) -> std::result::Result<PatientId, DropReason> {
    clean_text(value)
        .and_then(|value| PatientId::new(value).ok())
        .ok_or(DropReason::MissingPatient)
}

fn parse_required_date(
    value: &str,
    options: &VigencyOptions,
) -> std::result::Result<NaiveDate, DropReason> {
    parse_date(value, options.date_order).ok_or(DropReason::UnparseableDate)
}

/// Where a record's identifier came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Identifier {
    Explicit(i64),
    /// Derived from the source row for a blank or absent cell.
    Generated(i64),
}

impl Identifier {
    fn value(self) -> i64 {
        match self {
            Self::Explicit(id) | Self::Generated(id) => id,
        }
    }
}

/// Resolve a row's identifier. Blank cells get `generated_base + row`, which
/// never collides with an explicit identifier of the same input.
fn identifier(
    value: Option<&str>,
    row: usize,
    generated_base: i64,
) -> std::result::Result<Identifier, DropReason> {
    match parse_explicit_id(value)? {
        Some(id) => Ok(Identifier::Explicit(id)),
        None => i64::try_from(row)
            .ok()
            .and_then(|row| generated_base.checked_add(row))
            .map(Identifier::Generated)
            .ok_or(DropReason::InvalidIdentifier),
    }
}

/// Largest explicit identifier in an input, or zero. When no row carries an
/// identifier, generated ones are plain row numbers.
fn max_explicit_id<'a>(values: impl Iterator<Item = Option<&'a str>>) -> i64 {
    values
        .filter_map(|value| parse_explicit_id(value).ok().flatten())
        .max()
        .unwrap_or(0)
        .max(0)
}

/// Parse an identifier cell; `None` for a blank cell. Integral floats such
/// as `12.0` are accepted.
fn parse_explicit_id(value: Option<&str>) -> std::result::Result<Option<i64>, DropReason> {
    let Some(text) = clean_text(value) else {
        return Ok(None);
    };
    if let Ok(id) = text.parse::<i64>() {
        return Ok(Some(id));
    }
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15 => {
            Ok(Some(value as i64))
        }
        _ => Err(DropReason::InvalidIdentifier),
    }
}

/// Collapse runs of equal `(patient, day)` in sorted input to their last
/// element, which holds the highest identifier.
fn keep_last_per_day(sorted: Vec<Evaluation>, audit: &mut NormalizationAudit) -> Vec<Evaluation> {
    let mut kept: Vec<Evaluation> = Vec::with_capacity(sorted.len());
    let mut in_group = false;
    for evaluation in sorted {
        match kept.last_mut() {
            Some(last)
                if last.patient_id == evaluation.patient_id
                    && last.eval_date == evaluation.eval_date =>
            {
                if !in_group {
                    audit.same_day_groups += 1;
                    in_group = true;
                }
                audit.same_day_discarded += 1;
                *last = evaluation;
            }
            _ => {
                in_group = false;
                kept.push(evaluation);
            }
        }
    }
    kept
}

fn ensure_usable(audit: &NormalizationAudit) -> Result<()> {
    if audit.kept_rows > 0 {
        return Ok(());
    }
    Err(VigencyError::NoUsableRows {
        input: audit.input,
        total: audit.total_rows,
        missing_fields: audit.missing_field_count(),
        unparseable_dates: audit.dropped_count(DropReason::UnparseableDate),
        invalid_ids: audit.invalid_id_count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval_row(row: usize, id: Option<&str>, patient: &str, date: &str, diagnosis: &str) -> RawEvaluation {
        RawEvaluation {
            row,
            evaluation_id: id.map(str::to_string),
            patient_id: Some(patient.to_string()),
            eval_date: Some(date.to_string()),
            diagnosis: Some(diagnosis.to_string()),
            clinician: Some("Dr. Lima".to_string()),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn same_day_keeps_highest_identifier() {
        let raw = vec![
            eval_row(1, Some("7"), "P1", "2023-01-10", "b"),
            eval_row(2, Some("5"), "P1", "2023-01-10", "a"),
        ];
        let result = normalize_evaluations(&raw, &VigencyOptions::default()).unwrap();
        assert_eq!(result.evaluations.len(), 1);
        assert_eq!(result.evaluations[0].evaluation_id, EvaluationId(7));
        assert_eq!(result.evaluations[0].diagnosis, "B");
        assert_eq!(result.audit.same_day_discarded, 1);
        assert_eq!(result.audit.same_day_groups, 1);
    }

    #[test]
    fn same_day_tie_break_ignores_row_order() {
        let forward = vec![
            eval_row(1, Some("5"), "P1", "2023-01-10", "A"),
            eval_row(2, Some("7"), "P1", "2023-01-10", "B"),
        ];
        let mut backward = forward.clone();
        backward.reverse();
        let options = VigencyOptions::default();
        let a = normalize_evaluations(&forward, &options).unwrap();
        let b = normalize_evaluations(&backward, &options).unwrap();
        assert_eq!(a.evaluations, b.evaluations);
    }

    #[test]
    fn incomplete_rows_are_dropped_by_reason() {
        let mut missing_patient = eval_row(2, None, "P1", "2023-01-01", "A");
        missing_patient.patient_id = Some("  ".to_string());
        let mut missing_diagnosis = eval_row(3, None, "P1", "2023-01-02", "A");
        missing_diagnosis.diagnosis = Some("nan".to_string());
        let raw = vec![
            eval_row(1, None, "P1", "2023-01-01", "Depressão"),
            missing_patient,
            missing_diagnosis,
            eval_row(4, None, "P1", "someday", "A"),
            eval_row(5, Some("x1"), "P1", "2023-01-05", "A"),
        ];
        let result = normalize_evaluations(&raw, &VigencyOptions::default()).unwrap();
        let audit = &result.audit;
        assert_eq!(audit.kept_rows, 1);
        assert_eq!(audit.dropped_count(DropReason::MissingPatient), 1);
        assert_eq!(audit.dropped_count(DropReason::MissingDiagnosis), 1);
        assert_eq!(audit.dropped_count(DropReason::UnparseableDate), 1);
        assert_eq!(audit.dropped_count(DropReason::InvalidIdentifier), 1);
        assert_eq!(result.evaluations[0].evaluation_id, EvaluationId(1));
    }

    #[test]
    fn repeated_identifier_keeps_first_occurrence() {
        let raw = vec![
            eval_row(1, Some("3"), "P1", "2023-01-01", "A"),
            eval_row(2, Some("3.0"), "P2", "2023-02-01", "B"),
        ];
        let result = normalize_evaluations(&raw, &VigencyOptions::default()).unwrap();
        assert_eq!(result.evaluations.len(), 1);
        assert_eq!(result.evaluations[0].patient_id.as_str(), "P1");
        assert_eq!(result.audit.dropped_count(DropReason::DuplicateIdentifier), 1);
    }

    #[test]
    fn blank_identifiers_never_displace_explicit_ones() {
        let raw = vec![
            eval_row(1, Some("10"), "P1", "2023-01-01", "A"),
            eval_row(2, None, "P1", "2023-02-01", "B"),
            eval_row(3, Some("2"), "P2", "2023-01-15", "C"),
        ];
        let result = normalize_evaluations(&raw, &VigencyOptions::default()).unwrap();
        assert_eq!(result.audit.kept_rows, 3);
        assert_eq!(result.audit.dropped_count(DropReason::DuplicateIdentifier), 0);
        let ids: Vec<(i64, &str, usize)> = result
            .evaluations
            .iter()
            .map(|e| (e.evaluation_id.0, e.patient_id.as_str(), e.source_row))
            .collect();
        assert_eq!(ids, vec![(10, "P1", 1), (12, "P1", 2), (2, "P2", 3)]);
    }

    #[test]
    fn generated_identifiers_rank_above_explicit_ones() {
        let raw = vec![
            eval_row(1, None, "P1", "2023-01-10", "blank"),
            eval_row(2, Some("7"), "P1", "2023-01-10", "explicit"),
        ];
        let result = normalize_evaluations(&raw, &VigencyOptions::default()).unwrap();
        assert_eq!(result.evaluations.len(), 1);
        assert_eq!(result.evaluations[0].evaluation_id, EvaluationId(8));
        assert_eq!(result.evaluations[0].diagnosis, "Blank");
    }

    #[test]
    fn title_case_can_be_disabled() {
        let raw = vec![eval_row(1, None, "P1", "2023-01-01", "tdah LEVE")];
        let options = VigencyOptions::default().with_title_case(false);
        let result = normalize_evaluations(&raw, &options).unwrap();
        assert_eq!(result.evaluations[0].diagnosis, "tdah LEVE");
    }

    #[test]
    fn empty_and_unusable_inputs_are_fatal() {
        let options = VigencyOptions::default();
        assert!(matches!(
            normalize_evaluations(&[], &options),
            Err(VigencyError::EmptyInput {
                input: InputKind::Evaluations
            })
        ));
        let raw = vec![eval_row(1, None, "P1", "bad", "A")];
        match normalize_evaluations(&raw, &options) {
            Err(VigencyError::NoUsableRows {
                input,
                total,
                unparseable_dates,
                ..
            }) => {
                assert_eq!(input, InputKind::Evaluations);
                assert_eq!(total, 1);
                assert_eq!(unparseable_dates, 1);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn visits_keep_input_order_and_default_blank_fields() {
        let raw = vec![
            RawVisit {
                row: 1,
                patient_id: Some("P2".to_string()),
                visit_date: Some("05/03/2023".to_string()),
                ..RawVisit::default()
            },
            RawVisit {
                row: 2,
                visit_id: Some("40".to_string()),
                patient_id: Some(" P1 ".to_string()),
                visit_date: Some("2023-01-02".to_string()),
                clinician: Some(" Dr. Reis ".to_string()),
                unit: Some("CAPS".to_string()),
            },
            RawVisit {
                row: 3,
                patient_id: Some("P1".to_string()),
                ..RawVisit::default()
            },
        ];
        let result = normalize_visits(&raw, &VigencyOptions::default()).unwrap();
        assert_eq!(result.visits.len(), 2);
        assert_eq!(result.visits[0].visit_id, VisitId(41));
        assert_eq!(result.visits[0].source_row, 1);
        assert_eq!(result.visits[0].visit_date, date(2023, 3, 5));
        assert_eq!(result.visits[0].clinician, "");
        assert_eq!(result.visits[1].visit_id, VisitId(40));
        assert_eq!(result.visits[1].patient_id.as_str(), "P1");
        assert_eq!(result.visits[1].clinician, "Dr. Reis");
        assert_eq!(result.audit.dropped_count(DropReason::MissingDate), 1);
    }
}
