//! Count tables over resolved visits.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use vigency_model::{ResolvedVisit, SummaryKind, SummaryRow, SummaryTable, SummaryTables};

type GroupKey<'a> = (&'a str, Option<&'a str>, Option<&'a str>);

/// Group diagnosed visits into the four summary tables.
///
/// Visits without a vigent diagnosis are excluded from every table and
/// reported through `undiagnosed_visits`.
pub fn summarize(resolved: &[ResolvedVisit]) -> SummaryTables {
    let diagnosed: Vec<(&str, &ResolvedVisit)> = resolved
        .iter()
        .filter_map(|r| r.vigent.diagnosis().map(|diagnosis| (diagnosis, r)))
        .collect();

    let table = |kind: SummaryKind| -> SummaryTable {
        let mut counts: BTreeMap<GroupKey<'_>, u64> = BTreeMap::new();
        for &(diagnosis, r) in &diagnosed {
            let unit = kind.has_unit().then_some(r.visit.unit.as_str());
            let clinician = kind.has_clinician().then_some(r.visit.clinician.as_str());
            *counts.entry((diagnosis, unit, clinician)).or_insert(0) += 1;
        }
        let mut rows: Vec<SummaryRow> = counts
            .into_iter()
            .map(|((diagnosis, unit, clinician), count)| SummaryRow {
                diagnosis: diagnosis.to_string(),
                unit: unit.map(str::to_string),
                clinician: clinician.map(str::to_string),
                count,
            })
            .collect();
        sort_rows(kind, &mut rows);
        SummaryTable { kind, rows }
    };

    let total_visits = resolved.len() as u64;
    let diagnosed_visits = diagnosed.len() as u64;
    SummaryTables {
        by_diagnosis: table(SummaryKind::Diagnosis),
        by_diagnosis_unit: table(SummaryKind::DiagnosisUnit),
        by_diagnosis_clinician: table(SummaryKind::DiagnosisClinician),
        by_diagnosis_unit_clinician: table(SummaryKind::DiagnosisUnitClinician),
        total_visits,
        diagnosed_visits,
        undiagnosed_visits: total_visits - diagnosed_visits,
    }
}

fn sort_rows(kind: SummaryKind, rows: &mut [SummaryRow]) {
    match kind {
        SummaryKind::Diagnosis => {
            rows.sort_by(|a, b| {
                (Reverse(a.count), &a.diagnosis).cmp(&(Reverse(b.count), &b.diagnosis))
            });
        }
        SummaryKind::DiagnosisUnit | SummaryKind::DiagnosisClinician => {
            rows.sort_by(|a, b| {
                (&a.diagnosis, Reverse(a.count), &a.unit, &a.clinician).cmp(&(
                    &b.diagnosis,
                    Reverse(b.count),
                    &b.unit,
                    &b.clinician,
                ))
            });
        }
        SummaryKind::DiagnosisUnitClinician => {
            rows.sort_by(|a, b| {
                (&a.diagnosis, &a.unit, Reverse(a.count), &a.clinician).cmp(&(
                    &b.diagnosis,
                    &b.unit,
                    Reverse(b.count),
                    &b.clinician,
                ))
            });
        }
    }
}
