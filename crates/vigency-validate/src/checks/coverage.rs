//! Resolution coverage checks.

use std::collections::{BTreeSet, HashSet};

use vigency_model::{Evaluation, PatientId, QaCategory, QaItem, ResolvedVisit};

use super::percent;

/// Visits that resolved to no diagnosis.
pub fn unresolved_visits(resolved: &[ResolvedVisit]) -> QaItem {
    let total = resolved.len() as u64;
    let unresolved = resolved
        .iter()
        .filter(|r| !r.vigent.is_diagnosed())
        .count() as u64;
    QaItem::flagged(
        QaCategory::UnresolvedVisits,
        unresolved,
        format!("{} of {total} visits", percent(unresolved, total)),
    )
}

/// Patients that appear in visits but never in the clean evaluations.
pub fn patients_without_evaluations(
    resolved: &[ResolvedVisit],
    evaluations: &[Evaluation],
) -> QaItem {
    let evaluated: HashSet<&PatientId> = evaluations.iter().map(|e| &e.patient_id).collect();
    let visit_patients: BTreeSet<&PatientId> =
        resolved.iter().map(|r| &r.visit.patient_id).collect();
    let orphans = visit_patients
        .iter()
        .filter(|patient| !evaluated.contains(*patient))
        .count() as u64;
    let total = visit_patients.len() as u64;
    QaItem::flagged(
        QaCategory::PatientsWithoutEvaluations,
        orphans,
        format!("{} of {total} visit patients", percent(orphans, total)),
    )
}
