//! Visit resolution against the interval index.

use chrono::NaiveDate;
use rayon::prelude::*;
use tracing::debug;

use vigency_model::{ExecutionMode, PatientId, ResolvedVisit, VigentDiagnosis, Visit};

use crate::vigency::VigencyIndex;

/// The diagnosis vigent for `patient` on `date`.
///
/// Patients without evaluations and dates before a patient's first
/// evaluation both resolve to [`VigentDiagnosis::NoDiagnosis`].
pub fn resolve_date(
    index: &VigencyIndex,
    patient: &PatientId,
    date: NaiveDate,
) -> VigentDiagnosis {
    index
        .lookup(patient, date)
        .map_or(VigentDiagnosis::NoDiagnosis, VigentDiagnosis::from_interval)
}

pub fn resolve_visit(index: &VigencyIndex, visit: &Visit) -> ResolvedVisit {
    ResolvedVisit {
        visit: visit.clone(),
        vigent: resolve_date(index, &visit.patient_id, visit.visit_date),
    }
}

/// Resolve every visit. Output has one entry per visit, in input order.
pub fn resolve_visits(
    index: &VigencyIndex,
    visits: &[Visit],
    execution: ExecutionMode,
) -> Vec<ResolvedVisit> {
    let resolved: Vec<ResolvedVisit> = match execution {
        ExecutionMode::Parallel => visits
            .par_iter()
            .map(|visit| resolve_visit(index, visit))
            .collect(),
        ExecutionMode::Sequential => visits
            .iter()
            .map(|visit| resolve_visit(index, visit))
            .collect(),
    };
    debug_assert_eq!(resolved.len(), visits.len());
    debug!(
        visits = resolved.len(),
        unresolved = resolved.iter().filter(|r| !r.vigent.is_diagnosed()).count(),
        "resolved visits"
    );
    resolved
}
