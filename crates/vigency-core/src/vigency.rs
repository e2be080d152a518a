//! Patient-indexed validity intervals.
//!
//! All intervals live in one flat vector sorted by `(patient, start)`; a map
//! from patient to the slice range of that patient's intervals stands in for
//! nested per-patient collections.

use std::collections::{BTreeMap, HashMap};
use std::ops::Range;

use chrono::NaiveDate;
use rayon::prelude::*;
use tracing::debug;

use vigency_model::{Evaluation, ExecutionMode, PatientId, VigencyInterval};

/// Immutable interval table built once per run.
#[derive(Debug, Clone, Default)]
pub struct VigencyIndex {
    intervals: Vec<VigencyInterval>,
    offsets: HashMap<PatientId, Range<usize>>,
}

impl VigencyIndex {
    /// Build the interval table from clean evaluations.
    ///
    /// Evaluations are grouped by patient; each patient's group is sorted by
    /// `(eval_date, evaluation_id)` before intervals are emitted, so input
    /// order does not matter. At most one evaluation per patient-day is
    /// expected (see [`normalize_evaluations`](crate::normalize_evaluations)).
    pub fn build(evaluations: &[Evaluation], execution: ExecutionMode) -> Self {
        let mut by_patient: BTreeMap<&PatientId, Vec<&Evaluation>> = BTreeMap::new();
        for evaluation in evaluations {
            by_patient
                .entry(&evaluation.patient_id)
                .or_default()
                .push(evaluation);
        }
        let groups: Vec<(&PatientId, Vec<&Evaluation>)> = by_patient.into_iter().collect();

        let per_patient: Vec<Vec<VigencyInterval>> = match execution {
            ExecutionMode::Parallel => groups
                .into_par_iter()
                .map(|(patient, events)| build_patient_intervals(patient, events))
                .collect(),
            ExecutionMode::Sequential => groups
                .into_iter()
                .map(|(patient, events)| build_patient_intervals(patient, events))
                .collect(),
        };

        let total = per_patient.iter().map(Vec::len).sum();
        let mut intervals = Vec::with_capacity(total);
        let mut offsets = HashMap::with_capacity(per_patient.len());
        for patient_intervals in per_patient {
            let Some(first) = patient_intervals.first() else {
                continue;
            };
            let patient = first.patient_id.clone();
            let start = intervals.len();
            intervals.extend(patient_intervals);
            offsets.insert(patient, start..intervals.len());
        }

        debug!(
            patients = offsets.len(),
            intervals = intervals.len(),
            "built vigency index"
        );
        Self { intervals, offsets }
    }

    /// Every interval, sorted by patient then start.
    pub fn intervals(&self) -> &[VigencyInterval] {
        &self.intervals
    }

    /// One patient's intervals in start order; empty for unknown patients.
    pub fn for_patient(&self, patient: &PatientId) -> &[VigencyInterval] {
        match self.offsets.get(patient) {
            Some(range) => &self.intervals[range.clone()],
            None => &[],
        }
    }

    pub fn contains_patient(&self, patient: &PatientId) -> bool {
        self.offsets.contains_key(patient)
    }

    /// Find the interval containing `date` for `patient`.
    ///
    /// Binary search over interval starts: the candidate is the last interval
    /// whose start is on or before `date`. Starts are strictly increasing and
    /// each end equals the next start, so the candidate always contains the
    /// date when it exists.
    pub fn lookup(&self, patient: &PatientId, date: NaiveDate) -> Option<&VigencyInterval> {
        let intervals = self.for_patient(patient);
        let idx = intervals.partition_point(|interval| interval.start <= date);
        let candidate = intervals.get(idx.checked_sub(1)?)?;
        debug_assert!(candidate.contains(date));
        Some(candidate)
    }

    pub fn patient_count(&self) -> usize {
        self.offsets.len()
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}

/// Turn one patient's evaluations into a partition of `[first_date, ∞)`.
///
/// Interval `i` starts at evaluation `i` and ends where evaluation `i + 1`
/// starts; the last interval is open. No evaluations yields no intervals.
pub fn build_patient_intervals(
    patient: &PatientId,
    mut events: Vec<&Evaluation>,
) -> Vec<VigencyInterval> {
    events.sort_by_key(|evaluation| (evaluation.eval_date, evaluation.evaluation_id));
    debug_assert!(
        events
            .windows(2)
            .all(|pair| pair[0].eval_date < pair[1].eval_date),
        "same-day evaluations must be resolved before building intervals"
    );

    let ends = events
        .iter()
        .skip(1)
        .map(|next| Some(next.eval_date))
        .chain(std::iter::once(None));
    events
        .iter()
        .zip(ends)
        .map(|(evaluation, end)| VigencyInterval {
            patient_id: patient.clone(),
            start: evaluation.eval_date,
            end,
            diagnosis: evaluation.diagnosis.clone(),
            clinician: evaluation.clinician.clone(),
            source_evaluation_id: evaluation.evaluation_id,
        })
        .collect()
}
