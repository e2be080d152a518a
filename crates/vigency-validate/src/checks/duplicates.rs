//! Duplicate visit key detection.
//!
//! Duplicates stay in the output; they are only counted here.

use std::collections::HashMap;

use chrono::NaiveDate;

use vigency_model::{PatientId, QaCategory, QaItem, ResolvedVisit};

type VisitKey<'a> = (&'a PatientId, NaiveDate, &'a str, &'a str);

/// Count `(patient, visit_date, clinician, unit)` keys seen more than once.
pub fn check(resolved: &[ResolvedVisit]) -> QaItem {
    let mut occurrences: HashMap<VisitKey<'_>, u64> = HashMap::new();
    for r in resolved {
        let visit = &r.visit;
        let key = (
            &visit.patient_id,
            visit.visit_date,
            visit.clinician.as_str(),
            visit.unit.as_str(),
        );
        *occurrences.entry(key).or_insert(0) += 1;
    }

    let (keys, surplus) = occurrences
        .values()
        .filter(|count| **count > 1)
        .fold((0u64, 0u64), |(keys, surplus), count| {
            (keys + 1, surplus + count - 1)
        });
    QaItem::flagged(
        QaCategory::DuplicateVisitKeys,
        keys,
        format!("{surplus} surplus rows"),
    )
}
