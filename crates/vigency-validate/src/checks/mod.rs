//! Checklist modules.
//!
//! Each module computes one or more items of the fixed checklist.

mod coverage;
mod dates;
mod dropped;
mod duplicates;

use vigency_model::QaReport;

use crate::QaInput;

pub fn run_all(input: &QaInput<'_>) -> QaReport {
    let mut items = Vec::with_capacity(8);

    // 1. Visits nobody's interval covers
    items.push(coverage::unresolved_visits(input.resolved));

    // 2. Repeated (patient, date, clinician, unit) keys
    items.push(duplicates::check(input.resolved));

    // 3. Same-day evaluation tie-breaks
    items.push(dropped::same_day(input.evaluation_audit));

    // 4. Visit patients with no evaluation at all
    items.push(coverage::patients_without_evaluations(
        input.resolved,
        input.evaluations,
    ));

    // 5-6. Rows lost during normalization
    items.push(dropped::rows(input.evaluation_audit));
    items.push(dropped::rows(input.visit_audit));

    // 7. Visits far outside the evaluation date range
    items.push(dates::range_sanity(
        input.resolved,
        input.evaluations,
        input.options.late_visit_threshold_days,
    ));

    // 8. Visit period
    items.push(dates::visit_period(input.resolved));

    QaReport { items }
}

/// Percentage with two decimals; zero when the denominator is zero.
pub(crate) fn percent(part: u64, whole: u64) -> String {
    if whole == 0 {
        return "0.00%".to_string();
    }
    format!("{:.2}%", part as f64 * 100.0 / whole as f64)
}
