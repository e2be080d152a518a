//! Normalization losses.

use vigency_model::{InputKind, NormalizationAudit, QaCategory, QaItem};

pub fn same_day(audit: &NormalizationAudit) -> QaItem {
    QaItem::flagged(
        QaCategory::SameDayEvaluations,
        audit.same_day_discarded as u64,
        format!(
            "{} patient-day groups; kept the highest evaluation id",
            audit.same_day_groups
        ),
    )
}

/// Dropped rows for one input, broken down by reason.
pub fn rows(audit: &NormalizationAudit) -> QaItem {
    let category = match audit.input {
        InputKind::Evaluations => QaCategory::DroppedEvaluationRows,
        InputKind::Visits => QaCategory::DroppedVisitRows,
    };
    let dropped = audit.total_dropped() as u64;
    let detail = if dropped == 0 {
        format!("none of {} rows", audit.total_rows)
    } else {
        let reasons: Vec<String> = audit
            .dropped
            .iter()
            .map(|(reason, count)| format!("{}: {count}", reason.label()))
            .collect();
        format!("{} of {} rows", reasons.join(", "), audit.total_rows)
    };
    QaItem::flagged(category, dropped, detail)
}
