//! Date-range checks.

use chrono::{Days, NaiveDate};

use vigency_core::format_date;
use vigency_model::{Evaluation, QaCategory, QaItem, ResolvedVisit};

/// Visits before the earliest evaluation or well after the latest one.
pub fn range_sanity(
    resolved: &[ResolvedVisit],
    evaluations: &[Evaluation],
    late_threshold_days: i64,
) -> QaItem {
    let Some((first, last)) = bounds(evaluations.iter().map(|e| e.eval_date)) else {
        return QaItem::info(QaCategory::DateRangeSanity, 0, "no evaluations");
    };
    let threshold = late_threshold_days.max(0).unsigned_abs();
    let cutoff = last
        .checked_add_days(Days::new(threshold))
        .unwrap_or(NaiveDate::MAX);

    let mut early = 0u64;
    let mut late = 0u64;
    for r in resolved {
        let date = r.visit.visit_date;
        if date < first {
            early += 1;
        } else if date > cutoff {
            late += 1;
        }
    }
    QaItem::flagged(
        QaCategory::DateRangeSanity,
        early + late,
        format!(
            "{early} before first evaluation ({}); {late} more than {threshold} days after last evaluation ({})",
            format_date(first),
            format_date(last),
        ),
    )
}

/// Span in days between the earliest and latest visit. Always informational.
pub fn visit_period(resolved: &[ResolvedVisit]) -> QaItem {
    match bounds(resolved.iter().map(|r| r.visit.visit_date)) {
        Some((first, last)) => QaItem::info(
            QaCategory::VisitPeriod,
            (last - first).num_days().unsigned_abs(),
            format!("{} to {}", format_date(first), format_date(last)),
        ),
        None => QaItem::info(QaCategory::VisitPeriod, 0, "no visits"),
    }
}

fn bounds(dates: impl Iterator<Item = NaiveDate>) -> Option<(NaiveDate, NaiveDate)> {
    dates.fold(None, |acc, date| match acc {
        None => Some((date, date)),
        Some((min, max)) => Some((min.min(date), max.max(date))),
    })
}
