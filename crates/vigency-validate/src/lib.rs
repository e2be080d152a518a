//! Data-quality checklist for a vigency run.
//!
//! Checks only report. Nothing here removes rows or fails the run.

mod checks;

use tracing::debug;

use vigency_model::{Evaluation, NormalizationAudit, QaReport, ResolvedVisit, VigencyOptions};

/// Everything the checklist looks at.
#[derive(Debug, Clone, Copy)]
pub struct QaInput<'a> {
    pub resolved: &'a [ResolvedVisit],
    pub evaluations: &'a [Evaluation],
    pub evaluation_audit: &'a NormalizationAudit,
    pub visit_audit: &'a NormalizationAudit,
    pub options: &'a VigencyOptions,
}

/// Run every check and return the items in checklist order.
pub fn run_qa(input: &QaInput<'_>) -> QaReport {
    let report = checks::run_all(input);
    debug!(
        items = report.items.len(),
        warnings = report.warning_count(),
        "qa checklist complete"
    );
    report
}
