//! Vigency run pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Ingest**: read the evaluation and visit CSV files
//! 2. **Normalize**: clean both inputs, resolve same-day evaluation ties
//! 3. **Build vigency**: derive the per-patient interval index
//! 4. **Resolve**: attach the vigent diagnosis to every visit
//! 5. **Summarize**: count diagnosed visits by diagnosis, unit and clinician
//! 6. **QA**: run the data-quality checklist
//! 7. **Output**: write CSV tables and the JSON run report
//!
//! Stages 2-6 need no I/O and are bundled by [`run_pipeline`].

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use vigency_core::{
    NormalizedEvaluations, NormalizedVisits, VigencyIndex, normalize_evaluations,
    normalize_visits, resolve_visits, summarize,
};
use vigency_ingest::{read_evaluations, read_visits};
use vigency_model::{
    QaReport, QaSeverity, RawEvaluation, RawVisit, ResolvedVisit, SummaryTables, VigencyOptions,
};
use vigency_report::{ReportInputs, RunCounts, write_all};
use vigency_validate::{QaInput, run_qa};

// ============================================================================
// Stage 1: Ingest
// ============================================================================

/// Raw rows of both inputs.
#[derive(Debug)]
pub struct IngestResult {
    pub evaluations: Vec<RawEvaluation>,
    pub visits: Vec<RawVisit>,
}

pub fn ingest(evaluations: &Path, visits: &Path) -> Result<IngestResult> {
    let span = info_span!("ingest");
    let _guard = span.enter();
    let start = Instant::now();

    let evaluations = read_evaluations(evaluations)?;
    let visits = read_visits(visits)?;

    info!(
        evaluation_rows = evaluations.len(),
        visit_rows = visits.len(),
        duration_ms = start.elapsed().as_millis(),
        "ingest complete"
    );
    Ok(IngestResult {
        evaluations,
        visits,
    })
}

// ============================================================================
// Stages 2-6: Normalize, build, resolve, summarize, QA
// ============================================================================

/// Everything a run derives from its raw input.
#[derive(Debug)]
pub struct PipelineOutput {
    pub evaluations: NormalizedEvaluations,
    pub visits: NormalizedVisits,
    pub index: VigencyIndex,
    pub resolved: Vec<ResolvedVisit>,
    pub summaries: SummaryTables,
    pub qa: QaReport,
}

/// Run the in-memory stages over raw records.
///
/// Fails only when an input is empty or has no usable rows.
pub fn run_pipeline(
    raw_evaluations: &[RawEvaluation],
    raw_visits: &[RawVisit],
    options: &VigencyOptions,
) -> Result<PipelineOutput> {
    let (evaluations, visits) = normalize(raw_evaluations, raw_visits, options)?;
    let index = build_vigency(&evaluations, options);
    let resolved = resolve(&index, &visits, options);
    let summaries = aggregate(&resolved);
    let qa = qa(&resolved, &evaluations, &visits, options);
    Ok(PipelineOutput {
        evaluations,
        visits,
        index,
        resolved,
        summaries,
        qa,
    })
}

pub fn normalize(
    raw_evaluations: &[RawEvaluation],
    raw_visits: &[RawVisit],
    options: &VigencyOptions,
) -> Result<(NormalizedEvaluations, NormalizedVisits)> {
    let span = info_span!("normalize");
    let _guard = span.enter();
    let start = Instant::now();

    let evaluations = normalize_evaluations(raw_evaluations, options)?;
    let visits = normalize_visits(raw_visits, options)?;

    info!(
        evaluations_kept = evaluations.audit.kept_rows,
        evaluations_dropped = evaluations.audit.total_dropped(),
        same_day_discarded = evaluations.audit.same_day_discarded,
        visits_kept = visits.audit.kept_rows,
        visits_dropped = visits.audit.total_dropped(),
        duration_ms = start.elapsed().as_millis(),
        "normalize complete"
    );
    Ok((evaluations, visits))
}

pub fn build_vigency(
    evaluations: &NormalizedEvaluations,
    options: &VigencyOptions,
) -> VigencyIndex {
    let span = info_span!("build_vigency");
    let _guard = span.enter();
    let start = Instant::now();

    let index = VigencyIndex::build(&evaluations.evaluations, options.execution);

    info!(
        patients = index.patient_count(),
        intervals = index.len(),
        duration_ms = start.elapsed().as_millis(),
        "build vigency complete"
    );
    index
}

pub fn resolve(
    index: &VigencyIndex,
    visits: &NormalizedVisits,
    options: &VigencyOptions,
) -> Vec<ResolvedVisit> {
    let span = info_span!("resolve");
    let _guard = span.enter();
    let start = Instant::now();

    let resolved = resolve_visits(index, &visits.visits, options.execution);

    info!(
        visits = resolved.len(),
        unresolved = resolved.iter().filter(|r| !r.vigent.is_diagnosed()).count(),
        duration_ms = start.elapsed().as_millis(),
        "resolve complete"
    );
    resolved
}

pub fn aggregate(resolved: &[ResolvedVisit]) -> SummaryTables {
    let span = info_span!("summarize");
    let _guard = span.enter();
    let start = Instant::now();

    let summaries = summarize(resolved);

    info!(
        diagnoses = summaries.by_diagnosis.rows.len(),
        diagnosed = summaries.diagnosed_visits,
        undiagnosed = summaries.undiagnosed_visits,
        duration_ms = start.elapsed().as_millis(),
        "summarize complete"
    );
    summaries
}

pub fn qa(
    resolved: &[ResolvedVisit],
    evaluations: &NormalizedEvaluations,
    visits: &NormalizedVisits,
    options: &VigencyOptions,
) -> QaReport {
    let span = info_span!("qa");
    let _guard = span.enter();
    let start = Instant::now();

    let report = run_qa(&QaInput {
        resolved,
        evaluations: &evaluations.evaluations,
        evaluation_audit: &evaluations.audit,
        visit_audit: &visits.audit,
        options,
    });

    for item in report
        .items
        .iter()
        .filter(|item| item.severity == QaSeverity::Warning)
    {
        warn!(
            check = item.category.label(),
            count = item.count,
            detail = %item.detail,
            "qa warning"
        );
    }
    info!(
        warnings = report.warning_count(),
        duration_ms = start.elapsed().as_millis(),
        "qa complete"
    );
    report
}

// ============================================================================
// Stage 7: Output
// ============================================================================

pub fn output(
    output_dir: &Path,
    input: &IngestResult,
    result: &PipelineOutput,
    options: &VigencyOptions,
) -> Result<Vec<PathBuf>> {
    let span = info_span!("output", output_dir = %output_dir.display());
    let _guard = span.enter();
    let start = Instant::now();

    let written = write_all(
        output_dir,
        &ReportInputs {
            resolved: &result.resolved,
            intervals: result.index.intervals(),
            evaluations: &result.evaluations.evaluations,
            raw_evaluations: &input.evaluations,
            visits: &result.visits.visits,
            raw_visits: &input.visits,
            summaries: &result.summaries,
            qa: &result.qa,
            counts: RunCounts {
                evaluation_audit: &result.evaluations.audit,
                visit_audit: &result.visits.audit,
                patients_with_intervals: result.index.patient_count(),
                intervals: result.index.len(),
            },
            options,
        },
    )
    .with_context(|| format!("write outputs to {}", output_dir.display()))?;

    info!(
        files = written.len(),
        duration_ms = start.elapsed().as_millis(),
        "output complete"
    );
    Ok(written)
}
