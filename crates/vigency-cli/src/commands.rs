use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info, info_span};

use vigency_cli::config::{OptionOverrides, resolve_options};
use vigency_cli::logging::redact_value;
use vigency_cli::pipeline::{build_vigency, ingest, output, run_pipeline};
use vigency_core::{normalize_evaluations, parse_date, resolve_date};
use vigency_model::PatientId;

use crate::cli::{LookupArgs, RunArgs};
use crate::types::{LookupResult, RunResult};

const DEFAULT_OUTPUT_DIR: &str = "vigency-output";

pub fn run_vigency(args: &RunArgs) -> Result<RunResult> {
    let run_span = info_span!("run");
    let _run_guard = run_span.enter();
    let start = Instant::now();

    let overrides = OptionOverrides {
        late_visit_days: args.late_visit_days,
        csv_bom: args.csv_bom,
        ..args.options.overrides()
    };
    let options = resolve_options(args.options.config.as_deref(), &overrides)?;
    debug!(?options, "resolved options");

    let input = ingest(&args.evaluations, &args.visits)?;
    let result = run_pipeline(&input.evaluations, &input.visits, &options)?;

    let (output_dir, written) = if args.dry_run {
        info!("dry run, skipping output");
        (None, Vec::new())
    } else {
        let dir = args
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
        let written = output(&dir, &input, &result, &options)?;
        (Some(dir), written)
    };

    info!(
        visits = result.resolved.len(),
        warnings = result.qa.warning_count(),
        duration_ms = start.elapsed().as_millis(),
        "run complete"
    );
    Ok(RunResult {
        output_dir,
        written,
        patients: result.index.patient_count(),
        intervals: result.index.len(),
        evaluation_audit: result.evaluations.audit,
        visit_audit: result.visits.audit,
        summaries: result.summaries,
        qa: result.qa,
        sentinel: options.sentinel_label,
    })
}

pub fn run_lookup(args: &LookupArgs) -> Result<LookupResult> {
    let options = resolve_options(args.options.config.as_deref(), &args.options.overrides())?;
    let patient = PatientId::new(args.patient.as_str()).context("patient")?;
    let date = parse_date(&args.date, options.date_order)
        .ok_or_else(|| anyhow!("unrecognized date '{}'", args.date))?;

    let span = info_span!("lookup", patient = redact_value(patient.as_str()));
    let _guard = span.enter();

    let raw = vigency_ingest::read_evaluations(&args.evaluations)?;
    let evaluations = normalize_evaluations(&raw, &options)?;
    let index = build_vigency(&evaluations, &options);
    let vigent = resolve_date(&index, &patient, date);
    debug!(
        intervals = index.for_patient(&patient).len(),
        diagnosed = vigent.is_diagnosed(),
        "lookup resolved"
    );

    Ok(LookupResult {
        intervals: index.for_patient(&patient).to_vec(),
        patient,
        date,
        vigent,
        sentinel: options.sentinel_label,
    })
}
