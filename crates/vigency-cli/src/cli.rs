//! CLI argument definitions for the vigency runner.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use vigency_cli::config::OptionOverrides;

#[derive(Parser)]
#[command(
    name = "vigency",
    version,
    about = "Assign each visit the diagnosis vigent on its date",
    long_about = "Assign each clinical visit the diagnosis that was current on its date.\n\n\
                  Builds per-patient validity intervals from diagnostic evaluations,\n\
                  resolves every visit against them and reports summary counts and\n\
                  a data-quality checklist."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow patient identifiers in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Resolve every visit and write the outputs.
    Run(RunArgs),

    /// Show the diagnosis vigent for one patient on one date.
    Lookup(LookupArgs),
}

/// Options shared by every command that normalizes input.
#[derive(Args)]
pub struct OptionArgs {
    /// TOML file with run options; flags below override it.
    #[arg(long = "config", value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// Label for visits without a vigent diagnosis.
    #[arg(long = "sentinel", value_name = "LABEL")]
    pub sentinel: Option<String>,

    /// Read slash-separated dates as MM/DD/YYYY instead of DD/MM/YYYY.
    #[arg(long = "month-first")]
    pub month_first: bool,

    /// Keep diagnosis text as written instead of title-casing it.
    #[arg(long = "no-title-case")]
    pub no_title_case: bool,

    /// Process patients on one thread.
    #[arg(long = "sequential")]
    pub sequential: bool,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Evaluations CSV (patient, date, diagnosis, clinician).
    #[arg(long = "evaluations", value_name = "CSV")]
    pub evaluations: PathBuf,

    /// Visits CSV (patient, date, clinician, unit).
    #[arg(long = "visits", value_name = "CSV")]
    pub visits: PathBuf,

    /// Output directory for generated files (default: ./vigency-output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Flag visits more than this many days after the last evaluation.
    #[arg(long = "late-visit-days", value_name = "DAYS")]
    pub late_visit_days: Option<i64>,

    /// Resolve and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Start CSV outputs with a UTF-8 byte order mark for spreadsheet tools.
    #[arg(long = "csv-bom")]
    pub csv_bom: bool,

    #[command(flatten)]
    pub options: OptionArgs,
}

#[derive(Parser)]
pub struct LookupArgs {
    /// Evaluations CSV.
    #[arg(long = "evaluations", value_name = "CSV")]
    pub evaluations: PathBuf,

    /// Patient identifier.
    #[arg(long = "patient", value_name = "ID")]
    pub patient: String,

    /// Query date (same formats as the input files).
    #[arg(long = "date", value_name = "DATE")]
    pub date: String,

    #[command(flatten)]
    pub options: OptionArgs,
}

impl OptionArgs {
    pub fn overrides(&self) -> OptionOverrides {
        OptionOverrides {
            sentinel: self.sentinel.clone(),
            month_first: self.month_first,
            sequential: self.sequential,
            no_title_case: self.no_title_case,
            ..OptionOverrides::default()
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
