//! Run options: TOML file first, then command-line overrides.

use std::path::Path;

use anyhow::{Context, Result};
use vigency_model::{DateOrder, ExecutionMode, VigencyOptions};

/// Option values given on the command line. Unset fields keep the file value.
#[derive(Debug, Clone, Default)]
pub struct OptionOverrides {
    pub sentinel: Option<String>,
    pub month_first: bool,
    pub sequential: bool,
    pub late_visit_days: Option<i64>,
    pub no_title_case: bool,
    pub csv_bom: bool,
}

impl OptionOverrides {
    pub fn apply(&self, mut options: VigencyOptions) -> VigencyOptions {
        if let Some(label) = &self.sentinel {
            options.sentinel_label = label.clone();
        }
        if self.month_first {
            options.date_order = DateOrder::MonthFirst;
        }
        if self.sequential {
            options.execution = ExecutionMode::Sequential;
        }
        if let Some(days) = self.late_visit_days {
            options.late_visit_threshold_days = days;
        }
        if self.no_title_case {
            options.title_case_diagnoses = false;
        }
        if self.csv_bom {
            options.csv_bom = true;
        }
        options
    }
}

/// Parse options from TOML text. Missing keys take their defaults.
pub fn parse_options(text: &str) -> Result<VigencyOptions> {
    toml::from_str(text).context("parse options")
}

/// Load options from `path`, or defaults when no file is given, then apply overrides.
pub fn resolve_options(path: Option<&Path>, overrides: &OptionOverrides) -> Result<VigencyOptions> {
    let base = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read config {}", path.display()))?;
            parse_options(&text).with_context(|| format!("config {}", path.display()))?
        }
        None => VigencyOptions::default(),
    };
    Ok(overrides.apply(base))
}
