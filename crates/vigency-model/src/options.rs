//! Configuration options for a vigency run.

use serde::{Deserialize, Serialize};

use crate::vigency::NO_DIAGNOSIS;

/// How ambiguous slash-separated dates such as `03/04/2023` are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    /// `DD/MM/YYYY`.
    #[default]
    DayFirst,
    /// `MM/DD/YYYY`.
    MonthFirst,
}

/// Whether per-patient work is spread over a thread pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    #[default]
    Parallel,
    Sequential,
}

/// Options controlling normalization, resolution and QA.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VigencyOptions {
    /// Label rendered for visits no interval covers.
    pub sentinel_label: String,
    /// Coerce diagnosis text to title case during normalization.
    pub title_case_diagnoses: bool,
    /// Field order for slash-separated dates.
    pub date_order: DateOrder,
    /// Visits later than the latest evaluation by more than this many days
    /// are flagged by the date-range check.
    pub late_visit_threshold_days: i64,
    pub execution: ExecutionMode,
    /// Prefix CSV outputs with a UTF-8 byte order mark so spreadsheet
    /// applications detect the encoding.
    pub csv_bom: bool,
}

impl Default for VigencyOptions {
    fn default() -> Self {
        Self {
            sentinel_label: NO_DIAGNOSIS.to_string(),
            title_case_diagnoses: true,
            date_order: DateOrder::default(),
            late_visit_threshold_days: 365,
            execution: ExecutionMode::default(),
            csv_bom: false,
        }
    }
}

impl VigencyOptions {
    pub fn with_sentinel_label(mut self, label: impl Into<String>) -> Self {
        self.sentinel_label = label.into();
        self
    }

    pub fn with_execution(mut self, execution: ExecutionMode) -> Self {
        self.execution = execution;
        self
    }

    pub fn with_late_visit_threshold_days(mut self, days: i64) -> Self {
        self.late_visit_threshold_days = days;
        self
    }

    pub fn with_title_case(mut self, enable: bool) -> Self {
        self.title_case_diagnoses = enable;
        self
    }

    pub fn with_csv_bom(mut self, enable: bool) -> Self {
        self.csv_bom = enable;
        self
    }

    pub fn is_parallel(&self) -> bool {
        self.execution == ExecutionMode::Parallel
    }
}
