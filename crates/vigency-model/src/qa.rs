//! Data-quality checklist types.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QaSeverity {
    Info,
    Warning,
}

impl QaSeverity {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Warning => "Warning",
        }
    }
}

/// The fixed set of checks, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QaCategory {
    UnresolvedVisits,
    DuplicateVisitKeys,
    SameDayEvaluations,
    PatientsWithoutEvaluations,
    DroppedEvaluationRows,
    DroppedVisitRows,
    DateRangeSanity,
    VisitPeriod,
}

impl QaCategory {
    pub const fn all() -> &'static [QaCategory] {
        &[
            Self::UnresolvedVisits,
            Self::DuplicateVisitKeys,
            Self::SameDayEvaluations,
            Self::PatientsWithoutEvaluations,
            Self::DroppedEvaluationRows,
            Self::DroppedVisitRows,
            Self::DateRangeSanity,
            Self::VisitPeriod,
        ]
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::UnresolvedVisits => "Visits without vigent diagnosis",
            Self::DuplicateVisitKeys => "Duplicate visit keys",
            Self::SameDayEvaluations => "Same-day evaluations (resolved)",
            Self::PatientsWithoutEvaluations => "Patients without evaluations",
            Self::DroppedEvaluationRows => "Evaluation rows dropped",
            Self::DroppedVisitRows => "Visit rows dropped",
            Self::DateRangeSanity => "Visits outside evaluation date range",
            Self::VisitPeriod => "Visit period (days)",
        }
    }
}

/// One `{category, count, detail}` entry of the checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaItem {
    pub category: QaCategory,
    pub count: u64,
    pub detail: String,
    pub severity: QaSeverity,
}

impl QaItem {
    /// Build an item that warns when `count` is non-zero.
    pub fn flagged(category: QaCategory, count: u64, detail: impl Into<String>) -> Self {
        Self {
            category,
            count,
            detail: detail.into(),
            severity: if count > 0 {
                QaSeverity::Warning
            } else {
                QaSeverity::Info
            },
        }
    }

    pub fn info(category: QaCategory, count: u64, detail: impl Into<String>) -> Self {
        Self {
            category,
            count,
            detail: detail.into(),
            severity: QaSeverity::Info,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaReport {
    pub items: Vec<QaItem>,
}

impl QaReport {
    pub fn get(&self, category: QaCategory) -> Option<&QaItem> {
        self.items.iter().find(|item| item.category == category)
    }

    pub fn count(&self, category: QaCategory) -> u64 {
        self.get(category).map_or(0, |item| item.count)
    }

    pub fn warning_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.severity == QaSeverity::Warning)
            .count()
    }

    pub fn has_warnings(&self) -> bool {
        self.warning_count() > 0
    }
}
