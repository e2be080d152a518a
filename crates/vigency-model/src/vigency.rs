//! Validity intervals and resolved visits.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ids::{EvaluationId, PatientId};
use crate::records::Visit;

/// Sentinel diagnosis for visits that no interval covers.
pub const NO_DIAGNOSIS: &str = "NO_DIAGNOSIS";

/// The span `[start, end)` during which a diagnosis is current for a patient.
///
/// `end == None` marks the open-ended final interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VigencyInterval {
    pub patient_id: PatientId,
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
    pub diagnosis: String,
    pub clinician: String,
    pub source_evaluation_id: EvaluationId,
}

impl VigencyInterval {
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Half-open containment: a date equal to `end` belongs to the next interval.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && self.end.is_none_or(|end| date < end)
    }
}

/// The diagnosis attached to a visit by resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VigentDiagnosis {
    Diagnosed {
        diagnosis: String,
        origin_eval_date: NaiveDate,
        origin_clinician: String,
        source_evaluation_id: EvaluationId,
    },
    NoDiagnosis,
}

impl VigentDiagnosis {
    pub fn from_interval(interval: &VigencyInterval) -> Self {
        Self::Diagnosed {
            diagnosis: interval.diagnosis.clone(),
            origin_eval_date: interval.start,
            origin_clinician: interval.clinician.clone(),
            source_evaluation_id: interval.source_evaluation_id,
        }
    }

    pub fn is_diagnosed(&self) -> bool {
        matches!(self, Self::Diagnosed { .. })
    }

    pub fn diagnosis(&self) -> Option<&str> {
        match self {
            Self::Diagnosed { diagnosis, .. } => Some(diagnosis),
            Self::NoDiagnosis => None,
        }
    }

    /// The diagnosis, or `sentinel` when none was vigent.
    pub fn label<'a>(&'a self, sentinel: &'a str) -> &'a str {
        self.diagnosis().unwrap_or(sentinel)
    }

    pub fn origin_eval_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Diagnosed {
                origin_eval_date, ..
            } => Some(*origin_eval_date),
            Self::NoDiagnosis => None,
        }
    }

    pub fn origin_clinician(&self) -> Option<&str> {
        match self {
            Self::Diagnosed {
                origin_clinician, ..
            } => Some(origin_clinician),
            Self::NoDiagnosis => None,
        }
    }
}

/// A visit tagged with the diagnosis vigent on its date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedVisit {
    pub visit: Visit,
    pub vigent: VigentDiagnosis,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn interval(start: NaiveDate, end: Option<NaiveDate>) -> VigencyInterval {
        VigencyInterval {
            patient_id: PatientId::new("P1").unwrap(),
            start,
            end,
            diagnosis: "Depression".to_string(),
            clinician: "Dr. Lima".to_string(),
            source_evaluation_id: EvaluationId(1),
        }
    }

    #[test]
    fn closed_interval_excludes_its_end() {
        let iv = interval(date(2023, 1, 1), Some(date(2023, 6, 1)));
        assert!(iv.contains(date(2023, 1, 1)));
        assert!(iv.contains(date(2023, 5, 31)));
        assert!(!iv.contains(date(2023, 6, 1)));
        assert!(!iv.contains(date(2022, 12, 31)));
    }

    #[test]
    fn open_interval_extends_forever() {
        let iv = interval(date(2023, 1, 1), None);
        assert!(iv.is_open());
        assert!(iv.contains(date(2999, 1, 1)));
    }

    #[test]
    fn sentinel_label_for_missing_diagnosis() {
        assert_eq!(VigentDiagnosis::NoDiagnosis.label(NO_DIAGNOSIS), "NO_DIAGNOSIS");
        let vigent = VigentDiagnosis::from_interval(&interval(date(2023, 1, 1), None));
        assert_eq!(vigent.label(NO_DIAGNOSIS), "Depression");
        assert_eq!(vigent.origin_clinician(), Some("Dr. Lima"));
    }
}
