//! Synthetic patient corpus records.

use std::collections::BTreeSet;

use crate::Rxcui;
use crate::interval::Interval;
use crate::time::Timestamp;

/// One medication-exposure row.
#[derive(Debug, Clone, PartialEq)]
pub struct MedicationExposure {
    pub patient_id: String,
    pub description: Option<String>,
    /// Product identifier extracted from the medication code.
    pub rxcui: Option<Rxcui>,
    pub start: Option<Timestamp>,
    /// Missing when the exposure is ongoing.
    pub stop: Option<Timestamp>,
}

impl MedicationExposure {
    pub fn interval(&self) -> Interval {
        Interval::new(self.start, self.stop)
    }
}

/// Patient demographics as recorded in the source corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct Patient {
    pub id: String,
    pub birth_date: Option<Timestamp>,
    pub sex: Option<String>,
}

/// One condition (diagnosis) row.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub patient_id: String,
    pub description: Option<String>,
}

/// Per-patient snapshot attached to every enriched row.
///
/// `comorbidities` is a set: ordering only exists for deterministic output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Demographics {
    pub age: Option<i64>,
    pub sex: Option<String>,
    pub comorbidities: BTreeSet<String>,
}
