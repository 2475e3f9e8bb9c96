//! Patient adverse-event risk records.

use crate::Rxcui;
use crate::patient::Demographics;
use crate::time::Timestamp;

/// One (exposure x matching adverse event) row.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskAnnotation {
    pub patient_id: String,
    pub rxcui: Rxcui,
    pub ingredient_rxcui: Rxcui,
    pub drug_description: Option<String>,
    pub aeolus_drug_name: Option<String>,
    pub start: Option<Timestamp>,
    pub stop: Option<Timestamp>,
    /// `start` plus the onset latency, in the offset of `start`.
    pub estimated_onset: Option<Timestamp>,
    pub outcome_concept_id: Option<i64>,
    pub outcome_text: Option<String>,
    pub meddra_code: Option<String>,
    pub case_count: i64,
    pub prr: Option<f64>,
    pub ror: f64,
}

/// A risk annotation with demographics, comorbidities and the canonical drug.
///
/// The same record type is used for the Top-K table, which is a subset.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRisk {
    pub annotation: RiskAnnotation,
    pub demographics: Demographics,
    /// Exposure description truncated before its first digit.
    pub canonical_drug: String,
}

impl EnrichedRisk {
    pub fn patient_id(&self) -> &str {
        &self.annotation.patient_id
    }

    pub fn ror(&self) -> f64 {
        self.annotation.ror
    }

    pub fn case_count(&self) -> i64 {
        self.annotation.case_count
    }
}
