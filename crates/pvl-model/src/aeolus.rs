//! AEOLUS concept dictionary and outcome statistics records.

use crate::Rxcui;

/// One row of the headerless concept table.
///
/// Only the four columns the pipeline needs are kept; domain, class,
/// standard flag and validity dates are dropped at load time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConceptRecord {
    pub concept_id: Option<i64>,
    pub name: Option<String>,
    pub vocabulary_id: Option<String>,
    pub code: Option<String>,
}

/// Drug sub-dictionary row (RxNorm vocabulary).
#[derive(Debug, Clone, PartialEq)]
pub struct DrugConcept {
    pub drug_concept_id: i64,
    pub drug_name: Option<String>,
    /// Numeric identifier parsed from the concept code; missing when unparseable.
    pub rxcui: Option<Rxcui>,
}

/// Outcome sub-dictionary row (MedDRA vocabulary).
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeConcept {
    pub outcome_concept_id: i64,
    pub outcome_text: Option<String>,
    pub meddra_code: Option<String>,
}

/// One row of the headerless drug/outcome statistics table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OutcomeStat {
    pub drug_concept_id: Option<i64>,
    pub outcome_concept_id: Option<i64>,
    pub case_count: Option<i64>,
    pub prr: Option<f64>,
    pub ror: Option<f64>,
}

/// A significant drug/adverse-event signal keyed by ingredient identifier.
///
/// Every entry in a built lookup satisfies the configured case-count and ROR
/// thresholds, which is why both fields are non-optional.
#[derive(Debug, Clone, PartialEq)]
pub struct AeolusLookupEntry {
    pub rxcui: Rxcui,
    pub drug_name: Option<String>,
    pub outcome_concept_id: Option<i64>,
    pub outcome_text: Option<String>,
    pub meddra_code: Option<String>,
    pub case_count: i64,
    pub prr: Option<f64>,
    pub ror: f64,
}
