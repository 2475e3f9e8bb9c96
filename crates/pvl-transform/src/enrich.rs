//! Demographic and comorbidity enrichment, and the Top-K selector.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::time::Instant;

use chrono::Utc;
use pvl_model::{Condition, Demographics, EnrichedRisk, Patient, RiskAnnotation, Timestamp};
use tracing::info_span;

use crate::normalize::canonical_drug;

const SECONDS_PER_DAY: i64 = 86_400;
const DAYS_PER_YEAR: i64 = 365;

/// Earliest exposure start across the whole annotation table.
pub fn reference_date(annotations: &[RiskAnnotation]) -> Option<Timestamp> {
    annotations.iter().filter_map(|a| a.start).min()
}

/// Whole years between `birth` and `reference` on a 365-day year, floored.
pub fn age_in_years(birth: Timestamp, reference: Timestamp) -> i64 {
    let days = (reference - birth).num_seconds().div_euclid(SECONDS_PER_DAY);
    days.div_euclid(DAYS_PER_YEAR)
}

/// Enriches annotations using the earliest start as the reference date,
/// falling back to the current time when no start is known.
pub fn enrich_risk(
    annotations: &[RiskAnnotation],
    patients: &[Patient],
    conditions: &[Condition],
) -> Vec<EnrichedRisk> {
    let reference = reference_date(annotations).unwrap_or_else(|| Utc::now().fixed_offset());
    enrich_risk_at(annotations, patients, conditions, reference)
}

/// Attaches age, sex, comorbidities and the canonical drug to each annotation.
///
/// Both joins are left joins on the patient identifier; a patient missing
/// from either table keeps the row with empty fields. When a patient id
/// repeats in the patient table the first row wins. Output order is
/// `(patient asc, ror desc, case_count desc)`, stable.
pub fn enrich_risk_at(
    annotations: &[RiskAnnotation],
    patients: &[Patient],
    conditions: &[Condition],
    reference: Timestamp,
) -> Vec<EnrichedRisk> {
    let span = info_span!("enrich", rows = annotations.len());
    let _guard = span.enter();
    let start = Instant::now();

    let mut demographics: HashMap<&str, (Option<i64>, Option<String>)> = HashMap::new();
    for patient in patients {
        demographics.entry(patient.id.as_str()).or_insert_with(|| {
            (
                patient.birth_date.map(|birth| age_in_years(birth, reference)),
                patient.sex.clone(),
            )
        });
    }

    let mut comorbidities: HashMap<&str, BTreeSet<String>> = HashMap::new();
    for condition in conditions {
        let set = comorbidities
            .entry(condition.patient_id.as_str())
            .or_default();
        if let Some(description) = &condition.description {
            set.insert(description.clone());
        }
    }

    let mut enriched: Vec<EnrichedRisk> = annotations
        .iter()
        .map(|annotation| {
            let (age, sex) = demographics
                .get(annotation.patient_id.as_str())
                .cloned()
                .unwrap_or_default();
            EnrichedRisk {
                demographics: Demographics {
                    age,
                    sex,
                    comorbidities: comorbidities
                        .get(annotation.patient_id.as_str())
                        .cloned()
                        .unwrap_or_default(),
                },
                canonical_drug: canonical_drug(annotation.drug_description.as_deref()),
                annotation: annotation.clone(),
            }
        })
        .collect();

    enriched.sort_by(|a, b| {
        a.patient_id()
            .cmp(b.patient_id())
            .then_with(|| by_salience(a, b))
    });

    tracing::info!(
        rows = enriched.len(),
        patients = demographics.len(),
        reference = %reference,
        duration_ms = start.elapsed().as_millis(),
        "Enriched risk annotations"
    );
    enriched
}

/// `(ror desc, case_count desc)`.
fn by_salience(a: &EnrichedRisk, b: &EnrichedRisk) -> Ordering {
    b.ror()
        .total_cmp(&a.ror())
        .then(b.case_count().cmp(&a.case_count()))
}

/// Keeps at most `k` rows per (patient, canonical drug) group.
///
/// Rows are stably sorted by `(patient asc, canonical drug asc, ror desc,
/// case_count desc)`, so ties keep their enriched-table order, and the first
/// `k` of each group survive.
pub fn select_top_k(enriched: &[EnrichedRisk], k: usize) -> Vec<EnrichedRisk> {
    let span = info_span!("top_k", rows = enriched.len(), k);
    let _guard = span.enter();

    let mut ordered: Vec<&EnrichedRisk> = enriched.iter().collect();
    ordered.sort_by(|a, b| {
        a.patient_id()
            .cmp(b.patient_id())
            .then_with(|| a.canonical_drug.cmp(&b.canonical_drug))
            .then_with(|| by_salience(a, b))
    });

    let mut kept = Vec::new();
    let mut group: Option<(&str, &str)> = None;
    let mut taken = 0usize;
    for row in ordered {
        let key = (row.patient_id(), row.canonical_drug.as_str());
        if group != Some(key) {
            group = Some(key);
            taken = 0;
        }
        if taken < k {
            kept.push(row.clone());
            taken += 1;
        }
    }

    tracing::info!(rows = kept.len(), "Selected top-k risks per patient and drug");
    kept
}
