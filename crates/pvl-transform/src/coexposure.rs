//! Co-exposure detection over the Top-K table.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Instant;

use pvl_model::{CoExposure, DdiPair, Demographics, EnrichedRisk, Interval, PairKey};
use tracing::info_span;

use crate::normalize::normalize_name;
use crate::pairs::unordered_pairs;

/// One distinct exposure of a patient, as seen by the detector.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Exposure {
    pub drug: String,
    pub drug_norm: String,
    pub interval: Interval,
    pub demographics: Demographics,
}

/// Reduces the Top-K table to distinct exposures per patient.
///
/// Patients come out in ascending order; each patient's exposures keep the
/// order of their first appearance. Rows without a canonical drug (a
/// description that starts with a digit) are skipped and counted at debug.
pub fn distinct_exposures(top_k: &[EnrichedRisk]) -> BTreeMap<String, Vec<Exposure>> {
    let mut seen: HashSet<(&str, Exposure)> = HashSet::new();
    let mut by_patient: BTreeMap<String, Vec<Exposure>> = BTreeMap::new();
    let mut unnamed = 0usize;
    for row in top_k {
        if row.canonical_drug.is_empty() {
            unnamed += 1;
            continue;
        }
        let exposure = Exposure {
            drug: row.canonical_drug.clone(),
            drug_norm: normalize_name(Some(&row.canonical_drug)),
            interval: Interval::new(row.annotation.start, row.annotation.stop),
            demographics: row.demographics.clone(),
        };
        if seen.insert((row.patient_id(), exposure.clone())) {
            by_patient
                .entry(row.patient_id().to_string())
                .or_default()
                .push(exposure);
        }
    }
    if unnamed > 0 {
        tracing::debug!(skipped = unnamed, "Top-K rows without a canonical drug name");
    }
    by_patient
}

/// Finds overlapping pairs of distinct drugs per patient and flags known interactions.
///
/// The reference is left-joined on the pair key; `known` is set only when it
/// supplies a severity. No overlapping pair at all is not an error: the
/// result is simply empty.
pub fn detect_co_exposures(top_k: &[EnrichedRisk], reference: &[DdiPair]) -> Vec<CoExposure> {
    let span = info_span!("co_exposure", rows = top_k.len());
    let _guard = span.enter();
    let start = Instant::now();

    let by_key: HashMap<&PairKey, &DdiPair> = reference.iter().map(|p| (&p.key, p)).collect();
    let exposures = distinct_exposures(top_k);

    let mut rows = Vec::new();
    for (patient_id, patient_exposures) in &exposures {
        for (first, second) in unordered_pairs(patient_exposures) {
            if first.drug_norm == second.drug_norm {
                continue;
            }
            let Some((overlap_start, overlap_stop)) =
                first.interval.overlap_window(&second.interval)
            else {
                continue;
            };
            let pair_key = PairKey::new(first.drug_norm.clone(), second.drug_norm.clone());
            let matched = by_key.get(&pair_key);
            let unified_severity = matched.and_then(|p| p.unified_severity.clone());
            rows.push(CoExposure {
                patient_id: patient_id.clone(),
                drug1: first.drug.clone(),
                drug2: second.drug.clone(),
                drug1_norm: first.drug_norm.clone(),
                drug2_norm: second.drug_norm.clone(),
                overlap_start,
                overlap_stop,
                demographics: first.demographics.clone(),
                known: unified_severity.is_some(),
                unified_severity,
                unified_mechanism_text: matched.and_then(|p| p.unified_mechanism_text.clone()),
                ddi_confidence: matched.map(|p| p.confidence()),
                pair_key,
            });
        }
    }

    if rows.is_empty() {
        tracing::warn!("No overlapping exposures found; co-exposure table is empty");
    } else {
        tracing::info!(
            rows = rows.len(),
            patients = exposures.len(),
            known = rows.iter().filter(|r| r.known).count(),
            duration_ms = start.elapsed().as_millis(),
            "Detected co-exposures"
        );
    }
    rows
}
