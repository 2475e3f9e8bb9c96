//! Patient risk joiner: medication exposures x AEOLUS lookup.

use std::collections::{BTreeSet, HashMap};
use std::time::Instant;

use chrono::TimeDelta;
use pvl_model::{AeolusLookupEntry, IngredientMap, MedicationExposure, RiskAnnotation, Rxcui};
use tracing::info_span;

/// Distinct product identifiers of the exposures, ascending.
pub fn distinct_products(meds: &[MedicationExposure]) -> Vec<Rxcui> {
    meds.iter()
        .filter_map(|m| m.rxcui)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Produces one annotation per (exposure, matching lookup row).
///
/// Exposures without a product identifier or without a resolved ingredient
/// are dropped before the lookup join. The estimated onset is `start +
/// latency_days` in the offset of `start`. Output order is `(patient asc,
/// ingredient asc, ror desc)`, stable.
pub fn join_patient_risk(
    meds: &[MedicationExposure],
    ingredients: &IngredientMap,
    lookup: &[AeolusLookupEntry],
    latency_days: i64,
) -> Vec<RiskAnnotation> {
    let span = info_span!("patient_risk", exposures = meds.len());
    let _guard = span.enter();
    let start = Instant::now();

    let mut by_ingredient: HashMap<Rxcui, Vec<&AeolusLookupEntry>> = HashMap::new();
    for entry in lookup {
        by_ingredient.entry(entry.rxcui).or_default().push(entry);
    }
    let latency = TimeDelta::days(latency_days);

    let mut unmapped = 0usize;
    let mut annotations = Vec::new();
    for med in meds {
        let Some(rxcui) = med.rxcui else {
            continue;
        };
        let Some(ingredient) = ingredients.ingredient(rxcui) else {
            unmapped += 1;
            continue;
        };
        let Some(matches) = by_ingredient.get(&ingredient) else {
            continue;
        };
        let estimated_onset = med.start.and_then(|ts| ts.checked_add_signed(latency));
        for entry in matches {
            annotations.push(RiskAnnotation {
                patient_id: med.patient_id.clone(),
                rxcui,
                ingredient_rxcui: ingredient,
                drug_description: med.description.clone(),
                aeolus_drug_name: entry.drug_name.clone(),
                start: med.start,
                stop: med.stop,
                estimated_onset,
                outcome_concept_id: entry.outcome_concept_id,
                outcome_text: entry.outcome_text.clone(),
                meddra_code: entry.meddra_code.clone(),
                case_count: entry.case_count,
                prr: entry.prr,
                ror: entry.ror,
            });
        }
    }

    annotations.sort_by(|a, b| {
        a.patient_id
            .cmp(&b.patient_id)
            .then(a.ingredient_rxcui.cmp(&b.ingredient_rxcui))
            .then(b.ror.total_cmp(&a.ror))
    });

    if unmapped > 0 {
        tracing::debug!(unmapped, "Exposures without an ingredient mapping were dropped");
    }
    tracing::info!(
        rows = annotations.len(),
        duration_ms = start.elapsed().as_millis(),
        "Joined patient risk annotations"
    );
    annotations
}

#[cfg(test)]
mod tests {
    use super::*;
    use pvl_model::{format_timestamp, parse_timestamp};

    fn med(patient: &str, rxcui: Option<i64>, start: &str) -> MedicationExposure {
        MedicationExposure {
            patient_id: patient.to_string(),
            description: Some(format!("Drug {}", rxcui.unwrap_or_default())),
            rxcui,
            start: parse_timestamp(start),
            stop: None,
        }
    }

    fn entry(rxcui: i64, outcome: i64, ror: f64) -> AeolusLookupEntry {
        AeolusLookupEntry {
            rxcui,
            drug_name: Some(format!("ingredient {rxcui}")),
            outcome_concept_id: Some(outcome),
            outcome_text: Some(format!("outcome {outcome}")),
            meddra_code: None,
            case_count: 25,
            prr: None,
            ror,
        }
    }

    #[test]
    fn fans_out_over_matching_outcomes() {
        let meds = vec![med("P1", Some(10), "2020-01-01T08:00:00+02:00")];
        let lookup = vec![entry(10, 1, 2.5), entry(10, 2, 6.0), entry(11, 3, 9.0)];
        let ingredients = IngredientMap::identity([10]);
        let risk = join_patient_risk(&meds, &ingredients, &lookup, 5);
        assert_eq!(risk.len(), 2);
        assert_eq!(risk[0].ror, 6.0);
        assert_eq!(risk[1].ror, 2.5);
        assert_eq!(
            format_timestamp(&risk[0].estimated_onset.unwrap()),
            "2020-01-06T08:00:00+02:00"
        );
    }

    #[test]
    fn product_is_joined_through_its_ingredient() {
        let meds = vec![med("P1", Some(313782), "2020-01-01")];
        let mut ingredients = IngredientMap::new();
        ingredients.insert(313782, Some(161));
        let risk = join_patient_risk(&meds, &ingredients, &[entry(161, 1, 3.0)], 5);
        assert_eq!(risk.len(), 1);
        assert_eq!(risk[0].rxcui, 313782);
        assert_eq!(risk[0].ingredient_rxcui, 161);
    }

    #[test]
    fn unmapped_and_unidentified_exposures_are_dropped() {
        let meds = vec![
            med("P1", None, "2020-01-01"),
            med("P1", Some(20), "2020-01-01"),
        ];
        let mut ingredients = IngredientMap::new();
        ingredients.insert(20, None);
        let risk = join_patient_risk(&meds, &ingredients, &[entry(20, 1, 3.0)], 5);
        assert!(risk.is_empty());
    }

    #[test]
    fn missing_start_gives_missing_onset() {
        let mut exposure = med("P2", Some(10), "2020-01-01");
        exposure.start = None;
        let risk = join_patient_risk(
            &[exposure],
            &IngredientMap::identity([10]),
            &[entry(10, 1, 3.0)],
            5,
        );
        assert_eq!(risk[0].estimated_onset, None);
    }

    #[test]
    fn sorted_by_patient_then_ingredient() {
        let meds = vec![
            med("P2", Some(10), "2020-01-01"),
            med("P1", Some(11), "2020-01-01"),
            med("P1", Some(10), "2020-01-01"),
        ];
        let lookup = vec![entry(10, 1, 3.0), entry(11, 1, 9.0)];
        let risk = join_patient_risk(&meds, &IngredientMap::identity([10, 11]), &lookup, 5);
        let keys: Vec<_> = risk
            .iter()
            .map(|r| (r.patient_id.as_str(), r.ingredient_rxcui))
            .collect();
        assert_eq!(keys, vec![("P1", 10), ("P1", 11), ("P2", 10)]);
    }

    #[test]
    fn distinct_products_are_sorted() {
        let meds = vec![
            med("P1", Some(30), "2020-01-01"),
            med("P2", Some(10), "2020-01-01"),
            med("P3", Some(30), "2020-01-01"),
            med("P3", None, "2020-01-01"),
        ];
        assert_eq!(distinct_products(&meds), vec![10, 30]);
    }
}
