//! Concept dictionary split and the AEOLUS drug/outcome lookup.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use pvl_model::{
    AeolusConfig, AeolusLookupEntry, ConceptRecord, DrugConcept, OutcomeConcept, OutcomeStat,
};
use tracing::info_span;

/// Vocabulary of drug concepts.
pub const DRUG_VOCABULARY: &str = "RXNORM";
/// Vocabulary of adverse-event concepts.
pub const OUTCOME_VOCABULARY: &str = "MEDDRA";

/// Drug and outcome sub-dictionaries of one concept table.
#[derive(Debug, Clone, Default)]
pub struct ConceptDictionary {
    pub drugs: Vec<DrugConcept>,
    pub outcomes: Vec<OutcomeConcept>,
}

/// Splits a concept table by vocabulary (case-insensitive).
///
/// Rows without a concept identifier cannot be joined and are skipped. The
/// drug identifier is the whole code parsed as a number; anything else
/// leaves it missing.
pub fn build_concept_dictionary(concepts: &[ConceptRecord]) -> ConceptDictionary {
    let mut dictionary = ConceptDictionary::default();
    for concept in concepts {
        let Some(concept_id) = concept.concept_id else {
            continue;
        };
        let vocabulary = concept
            .vocabulary_id
            .as_deref()
            .map(str::to_ascii_uppercase)
            .unwrap_or_default();
        match vocabulary.as_str() {
            DRUG_VOCABULARY => dictionary.drugs.push(DrugConcept {
                drug_concept_id: concept_id,
                drug_name: concept.name.clone(),
                rxcui: concept
                    .code
                    .as_deref()
                    .and_then(|code| code.trim().parse::<i64>().ok()),
            }),
            OUTCOME_VOCABULARY => dictionary.outcomes.push(OutcomeConcept {
                outcome_concept_id: concept_id,
                outcome_text: concept.name.clone(),
                meddra_code: concept.code.clone(),
            }),
            _ => {}
        }
    }
    tracing::debug!(
        drugs = dictionary.drugs.len(),
        outcomes = dictionary.outcomes.len(),
        "Split concept dictionary"
    );
    dictionary
}

/// Row test for the statistics stream: keeps only rows that can reach the lookup.
///
/// A row survives when its drug concept resolves to an RxNorm drug with a
/// numeric code and it carries a case count and a ROR passing the
/// thresholds. [`build_aeolus_lookup`] applies the same test, so filtering
/// while loading never changes the lookup.
#[derive(Debug, Clone)]
pub struct SignificantStats<'a> {
    drug_ids: HashSet<i64>,
    config: &'a AeolusConfig,
}

impl<'a> SignificantStats<'a> {
    pub fn new(dictionary: &ConceptDictionary, config: &'a AeolusConfig) -> Self {
        let drug_ids = dictionary
            .drugs
            .iter()
            .filter(|drug| drug.rxcui.is_some())
            .map(|drug| drug.drug_concept_id)
            .collect();
        Self { drug_ids, config }
    }

    pub fn keeps(&self, stat: &OutcomeStat) -> bool {
        let Some(drug_id) = stat.drug_concept_id else {
            return false;
        };
        let (Some(case_count), Some(ror)) = (stat.case_count, stat.ror) else {
            return false;
        };
        self.drug_ids.contains(&drug_id) && self.config.is_significant(case_count, ror)
    }
}

/// Joins statistics to the dictionaries and keeps the significant signals.
///
/// Statistics join the drug dictionary with an inner join (fan-out over
/// duplicate concept ids) and the outcome dictionary with a left join.
/// Rows without an identifier, a case count or a ROR are dropped, then the
/// thresholds apply. Output order is `(rxcui asc, ror desc)`, stable.
pub fn build_aeolus_lookup(
    stats: &[OutcomeStat],
    dictionary: &ConceptDictionary,
    config: &AeolusConfig,
) -> Vec<AeolusLookupEntry> {
    let span = info_span!("aeolus_lookup", stats = stats.len());
    let _guard = span.enter();
    let start = Instant::now();

    let mut drugs: HashMap<i64, Vec<&DrugConcept>> = HashMap::new();
    for drug in &dictionary.drugs {
        drugs.entry(drug.drug_concept_id).or_default().push(drug);
    }
    let mut outcomes: HashMap<i64, Vec<&OutcomeConcept>> = HashMap::new();
    for outcome in &dictionary.outcomes {
        outcomes
            .entry(outcome.outcome_concept_id)
            .or_default()
            .push(outcome);
    }

    let mut lookup = Vec::new();
    for stat in stats {
        let Some(matched_drugs) = stat.drug_concept_id.and_then(|id| drugs.get(&id)) else {
            continue;
        };
        let matched_outcomes = stat.outcome_concept_id.and_then(|id| outcomes.get(&id));
        for drug in matched_drugs {
            let Some(rxcui) = drug.rxcui else {
                continue;
            };
            let (Some(case_count), Some(ror)) = (stat.case_count, stat.ror) else {
                continue;
            };
            if !config.is_significant(case_count, ror) {
                continue;
            }
            let entry = |outcome: Option<&OutcomeConcept>| AeolusLookupEntry {
                rxcui,
                drug_name: drug.drug_name.clone(),
                outcome_concept_id: stat.outcome_concept_id,
                outcome_text: outcome.and_then(|o| o.outcome_text.clone()),
                meddra_code: outcome.and_then(|o| o.meddra_code.clone()),
                case_count,
                prr: stat.prr,
                ror,
            };
            match matched_outcomes {
                Some(list) => lookup.extend(list.iter().map(|o| entry(Some(*o)))),
                None => lookup.push(entry(None)),
            }
        }
    }

    lookup.sort_by(|a, b| a.rxcui.cmp(&b.rxcui).then(b.ror.total_cmp(&a.ror)));

    let ingredients = lookup
        .iter()
        .map(|e| e.rxcui)
        .collect::<std::collections::BTreeSet<_>>()
        .len();
    tracing::info!(
        rows = lookup.len(),
        ingredients,
        duration_ms = start.elapsed().as_millis(),
        "Built AEOLUS lookup"
    );
    lookup
}
