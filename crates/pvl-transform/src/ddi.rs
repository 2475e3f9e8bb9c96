//! Unification of the three interaction sources into one pair reference.
//!
//! Sources are first merged on the raw (as published) name pair, then keyed
//! by the symmetric [`PairKey`] of the normalized names so that `A|B` and
//! `b|a [brand]` collapse into one reference row.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use pvl_model::{DdiConfig, DdiPair, DdiSource, DdiSources, PairKey};
use tracing::info_span;

use crate::normalize::normalize_name;

type RawPair = (Option<String>, Option<String>);

/// Per-pair contributions, lists in first-seen order without duplicates.
#[derive(Debug, Default)]
struct Contributions {
    drug1_norm: Option<String>,
    drug2_norm: Option<String>,
    ddinter_levels: Vec<String>,
    micromedex_severity: Vec<String>,
    micromedex_evidence: Vec<String>,
    crescenddi_event: Option<String>,
    mendeley_types: Vec<String>,
}

impl Contributions {
    fn absorb(&mut self, other: Contributions) {
        first_non_empty(&mut self.drug1_norm, other.drug1_norm);
        first_non_empty(&mut self.drug2_norm, other.drug2_norm);
        first_non_empty(&mut self.crescenddi_event, other.crescenddi_event);
        for value in other.ddinter_levels {
            push_unique(&mut self.ddinter_levels, Some(value));
        }
        for value in other.micromedex_severity {
            push_unique(&mut self.micromedex_severity, Some(value));
        }
        for value in other.micromedex_evidence {
            push_unique(&mut self.micromedex_evidence, Some(value));
        }
        for value in other.mendeley_types {
            push_unique(&mut self.mendeley_types, Some(value));
        }
    }
}

fn push_unique(list: &mut Vec<String>, value: Option<String>) {
    if let Some(value) = value
        && !value.trim().is_empty()
        && !list.contains(&value)
    {
        list.push(value);
    }
}

fn first_non_empty(slot: &mut Option<String>, candidate: Option<String>) {
    if slot.is_none()
        && let Some(value) = candidate
        && !value.trim().is_empty()
    {
        *slot = Some(value);
    }
}

/// Builds the unified interaction reference, one row per pair key.
///
/// Rows come out in ascending pair-key order. A source counts towards
/// `sources_present` (and so the confidence) only through its severity or
/// mechanism values: a CRESCENDDI row without a Micromedex severity, such as
/// a negative control, adds its event and evidence but not Micromedex.
pub fn unify_ddi_sources(sources: &DdiSources, config: &DdiConfig) -> Vec<DdiPair> {
    let span = info_span!("ddi_unify", rows = sources.total_rows());
    let _guard = span.enter();
    let start = Instant::now();

    // Outer join on the raw name pair.
    let mut merged: BTreeMap<RawPair, Contributions> = BTreeMap::new();
    for record in &sources.ddinter {
        let slot = merged
            .entry((record.drug1_name.clone(), record.drug2_name.clone()))
            .or_default();
        push_unique(&mut slot.ddinter_levels, record.level.clone());
    }
    for record in &sources.crescenddi {
        let slot = merged
            .entry((record.drug1_name.clone(), record.drug2_name.clone()))
            .or_default();
        push_unique(&mut slot.micromedex_severity, record.severity_level.clone());
        push_unique(&mut slot.micromedex_evidence, record.evidence_level.clone());
        first_non_empty(&mut slot.crescenddi_event, record.event_name.clone());
    }
    for record in &sources.mendeley {
        let slot = merged
            .entry((record.drug1_name.clone(), record.drug2_name.clone()))
            .or_default();
        push_unique(&mut slot.mendeley_types, record.interaction_type.clone());
    }
    let raw_pairs = merged.len();

    // Group by the symmetric key of the normalized names.
    let mut grouped: BTreeMap<PairKey, Contributions> = BTreeMap::new();
    for ((drug1, drug2), mut contributions) in merged {
        let drug1_norm = normalize_name(drug1.as_deref());
        let drug2_norm = normalize_name(drug2.as_deref());
        let key = PairKey::new(drug1_norm.clone(), drug2_norm.clone());
        contributions.drug1_norm = Some(drug1_norm);
        contributions.drug2_norm = Some(drug2_norm);
        grouped.entry(key).or_default().absorb(contributions);
    }

    let pairs: Vec<DdiPair> = grouped
        .into_iter()
        .map(|(key, c)| finish_pair(key, c, config))
        .collect();

    let known = pairs.iter().filter(|p| p.unified_severity.is_some()).count();
    let all_sources = pairs
        .iter()
        .filter(|p| p.sources_present.len() == DdiSource::ALL.len())
        .count();
    tracing::info!(
        raw_pairs,
        pairs = pairs.len(),
        with_severity = known,
        all_sources,
        duration_ms = start.elapsed().as_millis(),
        "Unified interaction reference"
    );
    pairs
}

fn finish_pair(key: PairKey, c: Contributions, config: &DdiConfig) -> DdiPair {
    let mut pair = DdiPair {
        key,
        drug1_norm: c.drug1_norm.unwrap_or_default(),
        drug2_norm: c.drug2_norm.unwrap_or_default(),
        ddinter_levels: c.ddinter_levels,
        micromedex_severity: c.micromedex_severity,
        micromedex_evidence: c.micromedex_evidence,
        crescenddi_event: c.crescenddi_event,
        mendeley_types: c.mendeley_types,
        unified_severity: None,
        unified_mechanism_text: None,
        sources_present: BTreeSet::new(),
    };
    pair.unified_severity = resolve_severity(&pair, config);
    pair.unified_mechanism_text = mechanism_text(&pair.mendeley_types);
    pair.sources_present = DdiSource::ALL
        .into_iter()
        .filter(|source| !pair.contributions(*source).is_empty())
        .collect();
    pair
}

/// First value of the highest-priority source that is neither empty nor the
/// sentinel; a sentinel falls through to the next source.
pub fn resolve_severity(pair: &DdiPair, config: &DdiConfig) -> Option<String> {
    config
        .severity_priority
        .iter()
        .filter_map(|source| pair.contributions(*source).first())
        .find(|value| !config.is_unknown_severity(value))
        .cloned()
}

/// Sorted, comma-joined distinct mechanism strings; `None` when there are none.
pub fn mechanism_text(types: &[String]) -> Option<String> {
    let distinct: BTreeSet<&str> = types.iter().map(String::as_str).collect();
    if distinct.is_empty() {
        None
    } else {
        Some(distinct.into_iter().collect::<Vec<_>>().join(", "))
    }
}
