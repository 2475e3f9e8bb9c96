//! Drug-drug interaction source rows and the unified pair record.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pair::PairKey;

/// Number of integrated interaction sources; the fixed confidence denominator.
pub const TOTAL_DDI_SOURCES: usize = 3;

/// An integrated interaction reference.
///
/// Variant order is the order sources are listed in `sources_present`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DdiSource {
    /// DDInter severity levels.
    DdInter,
    /// Micromedex severity and evidence levels, shipped inside CRESCENDDI.
    Micromedex,
    /// Mendeley interaction types (mechanism text).
    Mendeley,
}

impl DdiSource {
    pub const ALL: [DdiSource; TOTAL_DDI_SOURCES] =
        [DdiSource::DdInter, DdiSource::Micromedex, DdiSource::Mendeley];

    /// Display name used in the `sources_present` output column.
    pub fn as_str(self) -> &'static str {
        match self {
            DdiSource::DdInter => "DDInter",
            DdiSource::Micromedex => "Micromedex",
            DdiSource::Mendeley => "Mendeley",
        }
    }
}

impl fmt::Display for DdiSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// DDInter row (`Drug_A`, `Drug_B`, `Level`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DdInterRecord {
    pub drug1_name: Option<String>,
    pub drug2_name: Option<String>,
    pub level: Option<String>,
}

/// CRESCENDDI control row carrying Micromedex levels.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CrescendDiRecord {
    pub drug1_name: Option<String>,
    pub drug2_name: Option<String>,
    pub event_name: Option<String>,
    pub severity_level: Option<String>,
    pub evidence_level: Option<String>,
}

/// Mendeley row (`drug1_name`, `drug2_name`, `interaction_type`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MendeleyRecord {
    pub drug1_name: Option<String>,
    pub drug2_name: Option<String>,
    pub interaction_type: Option<String>,
}

/// The three loaded interaction sources, each in file order.
#[derive(Debug, Clone, Default)]
pub struct DdiSources {
    pub ddinter: Vec<DdInterRecord>,
    pub crescenddi: Vec<CrescendDiRecord>,
    pub mendeley: Vec<MendeleyRecord>,
}

impl DdiSources {
    pub fn total_rows(&self) -> usize {
        self.ddinter.len() + self.crescenddi.len() + self.mendeley.len()
    }
}

/// One unified interaction reference row.
///
/// List fields keep first-seen order without duplicates.
#[derive(Debug, Clone, PartialEq)]
pub struct DdiPair {
    pub key: PairKey,
    pub drug1_norm: String,
    pub drug2_norm: String,
    pub ddinter_levels: Vec<String>,
    pub micromedex_severity: Vec<String>,
    pub micromedex_evidence: Vec<String>,
    pub crescenddi_event: Option<String>,
    pub mendeley_types: Vec<String>,
    pub unified_severity: Option<String>,
    pub unified_mechanism_text: Option<String>,
    pub sources_present: BTreeSet<DdiSource>,
}

impl DdiPair {
    /// `|sources_present| / 3`.
    pub fn confidence(&self) -> f64 {
        self.sources_present.len() as f64 / TOTAL_DDI_SOURCES as f64
    }

    /// Values a source contributed to this pair; non-empty means present.
    ///
    /// Micromedex is judged by its severity levels alone, so evidence levels
    /// without a severity do not make it present.
    pub fn contributions(&self, source: DdiSource) -> &[String] {
        match source {
            DdiSource::DdInter => &self.ddinter_levels,
            DdiSource::Micromedex => &self.micromedex_severity,
            DdiSource::Mendeley => &self.mendeley_types,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_sort_in_listing_order() {
        let set: BTreeSet<_> = [DdiSource::Mendeley, DdiSource::DdInter].into_iter().collect();
        let names: Vec<_> = set.iter().map(|s| s.as_str()).collect();
        assert_eq!(names, ["DDInter", "Mendeley"]);
    }

    #[test]
    fn confidence_uses_fixed_denominator() {
        let mut pair = DdiPair {
            key: PairKey::new("a", "b"),
            drug1_norm: "a".into(),
            drug2_norm: "b".into(),
            ddinter_levels: vec!["Major".into()],
            micromedex_severity: Vec::new(),
            micromedex_evidence: Vec::new(),
            crescenddi_event: None,
            mendeley_types: Vec::new(),
            unified_severity: Some("Major".into()),
            unified_mechanism_text: None,
            sources_present: [DdiSource::DdInter].into_iter().collect(),
        };
        assert!((pair.confidence() - 1.0 / 3.0).abs() < 1e-12);
        pair.sources_present.clear();
        assert_eq!(pair.confidence(), 0.0);
    }
}
