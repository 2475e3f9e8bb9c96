//! Transformation and linkage stages of the pharmacovigilance pipeline.
//!
//! Every stage is a pure function over typed tables from `pvl-model`:
//!
//! - **normalize**: drug-name normalization and dosage stripping
//! - **aeolus**: concept dictionary split and the significant-signal lookup
//! - **risk**: exposure x lookup join with estimated onset
//! - **enrich**: demographics, comorbidities and Top-K selection
//! - **ddi**: three-source interaction reference unification
//! - **coexposure**: overlapping exposure pairs joined to the reference
//! - **pairs**: the unordered-pairs iterator used by co-exposure detection

pub mod aeolus;
pub mod coexposure;
pub mod ddi;
pub mod enrich;
pub mod normalize;
pub mod pairs;
pub mod risk;

pub use aeolus::{
    ConceptDictionary, SignificantStats, build_aeolus_lookup, build_concept_dictionary,
};
pub use coexposure::{Exposure, detect_co_exposures, distinct_exposures};
pub use ddi::{mechanism_text, resolve_severity, unify_ddi_sources};
pub use enrich::{age_in_years, enrich_risk, enrich_risk_at, reference_date, select_top_k};
pub use normalize::{canonical_drug, normalize_name};
pub use pairs::{UnorderedPairs, unordered_pairs};
pub use risk::{distinct_products, join_patient_risk};
