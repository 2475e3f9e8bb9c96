//! Data model for the drug-safety linkage pipeline.
//!
//! Every stage consumes and produces tables of the typed records defined
//! here; there are no untyped column-label joins anywhere in the workspace.
//!
//! # Module Organization
//!
//! - [`aeolus`]: concept dictionary rows, outcome statistics and the lookup entry
//! - [`patient`]: medication exposures, demographics and conditions
//! - [`risk`]: per-exposure risk annotations and their enriched form
//! - [`ddi`]: the three interaction sources and the unified pair record
//! - [`coexposure`]: overlapping exposure pairs joined to the interaction reference
//! - [`pair`]: the symmetric drug pair key
//! - [`interval`]: exposure intervals and overlap arithmetic
//! - [`ingredient`]: the product to ingredient mapping
//! - [`time`]: timestamp parsing and encoding
//! - [`config`]: the pipeline configuration value

#![deny(unsafe_code)]

pub mod aeolus;
pub mod coexposure;
pub mod config;
pub mod ddi;
pub mod error;
pub mod ingredient;
pub mod interval;
pub mod pair;
pub mod patient;
pub mod risk;
pub mod time;

pub use aeolus::{AeolusLookupEntry, ConceptRecord, DrugConcept, OutcomeConcept, OutcomeStat};
pub use coexposure::CoExposure;
pub use config::{AeolusConfig, DdiConfig, PipelineConfig, ResolverConfig};
pub use ddi::{
    CrescendDiRecord, DdInterRecord, DdiPair, DdiSource, DdiSources, MendeleyRecord,
    TOTAL_DDI_SOURCES,
};
pub use error::{ModelError, Result};
pub use ingredient::IngredientMap;
pub use interval::Interval;
pub use pair::PairKey;
pub use patient::{Condition, Demographics, MedicationExposure, Patient};
pub use risk::{EnrichedRisk, RiskAnnotation};
pub use time::{OPEN_END, Timestamp, format_timestamp, open_end, parse_timestamp};

/// Product-level or ingredient-level RxNorm concept unique identifier.
pub type Rxcui = i64;
