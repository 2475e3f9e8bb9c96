//! Pipeline configuration.
//!
//! One [`PipelineConfig`] value is built by the caller (defaults, optionally a
//! TOML file, then command-line overrides) and passed by reference into every
//! stage. Nothing in the workspace reads configuration from ambient state.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::ddi::DdiSource;
use crate::error::{ModelError, Result};

/// Default significance threshold on the number of reported cases.
pub const DEFAULT_MIN_CASE_COUNT: i64 = 20;
/// Default significance threshold on the reporting odds ratio.
pub const DEFAULT_MIN_ROR: f64 = 2.0;
/// Default number of risk rows kept per (patient, drug) group.
pub const DEFAULT_TOP_K: usize = 5;
/// Default latency between exposure start and estimated onset.
pub const DEFAULT_ONSET_LATENCY_DAYS: i64 = 5;
/// Default public RxNav endpoint.
pub const DEFAULT_RXNAV_BASE_URL: &str = "https://rxnav.nlm.nih.gov/REST";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Search root for every input file.
    pub raw_dir: PathBuf,
    /// Directory receiving every output table and the mapping cache.
    pub output_dir: PathBuf,
    pub top_k: usize,
    pub onset_latency_days: i64,
    pub aeolus: AeolusConfig,
    pub ddi: DdiConfig,
    pub resolver: ResolverConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            raw_dir: PathBuf::from("data/raw"),
            output_dir: PathBuf::from("data/processed"),
            top_k: DEFAULT_TOP_K,
            onset_latency_days: DEFAULT_ONSET_LATENCY_DAYS,
            aeolus: AeolusConfig::default(),
            ddi: DdiConfig::default(),
            resolver: ResolverConfig::default(),
        }
    }
}

/// Significance filter applied to the outcome statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AeolusConfig {
    pub min_case_count: i64,
    pub min_ror: f64,
}

impl Default for AeolusConfig {
    fn default() -> Self {
        Self {
            min_case_count: DEFAULT_MIN_CASE_COUNT,
            min_ror: DEFAULT_MIN_ROR,
        }
    }
}

impl AeolusConfig {
    /// True when a statistic passes both thresholds.
    pub fn is_significant(&self, case_count: i64, ror: f64) -> bool {
        case_count >= self.min_case_count && ror >= self.min_ror
    }
}

/// Interaction-reference policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DdiConfig {
    /// Sources consulted for the unified severity, highest priority first.
    pub severity_priority: Vec<DdiSource>,
    /// Severity value treated as absent, compared case-insensitively.
    pub unknown_sentinel: String,
    /// Integrate the CRESCENDDI negative controls as well.
    pub include_negative_controls: bool,
}

impl Default for DdiConfig {
    fn default() -> Self {
        Self {
            severity_priority: vec![DdiSource::Micromedex, DdiSource::DdInter],
            unknown_sentinel: "unknown".to_string(),
            include_negative_controls: false,
        }
    }
}

impl DdiConfig {
    /// True for empty values and the sentinel.
    pub fn is_unknown_severity(&self, value: &str) -> bool {
        let value = value.trim();
        value.is_empty() || value.eq_ignore_ascii_case(self.unknown_sentinel.trim())
    }
}

/// Ingredient resolution settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Use the online lookup instead of the identity mapping.
    pub online: bool,
    pub timeout_secs: u64,
    pub base_url: String,
    /// Ignore and overwrite an existing mapping cache.
    pub refresh_cache: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            online: false,
            timeout_secs: 8,
            base_url: DEFAULT_RXNAV_BASE_URL.to_string(),
            refresh_cache: false,
        }
    }
}

impl PipelineConfig {
    /// Checks the invariants every stage relies on.
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(ModelError::InvalidConfig("top_k must be at least 1".into()));
        }
        if self.aeolus.min_case_count < 0 {
            return Err(ModelError::InvalidConfig(format!(
                "aeolus.min_case_count must not be negative (got {})",
                self.aeolus.min_case_count
            )));
        }
        if !self.aeolus.min_ror.is_finite() || self.aeolus.min_ror < 0.0 {
            return Err(ModelError::InvalidConfig(format!(
                "aeolus.min_ror must be a non-negative number (got {})",
                self.aeolus.min_ror
            )));
        }
        if self.onset_latency_days < 0 {
            return Err(ModelError::InvalidConfig(format!(
                "onset_latency_days must not be negative (got {})",
                self.onset_latency_days
            )));
        }
        if self.ddi.severity_priority.is_empty() {
            return Err(ModelError::InvalidConfig(
                "ddi.severity_priority must name at least one source".into(),
            ));
        }
        let mut seen = BTreeSet::new();
        for source in &self.ddi.severity_priority {
            if *source == DdiSource::Mendeley {
                return Err(ModelError::InvalidConfig(
                    "ddi.severity_priority: Mendeley carries no severity".into(),
                ));
            }
            if !seen.insert(*source) {
                return Err(ModelError::InvalidConfig(format!(
                    "ddi.severity_priority names {source} twice"
                )));
            }
        }
        if self.resolver.online && self.resolver.timeout_secs == 0 {
            return Err(ModelError::InvalidConfig(
                "resolver.timeout_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
