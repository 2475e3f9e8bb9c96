//! Configuration loading: TOML file first, then command-line overrides.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pvl_model::PipelineConfig;

/// Values given on the command line; `None`/`false` leaves the file value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub raw_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub use_rxnav: bool,
    pub refresh_cache: bool,
    pub top_k: Option<usize>,
    pub min_case_count: Option<i64>,
    pub min_ror: Option<f64>,
    pub include_negative_controls: bool,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut PipelineConfig) {
        if let Some(dir) = &self.raw_dir {
            config.raw_dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if self.use_rxnav {
            config.resolver.online = true;
        }
        if self.refresh_cache {
            config.resolver.refresh_cache = true;
        }
        if let Some(k) = self.top_k {
            config.top_k = k;
        }
        if let Some(min) = self.min_case_count {
            config.aeolus.min_case_count = min;
        }
        if let Some(min) = self.min_ror {
            config.aeolus.min_ror = min;
        }
        if self.include_negative_controls {
            config.ddi.include_negative_controls = true;
        }
    }
}

/// Reads the configuration file, or the defaults when none is given.
pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    let Some(path) = path else {
        return Ok(PipelineConfig::default());
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parse config {}", path.display()))
}

/// Loads, overrides and validates the configuration of one run.
pub fn resolve_config(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<PipelineConfig> {
    let mut config = load_config(path)?;
    overrides.apply(&mut config);
    config.validate().context("invalid configuration")?;
    Ok(config)
}
