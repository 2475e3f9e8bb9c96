//! Key-value store for resolved product to ingredient mappings.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use pvl_model::IngredientMap;
use pvl_output::{read_ingredient_map, schema, write_table_at};
use tracing::debug;

use crate::error::Result;

/// Persistent store of ingredient mappings.
///
/// A stored mapping is authoritative: nothing checks whether it is stale or
/// covers every product of the current run.
pub trait MappingCache {
    fn get(&self, key: &str) -> Result<Option<IngredientMap>>;
    fn put(&mut self, key: &str, mapping: &IngredientMap) -> Result<()>;
}

/// Stores each mapping as `{dir}/{key}.csv` in the ingredient-map table format.
#[derive(Debug, Clone)]
pub struct CsvMappingCache {
    dir: PathBuf,
}

impl CsvMappingCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.csv"))
    }
}

impl MappingCache for CsvMappingCache {
    fn get(&self, key: &str) -> Result<Option<IngredientMap>> {
        let path = self.path(key);
        if !path.is_file() {
            debug!(path = %path.display(), "No cached mapping");
            return Ok(None);
        }
        Ok(Some(read_ingredient_map(&path)?))
    }

    fn put(&mut self, key: &str, mapping: &IngredientMap) -> Result<()> {
        write_table_at(&self.path(key), schema::INGREDIENT_MAP, mapping.iter())?;
        Ok(())
    }
}

/// In-memory store, for tests and one-shot runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryMappingCache {
    entries: HashMap<String, IngredientMap>,
}

impl MemoryMappingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: impl Into<String>, mapping: IngredientMap) -> Self {
        self.entries.insert(key.into(), mapping);
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl MappingCache for MemoryMappingCache {
    fn get(&self, key: &str) -> Result<Option<IngredientMap>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, mapping: &IngredientMap) -> Result<()> {
        self.entries.insert(key.to_string(), mapping.clone());
        Ok(())
    }
}
