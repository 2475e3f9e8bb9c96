//! Batch resolution of product identifiers with cache short-circuit.

use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use pvl_model::{IngredientMap, Rxcui};
use tracing::{debug, info, info_span, warn};

use crate::cache::MappingCache;
use crate::error::Result;
use crate::lookup::IngredientLookup;

/// Cache key of the product to ingredient mapping.
pub const INGREDIENT_CACHE_KEY: &str = "rxcui_to_ingredient_map";

const PROGRESS_TEMPLATE: &str = "{spinner} {msg} [{bar:40}] {pos}/{len} ({eta})";

/// Resolves product identifiers to ingredients through an injected lookup,
/// reusing a cached mapping when one exists.
pub struct IngredientResolver<C, L> {
    cache: C,
    lookup: L,
    refresh: bool,
    show_progress: bool,
}

impl<C: MappingCache, L: IngredientLookup> IngredientResolver<C, L> {
    pub fn new(cache: C, lookup: L) -> Self {
        Self {
            cache,
            lookup,
            refresh: false,
            show_progress: false,
        }
    }

    /// Ignore and overwrite an existing cached mapping.
    pub fn with_refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Returns the mapping for `products`.
    ///
    /// A cached mapping is returned as-is unless refresh is set. Otherwise
    /// every product is looked up once; a failed lookup is recorded as
    /// unresolved and does not stop the batch. The fresh mapping is written
    /// back to the cache.
    pub fn resolve(&mut self, products: &[Rxcui]) -> Result<IngredientMap> {
        let span = info_span!("ingredient_resolve", products = products.len());
        let _guard = span.enter();
        let start = Instant::now();

        if !self.refresh
            && let Some(mapping) = self.cache.get(INGREDIENT_CACHE_KEY)?
        {
            info!(
                entries = mapping.len(),
                resolved = mapping.resolved(),
                "Using cached ingredient mapping"
            );
            return Ok(mapping);
        }

        let progress = self.progress_bar(products.len());
        let mut mapping = IngredientMap::new();
        let mut failed = 0usize;
        for &product in products {
            if mapping.contains(product) {
                progress.inc(1);
                continue;
            }
            let ingredient = match self.lookup.lookup(product) {
                Ok(Some(ingredient)) => Some(ingredient),
                Ok(None) => {
                    debug!(rxcui = product, "No ingredient found");
                    None
                }
                Err(err) => {
                    warn!(rxcui = product, error = %err, "Ingredient lookup failed");
                    failed += 1;
                    None
                }
            };
            mapping.insert(product, ingredient);
            progress.inc(1);
        }
        progress.finish_and_clear();

        self.cache.put(INGREDIENT_CACHE_KEY, &mapping)?;

        info!(
            strategy = self.lookup.name(),
            entries = mapping.len(),
            resolved = mapping.resolved(),
            failed,
            duration_ms = start.elapsed().as_millis(),
            "Resolved ingredients"
        );
        Ok(mapping)
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::with_template(PROGRESS_TEMPLATE) {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.set_message(format!("Resolving via {}", self.lookup.name()));
        bar
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryMappingCache;
    use crate::error::LookupError;
    use crate::lookup::IdentityLookup;
    use std::cell::Cell;
    use std::collections::HashMap;

    struct FakeLookup {
        answers: HashMap<Rxcui, Option<Rxcui>>,
        calls: Cell<usize>,
    }

    impl FakeLookup {
        fn new(answers: &[(Rxcui, Option<Rxcui>)]) -> Self {
            Self {
                answers: answers.iter().copied().collect(),
                calls: Cell::new(0),
            }
        }
    }

    impl IngredientLookup for FakeLookup {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn lookup(&self, rxcui: Rxcui) -> std::result::Result<Option<Rxcui>, LookupError> {
            self.calls.set(self.calls.get() + 1);
            match self.answers.get(&rxcui) {
                Some(answer) => Ok(*answer),
                None => Err(LookupError::Unavailable {
                    rxcui,
                    message: "timed out".into(),
                }),
            }
        }
    }

    #[test]
    fn failures_become_missing_mappings() {
        let lookup = FakeLookup::new(&[(1, Some(10)), (2, None)]);
        let mut resolver = IngredientResolver::new(MemoryMappingCache::new(), lookup);
        let mapping = resolver.resolve(&[1, 2, 3]).unwrap();
        assert_eq!(mapping.len(), 3);
        assert_eq!(mapping.ingredient(1), Some(10));
        assert_eq!(mapping.ingredient(2), None);
        assert_eq!(mapping.ingredient(3), None);
        assert!(resolver.cache().contains(INGREDIENT_CACHE_KEY));
    }

    #[test]
    fn cached_mapping_short_circuits_lookups() {
        let cached = IngredientMap::identity([5]);
        let cache = MemoryMappingCache::new().with_entry(INGREDIENT_CACHE_KEY, cached.clone());
        let lookup = FakeLookup::new(&[(5, Some(50))]);
        let mut resolver = IngredientResolver::new(cache, lookup);
        assert_eq!(resolver.resolve(&[5, 6]).unwrap(), cached);
        assert_eq!(resolver.lookup.calls.get(), 0);
    }

    #[test]
    fn refresh_ignores_cache() {
        let cache = MemoryMappingCache::new()
            .with_entry(INGREDIENT_CACHE_KEY, IngredientMap::identity([5]));
        let lookup = FakeLookup::new(&[(5, Some(50))]);
        let mut resolver = IngredientResolver::new(cache, lookup).with_refresh(true);
        let mapping = resolver.resolve(&[5]).unwrap();
        assert_eq!(mapping.ingredient(5), Some(50));
        assert_eq!(
            resolver.cache().get(INGREDIENT_CACHE_KEY).unwrap(),
            Some(mapping)
        );
    }

    #[test]
    fn duplicate_products_are_looked_up_once() {
        let lookup = FakeLookup::new(&[(1, Some(1))]);
        let mut resolver = IngredientResolver::new(MemoryMappingCache::new(), lookup);
        resolver.resolve(&[1, 1, 1]).unwrap();
        assert_eq!(resolver.lookup.calls.get(), 1);
    }

    #[test]
    fn identity_fallback() {
        let mut resolver = IngredientResolver::new(MemoryMappingCache::new(), IdentityLookup);
        let mapping = resolver.resolve(&[7, 8]).unwrap();
        assert_eq!(mapping, IngredientMap::identity([7, 8]));
    }
}
