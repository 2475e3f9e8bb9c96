//! A second run over a file-backed cache reuses the first run's mapping.

use pvl_model::Rxcui;
use pvl_output::schema;
use pvl_resolve::{
    CsvMappingCache, IdentityLookup, IngredientLookup, IngredientResolver, LookupError,
};

struct Unreachable;

impl IngredientLookup for Unreachable {
    fn name(&self) -> &'static str {
        "unreachable"
    }

    fn lookup(&self, rxcui: Rxcui) -> Result<Option<Rxcui>, LookupError> {
        Err(LookupError::Unavailable {
            rxcui,
            message: "network disabled".into(),
        })
    }
}

#[test]
fn second_run_reads_cache_file() {
    let dir = tempfile::tempdir().unwrap();

    let first: Box<dyn IngredientLookup> = Box::new(IdentityLookup);
    let mut resolver = IngredientResolver::new(CsvMappingCache::new(dir.path()), first);
    let mapping = resolver.resolve(&[313782, 197361]).unwrap();

    let cache_file = dir.path().join(schema::INGREDIENT_MAP.file_name);
    assert!(cache_file.is_file());

    let second: Box<dyn IngredientLookup> = Box::new(Unreachable);
    let mut resolver = IngredientResolver::new(CsvMappingCache::new(dir.path()), second);
    assert_eq!(resolver.resolve(&[313782, 197361]).unwrap(), mapping);
}

#[test]
fn refresh_with_failing_lookup_persists_unresolved_products() {
    let dir = tempfile::tempdir().unwrap();
    let mut resolver =
        IngredientResolver::new(CsvMappingCache::new(dir.path()), Unreachable).with_refresh(true);
    let mapping = resolver.resolve(&[1, 2]).unwrap();
    assert_eq!(mapping.len(), 2);
    assert_eq!(mapping.resolved(), 0);

    let content = std::fs::read_to_string(resolver.cache().path("rxcui_to_ingredient_map")).unwrap();
    assert_eq!(content, "rxcui,ingredient_rxcui\n1,\n2,\n");
}
