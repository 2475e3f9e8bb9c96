//! Linkage pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Ingest**: discover and load every input
//! 2. **Lookup**: build the significant AEOLUS drug-outcome lookup
//! 3. **Resolve**: map product identifiers to ingredients (cached)
//! 4. **Link**: risk join, enrichment, Top-K, interaction reference, co-exposures
//! 5. **Output**: write the seven tables
//!
//! Tables are only written once every stage before them succeeded, so a
//! failed run leaves previous outputs untouched. The ingredient mapping is
//! the exception: it doubles as the resolver cache and is persisted as soon
//! as it is resolved.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span, trace};

use pvl_ingest::{
    InputPaths, load_concepts, load_conditions, load_ddi_sources, load_medications,
    load_outcome_stats, load_patients,
};
use pvl_model::{
    AeolusLookupEntry, CoExposure, Condition, DdiPair, DdiSources, EnrichedRisk,
    IngredientMap, MedicationExposure, OutcomeStat, Patient, PipelineConfig, ResolverConfig,
    RiskAnnotation,
};
use pvl_output::{WrittenTable, schema, write_table};
use pvl_resolve::{
    CsvMappingCache, IdentityLookup, IngredientLookup, IngredientResolver, MappingCache,
    RxNavClient,
};
use pvl_transform::{
    ConceptDictionary, SignificantStats, build_aeolus_lookup, build_concept_dictionary,
    detect_co_exposures, distinct_products, enrich_risk, join_patient_risk, select_top_k,
    unify_ddi_sources,
};

use crate::logging::redact_value;
use crate::types::RunResult;

// ============================================================================
// Stage 1: Ingest
// ============================================================================

/// Every input, loaded into typed records.
///
/// `outcome_stats` only holds the statistics that can reach the AEOLUS
/// lookup; the rest are dropped while the file streams.
#[derive(Debug, Default)]
pub struct SourceData {
    pub medications: Vec<MedicationExposure>,
    pub patients: Vec<Patient>,
    pub conditions: Vec<Condition>,
    pub dictionary: ConceptDictionary,
    pub outcome_stats: Vec<OutcomeStat>,
    pub ddi: DdiSources,
}

pub fn ingest(inputs: &InputPaths, config: &PipelineConfig) -> Result<SourceData> {
    let concepts = load_concepts(&inputs.concepts).context("load concept dictionary")?;
    let dictionary = build_concept_dictionary(&concepts);
    let filter = SignificantStats::new(&dictionary, &config.aeolus);
    let outcome_stats = load_outcome_stats(&inputs.outcome_stats, |stat| filter.keeps(stat))
        .context("load outcome statistics")?;
    Ok(SourceData {
        medications: load_medications(&inputs.medications).context("load medications")?,
        patients: load_patients(&inputs.patients).context("load patients")?,
        conditions: load_conditions(&inputs.conditions).context("load conditions")?,
        dictionary,
        outcome_stats,
        ddi: load_ddi_sources(inputs).context("load interaction sources")?,
    })
}

// ============================================================================
// Stage 2: AEOLUS lookup
// ============================================================================

pub fn build_lookup(data: &SourceData, config: &PipelineConfig) -> Vec<AeolusLookupEntry> {
    build_aeolus_lookup(&data.outcome_stats, &data.dictionary, &config.aeolus)
}

// ============================================================================
// Stage 3: Ingredient resolution
// ============================================================================

/// Online RxNav lookup when enabled, otherwise the identity fallback.
pub fn ingredient_lookup(config: &ResolverConfig) -> Result<Box<dyn IngredientLookup>> {
    if config.online {
        let client = RxNavClient::new(config).context("create RxNav client")?;
        Ok(Box::new(client))
    } else {
        Ok(Box::new(IdentityLookup))
    }
}

pub fn resolve_ingredients<C, L>(
    resolver: &mut IngredientResolver<C, L>,
    medications: &[MedicationExposure],
) -> Result<IngredientMap>
where
    C: MappingCache,
    L: IngredientLookup,
{
    let products = distinct_products(medications);
    resolver
        .resolve(&products)
        .context("resolve product ingredients")
}

// ============================================================================
// Stage 4: Linkage
// ============================================================================

/// Every table the run produces, in output order.
#[derive(Debug, Default)]
pub struct LinkedTables {
    pub aeolus_lookup: Vec<AeolusLookupEntry>,
    pub ingredients: IngredientMap,
    pub risk: Vec<RiskAnnotation>,
    pub enriched: Vec<EnrichedRisk>,
    pub top_k: Vec<EnrichedRisk>,
    pub ddi_reference: Vec<DdiPair>,
    pub co_exposures: Vec<CoExposure>,
}

pub fn link(
    data: &SourceData,
    aeolus_lookup: Vec<AeolusLookupEntry>,
    ingredients: IngredientMap,
    config: &PipelineConfig,
) -> LinkedTables {
    let risk = join_patient_risk(
        &data.medications,
        &ingredients,
        &aeolus_lookup,
        config.onset_latency_days,
    );
    let enriched = enrich_risk(&risk, &data.patients, &data.conditions);
    let top_k = select_top_k(&enriched, config.top_k);
    let ddi_reference = unify_ddi_sources(&data.ddi, &config.ddi);
    let co_exposures = detect_co_exposures(&top_k, &ddi_reference);

    if tracing::enabled!(tracing::Level::TRACE) {
        let mut per_patient: BTreeMap<&str, usize> = BTreeMap::new();
        for row in &co_exposures {
            *per_patient.entry(row.patient_id.as_str()).or_default() += 1;
        }
        for (patient, pairs) in per_patient {
            trace!(patient = redact_value(patient), pairs, "Patient co-exposures");
        }
    }

    LinkedTables {
        aeolus_lookup,
        ingredients,
        risk,
        enriched,
        top_k,
        ddi_reference,
        co_exposures,
    }
}

// ============================================================================
// Stage 5: Output
// ============================================================================

pub fn write_outputs(output_dir: &Path, tables: &LinkedTables) -> Result<Vec<WrittenTable>> {
    let context = |spec: schema::TableSpec| format!("write {}", spec.file_name);
    Ok(vec![
        write_table(output_dir, schema::AEOLUS_LOOKUP, &tables.aeolus_lookup)
            .with_context(|| context(schema::AEOLUS_LOOKUP))?,
        write_table(output_dir, schema::INGREDIENT_MAP, tables.ingredients.iter())
            .with_context(|| context(schema::INGREDIENT_MAP))?,
        write_table(output_dir, schema::RISK_ANNOTATIONS, &tables.risk)
            .with_context(|| context(schema::RISK_ANNOTATIONS))?,
        write_table(output_dir, schema::ENRICHED, &tables.enriched)
            .with_context(|| context(schema::ENRICHED))?,
        write_table(output_dir, schema::TOP_K, &tables.top_k)
            .with_context(|| context(schema::TOP_K))?,
        write_table(output_dir, schema::DDI_REFERENCE, &tables.ddi_reference)
            .with_context(|| context(schema::DDI_REFERENCE))?,
        write_table(output_dir, schema::CO_EXPOSURE, &tables.co_exposures)
            .with_context(|| context(schema::CO_EXPOSURE))?,
    ])
}

// ============================================================================
// Entry points
// ============================================================================

/// Runs every stage with an explicitly constructed resolver.
pub fn run_pipeline_with<C, L>(
    config: &PipelineConfig,
    resolver: &mut IngredientResolver<C, L>,
) -> Result<RunResult>
where
    C: MappingCache,
    L: IngredientLookup,
{
    let span = info_span!("run", raw_dir = %config.raw_dir.display());
    let _guard = span.enter();
    let start = Instant::now();

    let inputs = InputPaths::discover(&config.raw_dir, config.ddi.include_negative_controls)
        .with_context(|| format!("discover inputs under {}", config.raw_dir.display()))?;
    let data = ingest(&inputs, config)?;
    let aeolus_lookup = build_lookup(&data, config);
    let ingredients = resolve_ingredients(resolver, &data.medications)?;
    let tables = link(&data, aeolus_lookup, ingredients, config);
    let written = write_outputs(&config.output_dir, &tables)?;

    let mut patients: Vec<&str> = tables.risk.iter().map(|r| r.patient_id.as_str()).collect();
    patients.sort_unstable();
    patients.dedup();
    let result = RunResult {
        output_dir: config.output_dir.clone(),
        tables: written,
        patients_with_risk: patients.len(),
        known_interactions: tables.co_exposures.iter().filter(|c| c.known).count(),
    };
    info!(
        tables = result.tables.len(),
        rows = result.total_rows(),
        duration_ms = start.elapsed().as_millis(),
        "Pipeline finished"
    );
    Ok(result)
}

/// Runs every stage, caching the ingredient mapping in the output directory.
pub fn run_pipeline(config: &PipelineConfig, show_progress: bool) -> Result<RunResult> {
    let lookup = ingredient_lookup(&config.resolver)?;
    let mut resolver = IngredientResolver::new(CsvMappingCache::new(&config.output_dir), lookup)
        .with_refresh(config.resolver.refresh_cache)
        .with_progress(show_progress);
    run_pipeline_with(config, &mut resolver)
}
