//! End-to-end runs over a raw directory written to a temp dir.

use std::fs;
use std::path::Path;

use pvl_cli::pipeline::{ingest, run_pipeline, run_pipeline_with};
use pvl_ingest::InputPaths;
use pvl_model::{PipelineConfig, Rxcui};
use pvl_output::{RawTable, read_table, schema};
use pvl_resolve::{CsvMappingCache, IngredientLookup, IngredientResolver, LookupError};
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// One patient on warfarin and aspirin with overlapping exposures, two
/// significant AEOLUS signals and one interaction pair known to all sources.
fn raw_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(
        root,
        "synthea/medications.csv",
        "START,STOP,PATIENT,CODE,DESCRIPTION\n\
         2020-01-01T00:00:00Z,2020-01-10T00:00:00Z,P1,11289,Warfarin 5 MG Oral Tablet\n\
         2020-01-05T00:00:00Z,2020-01-20T00:00:00Z,P1,1191,Aspirin 81 MG Oral Tablet\n",
    );
    write(root, "synthea/patients.csv", "Id,BIRTHDATE,GENDER\nP1,1960-03-01,F\n");
    write(
        root,
        "synthea/conditions.csv",
        "PATIENT,DESCRIPTION\nP1,Atrial fibrillation\nP1,Hypertension\n",
    );
    write(
        root,
        "aeolus/concept.tsv",
        "1\twarfarin\tDrug\tRxNorm\tIngredient\tS\t11289\t\t\t\n\
         2\taspirin\tDrug\tRxNorm\tIngredient\tS\t1191\t\t\t\n\
         10\tHaemorrhage\tCondition\tMedDRA\tPT\t\t10055798\t\t\t\n",
    );
    write(
        root,
        "aeolus/standard_drug_outcome_statistics.tsv",
        "1\t10\t\t120\t3.9\t\t\t4.5\t\t\n\
         2\t10\t\t40\t2.1\t\t\t2.2\t\t\n\
         2\t10\t\t5\t8.0\t\t\t9.0\t\t\n",
    );
    write(
        root,
        "ddinter_downloads_code_B.csv",
        "DDInterID_A,Drug_A,DDInterID_B,Drug_B,Level\nD1,Warfarin,D2,Aspirin,Moderate\n",
    );
    write(
        root,
        "Mendeley.csv",
        "drug1_name,drug2_name,interaction_type\naspirin,warfarin,bleeding risk\n",
    );
    write(
        root,
        "CRESCENDDI - Positive Controls.csv",
        "DRUG_1_CONCEPT_NAME,DRUG_2_CONCEPT_NAME,EVENT_CONCEPT_NAME,MICROMEDEX_SEV_LEVEL,MICROMEDEX_EVID_LEVEL\n\
         Aspirin,Warfarin,Haemorrhage,Major,Excellent\n",
    );
    dir
}

fn config(raw: &Path, output: &Path) -> PipelineConfig {
    PipelineConfig {
        raw_dir: raw.to_path_buf(),
        output_dir: output.to_path_buf(),
        ..PipelineConfig::default()
    }
}

fn cell<'a>(table: &'a RawTable, row: usize, column: &str) -> &'a str {
    &table.rows[row][table.column(column).unwrap()]
}

#[test]
fn overlapping_known_pair_is_flagged() {
    let raw = raw_dir();
    let out = TempDir::new().unwrap();
    let result = run_pipeline(&config(raw.path(), out.path()), false).unwrap();

    assert_eq!(result.tables.len(), schema::ALL_TABLES.len());
    for spec in schema::ALL_TABLES {
        let table = read_table(&out.path().join(spec.file_name)).unwrap();
        table.expect_schema(spec).unwrap();
    }
    assert_eq!(result.patients_with_risk, 1);
    assert_eq!(result.known_interactions, 1);

    let lookup = read_table(&out.path().join(schema::AEOLUS_LOOKUP.file_name)).unwrap();
    assert_eq!(lookup.rows.len(), 2);

    let reference = read_table(&out.path().join(schema::DDI_REFERENCE.file_name)).unwrap();
    assert_eq!(reference.rows.len(), 1);
    assert_eq!(cell(&reference, 0, "unified_severity"), "Major");

    let co = read_table(&out.path().join(schema::CO_EXPOSURE.file_name)).unwrap();
    assert_eq!(co.rows.len(), 1);
    assert_eq!(cell(&co, 0, "pair_key"), "aspirin|warfarin");
    assert_eq!(cell(&co, 0, "ddi_known"), "true");
    assert_eq!(cell(&co, 0, "unified_severity"), cell(&reference, 0, "unified_severity"));
    assert_eq!(
        cell(&co, 0, "unified_mechanism_text"),
        cell(&reference, 0, "unified_mechanism_text")
    );
    assert_eq!(cell(&co, 0, "ddi_confidence"), cell(&reference, 0, "ddi_confidence"));
    assert_eq!(cell(&co, 0, "ddi_confidence"), "1.0");
    assert_eq!(cell(&co, 0, "overlap_start"), "2020-01-05T00:00:00Z");
    assert_eq!(cell(&co, 0, "overlap_stop"), "2020-01-10T00:00:00Z");
    assert_eq!(cell(&co, 0, "Age"), "59");
    assert_eq!(
        cell(&co, 0, "Comorbidities"),
        r#"["Atrial fibrillation","Hypertension"]"#
    );
}

struct Unreachable;

impl IngredientLookup for Unreachable {
    fn name(&self) -> &'static str {
        "unreachable"
    }

    fn lookup(&self, rxcui: Rxcui) -> Result<Option<Rxcui>, LookupError> {
        Err(LookupError::Unavailable {
            rxcui,
            message: "offline".into(),
        })
    }
}

#[test]
fn second_run_reuses_cached_ingredients() {
    let raw = raw_dir();
    let out = TempDir::new().unwrap();
    let config = config(raw.path(), out.path());
    run_pipeline(&config, false).unwrap();

    let mut resolver = IngredientResolver::new(CsvMappingCache::new(out.path()), Unreachable);
    let result = run_pipeline_with(&config, &mut resolver).unwrap();
    assert_eq!(result.known_interactions, 1);
}

#[test]
fn failed_lookups_drop_exposures_without_failing() {
    let raw = raw_dir();
    let out = TempDir::new().unwrap();
    let config = config(raw.path(), out.path());

    let mut resolver = IngredientResolver::new(CsvMappingCache::new(out.path()), Unreachable);
    let result = run_pipeline_with(&config, &mut resolver).unwrap();
    assert_eq!(result.patients_with_risk, 0);

    let map = read_table(&out.path().join(schema::INGREDIENT_MAP.file_name)).unwrap();
    assert_eq!(map.rows.len(), 2);
    let co = read_table(&out.path().join(schema::CO_EXPOSURE.file_name)).unwrap();
    assert!(co.rows.is_empty());
}

#[test]
fn missing_input_fails_before_writing() {
    let raw = raw_dir();
    fs::remove_file(raw.path().join("Mendeley.csv")).unwrap();
    let out = TempDir::new().unwrap();
    let err = run_pipeline(&config(raw.path(), out.path()), false).unwrap_err();
    assert!(format!("{err:#}").contains("Mendeley.csv"));
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn ingest_keeps_only_significant_statistics() {
    let raw = raw_dir();
    let out = TempDir::new().unwrap();
    let config = config(raw.path(), out.path());
    let inputs = InputPaths::discover(raw.path(), false).unwrap();
    let data = ingest(&inputs, &config).unwrap();
    assert_eq!(data.outcome_stats.len(), 2);
    assert!(data.outcome_stats.iter().all(|s| s.case_count >= Some(20)));
}
