//! Discovery plus loading over a raw directory laid out like a real download.

use std::fs;
use std::path::Path;

use pvl_ingest::{InputPaths, load_concepts, load_ddi_sources, load_medications};
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn raw_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(
        root,
        "synthea/csv/medications.csv",
        "START,STOP,PATIENT,CODE,DESCRIPTION\n2020-01-01,2020-01-10,P1,313782,Warfarin 5 MG Oral Tablet\n",
    );
    write(root, "synthea/csv/patients.csv", "Id,BIRTHDATE,GENDER\nP1,1970-01-01,M\n");
    write(root, "synthea/csv/conditions.csv", "PATIENT,DESCRIPTION\nP1,Hypertension\n");
    write(
        root,
        "aeolus/concept.tsv",
        "1\twarfarin\tDrug\tRxNorm\tIngredient\tS\t11289\t\t\t\n2\tBleeding\tCondition\tMedDRA\tPT\t\t10005103\t\t\t\n",
    );
    write(
        root,
        "aeolus/standard_drug_outcome_statistics.tsv",
        "1\t2\t\t100\t3.0\t\t\t4.0\t\t\n",
    );
    write(
        root,
        "ddinter_downloads_code_W.csv",
        "DDInterID_A,Drug_A,DDInterID_B,Drug_B,Level\nD1,Warfarin,D2,Aspirin,Major\n",
    );
    write(root, "Mendeley.csv", "drug1_name,drug2_name,interaction_type\nwarfarin,aspirin,bleeding\n");
    write(
        root,
        "CRESCENDDI - Positive Controls.csv",
        "DRUG_1_CONCEPT_NAME,DRUG_2_CONCEPT_NAME,EVENT_CONCEPT_NAME,MICROMEDEX_SEV_LEVEL,MICROMEDEX_EVID_LEVEL\nAspirin,Warfarin,Haemorrhage,Major,Excellent\n",
    );
    write(
        root,
        "CRESCENDDI - Negative Controls.csv",
        "DRUG_1_CONCEPT_NAME,DRUG_2_CONCEPT_NAME,EVENT_CONCEPT_NAME\nAspirin,Omeprazole,Rash\n",
    );
    dir
}

#[test]
fn discovers_and_loads_every_input() {
    let dir = raw_dir();
    let inputs = InputPaths::discover(dir.path(), false).unwrap();
    assert_eq!(inputs.ddinter_chunks.len(), 1);
    assert_eq!(inputs.crescenddi_negative, None);

    let meds = load_medications(&inputs.medications).unwrap();
    assert_eq!(meds.len(), 1);
    assert_eq!(meds[0].rxcui, Some(313782));

    let concepts = load_concepts(&inputs.concepts).unwrap();
    assert_eq!(concepts.len(), 2);

    let sources = load_ddi_sources(&inputs).unwrap();
    assert_eq!(sources.ddinter.len(), 1);
    assert_eq!(sources.crescenddi.len(), 1);
    assert_eq!(sources.mendeley.len(), 1);
    assert_eq!(sources.total_rows(), 3);
}

#[test]
fn negative_controls_are_appended_when_requested() {
    let dir = raw_dir();
    let inputs = InputPaths::discover(dir.path(), true).unwrap();
    assert!(inputs.crescenddi_negative.is_some());
    let sources = load_ddi_sources(&inputs).unwrap();
    assert_eq!(sources.crescenddi.len(), 2);
    assert_eq!(sources.crescenddi[1].drug2_name.as_deref(), Some("Omeprazole"));
}

#[test]
fn missing_synthea_file_is_fatal() {
    let dir = raw_dir();
    fs::remove_file(dir.path().join("synthea/csv/patients.csv")).unwrap();
    let err = InputPaths::discover(dir.path(), false).unwrap_err();
    assert!(err.to_string().contains("patients.csv"));
}
