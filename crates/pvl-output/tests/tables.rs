//! Integration tests for writing and re-reading output tables.

use std::collections::BTreeSet;
use std::fs;

use pvl_model::{
    AeolusLookupEntry, Demographics, EnrichedRisk, IngredientMap, RiskAnnotation,
    parse_timestamp,
};
use pvl_output::schema::{AEOLUS_LOOKUP, ENRICHED, INGREDIENT_MAP};
use pvl_output::{read_ingredient_map, read_table, write_table};

fn enriched_rows() -> Vec<EnrichedRisk> {
    let warfarin = EnrichedRisk {
        annotation: RiskAnnotation {
            patient_id: "P1".into(),
            rxcui: 855332,
            ingredient_rxcui: 11289,
            drug_description: Some("Warfarin 5 MG Oral Tablet".into()),
            aeolus_drug_name: Some("warfarin".into()),
            start: parse_timestamp("2020-01-01"),
            stop: None,
            estimated_onset: parse_timestamp("2020-01-06"),
            outcome_concept_id: Some(35809076),
            outcome_text: Some("Haemorrhage".into()),
            meddra_code: Some("10055798".into()),
            case_count: 120,
            prr: Some(3.5),
            ror: 4.0,
        },
        demographics: Demographics {
            age: Some(40),
            sex: Some("F".into()),
            comorbidities: BTreeSet::from(["Hypertension".to_string(), "Asthma".to_string()]),
        },
        canonical_drug: "Warfarin".into(),
    };
    let aspirin = EnrichedRisk {
        annotation: RiskAnnotation {
            patient_id: "P2".into(),
            rxcui: 243670,
            ingredient_rxcui: 1191,
            drug_description: Some("Aspirin 81 MG".into()),
            aeolus_drug_name: Some("aspirin".into()),
            start: parse_timestamp("2021-03-04T08:30:00+01:00"),
            stop: parse_timestamp("2021-04-01T00:00:00+01:00"),
            estimated_onset: None,
            outcome_concept_id: None,
            outcome_text: Some("Nausea, vomiting".into()),
            meddra_code: Some("10028813".into()),
            case_count: 20,
            prr: None,
            ror: 2.25,
        },
        demographics: Demographics::default(),
        canonical_drug: "Aspirin".into(),
    };
    vec![warfarin, aspirin]
}

#[test]
fn enriched_table_encoding() {
    let dir = tempfile::tempdir().unwrap();
    let written = write_table(dir.path(), ENRICHED, &enriched_rows()).unwrap();
    assert_eq!(written.rows, 2);
    let content = fs::read_to_string(&written.path).unwrap();
    insta::assert_snapshot!(content.trim_end(), @r#"
    patient_uuid,Age,Sex,Comorbidities,START,STOP,synthea_drug_desc,rxcui_x,ingredient_rxcui,aeolus_drug_name,outcome_text,meddra_code,case_count,prr,ror,synthea_drug
    P1,40,F,"[""Asthma"",""Hypertension""]",2020-01-01T00:00:00Z,,Warfarin 5 MG Oral Tablet,855332,11289,warfarin,Haemorrhage,10055798,120,3.5,4.0,Warfarin
    P2,,,,2021-03-04T08:30:00+01:00,2021-04-01T00:00:00+01:00,Aspirin 81 MG,243670,1191,aspirin,"Nausea, vomiting",10028813,20,,2.25,Aspirin
    "#);
}

#[test]
fn round_trip_keeps_rows_and_columns() {
    let dir = tempfile::tempdir().unwrap();
    let written = write_table(dir.path(), ENRICHED, &enriched_rows()).unwrap();
    let table = read_table(&written.path).unwrap();
    table.expect_schema(ENRICHED).unwrap();
    assert_eq!(table.rows.len(), 2);
    assert!(table.rows.iter().all(|row| row.len() == ENRICHED.columns.len()));
    let outcome = table.column("outcome_text").unwrap();
    assert_eq!(table.rows[1][outcome], "Nausea, vomiting");
}

#[test]
fn lookup_round_trip() {
    let entries = vec![
        AeolusLookupEntry {
            rxcui: 11289,
            drug_name: Some("warfarin".into()),
            outcome_concept_id: Some(35809076),
            outcome_text: Some("Haemorrhage".into()),
            meddra_code: Some("10055798".into()),
            case_count: 120,
            prr: Some(3.5),
            ror: 4.0,
        };
        3
    ];
    let dir = tempfile::tempdir().unwrap();
    let written = write_table(dir.path(), AEOLUS_LOOKUP, &entries).unwrap();
    let table = read_table(&written.path).unwrap();
    table.expect_schema(AEOLUS_LOOKUP).unwrap();
    assert_eq!(table.rows.len(), entries.len());
}

#[test]
fn ingredient_map_round_trip() {
    let mut map = IngredientMap::new();
    map.insert(313782, Some(161));
    map.insert(1049221, None);
    let dir = tempfile::tempdir().unwrap();
    let written = write_table(dir.path(), INGREDIENT_MAP, map.iter()).unwrap();
    assert_eq!(read_ingredient_map(&written.path).unwrap(), map);
}
