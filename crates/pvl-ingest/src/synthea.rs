//! Loaders for the synthetic patient corpus.

use std::path::Path;

use pvl_common::leading_digits;
use pvl_model::{Condition, Interval, MedicationExposure, Patient, Timestamp, parse_timestamp};

use crate::error::Result;
use crate::table::{SourceTable, TextColumn};

const PATIENT_ID: &[&str] = &["PATIENT", "patient_id"];
const DESCRIPTION: &[&str] = &["DESCRIPTION", "description"];
const CODE: &[&str] = &["CODE", "code"];
const START: &[&str] = &["START", "start"];
const STOP: &[&str] = &["STOP", "stop"];
const ID: &[&str] = &["Id", "id"];
const BIRTHDATE: &[&str] = &["BIRTHDATE", "birth_date"];
const SEX: &[&str] = &["GENDER", "sex"];

/// Loads medication exposures; the product identifier is the first digit run of `CODE`.
pub fn load_medications(path: &Path) -> Result<Vec<MedicationExposure>> {
    let table = SourceTable::read(path)?;
    let patient_col = table.require(PATIENT_ID)?;
    let description_col = table.require(DESCRIPTION)?;
    let code_col = table.require(CODE)?;
    let start_col = table.require(START)?;
    let stop_col = table.require(STOP)?;

    let mut meds = Vec::with_capacity(table.height());
    let mut skipped = 0usize;
    let mut bad_timestamps = 0usize;
    let mut inverted = 0usize;
    for row_idx in 0..table.height() {
        let Some(patient_id) = patient_col.text(row_idx)? else {
            skipped += 1;
            continue;
        };
        let rxcui = code_col
            .text(row_idx)?
            .and_then(|code| leading_digits(&code));
        let start = timestamp(&start_col, row_idx, &mut bad_timestamps)?;
        let stop = timestamp(&stop_col, row_idx, &mut bad_timestamps)?;
        // Kept for risk annotation; the interval never overlaps anything.
        if Interval::new(start, stop).is_inverted() {
            inverted += 1;
        }
        meds.push(MedicationExposure {
            patient_id,
            description: description_col.text(row_idx)?,
            rxcui,
            start,
            stop,
        });
    }

    let unique_rxcuis = meds
        .iter()
        .filter_map(|m| m.rxcui)
        .collect::<std::collections::BTreeSet<_>>()
        .len();
    if inverted > 0 {
        tracing::warn!(
            path = %path.display(),
            inverted,
            "Medication rows with START after STOP are excluded from co-exposure"
        );
    }
    if skipped > 0 || bad_timestamps > 0 {
        tracing::warn!(
            path = %path.display(),
            skipped,
            bad_timestamps,
            "Medication rows with missing patient or unparseable timestamps"
        );
    }
    tracing::info!(rows = meds.len(), unique_rxcuis, "Loaded medications");
    Ok(meds)
}

/// Loads patient demographics.
pub fn load_patients(path: &Path) -> Result<Vec<Patient>> {
    let table = SourceTable::read(path)?;
    let id_col = table.require(ID)?;
    let birth_col = table.require(BIRTHDATE)?;
    let sex_col = table.require(SEX)?;

    let mut patients = Vec::with_capacity(table.height());
    let mut bad_timestamps = 0usize;
    for row_idx in 0..table.height() {
        let Some(id) = id_col.text(row_idx)? else {
            continue;
        };
        patients.push(Patient {
            id,
            birth_date: timestamp(&birth_col, row_idx, &mut bad_timestamps)?,
            sex: sex_col.text(row_idx)?,
        });
    }
    if bad_timestamps > 0 {
        tracing::warn!(path = %path.display(), bad_timestamps, "Unparseable birth dates");
    }
    tracing::info!(rows = patients.len(), "Loaded patients");
    Ok(patients)
}

/// Loads condition descriptions.
pub fn load_conditions(path: &Path) -> Result<Vec<Condition>> {
    let table = SourceTable::read(path)?;
    let patient_col = table.require(PATIENT_ID)?;
    let description_col = table.require(DESCRIPTION)?;

    let mut conditions = Vec::with_capacity(table.height());
    for row_idx in 0..table.height() {
        let Some(patient_id) = patient_col.text(row_idx)? else {
            continue;
        };
        conditions.push(Condition {
            patient_id,
            description: description_col.text(row_idx)?,
        });
    }
    tracing::info!(rows = conditions.len(), "Loaded conditions");
    Ok(conditions)
}

/// Parses a timestamp cell; text that does not parse counts as missing.
fn timestamp(col: &TextColumn<'_>, row_idx: usize, bad: &mut usize) -> Result<Option<Timestamp>> {
    let Some(text) = col.text(row_idx)? else {
        return Ok(None);
    };
    let parsed = parse_timestamp(&text);
    if parsed.is_none() {
        *bad += 1;
        tracing::debug!(row = row_idx, value = %text, "Unparseable timestamp");
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pvl_model::format_timestamp;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn medications_extract_rxcui_and_times() {
        let file = create_temp_csv(
            "START,STOP,PATIENT,CODE,DESCRIPTION\n\
             2020-01-01T00:00:00Z,2020-01-10T00:00:00Z,P1,313782,Acetaminophen 325 MG Oral Tablet\n\
             2020-01-05,,P1,RxNorm:197361,Amlodipine 5 MG Oral Tablet\n\
             garbage,,P2,none,Unknown\n",
        );
        let meds = load_medications(file.path()).unwrap();
        assert_eq!(meds.len(), 3);
        assert_eq!(meds[0].rxcui, Some(313782));
        assert_eq!(meds[1].rxcui, Some(197361));
        assert_eq!(meds[1].stop, None);
        assert_eq!(
            format_timestamp(&meds[1].start.unwrap()),
            "2020-01-05T00:00:00Z"
        );
        assert_eq!(meds[2].rxcui, None);
        assert_eq!(meds[2].start, None);
    }

    #[test]
    fn lowercase_aliases_are_accepted() {
        let file = create_temp_csv("id,birth_date,sex\nP1,1980-06-15,F\n");
        let patients = load_patients(file.path()).unwrap();
        assert_eq!(patients[0].id, "P1");
        assert_eq!(patients[0].sex.as_deref(), Some("F"));
        assert!(patients[0].birth_date.is_some());
    }

    #[test]
    fn missing_column_is_fatal() {
        let file = create_temp_csv("PATIENT,CODE\nP1,1\n");
        assert!(load_medications(file.path()).is_err());
    }
}
