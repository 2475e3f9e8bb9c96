//! Loaders for the three interaction reference sources.

use std::path::{Path, PathBuf};

use pvl_model::{CrescendDiRecord, DdInterRecord, DdiSources, MendeleyRecord};

use crate::discovery::InputPaths;
use crate::error::Result;
use crate::table::SourceTable;

const DDINTER_DRUG1: &[&str] = &["Drug_A", "drug1_name"];
const DDINTER_DRUG2: &[&str] = &["Drug_B", "drug2_name"];
const DDINTER_LEVEL: &[&str] = &["Level", "ddinter_level", "severity_level"];

const CRESCENDDI_DRUG1: &[&str] = &["DRUG_1_CONCEPT_NAME", "drug1_concept_name", "drug1_name"];
const CRESCENDDI_DRUG2: &[&str] = &["DRUG_2_CONCEPT_NAME", "drug2_concept_name", "drug2_name"];
const CRESCENDDI_EVENT: &[&str] = &["EVENT_CONCEPT_NAME", "event_concept_name"];
const CRESCENDDI_SEVERITY: &[&str] = &["MICROMEDEX_SEV_LEVEL", "severity_level"];
const CRESCENDDI_EVIDENCE: &[&str] = &["MICROMEDEX_EVID_LEVEL", "evidence_level"];

const MENDELEY_DRUG1: &[&str] = &["drug1_name"];
const MENDELEY_DRUG2: &[&str] = &["drug2_name"];
const MENDELEY_TYPE: &[&str] = &["interaction_type"];

/// Loads every DDInter chunk in order; no chunks yields an empty source.
pub fn load_ddinter(paths: &[PathBuf]) -> Result<Vec<DdInterRecord>> {
    let mut records = Vec::new();
    for table in SourceTable::read_all(paths)? {
        let drug1 = table.require(DDINTER_DRUG1)?;
        let drug2 = table.require(DDINTER_DRUG2)?;
        let level = table.require(DDINTER_LEVEL)?;
        for row_idx in 0..table.height() {
            records.push(DdInterRecord {
                drug1_name: drug1.text(row_idx)?,
                drug2_name: drug2.text(row_idx)?,
                level: level.text(row_idx)?,
            });
        }
        tracing::debug!(path = %table.path().display(), rows = table.height(), "Read DDInter chunk");
    }
    if paths.is_empty() {
        tracing::warn!("No DDInter chunks found; DDInter contributes no pairs");
    }
    tracing::info!(chunks = paths.len(), rows = records.len(), "Loaded DDInter");
    Ok(records)
}

/// Loads one CRESCENDDI control export.
///
/// Micromedex columns are required in the positive controls and optional in
/// the negative controls, which ship without them in some releases.
pub fn load_crescenddi(path: &Path, require_levels: bool) -> Result<Vec<CrescendDiRecord>> {
    let table = SourceTable::read(path)?;
    let drug1 = table.require(CRESCENDDI_DRUG1)?;
    let drug2 = table.require(CRESCENDDI_DRUG2)?;
    let event = table.require(CRESCENDDI_EVENT)?;
    let (severity, evidence) = if require_levels {
        (
            Some(table.require(CRESCENDDI_SEVERITY)?),
            Some(table.require(CRESCENDDI_EVIDENCE)?),
        )
    } else {
        (
            table.optional(CRESCENDDI_SEVERITY)?,
            table.optional(CRESCENDDI_EVIDENCE)?,
        )
    };

    let mut records = Vec::with_capacity(table.height());
    for row_idx in 0..table.height() {
        records.push(CrescendDiRecord {
            drug1_name: drug1.text(row_idx)?,
            drug2_name: drug2.text(row_idx)?,
            event_name: event.text(row_idx)?,
            severity_level: match &severity {
                Some(col) => col.text(row_idx)?,
                None => None,
            },
            evidence_level: match &evidence {
                Some(col) => col.text(row_idx)?,
                None => None,
            },
        });
    }
    tracing::info!(path = %path.display(), rows = records.len(), "Loaded CRESCENDDI controls");
    Ok(records)
}

/// Loads the Mendeley interaction types.
pub fn load_mendeley(path: &Path) -> Result<Vec<MendeleyRecord>> {
    let table = SourceTable::read(path)?;
    let drug1 = table.require(MENDELEY_DRUG1)?;
    let drug2 = table.require(MENDELEY_DRUG2)?;
    let kind = table.require(MENDELEY_TYPE)?;

    let mut records = Vec::with_capacity(table.height());
    for row_idx in 0..table.height() {
        records.push(MendeleyRecord {
            drug1_name: drug1.text(row_idx)?,
            drug2_name: drug2.text(row_idx)?,
            interaction_type: kind.text(row_idx)?,
        });
    }
    tracing::info!(path = %path.display(), rows = records.len(), "Loaded Mendeley");
    Ok(records)
}

/// Loads all three sources for one run.
///
/// Negative controls are appended after the positive controls when present.
pub fn load_ddi_sources(inputs: &InputPaths) -> Result<DdiSources> {
    let ddinter = load_ddinter(&inputs.ddinter_chunks)?;
    let mut crescenddi = load_crescenddi(&inputs.crescenddi_positive, true)?;
    if let Some(negative) = &inputs.crescenddi_negative {
        crescenddi.extend(load_crescenddi(negative, false)?);
    }
    let mendeley = load_mendeley(&inputs.mendeley)?;
    Ok(DdiSources {
        ddinter,
        crescenddi,
        mendeley,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn ddinter_chunks_concatenate() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("ddinter_downloads_code_A.csv");
        let b = dir.path().join("ddinter_downloads_code_B.csv");
        std::fs::write(&a, "DDInterID_A,Drug_A,DDInterID_B,Drug_B,Level\n1,Abacavir,2,Aspirin,Minor\n").unwrap();
        std::fs::write(&b, "DDInterID_A,Drug_A,DDInterID_B,Drug_B,Level\n3,Bosentan,4,Warfarin,Unknown\n").unwrap();
        let records = load_ddinter(&[a, b]).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].drug1_name.as_deref(), Some("Bosentan"));
        assert_eq!(records[1].level.as_deref(), Some("Unknown"));
    }

    #[test]
    fn no_chunks_is_empty_not_an_error() {
        assert!(load_ddinter(&[]).unwrap().is_empty());
    }

    #[test]
    fn negative_controls_may_lack_levels() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("neg.csv");
        std::fs::write(
            &path,
            "DRUG_1_CONCEPT_NAME,DRUG_2_CONCEPT_NAME,EVENT_CONCEPT_NAME\nAspirin,Omeprazole,Rash\n",
        )
        .unwrap();
        assert!(load_crescenddi(&path, true).is_err());
        let records = load_crescenddi(&path, false).unwrap();
        assert_eq!(records[0].event_name.as_deref(), Some("Rash"));
        assert_eq!(records[0].severity_level, None);
    }
}
