//! Loaders for the headerless AEOLUS concept and statistics files.

use std::path::Path;

use pvl_common::{parse_f64, parse_i64};
use pvl_model::{ConceptRecord, OutcomeStat};

use crate::error::Result;
use crate::tsv::{field, for_each_record};

// Concept columns: concept_id, concept_name, domain_id, vocabulary_id,
// concept_class_id, standard_concept, concept_code, valid_start_date,
// valid_end_date, invalid_reason.
const CONCEPT_ID: usize = 0;
const CONCEPT_NAME: usize = 1;
const VOCABULARY_ID: usize = 3;
const CONCEPT_CODE: usize = 6;

// Statistics columns: drug_concept_id, outcome_concept_id,
// snomed_outcome_concept_id, case_count, prr, prr_upper, prr_lower, ror,
// ror_upper, ror_lower.
const DRUG_CONCEPT_ID: usize = 0;
const OUTCOME_CONCEPT_ID: usize = 1;
const CASE_COUNT: usize = 3;
const PRR: usize = 4;
const ROR: usize = 7;

/// Loads the concept dictionary, keeping id, name, vocabulary and code.
pub fn load_concepts(path: &Path) -> Result<Vec<ConceptRecord>> {
    let mut concepts = Vec::new();
    for_each_record(path, CONCEPT_CODE + 1, |record| {
        concepts.push(ConceptRecord {
            concept_id: field(record, CONCEPT_ID).and_then(parse_i64),
            name: field(record, CONCEPT_NAME).map(str::to_string),
            vocabulary_id: field(record, VOCABULARY_ID).map(str::to_string),
            code: field(record, CONCEPT_CODE).map(str::to_string),
        });
    })?;
    tracing::info!(path = %path.display(), rows = concepts.len(), "Loaded AEOLUS concepts");
    Ok(concepts)
}

/// Streams the outcome statistics, keeping only rows accepted by `keep`.
///
/// Unparseable numbers become missing before `keep` sees the row. Rejected
/// rows are dropped as they are read, so memory follows the kept rows only.
pub fn load_outcome_stats<P>(path: &Path, mut keep: P) -> Result<Vec<OutcomeStat>>
where
    P: FnMut(&OutcomeStat) -> bool,
{
    let mut stats = Vec::new();
    let scanned = for_each_record(path, ROR + 1, |record| {
        let stat = OutcomeStat {
            drug_concept_id: field(record, DRUG_CONCEPT_ID).and_then(parse_i64),
            outcome_concept_id: field(record, OUTCOME_CONCEPT_ID).and_then(parse_i64),
            case_count: field(record, CASE_COUNT).and_then(parse_i64),
            prr: field(record, PRR).and_then(parse_f64),
            ror: field(record, ROR).and_then(parse_f64),
        };
        if keep(&stat) {
            stats.push(stat);
        }
    })?;
    tracing::info!(
        path = %path.display(),
        scanned,
        kept = stats.len(),
        "Loaded AEOLUS statistics"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn concept_columns_are_picked_by_position() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "1125315\tacetaminophen\tDrug\tRxNorm\tIngredient\tS\t161\t19700101\t20991231\t"
        )
        .unwrap();
        let concepts = load_concepts(file.path()).unwrap();
        assert_eq!(
            concepts,
            vec![ConceptRecord {
                concept_id: Some(1125315),
                name: Some("acetaminophen".into()),
                vocabulary_id: Some("RxNorm".into()),
                code: Some("161".into()),
            }]
        );
    }

    #[test]
    fn statistics_tolerate_bad_numbers() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "1125315\t35104067\t\t42\t3.1\t4\t2\t2.5\t3\t2").unwrap();
        writeln!(file, "x\t35104067\t\tn/a\t\t\t\t\t\t").unwrap();
        let stats = load_outcome_stats(file.path(), |_| true).unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].case_count, Some(42));
        assert_eq!(stats[0].ror, Some(2.5));
        assert_eq!(stats[1].drug_concept_id, None);
        assert_eq!(stats[1].case_count, None);
    }

    #[test]
    fn rejected_statistics_are_not_collected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "1\t10\t\t120\t3.9\t\t\t4.5\t\t").unwrap();
        writeln!(file, "1\t11\t\t5\t8.0\t\t\t9.0\t\t").unwrap();
        writeln!(file, "2\t10\t\t90\t1.0\t\t\t1.2\t\t").unwrap();
        let mut seen = 0;
        let stats = load_outcome_stats(file.path(), |stat| {
            seen += 1;
            stat.case_count.is_some_and(|count| count >= 20)
                && stat.ror.is_some_and(|ror| ror >= 2.0)
        })
        .unwrap();
        assert_eq!(seen, 3);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].outcome_concept_id, Some(10));
        assert_eq!(stats[0].drug_concept_id, Some(1));
    }
}
