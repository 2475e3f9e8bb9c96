//! Streaming reader for the headerless, tab-separated AEOLUS bundle.
//!
//! The statistics file runs to millions of rows, so it is never materialised
//! as a frame: each record is handed to a callback, which decides whether
//! its typed fields survive.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{IngestError, Result};

/// Calls `on_record` for every line of a headerless TSV file.
///
/// Quotes are not interpreted; concept names legitimately contain them.
/// Records shorter than `min_fields` are rejected with the offending line.
pub fn for_each_record<F>(path: &Path, min_fields: usize, mut on_record: F) -> Result<u64>
where
    F: FnMut(&csv::StringRecord),
{
    let file = File::open(path).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let mut record = csv::StringRecord::new();
    let mut count = 0u64;
    loop {
        let more = reader
            .read_record(&mut record)
            .map_err(|e| IngestError::CsvParse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        if !more {
            break;
        }
        if record.len() == 1 && record.get(0).is_some_and(|f| f.trim().is_empty()) {
            continue;
        }
        if record.len() < min_fields {
            return Err(IngestError::ShortRecord {
                path: path.to_path_buf(),
                line: record.position().map(|p| p.line()).unwrap_or(count + 1),
                expected: min_fields,
                found: record.len(),
            });
        }
        on_record(&record);
        count += 1;
    }
    Ok(count)
}

/// Field `idx` of a record, trimmed, with blanks as `None`.
pub fn field(record: &csv::StringRecord, idx: usize) -> Option<&str> {
    record
        .get(idx)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
