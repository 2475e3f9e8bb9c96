//! Atomic CSV table writer.
//!
//! Each table is serialised completely into a temporary sibling file, synced,
//! and only then renamed over the target, so a failed stage never leaves a
//! half-written table behind.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::encode::ToCells;
use crate::error::{OutputError, Result};
use crate::schema::TableSpec;

/// Result of writing one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenTable {
    pub name: &'static str,
    pub path: PathBuf,
    pub rows: usize,
}

/// Writes `rows` as `spec` into `output_dir`.
///
/// The header row is always written, also for an empty table.
pub fn write_table<I>(output_dir: &Path, spec: TableSpec, rows: I) -> Result<WrittenTable>
where
    I: IntoIterator,
    I::Item: ToCells,
{
    write_table_at(&output_dir.join(spec.file_name), spec, rows)
}

/// Writes `rows` with the columns of `spec` to an explicit file path.
pub fn write_table_at<I>(path: &Path, spec: TableSpec, rows: I) -> Result<WrittenTable>
where
    I: IntoIterator,
    I::Item: ToCells,
{
    let path = path.to_path_buf();
    let temp_path = path.with_extension("csv.tmp");

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| OutputError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let written = match write_rows(&temp_path, spec, rows) {
        Ok(count) => count,
        Err(err) => {
            let _ = fs::remove_file(&temp_path);
            return Err(err);
        }
    };

    fs::rename(&temp_path, &path).map_err(|source| OutputError::AtomicWriteFailed {
        temp_path: temp_path.clone(),
        target_path: path.clone(),
        source,
    })?;

    debug!(table = spec.name(), rows = written, path = %path.display(), "Wrote table");
    Ok(WrittenTable {
        name: spec.name(),
        path,
        rows: written,
    })
}

fn write_rows<I>(temp_path: &Path, spec: TableSpec, rows: I) -> Result<usize>
where
    I: IntoIterator,
    I::Item: ToCells,
{
    let csv_error = |source| OutputError::Csv {
        path: temp_path.to_path_buf(),
        source,
    };

    let file = File::create(temp_path).map_err(|source| OutputError::Io {
        operation: "create",
        path: temp_path.to_path_buf(),
        source,
    })?;
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(spec.columns).map_err(csv_error)?;

    let mut count = 0usize;
    for row in rows {
        writer.write_record(row.cells()).map_err(csv_error)?;
        count += 1;
    }

    writer.flush().map_err(|source| OutputError::Io {
        operation: "flush",
        path: temp_path.to_path_buf(),
        source,
    })?;
    let file = writer.into_inner().map_err(|err| OutputError::Io {
        operation: "flush",
        path: temp_path.to_path_buf(),
        source: std::io::Error::new(err.error().kind(), err.error().to_string()),
    })?;
    file.sync_all().map_err(|source| OutputError::Io {
        operation: "sync",
        path: temp_path.to_path_buf(),
        source,
    })?;
    Ok(count)
}
