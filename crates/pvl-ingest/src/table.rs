//! Headed CSV tables read through Polars.
//!
//! Schema inference is disabled so every column arrives as text; the typed
//! loaders decide per column how a cell is parsed, and an unparseable cell
//! becomes a missing value instead of failing the whole read.

use std::path::{Path, PathBuf};

use polars::prelude::*;
use pvl_common::{ColumnLookup, any_to_text};

use crate::error::{IngestError, Result};

/// A CSV file loaded as an all-text DataFrame, with case-insensitive headers.
#[derive(Debug, Clone)]
pub struct SourceTable {
    path: PathBuf,
    df: DataFrame,
    columns: ColumnLookup,
}

impl SourceTable {
    /// Reads a headed CSV file.
    pub fn read(path: &Path) -> Result<Self> {
        let df = read_text_frame(path)?;
        let columns = ColumnLookup::new(df.get_column_names());
        Ok(Self {
            path: path.to_path_buf(),
            df,
            columns,
        })
    }

    /// Concatenates several files with the same layout.
    pub fn read_all(paths: &[PathBuf]) -> Result<Vec<Self>> {
        paths.iter().map(|path| Self::read(path)).collect()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    /// Resolves a required column by its aliases, tried in order.
    pub fn require(&self, aliases: &[&str]) -> Result<TextColumn<'_>> {
        self.optional(aliases)?
            .ok_or_else(|| IngestError::MissingColumn {
                column: aliases.join("|"),
                path: self.path.clone(),
            })
    }

    /// Resolves a column that may legitimately be absent.
    pub fn optional(&self, aliases: &[&str]) -> Result<Option<TextColumn<'_>>> {
        match self.columns.resolve(aliases) {
            Some(name) => Ok(Some(TextColumn {
                column: self.df.column(name)?,
            })),
            None => Ok(None),
        }
    }
}

/// One column of a [`SourceTable`], read cell by cell as trimmed text.
#[derive(Debug, Clone, Copy)]
pub struct TextColumn<'a> {
    column: &'a Column,
}

impl TextColumn<'_> {
    /// Cell text; `None` for nulls and blanks.
    pub fn text(&self, row_idx: usize) -> Result<Option<String>> {
        Ok(any_to_text(self.column.get(row_idx)?))
    }
}

/// Reads a headed CSV file into a DataFrame of String columns.
pub fn read_text_frame(path: &Path) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(IngestError::FileRead {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a file"),
        });
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    tracing::debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "Read CSV table"
    );
    Ok(df)
}
