//! Reading output tables back.

use std::path::{Path, PathBuf};

use pvl_model::IngredientMap;

use crate::error::{OutputError, Result};
use crate::schema::{self, TableSpec};

/// An output table as plain text cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub path: PathBuf,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Fails unless the header matches `spec` exactly, in order.
    pub fn expect_schema(&self, spec: TableSpec) -> Result<()> {
        if self.headers.iter().map(String::as_str).eq(spec.columns.iter().copied()) {
            return Ok(());
        }
        Err(OutputError::SchemaMismatch {
            path: self.path.clone(),
            expected: spec.columns.join(", "),
            found: self.headers.join(", "),
        })
    }
}

pub fn read_table(path: &Path) -> Result<RawTable> {
    let csv_error = |source| OutputError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::Reader::from_path(path).map_err(csv_error)?;
    let headers = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(str::to_string)
        .collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(RawTable {
        path: path.to_path_buf(),
        headers,
        rows,
    })
}

/// Reads a `rxcui_to_ingredient_map.csv` file; an empty ingredient cell is a
/// product that could not be resolved.
pub fn read_ingredient_map(path: &Path) -> Result<IngredientMap> {
    let table = read_table(path)?;
    table.expect_schema(schema::INGREDIENT_MAP)?;

    let mut map = IngredientMap::new();
    for (index, row) in table.rows.iter().enumerate() {
        // Header is line 1.
        let line = index as u64 + 2;
        let parse = |column: &'static str, value: &str| {
            value
                .trim()
                .parse::<i64>()
                .map_err(|_| OutputError::InvalidCell {
                    path: path.to_path_buf(),
                    line,
                    column,
                    value: value.to_string(),
                })
        };
        let product = parse("rxcui", &row[0])?;
        let ingredient = match row[1].trim() {
            "" => None,
            value => Some(parse("ingredient_rxcui", value)?),
        };
        map.insert(product, ingredient);
    }
    Ok(map)
}
