use std::path::PathBuf;

use pvl_output::WrittenTable;

#[derive(Debug)]
pub struct RunResult {
    pub output_dir: PathBuf,
    pub tables: Vec<WrittenTable>,
    pub patients_with_risk: usize,
    pub known_interactions: usize,
}

impl RunResult {
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|t| t.rows).sum()
    }
}
