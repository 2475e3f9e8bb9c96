//! Input file discovery under a raw-data search root.
//!
//! Every lookup walks the whole tree below the root. When several files
//! match, the one with the shortest path wins, so a file at the top of the
//! root beats a copy nested in an archive folder.

use std::fs::FileType;
use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

pub const MEDICATIONS_FILE: &str = "medications.csv";
pub const PATIENTS_FILE: &str = "patients.csv";
pub const CONDITIONS_FILE: &str = "conditions.csv";
pub const CONCEPT_PREFIX: &str = "concept";
pub const OUTCOME_STATS_PREFIX: &str = "standard_drug_outcome_statistics";
pub const DDINTER_PREFIX: &str = "ddinter_downloads_code_";
pub const MENDELEY_FILE: &str = "Mendeley.csv";
pub const CRESCENDDI_POSITIVE_STEM: &str = "CRESCENDDI - Positive Controls";
pub const CRESCENDDI_NEGATIVE_STEM: &str = "CRESCENDDI - Negative Controls";

/// Extensions accepted for spreadsheet exports located by stem.
const DELIMITED_EXTENSIONS: [&str; 3] = ["csv", "tsv", "txt"];

/// Every input file of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct InputPaths {
    pub medications: PathBuf,
    pub patients: PathBuf,
    pub conditions: PathBuf,
    pub concepts: PathBuf,
    pub outcome_stats: PathBuf,
    /// May be empty; DDInter then contributes nothing.
    pub ddinter_chunks: Vec<PathBuf>,
    pub mendeley: PathBuf,
    pub crescenddi_positive: PathBuf,
    /// Only located when negative controls are requested; optional even then.
    pub crescenddi_negative: Option<PathBuf>,
}

impl InputPaths {
    /// Locates every input below `root`.
    ///
    /// A missing required file is fatal and names the expected file. A
    /// missing negative-control export is only logged.
    pub fn discover(root: &Path, include_negative_controls: bool) -> Result<Self> {
        let index = FileIndex::scan(root)?;

        let crescenddi_negative = if include_negative_controls {
            let found = index.find_by_stem(CRESCENDDI_NEGATIVE_STEM).ok();
            if found.is_none() {
                tracing::warn!(
                    stem = CRESCENDDI_NEGATIVE_STEM,
                    root = %root.display(),
                    "Negative controls requested but not found; continuing without them"
                );
            }
            found
        } else {
            None
        };

        Ok(Self {
            medications: index.find_one(MEDICATIONS_FILE)?,
            patients: index.find_one(PATIENTS_FILE)?,
            conditions: index.find_one(CONDITIONS_FILE)?,
            concepts: index.find_by_prefix(CONCEPT_PREFIX)?,
            outcome_stats: index.find_by_prefix(OUTCOME_STATS_PREFIX)?,
            ddinter_chunks: list_ddinter_chunks(root)?,
            mendeley: index.find_one(MENDELEY_FILE)?,
            crescenddi_positive: index.find_by_stem(CRESCENDDI_POSITIVE_STEM)?,
            crescenddi_negative,
        })
    }

    /// Labelled paths in a fixed order, for display.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut entries = vec![
            ("medications".to_string(), display(&self.medications)),
            ("patients".to_string(), display(&self.patients)),
            ("conditions".to_string(), display(&self.conditions)),
            ("concepts".to_string(), display(&self.concepts)),
            ("outcome statistics".to_string(), display(&self.outcome_stats)),
        ];
        if self.ddinter_chunks.is_empty() {
            entries.push(("ddinter".to_string(), "(none)".to_string()));
        }
        for (idx, chunk) in self.ddinter_chunks.iter().enumerate() {
            entries.push((format!("ddinter [{}]", idx + 1), display(chunk)));
        }
        entries.push(("mendeley".to_string(), display(&self.mendeley)));
        entries.push((
            "crescenddi positive".to_string(),
            display(&self.crescenddi_positive),
        ));
        if let Some(negative) = &self.crescenddi_negative {
            entries.push(("crescenddi negative".to_string(), display(negative)));
        }
        entries
    }
}

/// Every regular file below a search root, walked once.
///
/// Lookups pick the shortest matching path; ties go to the lexically first.
#[derive(Debug, Clone)]
pub struct FileIndex {
    root: PathBuf,
    files: Vec<PathBuf>,
}

impl FileIndex {
    pub fn scan(root: &Path) -> Result<Self> {
        Ok(Self {
            root: root.to_path_buf(),
            files: walk_files(root)?,
        })
    }

    /// Finds a file by exact name.
    pub fn find_one(&self, name: &str) -> Result<PathBuf> {
        self.require(name, |p| name_is(p, name))
    }

    /// Finds a delimited-text file whose stem equals `stem` (case-insensitive).
    pub fn find_by_stem(&self, stem: &str) -> Result<PathBuf> {
        self.require(&format!("{stem}.csv"), |p| stem_matches(p, stem))
    }

    /// Finds a file whose name starts with `prefix` (case-insensitive).
    pub fn find_by_prefix(&self, prefix: &str) -> Result<PathBuf> {
        self.require(&format!("{prefix}*"), |p| name_has_prefix(p, prefix))
    }

    fn require(&self, name: &str, predicate: impl Fn(&Path) -> bool) -> Result<PathBuf> {
        self.files
            .iter()
            .filter(|p| predicate(p))
            .min_by(|a, b| {
                let (a_len, b_len) = (a.as_os_str().len(), b.as_os_str().len());
                a_len.cmp(&b_len).then_with(|| a.cmp(b))
            })
            .cloned()
            .ok_or_else(|| IngestError::FileNotFound {
                name: name.to_string(),
                root: self.root.clone(),
            })
    }
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|name| name.to_str())
}

fn name_is(path: &Path, name: &str) -> bool {
    file_name(path) == Some(name)
}

fn name_has_prefix(path: &Path, prefix: &str) -> bool {
    file_name(path)
        .map(|name| name.to_ascii_lowercase().starts_with(&prefix.to_ascii_lowercase()))
        .unwrap_or(false)
}

fn stem_matches(path: &Path, stem: &str) -> bool {
    let stem_ok = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.eq_ignore_ascii_case(stem))
        .unwrap_or(false);
    let ext_ok = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| DELIMITED_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
        .unwrap_or(false);
    stem_ok && ext_ok
}

/// Lists the DDInter download chunks directly in `root`, sorted by name.
pub fn list_ddinter_chunks(root: &Path) -> Result<Vec<PathBuf>> {
    let mut chunks: Vec<PathBuf> = read_entries(root)?
        .into_iter()
        .map(|(path, _)| path)
        .filter(|path| path.is_file())
        .filter(|path| {
            file_name(path)
                .map(|name| {
                    name.starts_with(DDINTER_PREFIX)
                        && Path::new(name)
                            .extension()
                            .and_then(|ext| ext.to_str())
                            .map(|ext| ext.eq_ignore_ascii_case("csv"))
                            .unwrap_or(false)
                })
                .unwrap_or(false)
        })
        .collect();
    chunks.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(chunks)
}

/// Lists every regular file below `root`, sorted by path.
///
/// Symbolic links to files are listed; symbolic links to directories are not
/// followed, so a link cycle cannot trap the walk.
pub fn walk_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: root.to_path_buf(),
        });
    }
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for (path, file_type) in read_entries(&dir)? {
            if file_type.is_dir() {
                pending.push(path);
            } else if file_type.is_file() || (file_type.is_symlink() && path.is_file()) {
                files.push(path);
            } else if file_type.is_symlink() {
                tracing::debug!(path = %path.display(), "Skipping symlinked directory");
            }
        }
    }
    files.sort();
    Ok(files)
}

fn read_entries(dir: &Path) -> Result<Vec<(PathBuf, FileType)>> {
    let read_error = |source| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths = Vec::new();
    for entry_result in std::fs::read_dir(dir).map_err(read_error)? {
        let entry = entry_result.map_err(read_error)?;
        let file_type = entry.file_type().map_err(read_error)?;
        paths.push((entry.path(), file_type));
    }
    Ok(paths)
}
