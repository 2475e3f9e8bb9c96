//! Input discovery and loading for the pharmacovigilance linkage pipeline.
//!
//! Headed CSV inputs (the synthetic patient corpus and the interaction
//! sources) are read through Polars with every column as text. The
//! headerless AEOLUS bundle is streamed record by record with the `csv`
//! crate. Every loader returns the typed records of `pvl-model`.

pub mod aeolus;
pub mod ddi;
pub mod discovery;
pub mod error;
pub mod synthea;
pub mod table;
pub mod tsv;

pub use aeolus::{load_concepts, load_outcome_stats};
pub use ddi::{load_crescenddi, load_ddi_sources, load_ddinter, load_mendeley};
pub use discovery::{FileIndex, InputPaths, list_ddinter_chunks, walk_files};
pub use error::{IngestError, Result};
pub use synthea::{load_conditions, load_medications, load_patients};
pub use table::{SourceTable, TextColumn, read_text_frame};
