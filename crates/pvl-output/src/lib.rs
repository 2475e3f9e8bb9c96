//! Output tables of the linkage pipeline.
//!
//! The seven tables are the fixed contract of the downstream bulk loader:
//! [`schema`] pins their file names and column orders, [`encode`] turns the
//! typed records into cells, and [`writer`] persists them atomically.

pub mod encode;
pub mod error;
pub mod reader;
pub mod schema;
pub mod writer;

pub use encode::ToCells;
pub use error::{OutputError, Result};
pub use reader::{RawTable, read_ingredient_map, read_table};
pub use schema::{ALL_TABLES, TableSpec};
pub use writer::{WrittenTable, write_table, write_table_at};
