//! Shared utilities for the pharmacovigilance linkage crates.
//!
//! This crate provides the cell-level helpers every table loader needs:
//! Polars `AnyValue` coercion into optional text and numbers, and
//! case-insensitive resolution of source column names.

pub mod columns;
pub mod polars;

// Re-export commonly used functions at crate root for convenience
pub use columns::ColumnLookup;
pub use polars::{any_to_text, format_numeric, leading_digits, parse_f64, parse_i64};
