//! Library components of the `pvl` command-line pipeline.

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod types;
