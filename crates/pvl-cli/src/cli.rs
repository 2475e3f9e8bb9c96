//! CLI argument definitions for the linkage pipeline.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use pvl_cli::config::ConfigOverrides;

#[derive(Parser)]
#[command(
    name = "pvl",
    version,
    about = "Link patient medication exposures to adverse-event and drug-interaction signals",
    long_about = "Link synthetic patient medication exposures to FAERS-derived adverse-event \
                  signals (AEOLUS) and to a unified drug-drug interaction reference.\n\n\
                  Writes seven CSV tables for bulk loading into a graph database."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow patient identifiers in trace-level logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the full pipeline and write the output tables.
    Run(RunArgs),

    /// Locate every input file without running the pipeline.
    Inputs(InputsArgs),
}

#[derive(Args)]
pub struct RunArgs {
    /// Pipeline configuration file (TOML). Flags override its values.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Root directory searched for input files.
    #[arg(long = "raw-dir", value_name = "DIR")]
    pub raw_dir: Option<PathBuf>,

    /// Directory the output tables are written to.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Resolve ingredients online via RxNav instead of the identity fallback.
    #[arg(long = "use-rxnav")]
    pub use_rxnav: bool,

    /// Ignore and overwrite a cached ingredient mapping.
    #[arg(long = "refresh-cache")]
    pub refresh_cache: bool,

    /// Maximum rows kept per patient and drug.
    #[arg(long = "top-k", value_name = "K")]
    pub top_k: Option<usize>,

    /// Minimum AEOLUS case count of a significant signal.
    #[arg(long = "min-case-count", value_name = "N")]
    pub min_case_count: Option<i64>,

    /// Minimum AEOLUS reporting odds ratio of a significant signal.
    #[arg(long = "min-ror", value_name = "ROR")]
    pub min_ror: Option<f64>,

    /// Also integrate the CRESCENDDI negative controls.
    #[arg(long = "include-negative-controls")]
    pub include_negative_controls: bool,
}

impl RunArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            raw_dir: self.raw_dir.clone(),
            output_dir: self.output_dir.clone(),
            use_rxnav: self.use_rxnav,
            refresh_cache: self.refresh_cache,
            top_k: self.top_k,
            min_case_count: self.min_case_count,
            min_ror: self.min_ror,
            include_negative_controls: self.include_negative_controls,
        }
    }
}

#[derive(Args)]
pub struct InputsArgs {
    /// Pipeline configuration file (TOML).
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Root directory searched for input files.
    #[arg(long = "raw-dir", value_name = "DIR")]
    pub raw_dir: Option<PathBuf>,

    /// Also locate the CRESCENDDI negative controls.
    #[arg(long = "include-negative-controls")]
    pub include_negative_controls: bool,
}

impl InputsArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            raw_dir: self.raw_dir.clone(),
            include_negative_controls: self.include_negative_controls,
            ..ConfigOverrides::default()
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
