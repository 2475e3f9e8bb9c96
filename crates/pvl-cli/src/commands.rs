use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use tracing::info;

use pvl_cli::config::resolve_config;
use pvl_cli::pipeline::run_pipeline;
use pvl_cli::types::RunResult;
use pvl_ingest::InputPaths;

use crate::cli::{InputsArgs, RunArgs};
use crate::summary::print_inputs;

pub fn run(args: &RunArgs) -> Result<RunResult> {
    let config = resolve_config(args.config.as_deref(), &args.overrides())?;
    info!(
        raw_dir = %config.raw_dir.display(),
        output_dir = %config.output_dir.display(),
        online = config.resolver.online,
        top_k = config.top_k,
        "Starting pipeline"
    );
    run_pipeline(&config, io::stderr().is_terminal())
}

pub fn run_inputs(args: &InputsArgs) -> Result<()> {
    let config = resolve_config(args.config.as_deref(), &args.overrides())?;
    let inputs = InputPaths::discover(&config.raw_dir, config.ddi.include_negative_controls)
        .with_context(|| format!("discover inputs under {}", config.raw_dir.display()))?;
    print_inputs(&inputs.entries());
    Ok(())
}
