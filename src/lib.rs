pub mod cli;
pub mod config;
pub mod dedup;
pub mod error;
pub mod expand;
pub mod frame;
pub mod io;
pub mod pilot;
pub mod pipeline;
pub mod preview;
pub mod prune;
pub mod rename;
pub mod render;
pub mod screen;
pub mod value;
pub mod verify;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, info};

use crate::cli::{Cli, CleanArgs, Commands};
use crate::config::PipelineConfig;

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("survey_prep", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Clean(args) => handle_clean(&args),
        Commands::Verify(args) => verify::execute(&args),
        Commands::Preview(args) => preview::execute(&args),
    }
}

fn handle_clean(args: &CleanArgs) -> Result<()> {
    let mut config = PipelineConfig::load(&args.config)?;
    if let Some(policy) = args.policy {
        config.missing.policy = policy;
    }
    let report = pipeline::run(&config)?;
    info!(
        "Run summary: {} -> {} row(s) ({} duplicate(s), {} pilot row(s), {} incomplete row(s) removed)",
        report.initial_rows,
        report.final_rows,
        report.duplicates_removed,
        report.pilot_rows_removed,
        report.missing_rows_removed
    );
    if !report.dropped_columns.is_empty() {
        info!(
            "Columns dropped by the threshold policy: {:?}",
            report.dropped_columns
        );
    }
    Ok(())
}
