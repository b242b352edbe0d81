use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::MissingValuePolicy;

#[derive(Debug, Parser)]
#[command(author, version, about = "Clean raw survey exports into analysis-ready datasets", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the full preprocessing pipeline described by a config file
    Clean(CleanArgs),
    /// Check a config file against the source table without changing anything
    Verify(VerifyArgs),
    /// Preview the first few rows of a source table in a formatted table
    Preview(PreviewArgs),
}

#[derive(Debug, Args)]
pub struct CleanArgs {
    /// Pipeline configuration file (YAML)
    #[arg(short, long)]
    pub config: PathBuf,
    /// Override the missing-value policy declared in the config file
    #[arg(long, value_enum)]
    pub policy: Option<MissingValuePolicy>,
}

#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// Pipeline configuration file (YAML)
    #[arg(short, long)]
    pub config: PathBuf,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Input table; the extension selects the format unless --format is given
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Number of rows to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
    /// Format override ('xlsx', 'xls' or 'csv')
    #[arg(long)]
    pub format: Option<String>,
}
