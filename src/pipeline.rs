//! The preprocessing pipeline orchestrator.
//!
//! Fixed forward-only stage order:
//! load → rename → expand/remap → deduplicate → (pilot filter) → prune →
//! missing-value screen → save. The pilot filter is omitted entirely when
//! no pilot dates are configured. Any failure aborts the run; files already
//! written (the columns book in particular) are left on disk and must be
//! treated as unreliable after a failed run.
//!
//! The frame is owned here for the duration of a run and handed through the
//! stages; the cleaned dataset is written to a derived `_cleaned` path so
//! the configured source is never overwritten.

use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;

use crate::config::PipelineConfig;
use crate::rename::RenameMap;
use crate::{dedup, expand, io, pilot, prune, rename, screen};

/// Audit summary of one completed pipeline run.
#[derive(Debug)]
pub struct RunReport {
    pub initial_rows: usize,
    pub final_rows: usize,
    pub duplicates_removed: usize,
    pub pilot_rows_removed: usize,
    pub missing_rows_removed: usize,
    /// Complete-case columns dropped by the threshold policy.
    pub dropped_columns: Vec<String>,
    pub rename_map: RenameMap,
    pub output_path: PathBuf,
}

pub fn run(config: &PipelineConfig) -> Result<RunReport> {
    info!("Preprocessing '{}'", config.project);

    let mut frame = io::load(&config.source, config.format)
        .with_context(|| format!("Loading dataset '{}'", config.source))?;
    let initial_rows = frame.row_count();
    info!(
        "Loaded {} row(s) x {} column(s) from '{}.{}'",
        frame.row_count(),
        frame.column_count(),
        config.source,
        config.format
    );

    let rename_map = rename::rename_columns(&mut frame, &config.rename)
        .context("Renaming columns")?;
    rename::write_columns_book(&rename_map, &io::columns_book_path(&config.source))
        .context("Writing the columns book")?;

    for field in &config.multi_select {
        expand::expand_multi_select(&mut frame, field)
            .with_context(|| format!("Expanding multi-select column '{}'", field.column))?;
    }
    for field in &config.ordinal {
        expand::remap_ordinal(&mut frame, field)
            .with_context(|| format!("Remapping ordinal column '{}'", field.column))?;
    }
    info!("Initial data points: {}", frame.row_count());

    let duplicates_removed = dedup::deduplicate(&mut frame, &config.identifiers)
        .context("Removing duplicates")?;

    let pilot_rows_removed = if config.pilot.dates.is_empty() {
        0
    } else {
        pilot::filter_pilot_rows(&mut frame, &config.pilot)
            .context("Filtering pilot rows")?
    };

    info!("Initial number of columns: {}", frame.column_count());
    prune::prune_columns(&mut frame, &config.delete).context("Pruning columns")?;

    let screen_report = screen::screen_missing(&mut frame, &config.missing)
        .context("Screening missing values")?;

    let output_path = io::cleaned_path(&config.source, config.format);
    io::save(&frame, &output_path, config.format)
        .with_context(|| format!("Saving cleaned dataset to {output_path:?}"))?;
    info!("The revised dataset has been saved");
    info!("Final number of data points: {}", frame.row_count());
    info!("Cleaned dataset has been saved: {}", output_path.display());

    Ok(RunReport {
        initial_rows,
        final_rows: frame.row_count(),
        duplicates_removed,
        pilot_rows_removed,
        missing_rows_removed: screen_report.rows_removed,
        dropped_columns: screen_report.dropped_columns,
        rename_map,
        output_path,
    })
}
