//! Missing-value screening over the complete-case column set.
//!
//! Complete-case columns are the questions every respondent must answer.
//! Under the strict policy, any null in that set removes the row. Under the
//! threshold policy, columns whose null count exceeds 10% of the row count
//! are dropped outright first (strict `>`: exactly 10% survives), then the
//! remaining subset is screened strictly. Null counts are always computed
//! against the row count at stage entry.

use anyhow::Result;
use log::info;

use crate::config::{MissingConfig, MissingValuePolicy};
use crate::frame::DataFrame;

#[derive(Debug, Clone, Default)]
pub struct ScreenReport {
    pub rows_removed: usize,
    pub dropped_columns: Vec<String>,
}

pub fn screen_missing(frame: &mut DataFrame, config: &MissingConfig) -> Result<ScreenReport> {
    // Every complete-case column must still be live here; a column already
    // pruned (or misspelled) is a configuration error, not a silent skip.
    let initial_rows = frame.row_count();
    let mut null_counts = Vec::with_capacity(config.columns.len());
    for name in &config.columns {
        let idx = frame.column_index(name)?;
        let nulls = frame.null_count(idx);
        info!("Column {name} has {nulls} missing value(s)");
        null_counts.push((name.clone(), nulls));
    }

    let mut dropped_columns = Vec::new();
    if config.policy == MissingValuePolicy::Threshold {
        dropped_columns = null_counts
            .iter()
            // count/rows > 0.10, kept in integer arithmetic so exactly 10%
            // stays on the surviving side.
            .filter(|(_, nulls)| *nulls * 10 > initial_rows)
            .map(|(name, _)| name.clone())
            .collect();
        if !dropped_columns.is_empty() {
            frame.drop_columns(&dropped_columns)?;
        }
        info!(
            "Number of columns: {} | After removing the columns that contained missing values more than 10% of data points",
            frame.column_count()
        );
        info!("Dropped columns = {dropped_columns:?}");
    }

    let checked_indices = config
        .columns
        .iter()
        .filter(|name| !dropped_columns.contains(*name))
        .map(|name| frame.column_index(name))
        .collect::<Result<Vec<_>, _>>()?;
    frame.retain_rows(|_, row| checked_indices.iter().all(|&idx| row[idx].is_some()));

    let rows_removed = initial_rows - frame.row_count();
    info!("Number of deleted missing values: {rows_removed}");
    info!(
        "Number of data points after missing value handling: {}",
        frame.row_count()
    );
    Ok(ScreenReport {
        rows_removed,
        dropped_columns,
    })
}
