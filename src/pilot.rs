//! Pilot-run contamination filter.
//!
//! Pilot data collection happens on known dates before the real survey; any
//! row whose submission-date column matches one of the configured date
//! literals is dropped. Date-valued cells match on the calendar date; text
//! cells fall back to exact string comparison against the literal.

use anyhow::Result;
use chrono::NaiveDate;
use log::info;

use crate::config::PilotConfig;
use crate::frame::DataFrame;
use crate::value::{Value, parse_naive_date};

/// Removes rows matching any configured pilot date. Returns the number of
/// rows removed. Callers skip this stage entirely when the date list is
/// empty.
pub fn filter_pilot_rows(frame: &mut DataFrame, config: &PilotConfig) -> Result<usize> {
    let col = frame.column_index(&config.column)?;
    let targets: Vec<(Option<NaiveDate>, &str)> = config
        .dates
        .iter()
        .map(|literal| (parse_naive_date(literal), literal.as_str()))
        .collect();

    let before = frame.row_count();
    frame.retain_rows(|_, row| match &row[col] {
        None => true,
        Some(value) => !targets
            .iter()
            .any(|(date, literal)| matches_pilot_date(value, *date, literal)),
    });
    let removed = before - frame.row_count();
    info!(
        "Number of data points: {} | After removing {} pilot row(s)",
        frame.row_count(),
        removed
    );
    Ok(removed)
}

fn matches_pilot_date(value: &Value, date: Option<NaiveDate>, literal: &str) -> bool {
    match (date, value.as_date()) {
        (Some(target), Some(cell_date)) => cell_date == target,
        _ => value.as_display() == literal,
    }
}
