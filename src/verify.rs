//! Configuration verification against the live source table.
//!
//! Walks the configured column lists in pipeline order against the column
//! set as it will exist at the stage where each list is consumed, so a
//! config that would abort mid-run fails here instead, before anything is
//! written.

use anyhow::{Result, bail};
use log::{info, warn};

use crate::cli::VerifyArgs;
use crate::config::PipelineConfig;
use crate::error::PrepError;
use crate::io;

pub fn execute(args: &VerifyArgs) -> Result<()> {
    let config = PipelineConfig::load(&args.config)?;
    let frame = io::load(&config.source, config.format)?;
    verify_config(&config, frame.columns())?;
    info!(
        "Configuration {:?} is consistent with '{}.{}'",
        args.config, config.source, config.format
    );
    Ok(())
}

/// Checks every configured column list against the header as it evolves
/// through the pipeline. Indicator columns appended by multi-select
/// expansion depend on the observed vocabulary, so any name carrying a
/// configured prefix is accepted without being provable from the header.
pub fn verify_config(config: &PipelineConfig, source_columns: &[String]) -> Result<()> {
    if config.rename.len() != source_columns.len() {
        return Err(PrepError::RenameLengthMismatch {
            expected: source_columns.len(),
            supplied: config.rename.len(),
        }
        .into());
    }
    let mut seen = std::collections::BTreeSet::new();
    for name in &config.rename {
        if !seen.insert(name) {
            warn!("Rename list repeats column name '{name}'");
        }
    }

    // Header after the rename stage.
    let live = config.rename.clone();
    let prefixes: Vec<&str> = config
        .multi_select
        .iter()
        .map(|field| field.prefix.as_str())
        .collect();
    let resolvable = |name: &String| {
        live.contains(name) || prefixes.iter().any(|prefix| name.starts_with(prefix))
    };

    for field in &config.multi_select {
        if !live.contains(&field.column) {
            bail!(PrepError::UnknownColumn(field.column.clone()));
        }
    }
    for field in &config.ordinal {
        if !live.contains(&field.column) {
            bail!(PrepError::UnknownColumn(field.column.clone()));
        }
    }
    for name in &config.identifiers {
        if !resolvable(name) {
            bail!(PrepError::UnknownColumn(name.clone()));
        }
    }
    if config.identifiers.len() < 3 {
        warn!(
            "Identifier key has only {} column(s); at least three are recommended",
            config.identifiers.len()
        );
    }
    if !config.pilot.dates.is_empty() && !live.contains(&config.pilot.column) {
        bail!(PrepError::UnknownColumn(config.pilot.column.clone()));
    }
    for name in &config.delete {
        if !resolvable(name) {
            bail!(PrepError::UnknownColumn(name.clone()));
        }
    }

    // Complete-case columns are screened after pruning, so a name in both
    // lists would abort the run at the screening stage.
    for name in &config.missing.columns {
        if config.delete.contains(name) {
            bail!(
                "complete-case column '{name}' is also in the delete list; it will be gone before screening"
            );
        }
        if !resolvable(name) {
            bail!(PrepError::UnknownColumn(name.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MissingConfig, MissingValuePolicy, MultiSelectField, PilotConfig};
    use crate::io::FileFormat;

    fn base_config() -> PipelineConfig {
        PipelineConfig {
            project: "test".to_string(),
            source: "data/raw".to_string(),
            format: FileFormat::Csv,
            open_ended: None,
            rename: vec![
                "Timestamp".to_string(),
                "Q1_age".to_string(),
                "Q5_type_dis".to_string(),
            ],
            delete: vec!["Q5_type_dis".to_string()],
            identifiers: vec!["Timestamp".to_string(), "Q1_age".to_string()],
            pilot: PilotConfig::default(),
            missing: MissingConfig {
                policy: MissingValuePolicy::Strict,
                columns: vec!["Timestamp".to_string(), "Q1_age".to_string()],
            },
            multi_select: vec![MultiSelectField {
                column: "Q5_type_dis".to_string(),
                prefix: "Q5_".to_string(),
            }],
            ordinal: Vec::new(),
        }
    }

    fn source_columns() -> Vec<String> {
        vec!["ts".to_string(), "age".to_string(), "q5".to_string()]
    }

    #[test]
    fn consistent_config_passes() {
        verify_config(&base_config(), &source_columns()).expect("verify");
    }

    #[test]
    fn rename_length_mismatch_is_reported() {
        let config = base_config();
        let err = verify_config(&config, &source_columns()[..2]).unwrap_err();
        assert!(err.to_string().contains("rename list"));
    }

    #[test]
    fn complete_case_column_in_delete_list_is_rejected() {
        let mut config = base_config();
        config.missing.columns.push("Q5_type_dis".to_string());
        let err = verify_config(&config, &source_columns()).unwrap_err();
        assert!(err.to_string().contains("also in the delete list"));
    }

    #[test]
    fn prefixed_indicator_names_are_accepted() {
        let mut config = base_config();
        // Indicator columns only exist after expansion; the prefix makes
        // them resolvable.
        config.missing.columns.push("Q5_Hearing".to_string());
        verify_config(&config, &source_columns()).expect("verify");
    }

    #[test]
    fn pilot_column_is_only_required_when_dates_are_configured() {
        let mut config = base_config();
        config.pilot.dates.push("2024-07-18".to_string());
        let err = verify_config(&config, &source_columns()).unwrap_err();
        assert!(err.to_string().contains("today"));

        config.pilot.column = "Timestamp".to_string();
        verify_config(&config, &source_columns()).expect("verify");
    }
}
