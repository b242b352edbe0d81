//! Pipeline configuration loaded from a YAML file.
//!
//! The configuration is the whole contract between the analyst and the
//! pipeline: nothing about the table is discovered at runtime. Column names
//! in `delete`, `identifiers`, `missing.columns`, `multi_select`, and
//! `ordinal` refer to the *renamed* header, since renaming is the first
//! transformation applied after load.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;

use crate::io::FileFormat;

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Project name, descriptive only.
    pub project: String,
    /// Extension-less path to the raw dataset; the extension comes from
    /// `format`.
    pub source: String,
    pub format: FileFormat,
    /// Destination for extracted open-ended answers. Declared for the
    /// downstream analysis layer; the pipeline itself never touches it.
    #[serde(default)]
    pub open_ended: Option<String>,
    /// Replacement header, one name per source column, in source order.
    pub rename: Vec<String>,
    /// Columns to drop before missing-value screening.
    #[serde(default)]
    pub delete: Vec<String>,
    /// Duplicate-detection key. Three or more columns recommended.
    pub identifiers: Vec<String>,
    #[serde(default)]
    pub pilot: PilotConfig,
    pub missing: MissingConfig,
    #[serde(default)]
    pub multi_select: Vec<MultiSelectField>,
    #[serde(default)]
    pub ordinal: Vec<OrdinalField>,
}

impl PipelineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Opening config file {path:?}"))?;
        let config: PipelineConfig =
            serde_yaml::from_str(&raw).with_context(|| format!("Parsing config {path:?}"))?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PilotConfig {
    /// Column holding the submission date used for pilot matching.
    #[serde(default = "default_pilot_column")]
    pub column: String,
    /// Pilot-run dates to exclude. Empty list skips the stage entirely.
    #[serde(default)]
    pub dates: Vec<String>,
}

impl Default for PilotConfig {
    fn default() -> Self {
        PilotConfig {
            column: default_pilot_column(),
            dates: Vec::new(),
        }
    }
}

fn default_pilot_column() -> String {
    "today".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct MissingConfig {
    #[serde(default)]
    pub policy: MissingValuePolicy,
    /// Complete-case columns: mandatory for every respondent.
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum MissingValuePolicy {
    /// Remove every row with a null in any complete-case column.
    #[default]
    Strict,
    /// First drop complete-case columns whose null share exceeds 10% of
    /// rows, then apply strict screening to the remainder.
    Threshold,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MultiSelectField {
    pub column: String,
    /// Prefix for the derived indicator columns, e.g. `Q5_`.
    pub prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrdinalField {
    pub column: String,
    /// Code-to-label lookup. Defaults to the 1..5 knowledge scale.
    #[serde(default = "knowledge_scale")]
    pub labels: BTreeMap<i64, String>,
}

pub fn knowledge_scale() -> BTreeMap<i64, String> {
    [
        (1, "No knowledge"),
        (2, "Minimal knowledge"),
        (3, "Basic knowledge"),
        (4, "Adequate knowledge"),
        (5, "Excellent knowledge"),
    ]
    .into_iter()
    .map(|(code, label)| (code, label.to_string()))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = "\
project: Disability perception survey
source: data/raw
format: csv
rename: [Timestamp, Consent, Q1_age]
identifiers: [Timestamp, Q1_age]
missing:
  columns: [Timestamp, Q1_age]
";

    #[test]
    fn minimal_config_fills_defaults() {
        let config: PipelineConfig = serde_yaml::from_str(MINIMAL).expect("parse");
        assert_eq!(config.format, FileFormat::Csv);
        assert_eq!(config.missing.policy, MissingValuePolicy::Strict);
        assert!(config.pilot.dates.is_empty());
        assert_eq!(config.pilot.column, "today");
        assert!(config.delete.is_empty());
        assert!(config.multi_select.is_empty());
    }

    #[test]
    fn ordinal_labels_default_to_knowledge_scale() {
        let yaml = format!("{MINIMAL}ordinal:\n  - column: Q4_dis_knowledge\n");
        let config: PipelineConfig = serde_yaml::from_str(&yaml).expect("parse");
        let labels = &config.ordinal[0].labels;
        assert_eq!(labels.len(), 5);
        assert_eq!(labels[&1], "No knowledge");
        assert_eq!(labels[&5], "Excellent knowledge");
    }

    #[test]
    fn unsupported_format_is_rejected_at_parse_time() {
        let yaml = MINIMAL.replace("format: csv", "format: parquet");
        let err = serde_yaml::from_str::<PipelineConfig>(&yaml).unwrap_err();
        assert!(err.to_string().contains("parquet") || err.to_string().contains("unknown variant"));
    }
}
