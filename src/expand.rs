//! Multi-select expansion and ordinal label remapping.
//!
//! Multi-select questions arrive as comma-separated free text ("Hearing
//! impairment, Visual impairment"). Each designated column is rewritten to a
//! canonical token form and expanded into one 0/1 indicator column per
//! distinct token observed anywhere in the column. Ordinal questions arrive
//! as numeric codes and are remapped to their label text through the
//! configured lookup.

use std::collections::BTreeSet;

use anyhow::Result;
use itertools::Itertools;
use log::info;

use crate::config::{MultiSelectField, OrdinalField};
use crate::frame::DataFrame;
use crate::value::Value;

/// Canonical form of one multi-select cell: tokens trimmed, de-duplicated,
/// sorted, and rejoined with a bare comma. Idempotent.
pub fn normalize_multi_select(raw: &str) -> String {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .join(",")
}

/// Normalizes the designated column in place and appends one indicator
/// column per vocabulary token, named `{prefix}{token}`. The original text
/// column is retained. Returns the vocabulary size.
pub fn expand_multi_select(frame: &mut DataFrame, field: &MultiSelectField) -> Result<usize> {
    let col = frame.column_index(&field.column)?;

    // Null cells normalize to the empty string so every row has a canonical
    // token set to test against.
    frame.map_column(col, |cell| {
        let raw = cell.map(|value| value.as_display()).unwrap_or_default();
        Some(Value::Text(normalize_multi_select(&raw)))
    });

    let normalized: Vec<BTreeSet<String>> = frame
        .rows()
        .iter()
        .map(|row| match &row[col] {
            Some(Value::Text(s)) if !s.is_empty() => {
                s.split(',').map(str::to_string).collect()
            }
            _ => BTreeSet::new(),
        })
        .collect();

    let vocabulary: BTreeSet<String> = normalized.iter().flatten().cloned().collect();
    for token in &vocabulary {
        let cells = normalized
            .iter()
            .map(|tokens| Some(Value::Integer(i64::from(tokens.contains(token)))))
            .collect();
        frame.push_column(format!("{}{}", field.prefix, token), cells);
    }
    info!(
        "Expanded '{}' into {} indicator column(s) with prefix '{}'",
        field.column,
        vocabulary.len(),
        field.prefix
    );
    Ok(vocabulary.len())
}

/// Remaps one ordinal column through its code-to-label lookup. Codes outside
/// the lookup domain, non-numeric cells, and nulls all become null.
pub fn remap_ordinal(frame: &mut DataFrame, field: &OrdinalField) -> Result<()> {
    let col = frame.column_index(&field.column)?;
    frame.map_column(col, |cell| {
        cell.and_then(|value| value.as_ordinal_code())
            .and_then(|code| field.labels.get(&code))
            .map(|label| Value::Text(label.clone()))
    });
    info!(
        "Remapped ordinal column '{}' through {} label(s)",
        field.column,
        field.labels.len()
    );
    Ok(())
}
