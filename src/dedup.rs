//! Duplicate-respondent detection and removal.
//!
//! Two rows collide when every cell of the identifier key compares equal
//! (null equals null). The first occurrence in row order survives. Before
//! anything is removed, every row involved in a duplicate group, the kept
//! first occurrence included, is rendered for audit.

use std::collections::BTreeMap;

use anyhow::Result;
use log::info;

use crate::frame::{DataFrame, Row};
use crate::render;
use crate::value::ComparableValue;

/// Removes duplicate rows on the identifier key, keeping the first
/// occurrence. Returns the number of rows removed.
pub fn deduplicate(frame: &mut DataFrame, identifiers: &[String]) -> Result<usize> {
    let indices = identifiers
        .iter()
        .map(|name| frame.column_index(name))
        .collect::<Result<Vec<_>, _>>()?;
    let key = |row: &Row| -> Vec<ComparableValue> {
        indices
            .iter()
            .map(|&idx| ComparableValue(row[idx].clone()))
            .collect()
    };

    let mut group_sizes: BTreeMap<Vec<ComparableValue>, usize> = BTreeMap::new();
    for row in frame.rows() {
        *group_sizes.entry(key(row)).or_insert(0) += 1;
    }

    let involved: Vec<Vec<String>> = frame
        .rows()
        .iter()
        .filter(|row| group_sizes[&key(row)] > 1)
        .map(|row| frame.row_display(row))
        .collect();
    info!(
        "Number of duplicates based on {:?}: {}",
        identifiers,
        involved.len()
    );
    if !involved.is_empty() {
        info!("Duplicate rows:");
        render::print_table(frame.columns(), &involved);
    }

    let before = frame.row_count();
    let mut seen: BTreeMap<Vec<ComparableValue>, ()> = BTreeMap::new();
    frame.retain_rows(|_, row| seen.insert(key(row), ()).is_none());
    let removed = before - frame.row_count();
    info!(
        "Number of data points: {} | After removing duplicates",
        frame.row_count()
    );
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn frame_with_ages(ages: &[Option<i64>]) -> DataFrame {
        let mut frame = DataFrame::new(vec!["Timestamp".to_string(), "Q1_age".to_string()]);
        for (idx, age) in ages.iter().enumerate() {
            frame.push_row(vec![
                Some(Value::Text(format!("t{}", idx % 5))),
                age.map(Value::Integer),
            ]);
        }
        frame
    }

    #[test]
    fn keeps_first_occurrence_of_each_duplicate_group() {
        // Rows 0 and 5 share the key (t0, 30); the survivor is row 0.
        let mut frame = frame_with_ages(&[
            Some(30),
            Some(31),
            Some(32),
            Some(33),
            Some(34),
            Some(30),
            Some(35),
            Some(36),
            Some(37),
            Some(38),
        ]);
        let removed = deduplicate(
            &mut frame,
            &["Timestamp".to_string(), "Q1_age".to_string()],
        )
        .expect("dedup");
        assert_eq!(removed, 1);
        assert_eq!(frame.row_count(), 9);
        assert_eq!(frame.cell(0, 1), Some(&Value::Integer(30)));
    }

    #[test]
    fn null_keys_compare_equal() {
        let mut frame = frame_with_ages(&[None, None]);
        // Same timestamp prefix, both ages null: one collides with the other.
        let removed = deduplicate(
            &mut frame,
            &["Q1_age".to_string()],
        )
        .expect("dedup");
        assert_eq!(removed, 1);
        assert_eq!(frame.row_count(), 1);
    }

    #[test]
    fn dedup_is_idempotent() {
        let key = vec!["Timestamp".to_string(), "Q1_age".to_string()];
        // Rows 0 and 5 collide (same t0 timestamp, same age).
        let mut frame = frame_with_ages(&[
            Some(30),
            Some(31),
            Some(32),
            Some(33),
            Some(34),
            Some(30),
        ]);
        let removed_first = deduplicate(&mut frame, &key).expect("first pass");
        assert_eq!(removed_first, 1);
        let after_first: Vec<_> = frame.rows().to_vec();
        let removed = deduplicate(&mut frame, &key).expect("second pass");
        assert_eq!(removed, 0);
        assert_eq!(frame.rows(), after_first.as_slice());
    }
}
