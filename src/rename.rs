//! Positional column renaming with a provenance workbook.
//!
//! Survey exports carry full question text as headers; analysis wants short
//! stable names. Renaming is positional: the i-th supplied name replaces
//! whatever header sits at position i, so the supplied list must match the
//! source column order exactly. The old↔new pairing is written to a
//! `_columns_book.xlsx` workbook for audit and never read back.

use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::frame::DataFrame;

/// Ordered (new name, original name) pairs, one per column at rename time.
/// Immutable once built.
#[derive(Debug, Clone)]
pub struct RenameMap {
    pairs: Vec<(String, String)>,
}

impl RenameMap {
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Replaces the header positionally and returns the provenance mapping.
/// Fails without touching the frame when the supplied list length does not
/// match the column count.
pub fn rename_columns(frame: &mut DataFrame, new_names: &[String]) -> Result<RenameMap> {
    let originals = frame.columns().to_vec();
    frame.set_columns(new_names.to_vec())?;
    let pairs = new_names
        .iter()
        .cloned()
        .zip(originals)
        .collect::<Vec<_>>();
    info!(
        "Renamed {} column(s) to analysis-friendly names",
        pairs.len()
    );
    Ok(RenameMap { pairs })
}

const MIN_COLUMN_WIDTH: usize = 12;

/// Writes the two-sheet provenance workbook: an empty `basic` placeholder
/// sheet and `Column_Info` listing the new/original name pairs with
/// content-fitted column widths.
pub fn write_columns_book(map: &RenameMap, path: &Path) -> Result<()> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    workbook.add_worksheet().set_name("basic")?;

    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Column_Info")?;
    let headers = ["Column Names", "Original Names"];
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }
    for (idx, (new_name, original)) in map.pairs().iter().enumerate() {
        let row = (idx + 1) as u32;
        worksheet.write_string(row, 0, new_name)?;
        worksheet.write_string(row, 1, original)?;
    }

    for (col, header) in headers.iter().enumerate() {
        let longest = map
            .pairs()
            .iter()
            .map(|(new_name, original)| if col == 0 { new_name.len() } else { original.len() })
            .chain(std::iter::once(header.len()))
            .max()
            .unwrap_or(MIN_COLUMN_WIDTH);
        worksheet.set_column_width(col as u16, longest.max(MIN_COLUMN_WIDTH) as f64)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("Writing columns book {path:?}"))?;
    info!("Column information has been saved: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PrepError;
    use crate::value::Value;

    fn frame() -> DataFrame {
        let mut frame = DataFrame::new(vec![
            "1. How old are you?".to_string(),
            "2. Where do you live?".to_string(),
        ]);
        frame.push_row(vec![
            Some(Value::Integer(34)),
            Some(Value::Text("Banjul".into())),
        ]);
        frame
    }

    #[test]
    fn rename_is_positional_and_keeps_original_order() {
        let mut frame = frame();
        let map = rename_columns(
            &mut frame,
            &["Q1_age".to_string(), "Q3_region".to_string()],
        )
        .expect("rename");
        assert_eq!(frame.columns(), ["Q1_age", "Q3_region"]);
        assert_eq!(
            map.pairs()[1],
            (
                "Q3_region".to_string(),
                "2. Where do you live?".to_string()
            )
        );
    }

    #[test]
    fn length_mismatch_leaves_frame_unchanged() {
        let mut frame = frame();
        let err = rename_columns(&mut frame, &["only_one".to_string()]).unwrap_err();
        let err = err.downcast::<PrepError>().expect("typed error");
        assert!(matches!(
            err,
            PrepError::RenameLengthMismatch {
                expected: 2,
                supplied: 1
            }
        ));
        assert_eq!(frame.columns()[0], "1. How old are you?");
    }

    #[test]
    fn columns_book_lists_one_row_per_column() {
        use calamine::Reader;

        let mut frame = frame();
        let map = rename_columns(
            &mut frame,
            &["Q1_age".to_string(), "Q3_region".to_string()],
        )
        .expect("rename");
        let dir = tempfile::tempdir().expect("temp dir");
        let book = dir.path().join("survey_columns_book.xlsx");
        write_columns_book(&map, &book).expect("write book");

        let mut workbook = calamine::open_workbook_auto(&book).expect("open book");
        let names = workbook.sheet_names().to_vec();
        assert_eq!(names, ["basic", "Column_Info"]);
        let range = workbook
            .worksheet_range("Column_Info")
            .expect("column info sheet");
        // Header row plus one row per renamed column.
        assert_eq!(range.height(), 3);
        assert_eq!(
            range.get_value((1, 1)).map(ToString::to_string),
            Some("1. How old are you?".to_string())
        );
    }
}
