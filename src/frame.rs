//! In-memory table of survey responses.
//!
//! A [`DataFrame`] is an ordered header plus one cell row per respondent.
//! Invariant: every row holds exactly `columns.len()` cells. The loader pads
//! or truncates at construction and every mutating operation preserves it,
//! so the pipeline stages never see a ragged row.

use crate::error::PrepError;
use crate::value::Value;

pub type Row = Vec<Option<Value>>;

#[derive(Debug, Clone, Default)]
pub struct DataFrame {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl DataFrame {
    pub fn new(columns: Vec<String>) -> Self {
        DataFrame {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Appends a row, padding or truncating to the current column count.
    pub fn push_row(&mut self, mut row: Row) {
        row.resize(self.columns.len(), None);
        self.rows.push(row);
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(col)).and_then(|c| c.as_ref())
    }

    pub fn column_index(&self, name: &str) -> Result<usize, PrepError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| PrepError::UnknownColumn(name.to_string()))
    }

    /// Replaces the header positionally. The rows are untouched, so the
    /// caller must supply exactly one name per existing column.
    pub fn set_columns(&mut self, names: Vec<String>) -> Result<(), PrepError> {
        if names.len() != self.columns.len() {
            return Err(PrepError::RenameLengthMismatch {
                expected: self.columns.len(),
                supplied: names.len(),
            });
        }
        self.columns = names;
        Ok(())
    }

    /// Appends a derived column with one cell per existing row.
    pub fn push_column(&mut self, name: String, cells: Vec<Option<Value>>) {
        debug_assert_eq!(cells.len(), self.rows.len());
        self.columns.push(name);
        for (row, cell) in self.rows.iter_mut().zip(cells) {
            row.push(cell);
        }
    }

    /// Removes the named columns from the header and every row. All names
    /// are resolved before anything is removed, so an unknown name leaves
    /// the frame unchanged.
    pub fn drop_columns(&mut self, names: &[String]) -> Result<(), PrepError> {
        let indices = names
            .iter()
            .map(|name| self.column_index(name))
            .collect::<Result<Vec<_>, _>>()?;
        let mut keep = vec![true; self.columns.len()];
        for idx in indices {
            keep[idx] = false;
        }
        retain_by_mask(&mut self.columns, &keep);
        for row in &mut self.rows {
            retain_by_mask(row, &keep);
        }
        Ok(())
    }

    /// Keeps only the rows whose index passes the predicate, preserving
    /// order.
    pub fn retain_rows<F>(&mut self, mut predicate: F)
    where
        F: FnMut(usize, &Row) -> bool,
    {
        let mut idx = 0;
        self.rows.retain(|row| {
            let keep = predicate(idx, row);
            idx += 1;
            keep
        });
    }

    /// Applies a cell transform over one column.
    pub fn map_column<F>(&mut self, col: usize, mut transform: F)
    where
        F: FnMut(Option<Value>) -> Option<Value>,
    {
        for row in &mut self.rows {
            let cell = row[col].take();
            row[col] = transform(cell);
        }
    }

    /// Count of null cells in one column.
    pub fn null_count(&self, col: usize) -> usize {
        self.rows.iter().filter(|row| row[col].is_none()).count()
    }

    /// Renders one row as display strings, for audit output.
    pub fn row_display(&self, row: &Row) -> Vec<String> {
        row.iter()
            .map(|cell| cell.as_ref().map(Value::as_display).unwrap_or_default())
            .collect()
    }
}

fn retain_by_mask<T>(items: &mut Vec<T>, keep: &[bool]) {
    let mut idx = 0;
    items.retain(|_| {
        let flag = keep[idx];
        idx += 1;
        flag
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        let mut frame = DataFrame::new(vec!["a".into(), "b".into(), "c".into()]);
        frame.push_row(vec![
            Some(Value::Integer(1)),
            Some(Value::Text("x".into())),
            None,
        ]);
        frame.push_row(vec![
            Some(Value::Integer(2)),
            None,
            Some(Value::Text("y".into())),
        ]);
        frame
    }

    #[test]
    fn drop_columns_is_atomic_on_unknown_name() {
        let mut frame = sample();
        let err = frame
            .drop_columns(&["b".to_string(), "missing".to_string()])
            .unwrap_err();
        assert!(matches!(err, PrepError::UnknownColumn(name) if name == "missing"));
        assert_eq!(frame.column_count(), 3);
    }

    #[test]
    fn drop_columns_removes_cells_from_every_row() {
        let mut frame = sample();
        frame.drop_columns(&["b".to_string()]).unwrap();
        assert_eq!(frame.columns(), ["a", "c"]);
        assert!(frame.rows().iter().all(|row| row.len() == 2));
        assert_eq!(frame.cell(1, 1), Some(&Value::Text("y".into())));
    }

    #[test]
    fn set_columns_rejects_length_mismatch() {
        let mut frame = sample();
        let err = frame
            .set_columns(vec!["only".into(), "two".into()])
            .unwrap_err();
        assert!(matches!(
            err,
            PrepError::RenameLengthMismatch {
                expected: 3,
                supplied: 2
            }
        ));
        assert_eq!(frame.columns(), ["a", "b", "c"]);
    }

    #[test]
    fn push_column_extends_every_row() {
        let mut frame = sample();
        frame.push_column(
            "d".into(),
            vec![Some(Value::Integer(0)), Some(Value::Integer(1))],
        );
        assert_eq!(frame.column_count(), 4);
        assert_eq!(frame.cell(1, 3), Some(&Value::Integer(1)));
    }

    #[test]
    fn push_row_pads_short_rows() {
        let mut frame = sample();
        frame.push_row(vec![Some(Value::Integer(3))]);
        assert_eq!(frame.rows()[2].len(), 3);
        assert_eq!(frame.cell(2, 2), None);
    }

    #[test]
    fn null_count_per_column() {
        let frame = sample();
        assert_eq!(frame.null_count(0), 0);
        assert_eq!(frame.null_count(1), 1);
        assert_eq!(frame.null_count(2), 1);
    }
}
