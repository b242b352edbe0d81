//! Table loading and saving for spreadsheet and delimited sources.
//!
//! Paths in the pipeline configuration are extension-less stems; the
//! configured [`FileFormat`] supplies the extension. Spreadsheets are read
//! with `calamine` (first worksheet, header row first) and written with
//! `rust_xlsxwriter`; CSV goes through the `csv` crate with every cell
//! typed by [`crate::value::parse_cell`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use calamine::{Data, Reader, open_workbook_auto};
use csv::QuoteStyle;
use log::debug;
use serde::Deserialize;

use crate::error::PrepError;
use crate::frame::DataFrame;
use crate::value::{Value, parse_cell};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Xlsx,
    Xls,
    Csv,
}

impl FileFormat {
    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Xlsx => "xlsx",
            FileFormat::Xls => "xls",
            FileFormat::Csv => "csv",
        }
    }

    pub fn is_spreadsheet(self) -> bool {
        matches!(self, FileFormat::Xlsx | FileFormat::Xls)
    }
}

impl FromStr for FileFormat {
    type Err = PrepError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "xlsx" => Ok(FileFormat::Xlsx),
            "xls" => Ok(FileFormat::Xls),
            "csv" => Ok(FileFormat::Csv),
            other => Err(PrepError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Joins an extension-less stem with the format's extension.
pub fn source_path(stem: &str, format: FileFormat) -> PathBuf {
    PathBuf::from(format!("{stem}.{}", format.extension()))
}

/// Derived output path for the cleaned dataset. The configured stem is
/// never modified; callers pass the derived path explicitly.
pub fn cleaned_path(stem: &str, format: FileFormat) -> PathBuf {
    PathBuf::from(format!("{stem}_cleaned.{}", format.extension()))
}

/// Path of the provenance workbook written alongside the source.
pub fn columns_book_path(stem: &str) -> PathBuf {
    PathBuf::from(format!("{stem}_columns_book.xlsx"))
}

pub fn load(stem: &str, format: FileFormat) -> Result<DataFrame> {
    let path = source_path(stem, format);
    debug!("Loading {path:?} as {format}");
    if format.is_spreadsheet() {
        load_spreadsheet(&path)
    } else {
        load_csv(&path)
    }
}

pub fn save(frame: &DataFrame, path: &Path, format: FileFormat) -> Result<()> {
    if format.is_spreadsheet() {
        // rust_xlsxwriter only emits the modern workbook format; an `.xls`
        // target receives modern content at the legacy path.
        save_spreadsheet(frame, path)
    } else {
        save_csv(frame, path)
    }
}

fn load_csv(path: &Path) -> Result<DataFrame> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_path(path)
        .with_context(|| format!("Opening input file {path:?}"))?;
    let headers = reader
        .headers()
        .with_context(|| format!("Reading header row of {path:?}"))?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    let mut frame = DataFrame::new(headers);
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Reading row {} of {path:?}", idx + 2))?;
        frame.push_row(record.iter().map(parse_cell).collect());
    }
    Ok(frame)
}

fn load_spreadsheet(path: &Path) -> Result<DataFrame> {
    let mut workbook =
        open_workbook_auto(path).with_context(|| format!("Opening workbook {path:?}"))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| PrepError::EmptySheet(path.display().to_string()))?
        .with_context(|| format!("Reading first worksheet of {path:?}"))?;
    let mut rows = range.rows();
    let headers = rows
        .next()
        .ok_or_else(|| PrepError::EmptySheet(path.display().to_string()))?
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect::<Vec<_>>();
    let mut frame = DataFrame::new(headers);
    for row in rows {
        frame.push_row(row.iter().map(convert_sheet_cell).collect());
    }
    Ok(frame)
}

fn convert_sheet_cell(cell: &Data) -> Option<Value> {
    match cell {
        Data::Empty => None,
        Data::String(s) => {
            if s.is_empty() {
                None
            } else {
                Some(Value::Text(s.clone()))
            }
        }
        Data::Int(i) => Some(Value::Integer(*i)),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                Some(Value::Integer(*f as i64))
            } else {
                Some(Value::Float(*f))
            }
        }
        Data::Bool(b) => Some(Value::Integer(i64::from(*b))),
        Data::DateTime(dt) => dt.as_datetime().map(Value::DateTime),
        Data::DateTimeIso(s) | Data::DurationIso(s) => parse_cell(s),
        Data::Error(_) => None,
    }
}

fn save_csv(frame: &DataFrame, path: &Path) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .from_path(path)
        .with_context(|| format!("Creating output file {path:?}"))?;
    writer
        .write_record(frame.columns())
        .context("Writing output headers")?;
    for row in frame.rows() {
        writer
            .write_record(frame.row_display(row))
            .context("Writing output row")?;
    }
    writer.flush().context("Flushing output")?;
    Ok(())
}

fn save_spreadsheet(frame: &DataFrame, path: &Path) -> Result<()> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (col, name) in frame.columns().iter().enumerate() {
        worksheet.write_string(0, col as u16, name)?;
    }
    for (idx, row) in frame.rows().iter().enumerate() {
        let sheet_row = (idx + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            let sheet_col = col as u16;
            match cell {
                None => {}
                Some(Value::Integer(i)) => {
                    worksheet.write_number(sheet_row, sheet_col, *i as f64)?;
                }
                Some(Value::Float(f)) => {
                    worksheet.write_number(sheet_row, sheet_col, *f)?;
                }
                Some(other) => {
                    worksheet.write_string(sheet_row, sheet_col, other.as_display())?;
                }
            }
        }
    }
    workbook
        .save(path)
        .with_context(|| format!("Writing workbook {path:?}"))?;
    Ok(())
}
