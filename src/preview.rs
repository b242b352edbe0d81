use anyhow::{Context, Result};
use log::info;

use crate::cli::PreviewArgs;
use crate::error::PrepError;
use crate::io::{self, FileFormat};
use crate::render;

pub fn execute(args: &PreviewArgs) -> Result<()> {
    let format: FileFormat = match &args.format {
        Some(label) => label.parse()?,
        None => args
            .input
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .parse()
            .map_err(|_: PrepError| {
                PrepError::UnsupportedFormat(args.input.display().to_string())
            })?,
    };
    let stem = args.input.with_extension("");
    let stem = stem
        .to_str()
        .with_context(|| format!("Input path {:?} is not valid UTF-8", args.input))?;
    let frame = io::load(stem, format)?;

    let rows: Vec<Vec<String>> = frame
        .rows()
        .iter()
        .take(args.rows)
        .map(|row| frame.row_display(row))
        .collect();
    render::print_table(frame.columns(), &rows);
    info!("Displayed {} row(s) from {:?}", rows.len(), args.input);
    Ok(())
}
