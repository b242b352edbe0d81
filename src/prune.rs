//! Removal of columns the analysis does not need.
//!
//! Typically the raw multi-select text columns whose content has already
//! been expanded, and free-text columns extracted elsewhere. Names must
//! match the live header exactly; an unknown name is a configuration error
//! and nothing is removed.

use anyhow::Result;
use log::info;

use crate::frame::DataFrame;

pub fn prune_columns(frame: &mut DataFrame, names: &[String]) -> Result<()> {
    frame.drop_columns(names)?;
    info!(
        "Number of columns: {} | After removing the columns that are not needed for the analysis",
        frame.column_count()
    );
    Ok(())
}
