//! Typed errors for configuration and data-shape failures.
//!
//! I/O and parser failures stay as `anyhow` errors with context; this enum
//! covers the cases where the caller's configuration names something the
//! table cannot satisfy, so the offending value appears in the message.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrepError {
    #[error("unsupported file format '{0}': use 'xlsx', 'xls' or 'csv'")]
    UnsupportedFormat(String),
    #[error("rename list has {supplied} name(s) but the table has {expected} column(s)")]
    RenameLengthMismatch { expected: usize, supplied: usize },
    #[error("column '{0}' not found in the table")]
    UnknownColumn(String),
    #[error("worksheet in {0} has no header row")]
    EmptySheet(String),
}
