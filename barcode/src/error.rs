use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BarcodeError {
    #[error("Unable to open barcode file {path:?}: {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("Unable to read barcode data: {0}")]
    Read(#[from] io::Error),

    /// A row with fewer than four columns or a field that is not a number.
    /// `line` is 1-based.
    #[error("Malformed barcode row at line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}
