//! Concrete document readers for the reconciliation engine, plus the xlsx
//! report export.
//!
//! Each reader implements one of the engine's reader traits and turns a
//! file on disk into plain slides or cell grids.

pub mod csv;
pub mod deck;
pub mod export;
pub mod xlsx;

use std::path::Path;

use deckcheck_recon::{ReconError, SpreadsheetReader};

pub use crate::csv::CsvSheet;
pub use crate::deck::JsonDeck;
pub use crate::xlsx::ExcelWorkbook;

/// Open a spreadsheet by extension: `.csv`/`.tsv` as a single sheet,
/// anything else through calamine.
pub fn open_spreadsheet(path: &Path) -> Result<Box<dyn SpreadsheetReader>, ReconError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("csv") | Some("tsv") => Ok(Box::new(CsvSheet::open(path)?)),
        _ => Ok(Box::new(ExcelWorkbook::open(path)?)),
    }
}

pub(crate) fn read_error(path: &Path, message: impl ToString) -> ReconError {
    ReconError::Read {
        path: path.display().to_string(),
        message: message.to_string(),
    }
}
