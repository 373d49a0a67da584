//! `deckcheck-recon`: presentation-vs-spreadsheet reconciliation engine.
//!
//! Pure engine crate: receives already-read slides and cell grids, returns
//! per-block outcomes and cell-level discrepancy records.
//! No CLI or file-format dependencies.

pub mod blocks;
pub mod config;
pub mod differ;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod report;
pub mod slides;
pub mod source;
pub mod table;

pub use config::{ReconConfig, SheetLayout};
pub use engine::run;
pub use error::{ReconError, SourceSide};
pub use model::{DiscrepancyRecord, ReconResult, ReportValue};
pub use source::{PresentationReader, Sheet, Slide, SpreadsheetReader};
pub use table::{Key, TableModel, Value};
