//! Spreadsheet block extraction.
//!
//! In `marker_blocks` layout a sheet is scanned top to bottom by a small state
//! machine:
//!
//! | state        | marker row            | blank row     | data row | end of sheet |
//! |--------------|-----------------------|---------------|----------|--------------|
//! | Idle         | open block            | -             | ignored  | -            |
//! | Accumulating | close, open new block | close → Idle  | append   | close        |
//!
//! A closed block uses its first accumulated row as the header.

use crate::config::{ReconConfig, SheetLayout};
use crate::error::{ReconError, SourceSide};
use crate::model::BlockDefect;
use crate::source::{has_marker, Extraction, Sheet};
use crate::table::{TableModel, Value};

// ---------------------------------------------------------------------------
// Row classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum RowEvent<'a> {
    /// Marker row; carries the cleaned marker text.
    Marker(String),
    Blank,
    Data(&'a [Value]),
    EndOfSheet,
}

/// Classify one sheet row.
pub fn classify_row<'a>(row: &'a [Value], marker_prefix: &str) -> RowEvent<'a> {
    if row.iter().all(Value::is_blank) {
        return RowEvent::Blank;
    }
    if let Some(text) = row.first().and_then(Value::as_text) {
        let cleaned = strip_control(text);
        if has_marker(&cleaned, marker_prefix) {
            return RowEvent::Marker(cleaned);
        }
    }
    RowEvent::Data(row)
}

/// Drop control characters (stray `\x0b`, `\r`, etc. from exported cells) and trim.
pub fn strip_control(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}

// ---------------------------------------------------------------------------
// Accumulator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default)]
pub enum BlockState {
    #[default]
    Idle,
    Accumulating { label: String, rows: Vec<Vec<Value>> },
}

/// A block closed by the accumulator, not yet turned into a table.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBlock {
    pub label: String,
    pub rows: Vec<Vec<Value>>,
}

#[derive(Debug, Default)]
pub struct BlockAccumulator {
    state: BlockState,
    closed: Vec<RawBlock>,
}

impl BlockAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &BlockState {
        &self.state
    }

    pub fn feed(&mut self, event: RowEvent<'_>) {
        match event {
            RowEvent::Marker(label) => {
                self.close();
                self.state = BlockState::Accumulating {
                    label,
                    rows: Vec::new(),
                };
            }
            RowEvent::Blank | RowEvent::EndOfSheet => self.close(),
            RowEvent::Data(row) => {
                if let BlockState::Accumulating { ref mut rows, .. } = self.state {
                    rows.push(row.to_vec());
                }
            }
        }
    }

    /// Blocks closed so far, in sheet order.
    pub fn finish(mut self) -> Vec<RawBlock> {
        self.close();
        self.closed
    }

    fn close(&mut self) {
        if let BlockState::Accumulating { label, rows } = std::mem::take(&mut self.state) {
            if rows.is_empty() {
                log::debug!("marker '{label}' closed with no rows");
            } else {
                self.closed.push(RawBlock { label, rows });
            }
        }
    }
}

/// Marker-delimited blocks of one sheet.
pub fn split_marker_blocks(rows: &[Vec<Value>], marker_prefix: &str) -> Vec<RawBlock> {
    let mut acc = BlockAccumulator::new();
    for row in rows {
        acc.feed(classify_row(row, marker_prefix));
    }
    acc.feed(RowEvent::EndOfSheet);
    acc.finish()
}

/// The whole sheet as a single block; blank rows are skipped.
pub fn whole_sheet_block(sheet: &Sheet) -> Option<RawBlock> {
    let rows: Vec<Vec<Value>> = sheet
        .rows
        .iter()
        .filter(|row| !row.iter().all(Value::is_blank))
        .cloned()
        .collect();
    if rows.is_empty() {
        return None;
    }
    Some(RawBlock {
        label: sheet.name.clone(),
        rows,
    })
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

pub fn extract_sheets(sheets: &[Sheet], config: &ReconConfig) -> Extraction {
    let mut out = Extraction::default();

    for sheet in sheets {
        let location = format!("sheet {}", sheet.name);
        let raw_blocks = match config.sheet_layout {
            SheetLayout::MarkerBlocks => split_marker_blocks(&sheet.rows, &config.marker_prefix),
            SheetLayout::WholeSheet => whole_sheet_block(sheet).into_iter().collect(),
        };

        for raw in raw_blocks {
            match raw_to_table(&raw) {
                Ok(table) => {
                    log::debug!(
                        "{location}: block '{}' with {} row(s), {} column(s)",
                        table.label,
                        table.rows().len(),
                        table.columns().len()
                    );
                    out.blocks.push(table);
                }
                Err(err) => {
                    log::warn!("{location}: dropping block '{}': {err}", raw.label);
                    out.defects.push(BlockDefect {
                        side: SourceSide::Spreadsheet,
                        location: location.clone(),
                        label: raw.label,
                        reason: err.to_string(),
                    });
                }
            }
        }
    }

    out
}

fn raw_to_table(raw: &RawBlock) -> Result<TableModel, ReconError> {
    let Some((header, data)) = raw.rows.split_first() else {
        return Err(ReconError::MalformedBlock {
            label: raw.label.clone(),
            row: 1,
            expected: 1,
            found: 0,
        });
    };
    TableModel::from_grid(raw.label.clone(), header, data)
}
