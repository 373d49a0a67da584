//! Excel-family workbooks (xlsx, xls, xlsb, ods) read through calamine.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};

use deckcheck_recon::{ReconError, Sheet, SpreadsheetReader, Value};

use crate::read_error;

pub struct ExcelWorkbook {
    path: PathBuf,
    workbook: Sheets<BufReader<File>>,
}

impl ExcelWorkbook {
    pub fn open(path: &Path) -> Result<Self, ReconError> {
        let workbook = open_workbook_auto(path).map_err(|e| read_error(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            workbook,
        })
    }
}

impl SpreadsheetReader for ExcelWorkbook {
    fn sheets(&mut self) -> Result<Vec<Sheet>, ReconError> {
        let names: Vec<String> = self.workbook.sheet_names().to_vec();
        if names.is_empty() {
            return Err(read_error(&self.path, "workbook contains no sheets"));
        }

        let mut sheets = Vec::with_capacity(names.len());
        for name in names {
            let range = self
                .workbook
                .worksheet_range(&name)
                .map_err(|e| read_error(&self.path, format!("sheet '{name}': {e}")))?;
            let rows = range_to_rows(&range);
            log::debug!("{}: sheet '{}' has {} row(s)", self.path.display(), name, rows.len());
            sheets.push(Sheet { name, rows });
        }
        Ok(sheets)
    }
}

/// Dense rows anchored at A1. calamine ranges start at the first used cell,
/// so leading rows and columns are padded with nulls.
fn range_to_rows(range: &Range<Data>) -> Vec<Vec<Value>> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };
    let lead = vec![Value::Null; start_col as usize];

    let mut rows: Vec<Vec<Value>> = (0..start_row).map(|_| Vec::new()).collect();
    for row in range.rows() {
        let mut out = lead.clone();
        out.extend(row.iter().map(cell_value));
        rows.push(out);
    }
    rows
}

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::String(s) if s.trim().is_empty() => Value::Null,
        Data::String(s) => Value::text(s.as_str()),
        Data::Float(n) => Value::number(*n),
        Data::Int(n) => Value::number(*n as f64),
        Data::Bool(b) => Value::text(if *b { "TRUE" } else { "FALSE" }),
        Data::Error(e) => Value::text(format!("#{e:?}")),
        Data::DateTime(dt) => Value::number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::text(s.as_str()),
    }
}
