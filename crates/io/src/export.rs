//! Discrepancy report as an xlsx workbook.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use deckcheck_recon::model::ReportValue;
use deckcheck_recon::report::REPORT_HEADERS;
use deckcheck_recon::{DiscrepancyRecord, Key, ReconError, Value};

pub const REPORT_SHEET: &str = "Discrepancies";

/// Write `records` to `path` as a single "Discrepancies" worksheet with the
/// report headers. Numeric cells and keys are written as numbers.
pub fn write_report_xlsx(records: &[DiscrepancyRecord], path: &Path) -> Result<(), ReconError> {
    let mut workbook = Workbook::new();
    fill_sheet(workbook.add_worksheet(), records).map_err(export_error)?;
    workbook.save(path).map_err(export_error)?;
    log::debug!("wrote {} record(s) to {}", records.len(), path.display());
    Ok(())
}

fn fill_sheet(sheet: &mut Worksheet, records: &[DiscrepancyRecord]) -> Result<(), XlsxError> {
    sheet.set_name(REPORT_SHEET)?;

    let bold = Format::new().set_bold();
    for (col, header) in REPORT_HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &bold)?;
    }
    sheet.set_freeze_panes(1, 0)?;

    for (i, r) in records.iter().enumerate() {
        let row = i as u32 + 1;
        write_key(sheet, row, 0, r.identifier())?;
        write_key(sheet, row, 1, r.category())?;
        write_report_value(sheet, row, 2, r.source_value())?;
        write_report_value(sheet, row, 3, r.reference_value())?;
        sheet.write_string(row, 4, r.source_block())?;
        sheet.write_string(row, 5, r.reference_block())?;
    }

    sheet.autofit();
    Ok(())
}

fn write_key(sheet: &mut Worksheet, row: u32, col: u16, key: &Key) -> Result<(), XlsxError> {
    write_value(sheet, row, col, &key.to_value())
}

fn write_report_value(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &ReportValue,
) -> Result<(), XlsxError> {
    match value {
        ReportValue::Value(v) => write_value(sheet, row, col, v),
        sentinel => sheet.write_string(row, col, sentinel.to_string()).map(|_| ()),
    }
}

fn write_value(sheet: &mut Worksheet, row: u32, col: u16, value: &Value) -> Result<(), XlsxError> {
    match value {
        Value::Null => {}
        Value::Number(n) => {
            sheet.write_number(row, col, *n)?;
        }
        Value::Text(s) => {
            sheet.write_string(row, col, s)?;
        }
    }
    Ok(())
}

fn export_error(err: XlsxError) -> ReconError {
    ReconError::Io(format!("xlsx export failed: {err}"))
}
