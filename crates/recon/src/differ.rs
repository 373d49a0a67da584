use crate::model::{DiscrepancyRecord, ReportValue};
use crate::table::{TableModel, Value};

/// Cell-level diff of two normalized tables.
///
/// Driven by the source: every (row, column) of `source` yields either nothing
/// (equal) or exactly one record. Rows and columns that exist only in
/// `reference` are not reported. Blank cells (null or whitespace text)
/// are equal to each other; numbers compare exactly.
pub fn diff_tables(source: &TableModel, reference: &TableModel) -> Vec<DiscrepancyRecord> {
    let mut records = Vec::new();

    for row in source.rows() {
        let row_in_reference = reference.has_row(row);

        for column in source.columns() {
            let source_value = source
                .get(row, column)
                .cloned()
                .map_or(ReportValue::NotFound, ReportValue::Value);

            let reference_value = if !row_in_reference {
                ReportValue::IdentifierNotFound
            } else if !reference.has_column(column) {
                ReportValue::NotFound
            } else {
                let value = reference.get(row, column).cloned().unwrap_or_default();
                // Missing cells read as null; blank == blank.
                let source_cell = source_value.value().unwrap_or(&Value::Null);
                if source_cell == &value || (source_cell.is_blank() && value.is_blank()) {
                    continue;
                }
                ReportValue::Value(value)
            };

            records.push(DiscrepancyRecord::new(
                row.clone(),
                column.clone(),
                source_value,
                reference_value,
                &source.label,
                &reference.label,
            ));
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Key;

    fn brands(label: &str, b2_q2: f64) -> TableModel {
        let mut t = TableModel::new(label, "Marca");
        t.set(Key::from("BrandA"), Key::from("Q1"), Value::Number(10.0));
        t.set(Key::from("BrandA"), Key::from("Q2"), Value::Number(20.0));
        t.set(Key::from("BrandB"), Key::from("Q1"), Value::Number(30.0));
        t.set(Key::from("BrandB"), Key::from("Q2"), Value::Number(b2_q2));
        t
    }

    #[test]
    fn single_cell_mismatch() {
        let source = brands("Indicador Ventas", 40.0);
        let reference = brands("Ventas", 41.0);
        let records = diff_tables(&source, &reference);
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.identifier(), &Key::from("BrandB"));
        assert_eq!(r.category(), &Key::from("Q2"));
        assert_eq!(r.source_value(), &ReportValue::Value(Value::Number(40.0)));
        assert_eq!(r.reference_value(), &ReportValue::Value(Value::Number(41.0)));
        assert_eq!(r.source_block(), "Indicador Ventas");
        assert_eq!(r.reference_block(), "Ventas");
    }

    #[test]
    fn identical_tables_have_no_records() {
        let source = brands("a", 40.0);
        let reference = brands("b", 40.0);
        assert!(diff_tables(&source, &reference).is_empty());
    }

    #[test]
    fn missing_identifier_reports_every_column() {
        let mut source = TableModel::new("s", "Marca");
        source.set(Key::from("BrandC"), Key::from("Q1"), Value::Number(5.0));
        let reference = brands("r", 40.0);
        let records = diff_tables(&source, &reference);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].identifier(), &Key::from("BrandC"));
        assert_eq!(records[0].reference_value(), &ReportValue::IdentifierNotFound);
    }

    #[test]
    fn missing_column_is_not_found() {
        let mut source = brands("s", 40.0);
        source.set(Key::from("BrandA"), Key::from("Q3"), Value::Number(1.0));
        let reference = brands("r", 40.0);
        let records = diff_tables(&source, &reference);
        // BrandA/Q3 has a value, BrandB/Q3 is an unset cell in the source.
        assert_eq!(records.len(), 2);
        assert!(records
            .iter()
            .all(|r| r.category() == &Key::from("Q3") && r.reference_value() == &ReportValue::NotFound));
        let b = records.iter().find(|r| r.identifier() == &Key::from("BrandB")).unwrap();
        assert_eq!(b.source_value(), &ReportValue::NotFound);
    }

    #[test]
    fn reference_only_columns_are_ignored() {
        let source = brands("s", 40.0);
        let mut reference = brands("r", 40.0);
        reference.set(Key::from("BrandA"), Key::from("Q4"), Value::Number(7.0));
        reference.set(Key::from("BrandZ"), Key::from("Q1"), Value::Number(7.0));
        assert!(diff_tables(&source, &reference).is_empty());
    }

    #[test]
    fn nulls_are_equal() {
        let mut source = TableModel::new("s", "Marca");
        source.set(Key::from("A"), Key::from("Q1"), Value::Null);
        let mut reference = TableModel::new("r", "Marca");
        reference.insert_row(Key::from("A"));
        reference.insert_column(Key::from("Q1"));
        assert!(diff_tables(&source, &reference).is_empty());
    }

    #[test]
    fn whitespace_text_equals_null() {
        let mut source = TableModel::new("s", "Marca");
        source.set(Key::from("A"), Key::from("Q1"), Value::Null);
        let mut reference = TableModel::new("r", "Marca");
        reference.set(Key::from("A"), Key::from("Q1"), Value::text(" \t"));
        assert!(diff_tables(&source, &reference).is_empty());
        assert!(diff_tables(&reference, &source).is_empty());
    }

    #[test]
    fn null_against_value_is_a_discrepancy() {
        let mut source = TableModel::new("s", "Marca");
        source.set(Key::from("A"), Key::from("Q1"), Value::Null);
        let mut reference = TableModel::new("r", "Marca");
        reference.set(Key::from("A"), Key::from("Q1"), Value::Number(0.0));
        let records = diff_tables(&source, &reference);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source_value(), &ReportValue::Value(Value::Null));
    }

    #[test]
    fn exact_numeric_equality() {
        let mut source = TableModel::new("s", "Marca");
        source.set(Key::from("A"), Key::from("Q1"), Value::Number(0.1 + 0.2));
        let mut reference = TableModel::new("r", "Marca");
        reference.set(Key::from("A"), Key::from("Q1"), Value::Number(0.3));
        assert_eq!(diff_tables(&source, &reference).len(), 1);
    }
}
