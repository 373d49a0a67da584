use crate::config::ReconConfig;
use crate::error::ReconError;
use crate::table::{Key, TableModel};

/// Bring a table to canonical form: identifiers on the row axis, both axes
/// sorted, first header set to `identifier_label`.
///
/// A table whose first header is one of `identifier_aliases` is already
/// row-major; any other table is transposed. Normalizing a normalized table
/// returns it unchanged.
pub fn normalize(table: &TableModel, config: &ReconConfig) -> Result<TableModel, ReconError> {
    let fail = |reason: String| ReconError::Normalization {
        label: table.label.clone(),
        reason,
    };

    if table.is_empty() {
        return Err(fail(format!(
            "table has {} row(s) and {} column(s)",
            table.rows().len(),
            table.columns().len()
        )));
    }

    let row_major = config.is_identifier_alias(&table.index_name);

    let mut canonical = if row_major {
        let mut copy = table.clone();
        copy.index_name = config.identifier_label.clone();
        copy
    } else {
        // The identifier column must not hide among the data columns.
        if let Some(column) = table
            .columns()
            .iter()
            .find(|c| matches!(c, Key::Text(s) if config.is_identifier_alias(s)))
        {
            return Err(fail(format!(
                "identifier header '{column}' is not in the first column"
            )));
        }
        log::debug!(
            "block '{}': first header '{}' is not an identifier alias, transposing",
            table.label,
            table.index_name
        );
        table.transposed(&config.identifier_label)
    };

    canonical.sort_axes();
    Ok(canonical)
}
