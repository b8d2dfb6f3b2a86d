use log::debug;

use crate::{
    table::{ColumnData, Table},
    transform::string_ops::trim_to_missing,
};

/// Strips surrounding whitespace from each listed field that exists, turning
/// blank cells into missing ones. Numeric columns are rendered to text first.
/// Fields not present in the table are skipped.
pub fn trim_text_fields(mut table: Table, fields: &[String]) -> Table {
    for field in fields {
        let updated = table.update_column(field, |data| {
            let before = data.missing_count();
            let trimmed = ColumnData::Text(
                data.into_text()
                    .into_iter()
                    .map(trim_to_missing)
                    .collect(),
            );
            debug!(
                "Trimmed field '{field}' ({} blank value(s) now missing)",
                trimmed.missing_count() - before
            );
            trimmed
        });
        if !updated {
            debug!("Skipping trim for absent field '{field}'");
        }
    }
    table
}
