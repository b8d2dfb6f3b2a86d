use log::{debug, info};

use crate::{config::NumericField, table::Table};

/// Removes every row holding a negative value in any of the numeric fields
/// present. Cells without a numeric reading never count as negative.
pub fn remove_invalid_rows(table: Table, numeric_fields: &[NumericField]) -> Table {
    let keep = {
        let checked = numeric_fields
            .iter()
            .filter_map(|field| table.column(&field.name))
            .collect::<Vec<_>>();
        (!checked.is_empty()).then(|| {
            (0..table.row_count())
                .map(|row| {
                    checked
                        .iter()
                        .all(|column| column.data.numeric(row).is_none_or(|value| value >= 0.0))
                })
                .collect::<Vec<_>>()
        })
    };
    let Some(keep) = keep else {
        debug!("No numeric fields present; skipping invalid row filter");
        return table;
    };
    let removed = keep.iter().filter(|k| !**k).count();
    if removed == 0 {
        return table;
    }
    info!("Removed {removed} row(s) with negative numeric values");
    table.retain_rows(&keep)
}
