//! Missing value resolution for sales tables.
//!
//! The policy has three parts, applied in order:
//!
//! 1. Numeric fields are coerced to numbers. Cells that do not parse become
//!    missing; malformed input is never an error.
//! 2. Rows missing any essential (identifying) field are dropped, since
//!    identity cannot be recovered.
//! 3. Remaining numeric gaps are filled with the column median computed over
//!    the surviving rows, falling back to `0` for a column with no values.
//!    Integral fields are then rounded half-to-even and stored as integers.

use log::{debug, info, warn};
use serde::Serialize;

use crate::{
    config::NumericField,
    data::parse_numeric,
    stats,
    table::{ColumnData, Table},
};

/// Fill applied to one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Imputation {
    pub column: String,
    pub fill_value: f64,
    pub filled: usize,
    /// The column had no usable values, so the zero fallback was used.
    pub used_fallback: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub table: Table,
    pub dropped_rows: usize,
    pub imputations: Vec<Imputation>,
}

pub fn resolve_missing_values(
    table: Table,
    essential_fields: &[String],
    numeric_fields: &[NumericField],
) -> Resolved {
    let mut table = table;
    for field in numeric_fields {
        table.update_column(&field.name, |data| {
            let mut values = coerce_numeric(data);
            if field.integral {
                for value in &mut values {
                    // Out of integer range; left for the median fill.
                    *value = value.filter(|v| fits_integer(*v));
                }
            }
            ColumnData::Float(values)
        });
    }

    let essential = essential_fields
        .iter()
        .filter(|name| table.has_column(name))
        .collect::<Vec<_>>();
    let rows_before = table.row_count();
    if !essential.is_empty() {
        let keep = (0..table.row_count())
            .map(|row| {
                essential.iter().all(|name| {
                    table
                        .column(name)
                        .is_some_and(|column| !column.data.is_missing(row))
                })
            })
            .collect::<Vec<_>>();
        table = table.retain_rows(&keep);
    }
    let dropped_rows = rows_before - table.row_count();
    if dropped_rows > 0 {
        info!("Dropped {dropped_rows} row(s) missing an essential field");
    }

    let mut imputations = Vec::new();
    for field in numeric_fields {
        let mut applied = None;
        table.update_column(&field.name, |data| {
            let (filled, imputation) = fill_with_median(&field.name, coerce_numeric(data));
            applied = Some(imputation);
            if field.integral {
                ColumnData::Integer(
                    filled
                        .into_iter()
                        .map(|value| value.map(|v| v.round_ties_even() as i64))
                        .collect(),
                )
            } else {
                ColumnData::Float(filled)
            }
        });
        imputations.extend(applied);
    }

    Resolved {
        table,
        dropped_rows,
        imputations,
    }
}

/// Numeric view of a column; anything unparseable or non-finite becomes missing.
fn coerce_numeric(data: ColumnData) -> Vec<Option<f64>> {
    match data {
        ColumnData::Text(values) => values
            .into_iter()
            .map(|value| value.as_deref().and_then(parse_numeric))
            .collect(),
        ColumnData::Float(values) => values
            .into_iter()
            .map(|value| value.filter(|v| v.is_finite()))
            .collect(),
        ColumnData::Integer(values) => values
            .into_iter()
            .map(|value| value.map(|v| v as f64))
            .collect(),
    }
}

fn fits_integer(value: f64) -> bool {
    let rounded = value.round_ties_even();
    rounded >= i64::MIN as f64 && rounded < i64::MAX as f64
}

fn fill_with_median(column: &str, values: Vec<Option<f64>>) -> (Vec<Option<f64>>, Imputation) {
    let observed = values.iter().flatten().copied().collect::<Vec<_>>();
    let filled = values.len() - observed.len();
    let (fill_value, used_fallback) = match stats::median(&observed) {
        Some(median) => (median, false),
        None if filled > 0 => {
            warn!("Column '{column}' has no numeric values; filling with 0");
            (0.0, true)
        }
        None => (0.0, false),
    };
    if filled > 0 {
        info!("Filled {filled} missing value(s) in '{column}' with {fill_value}");
    } else {
        debug!("No missing values in '{column}'");
    }
    let values = values
        .into_iter()
        .map(|value| Some(value.unwrap_or(fill_value)))
        .collect();
    (
        values,
        Imputation {
            column: column.to_string(),
            fill_value,
            filled,
            used_fallback,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::{ColumnKind, Value},
        table::Column,
    };

    fn defaults() -> (Vec<String>, Vec<NumericField>) {
        (
            vec!["product_name".to_string(), "order_id".to_string()],
            vec![NumericField::fractional("price"), NumericField::integral("quantity")],
        )
    }

    fn text(values: &[Option<&str>]) -> ColumnData {
        ColumnData::text(values.iter().copied())
    }

    #[test]
    fn fills_price_with_median_of_remaining_rows() {
        let table = Table::new(vec![
            Column::new("product_name", text(&[Some("X"), Some("Y")])),
            Column::new("order_id", text(&[Some("1"), Some("2")])),
            Column::new("price", text(&[None, Some("20")])),
            Column::new("quantity", text(&[Some("5"), Some("1")])),
        ])
        .unwrap();
        let (essential, numeric) = defaults();
        let resolved = resolve_missing_values(table, &essential, &numeric);
        assert_eq!(resolved.table.value(0, "price"), Some(Value::Float(20.0)));
        assert_eq!(resolved.table.value(0, "quantity"), Some(Value::Integer(5)));
        assert_eq!(resolved.table.column_kind("quantity"), Some(ColumnKind::Integer));
        assert_eq!(resolved.imputations[0].filled, 1);
        assert!(!resolved.imputations[0].used_fallback);
    }

    #[test]
    fn drops_rows_missing_essential_fields_before_computing_median() {
        let table = Table::new(vec![
            Column::new("order_id", text(&[Some("1"), None, Some("3"), Some("4")])),
            Column::new("price", text(&[Some("1"), Some("1000"), Some("3"), Some("oops")])),
        ])
        .unwrap();
        let (essential, numeric) = defaults();
        let resolved = resolve_missing_values(table, &essential, &numeric);
        assert_eq!(resolved.dropped_rows, 1);
        assert_eq!(resolved.table.row_count(), 3);
        // Median of 1 and 3, the 1000 row having been dropped.
        assert_eq!(resolved.table.value(2, "price"), Some(Value::Float(2.0)));
    }

    #[test]
    fn no_essential_columns_means_no_drops() {
        let table = Table::new(vec![Column::new("price", text(&[None, None]))]).unwrap();
        let (essential, numeric) = defaults();
        let resolved = resolve_missing_values(table, &essential, &numeric);
        assert_eq!(resolved.dropped_rows, 0);
        assert_eq!(resolved.table.value(1, "price"), Some(Value::Float(0.0)));
        assert!(resolved.imputations[0].used_fallback);
    }

    #[test]
    fn quantity_rounds_half_to_even() {
        let table = Table::new(vec![Column::new(
            "quantity",
            text(&[Some("2.5"), Some("3.5"), Some("-0.4"), Some("7")]),
        )])
        .unwrap();
        let (essential, numeric) = defaults();
        let resolved = resolve_missing_values(table, &essential, &numeric);
        let column = resolved.table.column("quantity").unwrap();
        assert_eq!(
            column.data,
            ColumnData::Integer(vec![Some(2), Some(4), Some(0), Some(7)])
        );
    }

    #[test]
    fn header_only_column_does_not_report_fallback() {
        let table = Table::new(vec![
            Column::new("price", text(&[])),
            Column::new("quantity", text(&[])),
        ])
        .unwrap();
        let (essential, numeric) = defaults();
        let resolved = resolve_missing_values(table, &essential, &numeric);
        assert_eq!(resolved.imputations.len(), 2);
        assert!(resolved.imputations.iter().all(|imp| imp.filled == 0));
        assert!(resolved.imputations.iter().all(|imp| !imp.used_fallback));
    }

    #[test]
    fn quantity_beyond_integer_range_is_treated_as_missing() {
        let table = Table::new(vec![Column::new(
            "quantity",
            text(&[Some("1e19"), Some("-1e300"), Some("3"), Some("5")]),
        )])
        .unwrap();
        let (essential, numeric) = defaults();
        let resolved = resolve_missing_values(table, &essential, &numeric);
        let column = resolved.table.column("quantity").unwrap();
        assert_eq!(
            column.data,
            ColumnData::Integer(vec![Some(4), Some(4), Some(3), Some(5)])
        );
        assert_eq!(resolved.imputations[0].filled, 2);
        assert!(fits_integer(-9.0e18));
        assert!(!fits_integer(9.3e18));
    }

    #[test]
    fn absent_numeric_fields_are_not_reported() {
        let table = Table::new(vec![Column::new("order_id", text(&[Some("1")]))]).unwrap();
        let (essential, numeric) = defaults();
        let resolved = resolve_missing_values(table, &essential, &numeric);
        assert!(resolved.imputations.is_empty());
        assert_eq!(resolved.table.column_count(), 1);
    }
}
