//! Summary statistics over numeric columns.

use serde::Serialize;

use crate::{data::format_float, table::Table};

/// Median of `values`; the mean of the two middle values for even counts.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len().is_multiple_of(2) {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStats {
    pub name: String,
    pub count: usize,
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

impl ColumnStats {
    fn from_values(name: &str, values: &[f64], missing: usize) -> Self {
        let count = values.len();
        let mean = (count > 0).then(|| values.iter().sum::<f64>() / count as f64);
        Self {
            name: name.to_string(),
            count,
            missing,
            min: values.iter().copied().reduce(f64::min),
            max: values.iter().copied().reduce(f64::max),
            mean,
            median: median(values),
        }
    }

    pub fn headers() -> Vec<String> {
        ["column", "count", "missing", "min", "max", "mean", "median"]
            .iter()
            .map(|h| h.to_string())
            .collect()
    }

    pub fn render_row(&self) -> Vec<String> {
        let metric = |value: Option<f64>| value.map(format_metric).unwrap_or_default();
        vec![
            self.name.clone(),
            self.count.to_string(),
            self.missing.to_string(),
            metric(self.min),
            metric(self.max),
            metric(self.mean),
            metric(self.median),
        ]
    }
}

/// Statistics for every numeric column of `table`, in column order.
pub fn summarize(table: &Table) -> Vec<ColumnStats> {
    table
        .columns()
        .iter()
        .filter(|column| column.kind().is_numeric())
        .map(|column| {
            let values = (0..table.row_count())
                .filter_map(|row| column.data.numeric(row))
                .collect::<Vec<_>>();
            ColumnStats::from_values(&column.name, &values, column.data.missing_count())
        })
        .collect()
}

fn format_metric(value: f64) -> String {
    if value.fract() == 0.0 {
        format_float(value)
    } else {
        format!("{value:.4}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, ColumnData};

    #[test]
    fn median_handles_odd_even_and_empty() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[20.0]), Some(20.0));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn summarize_skips_text_columns() {
        let table = Table::new(vec![
            Column::new("sku", ColumnData::text([Some("a"), Some("b"), Some("c")])),
            Column::new("price", ColumnData::Float(vec![Some(1.0), None, Some(2.0)])),
            Column::new("quantity", ColumnData::Integer(vec![Some(4), Some(5), Some(9)])),
        ])
        .unwrap();
        let stats = summarize(&table);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].name, "price");
        assert_eq!(stats[0].count, 2);
        assert_eq!(stats[0].missing, 1);
        assert_eq!(stats[0].mean, Some(1.5));
        assert_eq!(stats[1].median, Some(5.0));
        assert_eq!(
            stats[1].render_row(),
            vec!["quantity", "3", "0", "4.0", "9.0", "6.0", "5.0"]
        );
    }
}
