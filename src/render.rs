//! Plain-text grid rendering used for console previews.

use std::borrow::Cow;
use std::fmt::Write as _;

use crate::table::Table;

pub const MISSING_DISPLAY: &str = "<NA>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Renders `rows` under `headers`, two spaces between columns and a dashed
/// separator below the header.
pub fn render_grid(headers: &[String], rows: &[Vec<String>], align: &[Align]) -> String {
    let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(flatten_cell(cell).chars().count());
        }
    }
    let widths = widths.into_iter().map(|w| w.max(3)).collect::<Vec<_>>();

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_line(headers, &widths, align));
    let dashes = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_line(&dashes, &widths, &[]));
    for row in rows {
        let _ = writeln!(output, "{}", format_line(row, &widths, align));
    }
    output
}

/// Renders the first `limit` rows of a table; numeric columns are right-aligned.
pub fn render_table(table: &Table, limit: usize) -> String {
    let preview = table.head(limit);
    let align = preview
        .columns()
        .iter()
        .map(|c| {
            if c.kind().is_numeric() {
                Align::Right
            } else {
                Align::Left
            }
        })
        .collect::<Vec<_>>();
    let rows = (0..preview.row_count())
        .map(|row| {
            preview
                .row_display(row)
                .into_iter()
                .map(|cell| cell.unwrap_or_else(|| MISSING_DISPLAY.to_string()))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    render_grid(&preview.headers(), &rows, &align)
}

pub fn print_table(table: &Table, limit: usize) {
    print!("{}", render_table(table, limit));
}

fn format_line(cells: &[String], widths: &[usize], align: &[Align]) -> String {
    let line = cells
        .iter()
        .zip(widths.iter().copied())
        .enumerate()
        .map(|(idx, (cell, width))| {
            let cell = flatten_cell(cell);
            match align.get(idx).copied().unwrap_or(Align::Left) {
                Align::Left => format!("{cell:<width$}"),
                Align::Right => format!("{cell:>width$}"),
            }
        })
        .collect::<Vec<_>>()
        .join("  ");
    line.trim_end().to_string()
}

// Embedded line breaks and tabs would break the grid.
fn flatten_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, ColumnData};

    #[test]
    fn render_grid_pads_and_separates() {
        let headers = vec!["id".to_string(), "name".to_string()];
        let rows = vec![
            vec!["1".to_string(), "Alice".to_string()],
            vec!["2".to_string(), "Bob".to_string()],
        ];
        let rendered = render_grid(&headers, &rows, &[]);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines, vec!["id   name", "---  -----", "1    Alice", "2    Bob"]);
    }

    #[test]
    fn render_table_marks_missing_and_right_aligns_numbers() {
        let table = Table::new(vec![
            Column::new("product", ColumnData::text([Some("Widget"), None])),
            Column::new("price", ColumnData::Float(vec![Some(5.0), Some(12.5)])),
        ])
        .unwrap();
        let rendered = render_table(&table, 5);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "product  price");
        assert_eq!(lines[2], "Widget     5.0");
        assert_eq!(lines[3], "<NA>      12.5");
    }

    #[test]
    fn render_table_limits_rows() {
        let table = Table::new(vec![Column::new(
            "n",
            ColumnData::Integer((0..10).map(Some).collect()),
        )])
        .unwrap();
        assert_eq!(render_table(&table, 3).lines().count(), 5);
    }

    #[test]
    fn flatten_cell_replaces_control_characters() {
        assert_eq!(flatten_cell("a\nb\tc"), "a b c");
        assert!(matches!(flatten_cell("plain"), Cow::Borrowed(_)));
    }
}
