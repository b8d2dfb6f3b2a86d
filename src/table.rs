//! In-memory column-oriented table shared by every pipeline stage.
//!
//! Each [`Column`] stores cells of one [`ColumnKind`]; `None` marks a missing
//! cell. Stages take a [`Table`] by value and hand back a new one, so callers
//! never observe a half-transformed table.

use crate::{
    data::{ColumnKind, Value, format_float},
    error::PipelineError,
};

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Text(Vec<Option<String>>),
    Float(Vec<Option<f64>>),
    Integer(Vec<Option<i64>>),
}

impl ColumnData {
    pub fn text<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        ColumnData::Text(values.into_iter().map(|v| v.map(Into::into)).collect())
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnData::Text(_) => ColumnKind::Text,
            ColumnData::Float(_) => ColumnKind::Float,
            ColumnData::Integer(_) => ColumnKind::Integer,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Text(values) => values.len(),
            ColumnData::Float(values) => values.len(),
            ColumnData::Integer(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, row: usize) -> Option<Value> {
        match self {
            ColumnData::Text(values) => values.get(row)?.clone().map(Value::Text),
            ColumnData::Float(values) => values.get(row).copied().flatten().map(Value::Float),
            ColumnData::Integer(values) => values.get(row).copied().flatten().map(Value::Integer),
        }
    }

    pub fn is_missing(&self, row: usize) -> bool {
        match self {
            ColumnData::Text(values) => values.get(row).is_none_or(Option::is_none),
            ColumnData::Float(values) => values.get(row).is_none_or(Option::is_none),
            ColumnData::Integer(values) => values.get(row).is_none_or(Option::is_none),
        }
    }

    pub fn missing_count(&self) -> usize {
        (0..self.len()).filter(|row| self.is_missing(*row)).count()
    }

    /// Numeric reading of a cell; text cells are coerced leniently.
    pub fn numeric(&self, row: usize) -> Option<f64> {
        self.get(row).and_then(|value| value.as_f64())
    }

    pub fn display(&self, row: usize) -> Option<String> {
        match self {
            ColumnData::Text(values) => values.get(row)?.clone(),
            ColumnData::Float(values) => values.get(row).copied().flatten().map(format_float),
            ColumnData::Integer(values) => values
                .get(row)
                .copied()
                .flatten()
                .map(|v| v.to_string()),
        }
    }

    /// Text rendering of every cell, missing cells preserved.
    pub fn into_text(self) -> Vec<Option<String>> {
        match self {
            ColumnData::Text(values) => values,
            other => (0..other.len()).map(|row| other.display(row)).collect(),
        }
    }

    fn filtered(&self, keep: &[bool]) -> ColumnData {
        fn pick<T: Clone>(values: &[T], keep: &[bool]) -> Vec<T> {
            values
                .iter()
                .zip(keep)
                .filter(|(_, keep)| **keep)
                .map(|(value, _)| value.clone())
                .collect()
        }
        match self {
            ColumnData::Text(values) => ColumnData::Text(pick(values, keep)),
            ColumnData::Float(values) => ColumnData::Float(pick(values, keep)),
            ColumnData::Integer(values) => ColumnData::Integer(pick(values, keep)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn kind(&self) -> ColumnKind {
        self.data.kind()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    rows: usize,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Result<Self, PipelineError> {
        let rows = columns.first().map(|c| c.data.len()).unwrap_or(0);
        if let Some(ragged) = columns.iter().find(|c| c.data.len() != rows) {
            return Err(PipelineError::RaggedColumns {
                column: ragged.name.clone(),
                expected: rows,
                actual: ragged.data.len(),
            });
        }
        Ok(Self { columns, rows })
    }

    /// Builds an all-text table from row-major cells. Short rows are padded with
    /// missing cells; cells beyond the header are ignored.
    pub fn from_text_rows(headers: &[String], rows: Vec<Vec<Option<String>>>) -> Self {
        let mut values: Vec<Vec<Option<String>>> = headers
            .iter()
            .map(|_| Vec::with_capacity(rows.len()))
            .collect();
        let row_count = rows.len();
        for row in rows {
            let mut cells = row.into_iter();
            for column in values.iter_mut() {
                column.push(cells.next().flatten());
            }
        }
        let columns = headers
            .iter()
            .zip(values)
            .map(|(name, cells)| Column::new(name.clone(), ColumnData::Text(cells)))
            .collect();
        Self {
            columns,
            rows: if headers.is_empty() { 0 } else { row_count },
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_kind(&self, name: &str) -> Option<ColumnKind> {
        self.column(name).map(Column::kind)
    }

    /// Rewrites a column's data in place; `f` must keep the row count.
    /// Returns `false` when the column does not exist.
    pub fn update_column(&mut self, name: &str, f: impl FnOnce(ColumnData) -> ColumnData) -> bool {
        let Some(idx) = self.column_index(name) else {
            return false;
        };
        let column = &mut self.columns[idx];
        let data = std::mem::replace(&mut column.data, ColumnData::Text(Vec::new()));
        column.data = f(data);
        debug_assert_eq!(column.data.len(), self.rows, "column '{name}' changed length");
        true
    }

    /// Keeps the rows whose mask entry is `true`, preserving their order.
    pub fn retain_rows(self, keep: &[bool]) -> Self {
        debug_assert_eq!(keep.len(), self.rows);
        let rows = keep.iter().take(self.rows).filter(|k| **k).count();
        let columns = self
            .columns
            .iter()
            .map(|c| Column::new(c.name.clone(), c.data.filtered(keep)))
            .collect();
        Self { columns, rows }
    }

    pub fn head(&self, n: usize) -> Self {
        let keep = (0..self.rows).map(|row| row < n).collect::<Vec<_>>();
        self.clone().retain_rows(&keep)
    }

    pub fn value(&self, row: usize, column: &str) -> Option<Value> {
        self.column(column)?.data.get(row)
    }

    /// Text rendering of one row in column order.
    pub fn row_display(&self, row: usize) -> Vec<Option<String>> {
        self.columns.iter().map(|c| c.data.display(row)).collect()
    }
}
