use std::fmt;

use chrono::NaiveDateTime;

// ---------------------------------------------------------------------------
// ColumnKind – inferred scalar type of a column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Timestamp,
    Numeric,
    Text,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Timestamp => write!(f, "datetime"),
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Text => write!(f, "text"),
        }
    }
}

// ---------------------------------------------------------------------------
// CellValue – a single cell, used for display
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Timestamp(NaiveDateTime),
    Text(String),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S")),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

// ---------------------------------------------------------------------------
// Column – one typed, nullable column
// ---------------------------------------------------------------------------

/// Column storage. `None` marks a missing value.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Timestamp(Vec<Option<NaiveDateTime>>),
    Text(Vec<Option<String>>),
}

impl ColumnData {
    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnData::Numeric(_) => ColumnKind::Numeric,
            ColumnData::Timestamp(_) => ColumnKind::Timestamp,
            ColumnData::Text(_) => ColumnKind::Text,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Timestamp(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    pub fn cell(&self, row: usize) -> CellValue {
        let cell = match self {
            ColumnData::Numeric(v) => v.get(row).copied().flatten().map(CellValue::Number),
            ColumnData::Timestamp(v) => v.get(row).copied().flatten().map(CellValue::Timestamp),
            ColumnData::Text(v) => v.get(row).cloned().flatten().map(CellValue::Text),
        };
        cell.unwrap_or(CellValue::Null)
    }

    /// New column holding the rows at `order`, in that order.
    fn take(&self, order: &[usize]) -> ColumnData {
        match self {
            ColumnData::Numeric(v) => ColumnData::Numeric(order.iter().map(|&i| v[i]).collect()),
            ColumnData::Timestamp(v) => {
                ColumnData::Timestamp(order.iter().map(|&i| v[i]).collect())
            }
            ColumnData::Text(v) => ColumnData::Text(order.iter().map(|&i| v[i].clone()).collect()),
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

    /// Count of non-missing values.
    pub fn non_null(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(v) => v.iter().filter(|c| c.is_some()).count(),
            ColumnData::Timestamp(v) => v.iter().filter(|c| c.is_some()).count(),
            ColumnData::Text(v) => v.iter().filter(|c| c.is_some()).count(),
        }
    }
}

// ---------------------------------------------------------------------------
// Table – the loaded dataset
// ---------------------------------------------------------------------------

/// Ordered, named, equally long columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// Build a table. All columns must have `n_rows` entries.
    pub fn new(columns: Vec<Column>, n_rows: usize) -> Self {
        debug_assert!(columns.iter().all(|c| c.data.len() == n_rows));
        Self { columns, n_rows }
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Names of the numeric columns, in table order.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.kind() == ColumnKind::Numeric)
            .map(|c| c.name.clone())
            .collect()
    }

    /// Values of a numeric column, or `None` if it is missing or not numeric.
    pub fn numeric(&self, name: &str) -> Option<&[Option<f64>]> {
        match &self.column(name)?.data {
            ColumnData::Numeric(v) => Some(v),
            _ => None,
        }
    }

    /// Replace the data of the column named `name`, keeping its position.
    /// Returns `false` if there is no such column or the length differs.
    pub fn replace_column(&mut self, name: &str, data: ColumnData) -> bool {
        if data.len() != self.n_rows {
            return false;
        }
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(col) => {
                col.data = data;
                true
            }
            None => false,
        }
    }

    /// Reorder rows: row `i` of the result is row `order[i]` of `self`.
    pub fn take_rows(&self, order: &[usize]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|c| Column::new(c.name.clone(), c.data.take(order)))
            .collect();
        Table::new(columns, order.len())
    }
}
