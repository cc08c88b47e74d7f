//! Tabular data model shared by every pipeline stage: typed cells, tables,
//! and the four dataset kinds a dashboard run consumes.

use serde::{Deserialize, Serialize};
use std::fmt;

// ─── Dataset Kinds ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    Influencers,
    Posts,
    Tracking,
    Payouts,
}

impl DatasetKind {
    /// All datasets in validation order.
    pub const ALL: [DatasetKind; 4] = [
        DatasetKind::Influencers,
        DatasetKind::Posts,
        DatasetKind::Tracking,
        DatasetKind::Payouts,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DatasetKind::Influencers => "Influencers CSV",
            DatasetKind::Posts => "Posts CSV",
            DatasetKind::Tracking => "Tracking Data CSV",
            DatasetKind::Payouts => "Payouts CSV",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ─── Cells ──────────────────────────────────────────────────────────────────

/// A single value inferred from a CSV field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

/// Storage type chosen once per column when a CSV is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Integer,
    Float,
    Text,
}

impl ColumnType {
    /// Narrowest type every non-empty field parses as: integer, then float
    /// (which accepts `inf` and `NaN`), otherwise text.
    pub fn infer<'a>(fields: impl IntoIterator<Item = &'a str>) -> Self {
        let mut inferred = ColumnType::Integer;
        for raw in fields.into_iter().filter(|raw| !raw.is_empty()) {
            if inferred == ColumnType::Integer && raw.parse::<i64>().is_err() {
                inferred = ColumnType::Float;
            }
            if inferred == ColumnType::Float && raw.parse::<f64>().is_err() {
                return ColumnType::Text;
            }
        }
        inferred
    }
}

impl Cell {
    /// Read a raw field as `column_type`. Empty fields are null.
    pub fn parse_as(raw: &str, column_type: ColumnType) -> Self {
        if raw.is_empty() {
            return Cell::Null;
        }
        let numeric = match column_type {
            ColumnType::Integer => raw.parse().ok().map(Cell::Int),
            ColumnType::Float => raw.parse().ok().map(Cell::Float),
            ColumnType::Text => None,
        };
        numeric.unwrap_or_else(|| Cell::Text(raw.to_string()))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Numeric view of the cell, NaN included.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(value) => Some(*value as f64),
            Cell::Float(value) => Some(*value),
            Cell::Null | Cell::Text(_) => None,
        }
    }

    /// Numeric value for aggregation. Null, text, and NaN count as missing.
    pub fn numeric_value(&self) -> Option<f64> {
        self.as_f64().filter(|value| !value.is_nan())
    }

    /// Canonical grouping/join key. Integral floats collapse onto the
    /// integer form so `7` and `7.0` land in the same group.
    pub fn key(&self) -> Option<String> {
        match self {
            Cell::Null => None,
            Cell::Int(value) => Some(value.to_string()),
            Cell::Float(value) if value.is_nan() => None,
            Cell::Float(value) if value.fract() == 0.0 && value.abs() < 9.007_199_254_740_992e15 => {
                Some((*value as i64).to_string())
            }
            Cell::Float(value) => Some(format!("{value:?}")),
            Cell::Text(text) => Some(text.clone()),
        }
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Cell::Null, Cell::Null) => true,
            (Cell::Int(a), Cell::Int(b)) => a == b,
            (Cell::Float(a), Cell::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Cell::Text(a), Cell::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

/// Floats use the shortest representation that parses back to the same
/// value and always keep a fractional part (`100.0`, `1.5`, `inf`, `NaN`).
impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Int(value) => write!(f, "{value}"),
            Cell::Float(value) => write!(f, "{value:?}"),
            Cell::Text(text) => f.write_str(text),
        }
    }
}

// ─── Tables ─────────────────────────────────────────────────────────────────

static NULL_CELL: Cell = Cell::Null;

/// Ordered columns plus rows of cells. Every row has one cell per column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

/// Borrowed view of one table row with by-name access.
#[derive(Debug, Clone, Copy)]
pub struct RowRef<'a> {
    columns: &'a [String],
    cells: &'a [Cell],
}

impl<'a> RowRef<'a> {
    /// Cell under `column`, or null when the column does not exist.
    pub fn get(&self, column: &str) -> &'a Cell {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|idx| self.cells.get(idx))
            .unwrap_or(&NULL_CELL)
    }

    pub fn cells(&self) -> &'a [Cell] {
        self.cells
    }
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn with_rows(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == columns.len()));
        Self { columns, rows }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = RowRef<'_>> {
        self.rows.iter().map(|cells| RowRef {
            columns: &self.columns,
            cells,
        })
    }

    pub fn row(&self, index: usize) -> Option<RowRef<'_>> {
        self.rows.get(index).map(|cells| RowRef {
            columns: &self.columns,
            cells,
        })
    }

    /// Cells of one column, top to bottom. Empty when the column is absent.
    pub fn column(&self, column: &str) -> Vec<&Cell> {
        match self.column_index(column) {
            Some(idx) => self.rows.iter().map(|row| &row[idx]).collect(),
            None => Vec::new(),
        }
    }

    /// Distinct non-null values of a column in first-encounter order.
    pub fn distinct(&self, column: &str) -> Vec<Cell> {
        let mut seen = std::collections::HashSet::new();
        self.column(column)
            .into_iter()
            .filter(|cell| cell.key().is_some_and(|key| seen.insert(key)))
            .cloned()
            .collect()
    }

    /// New table holding the rows that satisfy `predicate`.
    pub fn filter<F>(&self, mut predicate: F) -> Table
    where
        F: FnMut(RowRef<'_>) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|cells| {
                predicate(RowRef {
                    columns: &self.columns,
                    cells,
                })
            })
            .cloned()
            .collect();
        Table {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Trim surrounding whitespace from every column name.
    pub fn with_trimmed_column_names(mut self) -> Table {
        for column in &mut self.columns {
            let trimmed = column.trim();
            if trimmed.len() != column.len() {
                *column = trimmed.to_string();
            }
        }
        self
    }

    /// Assign a column: replaces an existing column of the same name,
    /// otherwise appends it.
    pub fn with_column(mut self, name: &str, values: Vec<Cell>) -> Table {
        debug_assert_eq!(values.len(), self.rows.len());
        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        self
    }
}
