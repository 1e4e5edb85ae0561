use std::path::PathBuf;

use super::loader::ParseError;

// ---------------------------------------------------------------------------
// Column – one named numeric column
// ---------------------------------------------------------------------------

/// A single named column of numeric values.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

// ---------------------------------------------------------------------------
// Table – the complete contents of one loaded file
// ---------------------------------------------------------------------------

/// One loaded file: ordered named columns of equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Display name (file stem for tables read from disk).
    pub name: String,
    /// Where the table was read from, if anywhere.
    pub path: Option<PathBuf>,
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// Build a table, checking that every column has the same length.
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Result<Self, ParseError> {
        let n_rows = columns.first().map_or(0, |c| c.values.len());
        if let Some(bad) = columns.iter().find(|c| c.values.len() != n_rows) {
            return Err(ParseError::UnevenColumns {
                column: bad.name.clone(),
                expected: n_rows,
                found: bad.values.len(),
            });
        }
        Ok(Self {
            name: name.into(),
            path: None,
            columns,
            n_rows,
        })
    }

    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in header order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Values of the named column.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Values of row `index` across all columns.
    pub fn row(&self, index: usize) -> Option<Vec<f64>> {
        if index >= self.n_rows {
            return None;
        }
        Some(self.columns.iter().map(|c| c.values[index]).collect())
    }
}
