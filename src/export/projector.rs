//! Row projection
//!
//! Turns a dataset and its column specification into a [`ProjectedMatrix`],
//! the format-agnostic input both renderers consume.

use tracing::debug;

use crate::error::{ExportError, Result};

use super::column::{CellValue, ColumnSpec, Record};

/// Headers plus row-major projected cells.
///
/// Built fresh for each export call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedMatrix {
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl ProjectedMatrix {
    /// Build a matrix from already projected parts.
    ///
    /// Every row must have exactly one cell per header.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Result<Self> {
        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != headers.len())
        {
            return Err(ExportError::InvalidColumns(format!(
                "row {} has {} cells, expected {}",
                index,
                row.len(),
                headers.len()
            ))
            .into());
        }
        Ok(Self { headers, rows })
    }

    /// Header labels in column order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Body rows in dataset order
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Number of body rows (the header row is not counted)
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no body rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Project `dataset` through `columns`.
///
/// One output row per record in input order, one cell per column in
/// declaration order. Stops at the first failing accessor.
pub fn project(dataset: &[Record], columns: &[ColumnSpec]) -> Result<ProjectedMatrix> {
    if columns.is_empty() {
        return Err(ExportError::InvalidColumns("no columns declared".to_string()).into());
    }

    let headers: Vec<String> = columns.iter().map(|c| c.header.clone()).collect();

    let mut rows = Vec::with_capacity(dataset.len());
    for (index, record) in dataset.iter().enumerate() {
        let mut cells = Vec::with_capacity(columns.len());
        for column in columns {
            cells.push(column.project(record, index)?);
        }
        rows.push(cells);
    }

    debug!(
        "Projected {} records across {} columns",
        rows.len(),
        headers.len()
    );

    Ok(ProjectedMatrix { headers, rows })
}
