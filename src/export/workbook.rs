//! Spreadsheet workbook renderer (XLSX)
//!
//! Writes a single sheet: the header sequence on row 1, body rows after it.
//! Column widths follow a fixed heuristic on the header label only.

use rust_xlsxwriter::{Workbook, XlsxError};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ExportError, Result};

use super::column::CellValue;
use super::projector::ProjectedMatrix;

/// Name of the single exported sheet
pub const DEFAULT_SHEET_NAME: &str = "Data";

/// Narrowest column width, in character widths
pub const MIN_COLUMN_WIDTH: usize = 15;

/// Workbook settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbookOptions {
    /// Name of the single sheet
    pub sheet_name: String,
    /// Lower bound for every column width
    pub min_column_width: usize,
}

impl Default for WorkbookOptions {
    fn default() -> Self {
        Self {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            min_column_width: MIN_COLUMN_WIDTH,
        }
    }
}

/// Width of each column: `max(header length, minimum)`.
///
/// Body cells are not inspected.
pub fn column_widths(headers: &[String], min_width: usize) -> Vec<usize> {
    headers
        .iter()
        .map(|h| h.chars().count().max(min_width))
        .collect()
}

/// Renders a projected matrix as an XLSX workbook
#[derive(Debug, Clone, Default)]
pub struct WorkbookRenderer {
    options: WorkbookOptions,
}

impl WorkbookRenderer {
    /// Create a renderer with the given options
    pub fn new(options: WorkbookOptions) -> Self {
        Self { options }
    }

    /// Sheet name used when none is given to [`render`](Self::render)
    pub fn sheet_name(&self) -> &str {
        &self.options.sheet_name
    }

    /// Render `matrix` into a workbook holding one sheet called `sheet_name`.
    ///
    /// # Returns
    /// * `Result<Vec<u8>>` - Complete XLSX file contents
    pub fn render(&self, matrix: &ProjectedMatrix, sheet_name: &str) -> Result<Vec<u8>> {
        self.build(matrix, sheet_name).map_err(|e| {
            ExportError::Render {
                format: "xlsx".to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }

    fn build(
        &self,
        matrix: &ProjectedMatrix,
        sheet_name: &str,
    ) -> std::result::Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet_name)?;

        for (col, header) in matrix.headers().iter().enumerate() {
            worksheet.write_string(0, col as u16, header.as_str())?;
        }

        for (index, row) in matrix.rows().iter().enumerate() {
            let sheet_row = index as u32 + 1;
            for (col, cell) in row.iter().enumerate() {
                match cell {
                    CellValue::Text(text) => {
                        worksheet.write_string(sheet_row, col as u16, text.as_str())?
                    }
                    CellValue::Number(n) => worksheet.write_number(sheet_row, col as u16, *n)?,
                };
            }
        }

        let widths = column_widths(matrix.headers(), self.options.min_column_width);
        for (col, width) in widths.into_iter().enumerate() {
            worksheet.set_column_width(col as u16, width as f64)?;
        }

        debug!(
            "Workbook sheet '{}': 1 header row, {} body rows",
            sheet_name,
            matrix.row_count()
        );

        workbook.save_to_buffer()
    }
}
