//! Terminal output for the recexport CLI
//!
//! This module provides the text the CLI prints:
//! - Table previews of projected exports
//! - Colored export notices
//! - Short summaries of written artifacts

pub mod colorizer;
pub mod table;

pub use colorizer::Colorizer;
pub use table::{TableFormatter, TableStyle};

use std::path::Path;

use crate::export::{ExportArtifact, Notice, ProjectedMatrix};

/// Main formatter for CLI output
pub struct Formatter {
    /// Colorizer for notices and messages
    colorizer: Colorizer,

    /// Table formatter for previews
    table: TableFormatter,
}

impl Formatter {
    /// Create a new formatter
    ///
    /// # Arguments
    /// * `use_colors` - Enable colored output
    pub fn new(use_colors: bool) -> Self {
        Self {
            colorizer: Colorizer::new(use_colors),
            table: TableFormatter::with_colors(use_colors),
        }
    }

    /// Replace the preview table formatter
    pub fn with_table(mut self, table: TableFormatter) -> Self {
        self.table = table;
        self
    }

    /// Colorizer used for messages
    pub fn colorizer(&self) -> &Colorizer {
        &self.colorizer
    }

    /// Format a projected matrix as a preview table
    pub fn format_preview(&self, matrix: &ProjectedMatrix) -> String {
        let summary = format!(
            "{} row(s), {} column(s)",
            matrix.row_count(),
            matrix.column_count()
        );
        format!(
            "{}\n{}",
            self.table.format(matrix),
            self.colorizer.dim(&summary)
        )
    }

    /// Format the notice of an export
    pub fn format_notice(&self, notice: &Notice) -> String {
        self.colorizer.notice(notice)
    }

    /// Format the line reporting where an artifact was written
    pub fn format_written(&self, artifact: &ExportArtifact, path: &Path) -> String {
        self.colorizer.dim(&format!(
            "{} row(s) written to {} ({} bytes)",
            artifact.rows,
            path.display(),
            artifact.bytes.len()
        ))
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{CellValue, ExportFormat};

    #[test]
    fn test_format_preview_summary() {
        let matrix = ProjectedMatrix::new(
            vec!["ID".to_string()],
            vec![vec![CellValue::from("A")], vec![CellValue::from("B")]],
        )
        .unwrap();
        let output = Formatter::new(false).format_preview(&matrix);
        assert!(output.contains("ID"));
        assert!(output.ends_with("2 row(s), 1 column(s)"));
    }

    #[test]
    fn test_format_notice_plain() {
        let output = Formatter::new(false).format_notice(&Notice::info("Export Excel réussi"));
        assert_eq!(output, "Export Excel réussi");
    }

    #[test]
    fn test_format_written() {
        let artifact = ExportArtifact {
            format: ExportFormat::Workbook,
            filename: "factures.xlsx".to_string(),
            bytes: vec![0; 10],
            rows: 3,
        };
        let output = Formatter::new(false).format_written(&artifact, Path::new("out/factures.xlsx"));
        assert_eq!(output, "3 row(s) written to out/factures.xlsx (10 bytes)");
    }
}
