//! Table preview of projected exports using tabled
//!
//! Shows exactly what an export would contain: the declared headers in
//! order, then one row per record with the same cell text the renderers use.

use tabled::{
    Table,
    builder::Builder,
    settings::{Alignment, Color, Modify, Style, object::Columns, object::Rows, width::Width},
};

use crate::export::ProjectedMatrix;

/// Maximum width for a single column (characters)
const DEFAULT_MAX_COLUMN_WIDTH: usize = 40;

/// Table formatter for projected matrices
pub struct TableFormatter {
    /// Maximum column width
    max_column_width: usize,

    /// Number of body rows shown before truncating, `None` for all
    max_rows: Option<usize>,

    /// Table style
    style: TableStyle,

    /// Enable colored output
    use_colors: bool,
}

/// Available table styles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStyle {
    /// Modern style with box-drawing characters
    Modern,
    /// ASCII style with basic characters
    Ascii,
    Rounded,
    Markdown,
    Psql,
}

impl TableFormatter {
    /// Create a new table formatter with default settings
    pub fn new() -> Self {
        Self {
            max_column_width: DEFAULT_MAX_COLUMN_WIDTH,
            max_rows: None,
            style: TableStyle::Modern,
            use_colors: false,
        }
    }

    /// Create a new table formatter with color support
    ///
    /// # Arguments
    /// * `use_colors` - Enable colored header
    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            ..Self::new()
        }
    }

    /// Set the table style
    pub fn with_style(mut self, style: TableStyle) -> Self {
        self.style = style;
        self
    }

    /// Set maximum column width, longer cells wrap
    pub fn with_max_column_width(mut self, width: usize) -> Self {
        self.max_column_width = width;
        self
    }

    /// Show at most `rows` body rows
    pub fn with_max_rows(mut self, rows: Option<usize>) -> Self {
        self.max_rows = rows;
        self
    }

    /// Format a projected matrix as a table
    ///
    /// # Arguments
    /// * `matrix` - Matrix to display
    ///
    /// # Returns
    /// * `String` - Table text, followed by a truncation note when rows were
    ///   left out
    pub fn format(&self, matrix: &ProjectedMatrix) -> String {
        if matrix.column_count() == 0 {
            return "(no columns)".to_string();
        }

        let shown = self
            .max_rows
            .map_or(matrix.row_count(), |max| max.min(matrix.row_count()));

        let mut builder = Builder::default();
        builder.push_record(matrix.headers().iter().cloned());
        for row in &matrix.rows()[..shown] {
            builder.push_record(row.iter().map(ToString::to_string));
        }

        let mut table = builder.build();
        self.apply_style(&mut table);

        // Wrap long values instead of truncating them
        for i in 0..matrix.column_count() {
            table.with(Modify::new(Columns::new(i..=i)).with(Width::wrap(self.max_column_width)));
        }

        table.with(Modify::new(Rows::first()).with(Alignment::center()));

        if self.use_colors {
            table.modify(Rows::first(), Color::FG_CYAN | Color::BOLD);
        }

        let hidden = matrix.row_count() - shown;
        if hidden > 0 {
            format!("{}\n... {} more row(s)", table, hidden)
        } else {
            table.to_string()
        }
    }

    fn apply_style(&self, table: &mut Table) {
        match self.style {
            TableStyle::Modern => table.with(Style::modern()),
            TableStyle::Ascii => table.with(Style::ascii()),
            TableStyle::Rounded => table.with(Style::rounded()),
            TableStyle::Markdown => table.with(Style::markdown()),
            TableStyle::Psql => table.with(Style::psql()),
        };
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}
