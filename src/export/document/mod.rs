//! Paginated document renderer (PDF)
//!
//! Produces, in order: a title block, a "generated on" line using the French
//! date convention, then the table laid out by [`layout::plan`]. Styling is
//! fixed configuration ([`DocumentStyle`]) and never derived from the data.

pub mod layout;

use chrono::NaiveDateTime;
use printpdf::path::PaintMode;
use printpdf::{BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Rect, Rgb};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ExportError, Result};

use super::column::CellValue;
use super::projector::ProjectedMatrix;
use layout::{PT_TO_MM, PlacedRow, RowKind};

/// Fixed visual configuration of exported documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentStyle {
    /// Page width (A4 portrait by default)
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    /// Left, right and bottom margin, also the table top on continuation pages
    pub margin_mm: f32,
    pub title_font_size: f32,
    /// Baseline of the title, from the top edge
    pub title_y_mm: f32,
    pub timestamp_font_size: f32,
    /// Baseline of the timestamp line, from the top edge
    pub timestamp_y_mm: f32,
    /// Top of the table on the first page
    pub table_top_mm: f32,
    /// Font size of header and body cells
    pub font_size: f32,
    pub cell_padding_mm: f32,
    pub line_height_factor: f32,
    pub header_fill: [u8; 3],
    pub header_text: [u8; 3],
    /// Fill of every other body row, `None` for a plain table
    pub stripe_fill: Option<[u8; 3]>,
    pub body_text: [u8; 3],
    /// Prefix of the timestamp line
    pub generated_label: String,
    /// chrono format of the timestamp date
    pub date_format: String,
}

impl Default for DocumentStyle {
    fn default() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            margin_mm: 14.0,
            title_font_size: 18.0,
            title_y_mm: 22.0,
            timestamp_font_size: 10.0,
            timestamp_y_mm: 30.0,
            table_top_mm: 35.0,
            font_size: 9.0,
            cell_padding_mm: 1.76,
            line_height_factor: 1.15,
            header_fill: [59, 130, 246],
            header_text: [255, 255, 255],
            stripe_fill: Some([245, 245, 245]),
            body_text: [20, 20, 20],
            generated_label: "Généré le".to_string(),
            date_format: "%d/%m/%Y".to_string(),
        }
    }
}

impl DocumentStyle {
    /// Horizontal space available to the table
    pub fn content_width_mm(&self) -> f32 {
        self.page_width_mm - 2.0 * self.margin_mm
    }

    /// Height of one line of cell text
    pub fn line_height_mm(&self) -> f32 {
        self.font_size * self.line_height_factor * PT_TO_MM
    }

    /// Text of the timestamp line for `generated_at`
    pub fn timestamp_line(&self, generated_at: &NaiveDateTime) -> String {
        format!(
            "{} {}",
            self.generated_label,
            generated_at.format(&self.date_format)
        )
    }
}

/// Renders a projected matrix as a PDF document
#[derive(Debug, Clone, Default)]
pub struct DocumentRenderer {
    style: DocumentStyle,
}

impl DocumentRenderer {
    /// Create a renderer with the given style
    pub fn new(style: DocumentStyle) -> Self {
        Self { style }
    }

    /// The style this renderer draws with
    pub fn style(&self) -> &DocumentStyle {
        &self.style
    }

    /// Render `matrix` under `title`, stamped with `generated_at`.
    ///
    /// An empty matrix yields a header-only table.
    ///
    /// # Returns
    /// * `Result<Vec<u8>>` - Complete PDF file contents
    pub fn render(
        &self,
        matrix: &ProjectedMatrix,
        title: &str,
        generated_at: &NaiveDateTime,
    ) -> Result<Vec<u8>> {
        let style = &self.style;
        let timestamp = style.timestamp_line(generated_at);
        check_encodable(matrix, title, &timestamp)?;

        let table = layout::plan(matrix, style);
        debug!(
            "Document layout: {} rows over {} pages",
            table.body_rows(),
            table.pages.len()
        );

        let (doc, first_page, first_layer) = PdfDocument::new(
            title,
            Mm(style.page_width_mm),
            Mm(style.page_height_mm),
            "Layer 1",
        );
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(render_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(render_error)?;

        for (index, page) in table.pages.iter().enumerate() {
            let canvas = if index == 0 {
                doc.get_page(first_page).get_layer(first_layer)
            } else {
                let (page_index, layer_index) = doc.add_page(
                    Mm(style.page_width_mm),
                    Mm(style.page_height_mm),
                    "Layer 1",
                );
                doc.get_page(page_index).get_layer(layer_index)
            };

            let painter = Painter {
                style,
                canvas: &canvas,
                regular: &regular,
                bold: &bold,
                column_width_mm: table.column_width_mm,
            };

            if index == 0 {
                painter.heading(title, &timestamp);
            }
            for row in &page.rows {
                painter.row(row);
            }
        }

        doc.save_to_bytes().map_err(render_error)
    }
}

/// Fail on text the builtin fonts would silently drop
fn check_encodable(matrix: &ProjectedMatrix, title: &str, timestamp: &str) -> Result<()> {
    if let Some(c) = layout::first_unencodable(title) {
        return Err(unencodable(format!("title contains {c:?}")));
    }
    if let Some(c) = layout::first_unencodable(timestamp) {
        return Err(unencodable(format!("timestamp line contains {c:?}")));
    }
    for header in matrix.headers() {
        if let Some(c) = layout::first_unencodable(header) {
            return Err(unencodable(format!("header '{header}' contains {c:?}")));
        }
    }
    for (row, cells) in matrix.rows().iter().enumerate() {
        for (header, cell) in matrix.headers().iter().zip(cells) {
            if let CellValue::Text(text) = cell {
                if let Some(c) = layout::first_unencodable(text) {
                    return Err(unencodable(format!(
                        "column '{header}' of record #{row} contains {c:?}"
                    )));
                }
            }
        }
    }
    Ok(())
}

fn unencodable(detail: String) -> crate::error::RecexportError {
    ExportError::Render {
        format: "pdf".to_string(),
        message: format!("{detail}, which the built-in PDF font cannot encode"),
    }
    .into()
}

fn render_error<E: std::fmt::Debug>(err: E) -> crate::error::RecexportError {
    ExportError::Render {
        format: "pdf".to_string(),
        message: format!("{err:?}"),
    }
    .into()
}

fn rgb([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb(Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

/// Draws onto one page, converting top-down millimetres to PDF coordinates
struct Painter<'a> {
    style: &'a DocumentStyle,
    canvas: &'a PdfLayerReference,
    regular: &'a IndirectFontRef,
    bold: &'a IndirectFontRef,
    column_width_mm: f32,
}

impl Painter<'_> {
    fn y(&self, from_top_mm: f32) -> Mm {
        Mm(self.style.page_height_mm - from_top_mm)
    }

    fn heading(&self, title: &str, timestamp: &str) {
        let style = self.style;
        self.canvas.set_fill_color(rgb([0, 0, 0]));
        self.canvas.use_text(
            title,
            style.title_font_size,
            Mm(style.margin_mm),
            self.y(style.title_y_mm),
            self.regular,
        );
        self.canvas.use_text(
            timestamp,
            style.timestamp_font_size,
            Mm(style.margin_mm),
            self.y(style.timestamp_y_mm),
            self.regular,
        );
    }

    fn row(&self, row: &PlacedRow) {
        let style = self.style;

        let (fill, text_color, font) = match row.kind {
            RowKind::Header => (Some(style.header_fill), style.header_text, self.bold),
            RowKind::Body(index) if index % 2 == 1 => {
                (style.stripe_fill, style.body_text, self.regular)
            }
            RowKind::Body(_) => (None, style.body_text, self.regular),
        };

        if let Some(fill) = fill {
            self.canvas.set_fill_color(rgb(fill));
            let width = self.column_width_mm * row.cells.len() as f32;
            let rect = Rect::new(
                Mm(style.margin_mm),
                self.y(row.top_mm + row.height_mm),
                Mm(style.margin_mm + width),
                self.y(row.top_mm),
            )
            .with_mode(PaintMode::Fill);
            self.canvas.add_rect(rect);
        }

        self.canvas.set_fill_color(rgb(text_color));
        let ascent = style.font_size * PT_TO_MM * 0.8;
        let line_height = style.line_height_mm();
        for (column, lines) in row.cells.iter().enumerate() {
            let x = style.margin_mm + column as f32 * self.column_width_mm + style.cell_padding_mm;
            for (line_no, line) in lines.iter().enumerate() {
                if line.is_empty() {
                    continue;
                }
                let baseline =
                    row.top_mm + style.cell_padding_mm + ascent + line_no as f32 * line_height;
                self.canvas
                    .use_text(line.as_str(), style.font_size, Mm(x), self.y(baseline), font);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_timestamp_line_uses_french_date() {
        let style = DocumentStyle::default();
        assert_eq!(style.timestamp_line(&generated_at()), "Généré le 05/03/2024");
    }

    #[test]
    fn test_default_style_constants() {
        let style = DocumentStyle::default();
        assert_eq!(style.header_fill, [59, 130, 246]);
        assert_eq!(style.font_size, 9.0);
        assert_eq!(style.table_top_mm, 35.0);
        assert!((style.content_width_mm() - 182.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_render_produces_pdf() {
        let matrix = ProjectedMatrix::new(
            vec!["Num".to_string(), "Client".to_string()],
            vec![
                vec![CellValue::from("INV-1"), CellValue::from("Acme")],
                vec![CellValue::from("INV-2"), CellValue::from("")],
            ],
        )
        .unwrap();

        let bytes = DocumentRenderer::default()
            .render(&matrix, "Liste des Factures", &generated_at())
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_empty_matrix() {
        let matrix = ProjectedMatrix::new(vec!["ID".to_string()], Vec::new()).unwrap();
        let bytes = DocumentRenderer::default()
            .render(&matrix, "Empty", &generated_at())
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_rejects_text_outside_font() {
        let matrix = ProjectedMatrix::new(
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec![vec![
                CellValue::from("Été"),
                CellValue::from("ZZB"),
                CellValue::from("مرحبا"),
            ]],
        )
        .unwrap();

        let err = DocumentRenderer::default()
            .render(&matrix, "Clients", &generated_at())
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("pdf"));
        assert!(message.contains("column 'c' of record #0"));
    }

    #[test]
    fn test_render_rejects_header_and_title_outside_font() {
        let matrix = ProjectedMatrix::new(vec!["Étape →".to_string()], Vec::new()).unwrap();
        let err = DocumentRenderer::default()
            .render(&matrix, "T", &generated_at())
            .unwrap_err();
        assert!(err.to_string().contains("header 'Étape →'"));

        let matrix = ProjectedMatrix::new(vec!["ID".to_string()], Vec::new()).unwrap();
        let err = DocumentRenderer::default()
            .render(&matrix, "Rapport ✓", &generated_at())
            .unwrap_err();
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn test_render_many_pages() {
        let rows = (0..150)
            .map(|i| vec![CellValue::Number(f64::from(i))])
            .collect();
        let matrix = ProjectedMatrix::new(vec!["N".to_string()], rows).unwrap();
        let bytes = DocumentRenderer::default()
            .render(&matrix, "Long", &generated_at())
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
