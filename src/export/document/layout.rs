//! Table layout for paginated documents
//!
//! Layout is computed up front and kept free of any PDF types, so paging and
//! wrapping can be checked without decoding the rendered bytes.

use super::DocumentStyle;
use crate::export::projector::ProjectedMatrix;

/// Millimetres per typographic point
pub const PT_TO_MM: f32 = 25.4 / 72.0;

/// Glyph advance widths of Helvetica for ASCII 32..=126, in 1/1000 em
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
    278, 278, 584, 584, 584, 556, 1015, // :;<=>?@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
    278, 278, 278, 469, 556, 333, // [\]^_`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a-m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n-z
    334, 260, 334, 584, // {|}~
];

/// Glyph advance widths of Helvetica-Bold for ASCII 32..=126, in 1/1000 em
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
    333, 333, 584, 584, 584, 611, 975, // :;<=>?@
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
    333, 278, 333, 584, 556, 333, // [\]^_`
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // a-m
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // n-z
    389, 280, 389, 584, // {|}~
];

/// Width used for glyphs with no ASCII base letter
const FALLBACK_WIDTH: u16 = 556;

/// Windows-1252 characters in 0x80..=0x9F, the only non-Latin-1 glyphs the
/// builtin fonts can show
const WIN_ANSI_EXTRAS: &[char] = &[
    '€', '‚', 'ƒ', '„', '…', '†', '‡', 'ˆ', '‰', 'Š', '‹', 'Œ', 'Ž', '‘', '’', '“', '”', '•',
    '–', '—', '˜', '™', 'š', '›', 'œ', 'ž', 'Ÿ',
];

/// Weight of the builtin Helvetica face a text is set in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

impl FontWeight {
    fn widths(self) -> &'static [u16; 95] {
        match self {
            FontWeight::Regular => &HELVETICA_WIDTHS,
            FontWeight::Bold => &HELVETICA_BOLD_WIDTHS,
        }
    }
}

/// What a placed row shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// The header row, repeated at the top of every page
    Header,
    /// A body row, carrying its index in the matrix
    Body(usize),
}

impl RowKind {
    /// Face the row is drawn in, headers are bold
    pub fn weight(self) -> FontWeight {
        match self {
            RowKind::Header => FontWeight::Bold,
            RowKind::Body(_) => FontWeight::Regular,
        }
    }
}

/// A row positioned on a page
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedRow {
    pub kind: RowKind,
    /// Distance from the top edge of the page to the top of the row
    pub top_mm: f32,
    pub height_mm: f32,
    /// Wrapped text lines for each cell, in column order
    pub cells: Vec<Vec<String>>,
}

/// Rows placed on one page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub rows: Vec<PlacedRow>,
}

impl PageLayout {
    /// Number of body rows on this page
    pub fn body_rows(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| matches!(r.kind, RowKind::Body(_)))
            .count()
    }
}

/// Complete table layout for a document
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub pages: Vec<PageLayout>,
    /// Width shared by every column
    pub column_width_mm: f32,
}

impl DocumentLayout {
    /// Total body rows across all pages
    pub fn body_rows(&self) -> usize {
        self.pages.iter().map(PageLayout::body_rows).sum()
    }
}

/// Width of `text` set in Helvetica at `font_size` points, in millimetres
pub fn text_width_mm(text: &str, font_size: f32, weight: FontWeight) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(glyph_width(c, weight))).sum();
    units as f32 / 1000.0 * font_size * PT_TO_MM
}

fn glyph_width(c: char, weight: FontWeight) -> u16 {
    let code = ascii_base(c) as u32;
    if (32..=126).contains(&code) {
        weight.widths()[(code - 32) as usize]
    } else {
        FALLBACK_WIDTH
    }
}

/// Unaccented letter an accented Latin-1 letter is measured as
fn ascii_base(c: char) -> char {
    match c {
        'À'..='Å' => 'A',
        'Ç' => 'C',
        'È'..='Ë' => 'E',
        'Ì'..='Ï' => 'I',
        'Ñ' => 'N',
        'Ò'..='Ö' | 'Ø' => 'O',
        'Ù'..='Ü' => 'U',
        'Ý' => 'Y',
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ñ' => 'n',
        'ò'..='ö' | 'ø' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        '\u{a0}' => ' ',
        other => other,
    }
}

/// Whether the builtin fonts can show `c` (WinAnsi encoding).
///
/// Tabs and line breaks are accepted, the wrapper turns them into spaces
/// and hard breaks.
pub fn is_encodable(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | ' '..='~' | '\u{a0}'..='\u{ff}')
        || WIN_ANSI_EXTRAS.contains(&c)
}

/// First character of `text` the builtin fonts cannot show
pub fn first_unencodable(text: &str) -> Option<char> {
    text.chars().find(|&c| !is_encodable(c))
}

/// Greedy word wrap of `text` into lines no wider than `max_width_mm`.
///
/// Lines break at single spaces; runs of spaces are kept as written and tabs
/// count as one space each. Explicit newlines are hard breaks and words wider
/// than a line are broken between characters. Always returns at least one
/// line.
pub fn wrap_text(
    text: &str,
    max_width_mm: f32,
    font_size: f32,
    weight: FontWeight,
) -> Vec<String> {
    let fits = |s: &str| text_width_mm(s, font_size, weight) <= max_width_mm;
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let paragraph = paragraph.strip_suffix('\r').unwrap_or(paragraph).replace('\t', " ");
        let mut current = String::new();
        let mut started = false;

        for word in paragraph.split(' ') {
            let candidate = if started {
                format!("{current} {word}")
            } else {
                word.to_string()
            };

            if fits(candidate.as_str()) {
                current = candidate;
                started = true;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            started = true;

            if fits(word) {
                current = word.to_string();
            } else {
                // Hard-break a word that cannot fit on any line
                for c in word.chars() {
                    let mut next = current.clone();
                    next.push(c);
                    if !current.is_empty() && !fits(next.as_str()) {
                        lines.push(std::mem::take(&mut current));
                        current.push(c);
                    } else {
                        current = next;
                    }
                }
            }
        }
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Compute the paginated table layout for `matrix`.
///
/// The table starts at `style.table_top_mm` on the first page and at the top
/// margin on the following ones. The header row opens every page. A row that
/// would cross the bottom margin moves to the next page, unless it is the
/// first body row of its page.
pub fn plan(matrix: &ProjectedMatrix, style: &DocumentStyle) -> DocumentLayout {
    let columns = matrix.column_count().max(1);
    let column_width_mm = style.content_width_mm() / columns as f32;
    let text_width = (column_width_mm - 2.0 * style.cell_padding_mm).max(0.0);
    let line_height = style.line_height_mm();
    let bottom = style.page_height_mm - style.margin_mm;

    let place = |kind: RowKind, cells: Vec<String>, top_mm: f32| -> PlacedRow {
        let weight = kind.weight();
        let cells: Vec<Vec<String>> = cells
            .iter()
            .map(|text| wrap_text(text, text_width, style.font_size, weight))
            .collect();
        let lines = cells.iter().map(Vec::len).max().unwrap_or(1);
        PlacedRow {
            kind,
            top_mm,
            height_mm: lines as f32 * line_height + 2.0 * style.cell_padding_mm,
            cells,
        }
    };

    let header_cells: Vec<String> = matrix.headers().to_vec();

    let mut pages = Vec::new();
    let mut page = PageLayout::default();
    let header = place(RowKind::Header, header_cells.clone(), style.table_top_mm);
    let mut cursor = header.top_mm + header.height_mm;
    page.rows.push(header);

    for (index, row) in matrix.rows().iter().enumerate() {
        let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
        let mut placed = place(RowKind::Body(index), cells, cursor);

        if cursor + placed.height_mm > bottom && page.body_rows() > 0 {
            pages.push(std::mem::take(&mut page));
            let header = place(RowKind::Header, header_cells.clone(), style.margin_mm);
            cursor = header.top_mm + header.height_mm;
            page.rows.push(header);
            placed.top_mm = cursor;
        }

        cursor += placed.height_mm;
        page.rows.push(placed);
    }
    pages.push(page);

    DocumentLayout {
        pages,
        column_width_mm,
    }
}
