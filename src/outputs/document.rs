//! Paginated PDF document export.
//!
//! The document has a fixed visible column set (title, description, formatted
//! date, source). The report title sits on the first page; every page repeats
//! the table header and carries a "Página n de N" footer.
//!
//! Export happens in two steps: [`to_document`] lays records out into a
//! [`Document`] page model, and [`Document::render_pdf`] draws each page onto
//! an A4 sheet. Text uses the standard Helvetica faces with WinAnsi encoding,
//! so no font is embedded and the bytes depend on the records alone.

use super::{ExportKind, ExportPayload};
use crate::error::ExportError;
use crate::models::Record;
use chrono::{Datelike, NaiveDate};
use lopdf::{Object, Stream, dictionary};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use tracing::{debug, info, instrument};

const MONTHS_ES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

// Page geometry in PDF points, origin at the bottom-left corner (A4 portrait).
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 40;
const TITLE_SIZE: i64 = 16;
const TITLE_BLOCK: i64 = 32;
const FONT_SIZE: i64 = 8;
const LINE_HEIGHT: i64 = 10;
const CELL_PADDING: i64 = 4;
const HEADER_HEIGHT: i64 = 18;
const MAX_CELL_LINES: usize = 2;
const ROW_HEIGHT: i64 = MAX_CELL_LINES as i64 * LINE_HEIGHT + CELL_PADDING;
const COLUMN_WIDTHS: [i64; 4] = [150, 215, 70, 80];
const TABLE_WIDTH: i64 = PAGE_WIDTH - 2 * MARGIN;

const REGULAR: &str = "F1";
const BOLD: &str = "F2";

/// Most rows that fit on a page after the first.
pub const MAX_ROWS_PER_PAGE: usize =
    ((PAGE_HEIGHT - 2 * MARGIN - HEADER_HEIGHT) / ROW_HEIGHT) as usize;

/// Most rows that fit on the first page, below the title.
pub const MAX_FIRST_PAGE_ROWS: usize =
    ((PAGE_HEIGHT - 2 * MARGIN - TITLE_BLOCK - HEADER_HEIGHT) / ROW_HEIGHT) as usize;

/// Human date format used in the date column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateStyle {
    /// `5/3/2024`
    #[default]
    Short,
    /// `05 de marzo de 2024`
    Long,
}

impl DateStyle {
    pub fn format(&self, date: NaiveDate) -> String {
        match self {
            DateStyle::Short => date.format("%-d/%-m/%Y").to_string(),
            DateStyle::Long => format!(
                "{:02} de {} de {}",
                date.day(),
                MONTHS_ES[date.month0() as usize],
                date.year()
            ),
        }
    }
}

/// Title, column labels and page geometry of the document export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentLayout {
    pub title: String,
    pub columns: [String; 4],
    /// Rows on every page after the first, at most [`MAX_ROWS_PER_PAGE`].
    pub rows_per_page: usize,
    /// Rows on the first page, which also carries the title. At most
    /// [`MAX_FIRST_PAGE_ROWS`].
    pub first_page_rows: usize,
    pub date_style: DateStyle,
}

impl Default for DocumentLayout {
    fn default() -> Self {
        Self {
            title: "Reporte de Noticias".to_string(),
            columns: [
                "Título".to_string(),
                "Descripción".to_string(),
                "Fecha".to_string(),
                "Fuente".to_string(),
            ],
            rows_per_page: 25,
            first_page_rows: 22,
            date_style: DateStyle::Short,
        }
    }
}

/// One printed page: its 1-based number and table rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentPage {
    pub number: usize,
    pub rows: Vec<[String; 4]>,
}

/// The paginated report before rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub title: String,
    pub columns: [String; 4],
    pub pages: Vec<DocumentPage>,
}

/// Lay out `records` as a paginated document.
///
/// An empty slice still yields one page carrying the title and header.
/// Page sizes of zero are treated as one row.
#[instrument(level = "info", skip_all, fields(records = records.len()))]
pub fn to_document(records: &[Record], layout: &DocumentLayout) -> Document {
    let rows: Vec<[String; 4]> = records
        .iter()
        .map(|record| document_row(record, layout.date_style))
        .collect();

    let first = layout.first_page_rows.max(1).min(rows.len());
    let (head, tail) = rows.split_at(first);

    let mut pages = vec![DocumentPage {
        number: 1,
        rows: head.to_vec(),
    }];
    for chunk in tail.chunks(layout.rows_per_page.max(1)) {
        pages.push(DocumentPage {
            number: pages.len() + 1,
            rows: chunk.to_vec(),
        });
    }

    info!(pages = pages.len(), "Laid out document export");
    Document {
        title: layout.title.clone(),
        columns: layout.columns.clone(),
        pages,
    }
}

fn document_row(record: &Record, style: DateStyle) -> [String; 4] {
    let date = match record.parse_date() {
        Some(date) => style.format(date),
        None => record.published_at.clone(),
    };
    [
        record.title.clone(),
        record.description.clone(),
        date,
        record.source.clone(),
    ]
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn row_count(&self) -> usize {
        self.pages.iter().map(|page| page.rows.len()).sum()
    }

    /// Draw every page and serialize the result as PDF bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Pdf`] if the PDF writer fails.
    pub fn render_pdf(&self) -> Result<Vec<u8>, ExportError> {
        let mut pdf = lopdf::Document::with_version("1.5");
        let pages_id = pdf.new_object_id();

        let regular_id = pdf.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold_id = pdf.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = pdf.add_object(dictionary! {
            "Font" => dictionary! {
                REGULAR => regular_id,
                BOLD => bold_id,
            },
        });

        let total = self.pages.len();
        let mut kids = Vec::with_capacity(total);
        for page in &self.pages {
            let content = self.draw_page(page, total);
            let stream = Stream::new(dictionary! {}, content.into_bytes()).with_compression(false);
            let content_id = pdf.add_object(stream);
            let page_id = pdf.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(Object::Reference(page_id));
        }

        pdf.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => Object::Integer(total as i64),
                "Resources" => resources_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(PAGE_WIDTH),
                    Object::Integer(PAGE_HEIGHT),
                ],
            }),
        );
        let catalog_id = pdf.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        pdf.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        pdf.save_to(&mut bytes)
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        debug!(pages = total, bytes = bytes.len(), "Rendered PDF document");
        Ok(bytes)
    }

    /// Render and wrap as a document export payload.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Pdf`] if the PDF writer fails.
    pub fn into_payload(self) -> Result<ExportPayload, ExportError> {
        Ok(ExportPayload {
            kind: ExportKind::Document,
            bytes: self.render_pdf()?,
        })
    }

    /// Content stream of one page: optional title, shaded header row, body
    /// rows separated by rules, then the page footer.
    fn draw_page(&self, page: &DocumentPage, total: usize) -> String {
        let mut canvas = Canvas::default();
        let columns = column_geometry();
        let mut top = PAGE_HEIGHT - MARGIN;

        if page.number == 1 {
            canvas.text(BOLD, TITLE_SIZE, MARGIN, top - TITLE_SIZE, &self.title);
            top -= TITLE_BLOCK;
        }

        canvas.shade(MARGIN, top - HEADER_HEIGHT, TABLE_WIDTH, HEADER_HEIGHT);
        for ((x, _), label) in columns.iter().zip(&self.columns) {
            let baseline = top - HEADER_HEIGHT + (HEADER_HEIGHT - FONT_SIZE) / 2;
            canvas.text(BOLD, FONT_SIZE, x + CELL_PADDING, baseline, label);
        }
        top -= HEADER_HEIGHT;

        for row in &page.rows {
            for ((x, width), cell) in columns.iter().zip(row) {
                let lines = wrap_cell(cell, column_chars(*width), MAX_CELL_LINES);
                for (i, line) in lines.iter().enumerate() {
                    let baseline = top - CELL_PADDING - FONT_SIZE - i as i64 * LINE_HEIGHT;
                    canvas.text(REGULAR, FONT_SIZE, x + CELL_PADDING, baseline, line);
                }
            }
            top -= ROW_HEIGHT;
            canvas.rule(MARGIN, MARGIN + TABLE_WIDTH, top);
        }

        let footer = format!("Página {} de {}", page.number, total);
        canvas.text(REGULAR, FONT_SIZE, MARGIN, MARGIN / 2, &footer);
        canvas.ops
    }
}

/// PDF content stream operators for one page.
#[derive(Default)]
struct Canvas {
    ops: String,
}

impl Canvas {
    fn text(&mut self, font: &str, size: i64, x: i64, y: i64, text: &str) {
        writeln!(
            self.ops,
            "BT /{font} {size} Tf {x} {y} Td {} Tj ET",
            pdf_string(text)
        )
        .unwrap();
    }

    fn shade(&mut self, x: i64, y: i64, width: i64, height: i64) {
        writeln!(self.ops, "0.85 g {x} {y} {width} {height} re f 0 g").unwrap();
    }

    fn rule(&mut self, x1: i64, x2: i64, y: i64) {
        writeln!(self.ops, "0.75 G 0.5 w {x1} {y} m {x2} {y} l S 0 G").unwrap();
    }
}

/// Left edge and width of each table column.
fn column_geometry() -> [(i64, i64); 4] {
    let mut x = MARGIN;
    COLUMN_WIDTHS.map(|width| {
        let column = (x, width);
        x += width;
        column
    })
}

/// Characters that fit on one line of a column, assuming an average
/// Helvetica glyph of 0.55 em.
fn column_chars(width: i64) -> usize {
    ((width - 2 * CELL_PADDING) * 20 / (FONT_SIZE * 11)).max(1) as usize
}

/// Word-wrap `text` into at most `max_lines` lines of `width` characters.
///
/// Line breaks in the input fold into spaces, words longer than a line are
/// split, and text beyond the last line is cut with a trailing "...".
fn wrap_cell(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word;
        loop {
            let current_len = current.chars().count();
            let word_len = word.chars().count();
            let needed = if current.is_empty() {
                word_len
            } else {
                current_len + 1 + word_len
            };
            if needed <= width {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
                break;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                continue;
            }
            let cut = word
                .char_indices()
                .nth(width)
                .map_or(word.len(), |(i, _)| i);
            lines.push(word[..cut].to_string());
            word = &word[cut..];
            if word.is_empty() {
                break;
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            let kept: String = last.chars().take(width.saturating_sub(3)).collect();
            *last = format!("{kept}...");
        }
    }
    lines
}

/// Encode `text` as a PDF literal string in WinAnsi encoding.
///
/// Bytes outside printable ASCII are written as octal escapes, so the
/// content stream stays 7-bit. Characters WinAnsi lacks become `?`.
fn pdf_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('(');
    for c in text.chars() {
        match win_ansi(c) {
            byte @ (b'(' | b')' | b'\\') => {
                out.push('\\');
                out.push(byte as char);
            }
            byte @ 0x20..=0x7e => out.push(byte as char),
            byte => write!(out, "\\{byte:03o}").unwrap(),
        }
    }
    out.push(')');
    out
}

fn win_ansi(c: char) -> u8 {
    match c {
        '\u{20}'..='\u{7e}' | '\u{a0}'..='\u{ff}' => c as u8,
        '€' => 0x80,
        '…' => 0x85,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        _ => b'?',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(n: u64) -> Vec<Record> {
        (1..=n)
            .map(|i| {
                Record::new(i, format!("Noticia {i}"), "2024-03-05", "El Universo")
                    .with_description(format!("Descripción {i}"))
            })
            .collect()
    }

    fn small_layout() -> DocumentLayout {
        DocumentLayout {
            rows_per_page: 3,
            first_page_rows: 2,
            ..DocumentLayout::default()
        }
    }

    fn count(haystack: &[u8], needle: &str) -> usize {
        haystack
            .windows(needle.len())
            .filter(|window| *window == needle.as_bytes())
            .count()
    }

    #[test]
    fn test_date_styles() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(DateStyle::Short.format(date), "5/3/2024");
        assert_eq!(DateStyle::Long.format(date), "05 de marzo de 2024");
    }

    #[test]
    fn test_default_layout_fits_on_a4() {
        let layout = DocumentLayout::default();
        assert!(layout.rows_per_page <= MAX_ROWS_PER_PAGE);
        assert!(layout.first_page_rows <= MAX_FIRST_PAGE_ROWS);
        assert_eq!(COLUMN_WIDTHS.iter().sum::<i64>(), TABLE_WIDTH);
    }

    #[test]
    fn test_empty_input_renders_one_header_page() {
        let doc = to_document(&[], &DocumentLayout::default());
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.row_count(), 0);

        let bytes = doc.render_pdf().unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        assert_eq!(lopdf::Document::load_mem(&bytes).unwrap().get_pages().len(), 1);
        assert_eq!(count(&bytes, "(Reporte de Noticias) Tj"), 1);
        assert_eq!(count(&bytes, "(T\\355tulo) Tj"), 1);
        assert_eq!(count(&bytes, "(P\\341gina 1 de 1) Tj"), 1);
    }

    #[test]
    fn test_overflow_repeats_header_on_every_page() {
        let doc = to_document(&records(7), &small_layout());
        let sizes: Vec<usize> = doc.pages.iter().map(|p| p.rows.len()).collect();
        assert_eq!(sizes, vec![2, 3, 2]);
        assert_eq!(doc.row_count(), 7);

        let bytes = doc.render_pdf().unwrap();
        assert_eq!(lopdf::Document::load_mem(&bytes).unwrap().get_pages().len(), 3);
        assert_eq!(count(&bytes, "(Fuente) Tj"), 3);
        assert_eq!(count(&bytes, "(Reporte de Noticias) Tj"), 1);
        assert_eq!(count(&bytes, "(Noticia 7) Tj"), 1);
        assert_eq!(count(&bytes, "(P\\341gina 3 de 3) Tj"), 1);
    }

    #[test]
    fn test_row_uses_fixed_columns_and_human_date() {
        let record = Record::new(4, "Titular", "2024-03-05T10:00:00Z", "Primicias")
            .with_description("Texto")
            .with_category("general")
            .with_views(99);
        let doc = to_document(&[record], &DocumentLayout::default());
        assert_eq!(
            doc.pages[0].rows[0],
            [
                "Titular".to_string(),
                "Texto".to_string(),
                "5/3/2024".to_string(),
                "Primicias".to_string()
            ]
        );
    }

    #[test]
    fn test_text_is_escaped_for_pdf() {
        assert_eq!(pdf_string("Quito (EFE)"), "(Quito \\(EFE\\))");
        assert_eq!(pdf_string("a\\b"), "(a\\\\b)");
        assert_eq!(pdf_string("Año €"), "(A\\361o \\200)");
        assert_eq!(pdf_string("東京"), "(??)");
    }

    #[test]
    fn test_wrap_cell() {
        assert_eq!(wrap_cell("uno\n\ndos", 20, 2), vec!["uno dos"]);
        assert_eq!(wrap_cell("uno dos tres cuatro", 8, 2), vec!["uno dos", "tres..."]);
        assert_eq!(wrap_cell("abcdefghij", 4, 3), vec!["abcd", "efgh", "ij"]);
        assert!(wrap_cell("", 10, 2).is_empty());
    }

    #[test]
    fn test_long_description_stays_within_row() {
        let record = Record::new(1, "T", "2024-03-05", "S").with_description("palabra ".repeat(200));
        let bytes = to_document(&[record], &DocumentLayout::default())
            .render_pdf()
            .unwrap();
        assert_eq!(count(&bytes, "...) Tj"), 1);
    }

    #[test]
    fn test_payload_is_deterministic() {
        let layout = small_layout();
        let a = to_document(&records(5), &layout).into_payload().unwrap();
        let b = to_document(&records(5), &layout).into_payload().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.kind, ExportKind::Document);
    }
}
