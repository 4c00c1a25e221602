//! Layout pass: places the title, summary and table rows onto A4 pages.
//!
//! Coordinates are millimetres from the top-left corner of the page. Text
//! runs are positioned by the top of their line box; for centered runs `x`
//! is the horizontal centre. Every run carries the box it is clipped to.
//!
//! Text is set in a monospaced font bundled with Typst, so a line's width is
//! its character count times one advance.

use serde::Serialize;
use std::ops::Range;

use super::row::FormattedRow;
use super::summary::ReportSummary;
use super::ReportSettings;

pub const PAGE_WIDTH: f64 = 210.0;
pub const PAGE_HEIGHT: f64 = 297.0;
pub const MARGIN: f64 = 14.0;
/// Lowest point table rows may reach
pub const CONTENT_BOTTOM: f64 = PAGE_HEIGHT - MARGIN;

const PT_TO_MM: f64 = 25.4 / 72.0;

/// Font family used for every run
pub const REPORT_FONT: &str = "DejaVu Sans Mono";
/// Advance width of every DejaVu Sans Mono glyph (1233 / 2048 units), in ems
const GLYPH_ADVANCE: f64 = 1233.0 / 2048.0;
const LINE_SPACING: f64 = 1.15;

const TITLE_Y: f64 = 9.0;
const TITLE_SIZE: f64 = 18.0;

const SUMMARY_Y: f64 = 25.0;
const SUMMARY_SIZE: f64 = 14.0;
const SUMMARY_LINE_HEIGHT: f64 = 8.0;
const SUMMARY_GAP: f64 = 15.0;
const FIRST_TABLE_TOP: f64 = SUMMARY_Y + 3.0 * SUMMARY_LINE_HEIGHT + SUMMARY_GAP;

const BODY_SIZE: f64 = 10.0;
const CELL_PADDING: f64 = 3.0;
const LINE_HEIGHT: f64 = BODY_SIZE * PT_TO_MM * LINE_SPACING;
const MAX_CELL_LINES: usize = 4;

pub const COLUMNS: [&str; 5] = ["Cliente", "Data", "Serviço", "Valor", "Status"];
const COLUMN_WIDTHS: [f64; 5] = [52.0, 28.0, 38.0, 34.0, 30.0];

pub const BRAND_COLOR: &str = "#0ea5e9";
const STRIPE_COLOR: &str = "#f5f5f5";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
}

/// Font settings shared by a group of text runs
#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    pub size: f64,
    pub bold: bool,
    pub align: Align,
    pub color: &'static str,
}

const TITLE_STYLE: TextStyle = TextStyle {
    size: TITLE_SIZE,
    bold: true,
    align: Align::Center,
    color: BRAND_COLOR,
};

const SUMMARY_STYLE: TextStyle = TextStyle {
    size: SUMMARY_SIZE,
    bold: false,
    align: Align::Left,
    color: "#000000",
};

const HEADER_STYLE: TextStyle = TextStyle {
    size: BODY_SIZE,
    bold: true,
    align: Align::Left,
    color: "#ffffff",
};

const BODY_STYLE: TextStyle = TextStyle {
    size: BODY_SIZE,
    bold: false,
    align: Align::Left,
    color: "#000000",
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    pub x: f64,
    pub y: f64,
    /// Width of the clipping box
    pub width: f64,
    pub height: f64,
    pub size: f64,
    pub bold: bool,
    pub align: Align,
    pub color: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilledRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: String,
}

/// Something drawn on a page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Element {
    Text(TextRun),
    Rect(FilledRect),
}

impl Element {
    pub fn text_run(x: f64, y: f64, width: f64, style: TextStyle, text: &str) -> Self {
        Element::Text(TextRun {
            x,
            y,
            width,
            height: style.size * PT_TO_MM * LINE_SPACING,
            size: style.size,
            bold: style.bold,
            align: style.align,
            color: style.color.to_string(),
            text: text.to_string(),
        })
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Element::Text(run) => Some(&run.text),
            Element::Rect(_) => None,
        }
    }
}

/// Content of one page before its footer is known.
#[derive(Debug, Clone, PartialEq)]
pub struct PageBlock {
    /// 1-based page number
    pub number: usize,
    /// Indices of the table rows placed on this page
    pub rows: Range<usize>,
    pub elements: Vec<Element>,
}

impl PageBlock {
    fn new(number: usize, first_row: usize) -> Self {
        Self {
            number,
            rows: first_row..first_row,
            elements: Vec::new(),
        }
    }

    fn text(&mut self, x: f64, y: f64, width: f64, style: TextStyle, text: &str) {
        self.elements.push(Element::text_run(x, y, width, style, text));
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, fill: &str) {
        self.elements.push(Element::Rect(FilledRect {
            x,
            y,
            width,
            height,
            fill: fill.to_string(),
        }));
    }

    /// Text of every run on the page, in drawing order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(Element::text)
    }
}

/// Lay out the whole report, starting a new page whenever the next row
/// would cross the bottom margin.
pub fn layout_pages(
    summary: &ReportSummary,
    rows: &[FormattedRow],
    settings: &ReportSettings,
) -> Vec<PageBlock> {
    let mut pages = Vec::new();
    let mut page = PageBlock::new(1, 0);

    page.text(PAGE_WIDTH / 2.0, TITLE_Y, table_width(), TITLE_STYLE, &settings.title);

    for (i, line) in summary.lines(&settings.currency_symbol).iter().enumerate() {
        let y = SUMMARY_Y + i as f64 * SUMMARY_LINE_HEIGHT;
        page.text(MARGIN, y, table_width(), SUMMARY_STYLE, line);
    }

    let mut y = draw_header(&mut page, FIRST_TABLE_TOP);

    for (idx, row) in rows.iter().enumerate() {
        let cells = wrap_row(row);
        let height = row_height(&cells);

        if y + height > CONTENT_BOTTOM && !page.rows.is_empty() {
            let next = PageBlock::new(page.number + 1, idx);
            pages.push(std::mem::replace(&mut page, next));
            y = draw_header(&mut page, MARGIN);
        }

        draw_row(&mut page, &cells, y, height, idx);
        page.rows.end = idx + 1;
        y += height;
    }

    pages.push(page);
    tracing::debug!(pages = pages.len(), rows = rows.len(), "laid out report");
    pages
}

fn column_x(col: usize) -> f64 {
    MARGIN + COLUMN_WIDTHS[..col].iter().sum::<f64>()
}

fn table_width() -> f64 {
    COLUMN_WIDTHS.iter().sum()
}

/// Usable width inside a column, between its paddings
fn cell_width(col: usize) -> f64 {
    COLUMN_WIDTHS[col] - 2.0 * CELL_PADDING
}

/// Printed width of `text` at `size` points
pub fn text_width(text: &str, size: f64) -> f64 {
    text.chars().count() as f64 * size * PT_TO_MM * GLYPH_ADVANCE
}

fn draw_header(page: &mut PageBlock, top: f64) -> f64 {
    let height = LINE_HEIGHT + 2.0 * CELL_PADDING;
    page.rect(MARGIN, top, table_width(), height, BRAND_COLOR);
    for (col, label) in COLUMNS.iter().enumerate() {
        page.text(
            column_x(col) + CELL_PADDING,
            top + CELL_PADDING,
            cell_width(col),
            HEADER_STYLE,
            label,
        );
    }
    top + height
}

fn draw_row(page: &mut PageBlock, cells: &[Vec<String>], top: f64, height: f64, idx: usize) {
    if idx % 2 == 1 {
        page.rect(MARGIN, top, table_width(), height, STRIPE_COLOR);
    }
    for (col, lines) in cells.iter().enumerate() {
        for (n, line) in lines.iter().enumerate() {
            let y = top + CELL_PADDING + n as f64 * LINE_HEIGHT;
            page.text(column_x(col) + CELL_PADDING, y, cell_width(col), BODY_STYLE, line);
        }
    }
}

fn wrap_row(row: &FormattedRow) -> Vec<Vec<String>> {
    row.cells()
        .iter()
        .enumerate()
        .map(|(col, cell)| wrap_text(cell, chars_per_line(cell_width(col)), MAX_CELL_LINES))
        .collect()
}

fn row_height(cells: &[Vec<String>]) -> f64 {
    let lines = cells.iter().map(Vec::len).max().unwrap_or(1).max(1);
    lines as f64 * LINE_HEIGHT + 2.0 * CELL_PADDING
}

fn chars_per_line(inner_width: f64) -> usize {
    let glyph = BODY_SIZE * PT_TO_MM * GLYPH_ADVANCE;
    ((inner_width / glyph).floor() as usize).max(1)
}

/// Greedy word wrap. Words longer than a line are split; text beyond
/// `max_lines` is cut and the last line ends with an ellipsis.
pub fn wrap_text(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        loop {
            let used = current.chars().count();
            let sep = usize::from(used > 0);
            if used + sep + word.len() <= width {
                if sep == 1 {
                    current.push(' ');
                }
                current.extend(word.iter());
                break;
            }
            if used > 0 {
                lines.push(std::mem::take(&mut current));
                continue;
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }

    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            let mut kept: String = last.chars().take(width.saturating_sub(1)).collect();
            kept.push('…');
            *last = kept;
        }
    }
    lines
}
