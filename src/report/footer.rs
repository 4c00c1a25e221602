use chrono::NaiveDate;
use std::ops::Range;

use super::layout::{Align, Element, PageBlock, TextStyle, MARGIN, PAGE_HEIGHT, PAGE_WIDTH};
use super::row::format_date;

const FOOTER_OFFSET: f64 = 10.0;

const FOOTER_STYLE: TextStyle = TextStyle {
    size: 10.0,
    bold: false,
    align: Align::Center,
    color: "#969696",
};

/// A finished page: laid out content plus its footer.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub number: usize,
    pub count: usize,
    pub rows: Range<usize>,
    pub elements: Vec<Element>,
    pub footer: String,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(Element::text)
    }
}

pub fn footer_text(brand: &str, generated_on: NaiveDate, number: usize, count: usize) -> String {
    format!(
        "{} - Relatório gerado em {} - Página {} de {}",
        brand,
        format_date(generated_on),
        number,
        count
    )
}

/// Stamp every laid-out page with its footer.
///
/// Runs only after layout has finished, since each footer needs the total
/// page count.
pub fn stamp_footers(blocks: Vec<PageBlock>, brand: &str, generated_on: NaiveDate) -> Vec<Page> {
    let count = blocks.len();
    blocks
        .into_iter()
        .enumerate()
        .map(|(i, block)| {
            let number = i + 1;
            let footer = footer_text(brand, generated_on, number, count);
            let mut elements = block.elements;
            elements.push(Element::text_run(
                PAGE_WIDTH / 2.0,
                PAGE_HEIGHT - FOOTER_OFFSET,
                PAGE_WIDTH - 2.0 * MARGIN,
                FOOTER_STYLE,
                &footer,
            ));
            Page {
                number,
                count,
                rows: block.rows,
                elements,
                footer,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::layout::layout_pages;
    use crate::report::{FormattedRow, ReportSettings, ReportSummary};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    #[test]
    fn test_footer_text() {
        assert_eq!(
            footer_text("Libertá", day(), 2, 3),
            "Libertá - Relatório gerado em 10/03/2024 - Página 2 de 3"
        );
    }

    #[test]
    fn test_every_page_shows_total_count() {
        let rows: Vec<FormattedRow> = (0..70)
            .map(|i| FormattedRow {
                client: format!("Cliente {i}"),
                date: "N/A".to_string(),
                service: "N/A".to_string(),
                amount: "R$ 0.00".to_string(),
                status: "N/A".to_string(),
            })
            .collect();
        let blocks = layout_pages(&ReportSummary::default(), &rows, &ReportSettings::default());
        let block_count = blocks.len();

        let pages = stamp_footers(blocks, "Libertá", day());

        assert_eq!(pages.len(), block_count);
        assert!(pages.len() > 1);
        for (i, page) in pages.iter().enumerate() {
            assert_eq!(page.number, i + 1);
            assert_eq!(page.count, pages.len());
            assert!(page
                .footer
                .ends_with(&format!("Página {} de {}", i + 1, pages.len())));
            assert_eq!(page.texts().last(), Some(page.footer.as_str()));
        }
    }

    #[test]
    fn test_single_page_footer() {
        let blocks = layout_pages(&ReportSummary::default(), &[], &ReportSettings::default());
        let pages = stamp_footers(blocks, "Libertá", day());

        assert_eq!(pages.len(), 1);
        assert_eq!(
            pages[0].footer,
            "Libertá - Relatório gerado em 10/03/2024 - Página 1 de 1"
        );
    }
}
