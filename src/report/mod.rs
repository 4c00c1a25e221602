//! General report: aggregation, row formatting, page layout and export.

mod footer;
pub mod layout;
mod row;
mod summary;

pub use footer::{footer_text, stamp_footers, Page};
pub use layout::{layout_pages, PageBlock};
pub use row::{
    format_currency, format_date, format_row, parse_amount, FormattedRow, NOT_AVAILABLE,
};
pub use summary::{summarize, ReportSummary};

use chrono::{NaiveDate, NaiveDateTime};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::pdf::PdfEngine;
use crate::session::SessionRecord;

pub const DEFAULT_TITLE: &str = "Relatório Geral de Atendimentos";
pub const DEFAULT_BRAND: &str = "Libertá";
pub const DEFAULT_CURRENCY_SYMBOL: &str = "R$";

/// Fixed texts of the report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSettings {
    pub title: String,
    /// Label printed at the start of every footer
    pub brand: String,
    pub currency_symbol: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            brand: DEFAULT_BRAND.to_string(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }
}

/// A complete report document: stamped pages plus their PDF encoding
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub pages: Vec<Page>,
    pub bytes: Vec<u8>,
}

impl RenderedDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedReport {
    pub file_name: String,
    pub summary: ReportSummary,
    pub document: RenderedDocument,
}

/// Where an exported report ended up
#[derive(Debug, Clone)]
pub struct ExportedReport {
    pub path: PathBuf,
    pub summary: ReportSummary,
    pub page_count: usize,
}

/// Receives the outcome of an export.
pub trait Reporter {
    fn success(&self, path: &Path);
    fn failure(&self, cause: &AppError);
}

/// Prints outcome messages to the terminal
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn success(&self, _path: &Path) {
        println!("Relatório geral gerado com sucesso!");
    }

    fn failure(&self, _cause: &AppError) {
        eprintln!("Erro ao gerar relatório");
    }
}

/// `Relatorio_Geral_DD-MM-YYYY.pdf` for the given generation date
pub fn report_file_name(date: NaiveDate) -> String {
    format!("Relatorio_Geral_{}.pdf", format_date(date).replace('/', "-"))
}

/// Run both layout passes: place content, then stamp footers once the
/// page count is known.
pub fn layout_document(
    summary: &ReportSummary,
    rows: &[FormattedRow],
    generated_at: NaiveDateTime,
    settings: &ReportSettings,
) -> Vec<Page> {
    let blocks = layout_pages(summary, rows, settings);
    stamp_footers(blocks, &settings.brand, generated_at.date())
}

/// Lay out and encode the report. Engine errors are returned unchanged.
pub fn render(
    summary: &ReportSummary,
    rows: &[FormattedRow],
    generated_at: NaiveDateTime,
    settings: &ReportSettings,
    engine: &dyn PdfEngine,
) -> Result<RenderedDocument> {
    let pages = layout_document(summary, rows, generated_at, settings);
    let bytes = engine.compile(&pages)?;
    Ok(RenderedDocument { pages, bytes })
}

/// Build the general report for a snapshot of sessions.
///
/// `records` is borrowed for the whole call, so the summary and the table
/// always describe the same data.
pub fn build_report(
    records: &[SessionRecord],
    generated_at: NaiveDateTime,
    settings: &ReportSettings,
    engine: &dyn PdfEngine,
) -> Result<GeneratedReport> {
    let summary = summarize(records);
    let rows: Vec<FormattedRow> = records
        .iter()
        .map(|r| format_row(r, &settings.currency_symbol))
        .collect();

    let document = render(&summary, &rows, generated_at, settings, engine)?;

    Ok(GeneratedReport {
        file_name: report_file_name(generated_at.date()),
        summary,
        document,
    })
}

/// Write bytes to `output_dir/file_name` through a temporary sibling, so
/// the destination either holds the complete file or is untouched.
pub fn write_report(bytes: &[u8], output_dir: &Path, file_name: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(file_name);

    let mut tmp = tempfile::NamedTempFile::new_in(output_dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(&path).map_err(|e| AppError::Io(e.error))?;

    Ok(path)
}

/// Generate the report and save it into `output_dir`.
///
/// Any failure is logged with its cause, passed to `reporter`, and
/// returned as the opaque [`AppError::ReportFailed`].
pub fn export_report(
    records: &[SessionRecord],
    generated_at: NaiveDateTime,
    settings: &ReportSettings,
    engine: &dyn PdfEngine,
    output_dir: &Path,
    reporter: &dyn Reporter,
) -> Result<ExportedReport> {
    let outcome = build_report(records, generated_at, settings, engine).and_then(|report| {
        let path = write_report(&report.document.bytes, output_dir, &report.file_name)?;
        Ok(ExportedReport {
            path,
            summary: report.summary,
            page_count: report.document.page_count(),
        })
    });

    match outcome {
        Ok(exported) => {
            tracing::info!(
                path = %exported.path.display(),
                pages = exported.page_count,
                sessions = exported.summary.total_count,
                "report generated"
            );
            reporter.success(&exported.path);
            Ok(exported)
        }
        Err(cause) => {
            tracing::error!(error = %cause, "failed to generate report PDF");
            reporter.failure(&cause);
            Err(AppError::ReportFailed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::TempDir;

    struct FakeEngine;

    impl PdfEngine for FakeEngine {
        fn compile(&self, pages: &[Page]) -> Result<Vec<u8>> {
            let mut out = b"%PDF-1.7\n".to_vec();
            for page in pages {
                out.extend(page.footer.as_bytes());
                out.push(b'\n');
            }
            Ok(out)
        }
    }

    struct FailingEngine;

    impl PdfEngine for FailingEngine {
        fn compile(&self, _pages: &[Page]) -> Result<Vec<u8>> {
            Err(AppError::PdfGeneration("out of memory".to_string()))
        }
    }

    #[derive(Default)]
    struct RecordingReporter {
        successes: RefCell<Vec<PathBuf>>,
        failures: RefCell<Vec<String>>,
    }

    impl Reporter for RecordingReporter {
        fn success(&self, path: &Path) {
            self.successes.borrow_mut().push(path.to_path_buf());
        }

        fn failure(&self, cause: &AppError) {
            self.failures.borrow_mut().push(cause.to_string());
        }
    }

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn sessions(n: usize) -> Vec<SessionRecord> {
        (0..n)
            .map(|i| SessionRecord {
                id: i.to_string(),
                client_name: Some(format!("Cliente {i}")),
                service_type: Some("mesa-radionica".to_string()),
                session_date: Some("2024-03-01".to_string()),
                amount: Some("50".to_string()),
                payment_status: Some(if i % 2 == 0 { "paid" } else { "pending" }.to_string()),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_report_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(report_file_name(date), "Relatorio_Geral_10-03-2024.pdf");
    }

    #[test]
    fn test_empty_snapshot_renders_one_page() {
        let report = build_report(&[], at(10), &ReportSettings::default(), &FakeEngine).unwrap();

        assert_eq!(report.summary, ReportSummary::default());
        assert_eq!(report.document.page_count(), 1);
        let page = &report.document.pages[0];
        assert_eq!(page.rows, 0..0);
        assert!(page.texts().any(|t| t == "Valor Total: R$ 0.00"));
        assert!(page.texts().any(|t| t == "Cliente"));
        assert!(report.document.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_single_record_report() {
        let record = SessionRecord {
            id: "1".to_string(),
            client_name: Some("Ana".to_string()),
            amount: Some("150.5".to_string()),
            payment_status: Some("paid".to_string()),
            session_date: Some("2024-03-10".to_string()),
            service_type: Some("tarot".to_string()),
            ..Default::default()
        };

        let report =
            build_report(&[record], at(10), &ReportSettings::default(), &FakeEngine).unwrap();

        assert_eq!(report.summary.total_count, 1);
        assert_eq!(report.summary.total_amount, 150.5);
        assert_eq!(report.summary.paid_count, 1);
        assert_eq!(report.summary.pending_count, 0);

        let texts: Vec<_> = report.document.pages[0].texts().collect();
        for cell in ["Ana", "10/03/2024", "tarot", "R$ 150.50", "paid"] {
            assert!(texts.contains(&cell), "missing cell {cell}");
        }
        assert!(texts.contains(&"Valor Total: R$ 150.50"));
    }

    #[test]
    fn test_multi_page_report_stamps_every_page() {
        let records = sessions(40);
        let settings = ReportSettings::default();
        let report = build_report(&records, at(10), &settings, &FakeEngine).unwrap();

        let pages = &report.document.pages;
        assert_eq!(pages.len(), 2);
        for (i, page) in pages.iter().enumerate() {
            assert_eq!(page.texts().filter(|t| *t == "Serviço").count(), 1);
            assert_eq!(
                page.footer,
                format!(
                    "Libertá - Relatório gerado em 10/03/2024 - Página {} de 2",
                    i + 1
                )
            );
        }
        assert_eq!(pages[0].rows, 0..20);
        assert_eq!(pages[1].rows, 20..40);
        assert_eq!(report.summary.paid_count, 20);
        assert_eq!(report.summary.pending_count, 20);
        assert_eq!(report.summary.total_amount, 2000.0);
    }

    #[test]
    fn test_render_is_repeatable_apart_from_footer() {
        let records = sessions(30);
        let settings = ReportSettings::default();

        let first = build_report(&records, at(10), &settings, &FakeEngine).unwrap();
        let again = build_report(&records, at(10), &settings, &FakeEngine).unwrap();
        let later = build_report(&records, at(11), &settings, &FakeEngine).unwrap();

        assert_eq!(first.document.pages, again.document.pages);
        assert_eq!(first.document.bytes, again.document.bytes);
        assert_eq!(first.summary, later.summary);

        let strip = |report: &GeneratedReport| -> Vec<Vec<String>> {
            report
                .document
                .pages
                .iter()
                .map(|p| {
                    p.texts()
                        .filter(|t| *t != p.footer)
                        .map(str::to_string)
                        .collect()
                })
                .collect()
        };
        assert_eq!(strip(&first), strip(&later));
        assert_ne!(first.document.pages[0].footer, later.document.pages[0].footer);
    }

    #[test]
    fn test_engine_failure_is_returned() {
        let err = build_report(&sessions(3), at(10), &ReportSettings::default(), &FailingEngine)
            .unwrap_err();
        assert!(matches!(err, AppError::PdfGeneration(_)));
    }

    #[test]
    fn test_export_writes_file_and_reports_success() {
        let temp_dir = TempDir::new().unwrap();
        let reporter = RecordingReporter::default();

        let exported = export_report(
            &sessions(5),
            at(10),
            &ReportSettings::default(),
            &FakeEngine,
            temp_dir.path(),
            &reporter,
        )
        .unwrap();

        assert_eq!(
            exported.path,
            temp_dir.path().join("Relatorio_Geral_10-03-2024.pdf")
        );
        assert!(std::fs::read(&exported.path).unwrap().starts_with(b"%PDF"));
        assert_eq!(exported.page_count, 1);
        assert_eq!(*reporter.successes.borrow(), vec![exported.path.clone()]);
        assert!(reporter.failures.borrow().is_empty());
    }

    #[test]
    fn test_export_failure_leaves_no_file() {
        let temp_dir = TempDir::new().unwrap();
        let reporter = RecordingReporter::default();

        let err = export_report(
            &sessions(5),
            at(10),
            &ReportSettings::default(),
            &FailingEngine,
            temp_dir.path(),
            &reporter,
        )
        .unwrap_err();

        assert!(matches!(err, AppError::ReportFailed));
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
        assert!(reporter.successes.borrow().is_empty());
        assert_eq!(
            *reporter.failures.borrow(),
            vec!["Failed to generate PDF: out of memory".to_string()]
        );
    }

    #[test]
    fn test_concurrent_generations_are_independent() {
        let records = sessions(40);
        let settings = ReportSettings::default();

        let (a, b) = std::thread::scope(|s| {
            let a = s.spawn(|| build_report(&records, at(10), &settings, &FakeEngine).unwrap());
            let b = s.spawn(|| build_report(&records, at(10), &settings, &FakeEngine).unwrap());
            (a.join().unwrap(), b.join().unwrap())
        });

        assert_eq!(a.document.pages, b.document.pages);
        assert_eq!(a.summary, b.summary);
    }
}
