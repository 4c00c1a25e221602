pub mod config;
pub mod error;
pub mod logging;
pub mod pdf;
pub mod report;
pub mod session;

pub use config::{Config, SessionStore};
pub use error::{AppError, Result};
pub use pdf::{PdfEngine, TypstEngine};
pub use report::{build_report, export_report, summarize, ReportSettings, ReportSummary};
pub use session::SessionRecord;
