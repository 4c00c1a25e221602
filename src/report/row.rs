use chrono::NaiveDate;
use serde::Serialize;

use crate::session::SessionRecord;

/// Placeholder for a missing or unreadable cell value
pub const NOT_AVAILABLE: &str = "N/A";

/// One table row of the general report, already formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedRow {
    pub client: String,
    pub date: String,
    pub service: String,
    pub amount: String,
    pub status: String,
}

impl FormattedRow {
    /// Cells in column order
    pub fn cells(&self) -> [&str; 5] {
        [
            &self.client,
            &self.date,
            &self.service,
            &self.amount,
            &self.status,
        ]
    }
}

/// Parse a stored amount, treating anything missing or non-numeric as zero.
pub fn parse_amount(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Format a value as `R$ 150.50` style currency.
pub fn format_currency(value: f64, currency_symbol: &str) -> String {
    // avoid printing "-0.00"
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{} {:.2}", currency_symbol, value)
}

/// Format a date the pt-BR way (`DD/MM/YYYY`).
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Project a session record onto the five report columns.
pub fn format_row(record: &SessionRecord, currency_symbol: &str) -> FormattedRow {
    FormattedRow {
        client: record.name().unwrap_or(NOT_AVAILABLE).to_string(),
        date: record
            .session_day()
            .map(format_date)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        service: record
            .service()
            .map(|s| s.replace(['-', '_'], " "))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        amount: format_currency(parse_amount(record.amount_text()), currency_symbol),
        status: record.status_text().unwrap_or(NOT_AVAILABLE).to_string(),
    }
}
