use serde::Serialize;

use super::row::{format_currency, parse_amount};
use crate::session::{PaymentStatus, SessionRecord};

/// Aggregate figures shown at the top of the general report.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ReportSummary {
    pub total_count: usize,
    pub total_amount: f64,
    pub paid_count: usize,
    pub pending_count: usize,
}

impl ReportSummary {
    /// The four summary lines, in display order
    pub fn lines(&self, currency_symbol: &str) -> [String; 4] {
        [
            format!("Total de Atendimentos: {}", self.total_count),
            format!(
                "Valor Total: {}",
                format_currency(self.total_amount, currency_symbol)
            ),
            format!("Consultas Pagas: {}", self.paid_count),
            format!("Consultas Pendentes: {}", self.pending_count),
        ]
    }
}

/// Reduce a snapshot of sessions to its summary.
///
/// Amounts are summed in input order, so the same snapshot always yields
/// the same bits. Statuses other than `paid` and `pending` count toward
/// neither total.
pub fn summarize(records: &[SessionRecord]) -> ReportSummary {
    records
        .iter()
        .fold(ReportSummary::default(), |mut summary, record| {
            summary.total_count += 1;
            let amount = parse_amount(record.amount_text());
            // saturate so huge amounts still print with two decimals
            summary.total_amount = (summary.total_amount + amount).clamp(f64::MIN, f64::MAX);
            match record.status() {
                PaymentStatus::Paid => summary.paid_count += 1,
                PaymentStatus::Pending => summary.pending_count += 1,
                PaymentStatus::Installment | PaymentStatus::Other => {}
            }
            summary
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: usize, amount: Option<&str>, status: Option<&str>) -> SessionRecord {
        SessionRecord {
            id: id.to_string(),
            amount: amount.map(str::to_string),
            payment_status: status.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_snapshot() {
        assert_eq!(
            summarize(&[]),
            ReportSummary {
                total_count: 0,
                total_amount: 0.0,
                paid_count: 0,
                pending_count: 0,
            }
        );
    }

    #[test]
    fn test_single_paid_record() {
        let summary = summarize(&[record(1, Some("150.5"), Some("paid"))]);
        assert_eq!(summary.total_count, 1);
        assert_eq!(summary.total_amount, 150.5);
        assert_eq!(summary.paid_count, 1);
        assert_eq!(summary.pending_count, 0);
    }

    #[test]
    fn test_malformed_amounts_contribute_zero() {
        let records = vec![
            record(1, Some("abc"), None),
            record(2, None, Some("pending")),
            record(3, Some(""), Some("paid")),
            record(4, Some("100"), Some("installment")),
        ];

        let summary = summarize(&records);
        assert_eq!(summary.total_count, 4);
        assert_eq!(summary.total_amount, 100.0);
        assert_eq!(summary.paid_count, 1);
        assert_eq!(summary.pending_count, 1);
    }

    #[test]
    fn test_counts_never_exceed_total() {
        let statuses = [
            Some("paid"),
            Some("pending"),
            Some("installment"),
            None,
            Some("pago"),
        ];
        let records: Vec<_> = (0..25)
            .map(|i| record(i, Some("10"), statuses[i % statuses.len()]))
            .collect();

        let summary = summarize(&records);
        assert_eq!(summary.total_count, records.len());
        assert!(summary.paid_count + summary.pending_count < summary.total_count);
        assert_eq!(summary.paid_count, 5);
        assert_eq!(summary.pending_count, 5);
    }

    #[test]
    fn test_counts_equal_total_when_all_paid_or_pending() {
        let records = vec![
            record(1, Some("1"), Some("paid")),
            record(2, Some("2"), Some("pending")),
            record(3, Some("3"), Some("paid")),
        ];

        let summary = summarize(&records);
        assert_eq!(summary.paid_count + summary.pending_count, summary.total_count);
    }

    #[test]
    fn test_summarize_is_deterministic() {
        let records: Vec<_> = (0..100)
            .map(|i| {
                let amount = format!("{}.{}", i * 7, i % 10);
                record(i, Some(amount.as_str()), Some("paid"))
            })
            .collect();

        let first = summarize(&records);
        let second = summarize(&records);
        assert_eq!(first.total_amount.to_bits(), second.total_amount.to_bits());
        assert_eq!(first, second);
    }

    #[test]
    fn test_huge_amounts_saturate_instead_of_overflowing() {
        let records = vec![
            record(1, Some("1e308"), Some("paid")),
            record(2, Some("1e308"), Some("paid")),
            record(3, Some("1e308"), Some("pending")),
        ];

        let summary = summarize(&records);
        assert!(summary.total_amount.is_finite());
        assert_eq!(summary.total_amount, f64::MAX);

        let total_line = &summary.lines("R$")[1];
        assert!(total_line.starts_with("Valor Total: R$ 1797693"));
        assert!(total_line.ends_with(".00"));
        assert!(!total_line.contains("inf"));

        let refunds = vec![record(1, Some("-1e308"), None), record(2, Some("-1e308"), None)];
        assert_eq!(summarize(&refunds).total_amount, f64::MIN);
    }

    #[test]
    fn test_summary_lines() {
        let summary = ReportSummary {
            total_count: 3,
            total_amount: 410.0,
            paid_count: 2,
            pending_count: 1,
        };

        assert_eq!(
            summary.lines("R$"),
            [
                "Total de Atendimentos: 3".to_string(),
                "Valor Total: R$ 410.00".to_string(),
                "Consultas Pagas: 2".to_string(),
                "Consultas Pendentes: 1".to_string(),
            ]
        );
    }
}
