// Handler for the monthly dashboard rollup
use serde::Serialize;
use shared::finance::format_currency;
use shared::ist::{MonthRange, ReportingZone, TimeWindow};
use shared::models::{BillKind, Expense};
use shared::summary::{CategoryStats, DashboardSummary};
use std::fmt::Write as _;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::helpers::read_bills;
use crate::data::store::{BillFilter, RecordStore};
use crate::error::EngineError;
use crate::models::query::month_label;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardReport {
    pub label: String,
    #[serde(skip)]
    pub range: MonthRange,
    pub summary: DashboardSummary,
}

async fn read_expenses<S: RecordStore>(store: &RwLock<S>, window: &TimeWindow) -> Result<Vec<Expense>, EngineError> {
    let guard = store.read().await;
    guard.select_expenses(window)
}

pub async fn handle_dashboard<S: RecordStore>(
    month: i32,
    year: i32,
    zone: ReportingZone,
    store: Arc<RwLock<S>>,
) -> Result<DashboardReport, EngineError> {
    let range = zone
        .month_range(month, year)
        .ok_or_else(|| EngineError::PeriodError(format!("month {} of year {} is out of range", month, year)))?;
    let window = TimeWindow::half_open(range);
    let filter = BillFilter::Window(window);

    let (sells, purchases, expenses) = tokio::join!(
        read_bills(&store, BillKind::Sell, &filter),
        read_bills(&store, BillKind::Purchase, &filter),
        read_expenses(&store, &window),
    );
    let (sells, purchases, expenses) = (sells?, purchases?, expenses?);

    tracing::debug!(
        sells = sells.len(),
        purchases = purchases.len(),
        expenses = expenses.len(),
        "Aggregating dashboard."
    );

    Ok(DashboardReport {
        label: month_label(month, year),
        range,
        summary: DashboardSummary::from_records(&sells, &purchases, &expenses),
    })
}

fn write_category(out: &mut String, title: &str, stats: &CategoryStats) {
    let _ = writeln!(out, "{} ({} records)", title, stats.count);
    let _ = writeln!(out, "  {:<14}{:>18}", "Taxable", format_currency(stats.amount));
    let _ = writeln!(out, "  {:<14}{:>18}", "GST", format_currency(stats.gst));
    let _ = writeln!(out, "  {:<14}{:>18}", "Total", format_currency(stats.total));
}

/// Plain-text rendering for the terminal.
pub fn render_dashboard(report: &DashboardReport) -> String {
    let summary = &report.summary;
    let mut out = String::new();
    let _ = writeln!(out, "Dashboard: {}", report.label);
    let _ = writeln!(out);
    write_category(&mut out, "Sales", &summary.sales);
    write_category(&mut out, "Purchases", &summary.purchases);
    write_category(&mut out, "Expenses", &summary.expenses);
    let _ = writeln!(out);
    let net_gst = summary.net_gst();
    let gst_label = if net_gst >= 0.0 { "GST payable" } else { "GST credit" };
    let _ = writeln!(out, "{:<16}{:>18}", gst_label, format_currency(net_gst));
    let _ = writeln!(out, "{:<16}{:>18}", "Income", format_currency(summary.sales.total));
    let _ = writeln!(out, "{:<16}{:>18}", "Outflow", format_currency(summary.outflow()));
    let _ = writeln!(out, "{:<16}{:>18}", "Net profit", format_currency(summary.net_profit()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_empty_dashboard() {
        let report = DashboardReport {
            label: "January 2026".to_string(),
            range: shared::ist::ist_month_range(0, 2026).unwrap(),
            summary: DashboardSummary::default(),
        };
        let text = render_dashboard(&report);
        assert!(text.starts_with("Dashboard: January 2026\n"));
        assert!(text.contains("Sales (0 records)"));
        assert!(text.contains("GST payable"));
        assert!(text.contains("₹0.00"));
    }
}
