// Helper functions shared by the ledger_service handlers
use shared::ist::{ReportingZone, TimeWindow};
use shared::models::{Bill, BillKind};
use tokio::sync::RwLock;

use crate::data::store::{BillFilter, RecordStore};
use crate::error::EngineError;
use crate::models::query::{BillQuery, Period};

pub fn window_for(period: &Period, zone: ReportingZone) -> Result<TimeWindow, EngineError> {
    match period {
        Period::Month { month, year } => zone
            .month_range(*month, *year)
            .map(TimeWindow::half_open)
            .ok_or_else(|| EngineError::PeriodError(format!("month {} of year {} is out of range", month, year))),
        Period::Range { start, end } => {
            let lower = zone.date_bound(start.as_deref(), false);
            let upper = zone.date_bound(end.as_deref(), true);
            if let (Some(lower), Some(upper)) = (lower, upper) {
                if lower > upper {
                    tracing::debug!(?start, ?end, "Date range is inverted; it will match nothing.");
                }
            }
            Ok(TimeWindow::closed(lower, upper))
        }
    }
}

/// A non-blank search term wins over the period.
pub fn bill_filter(query: &BillQuery, zone: ReportingZone) -> Result<BillFilter, EngineError> {
    match query.search.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => Ok(BillFilter::Search(term.to_string())),
        _ => Ok(BillFilter::Window(window_for(&query.period, zone)?)),
    }
}

pub async fn read_bills<S: RecordStore>(
    store: &RwLock<S>,
    kind: BillKind,
    filter: &BillFilter,
) -> Result<Vec<Bill>, EngineError> {
    let guard = store.read().await;
    let rows = guard.select_bills(kind, filter)?;
    drop(guard);
    Ok(rows.into_iter().map(|row| Bill::from_row(kind, row)).collect())
}

pub fn bill_label(kind: BillKind, id: u64) -> String {
    format!("{} {}", kind.label().to_lowercase(), id)
}
