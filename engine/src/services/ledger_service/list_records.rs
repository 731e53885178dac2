// Handlers for the month / date-range list views
use shared::ist::ReportingZone;
use shared::models::{Bill, BillKind, Expense};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::helpers::{bill_filter, read_bills, window_for};
use crate::data::store::RecordStore;
use crate::error::EngineError;
use crate::models::query::{BillQuery, Period};

pub async fn handle_list_bills<S: RecordStore>(
    kind: BillKind,
    query: &BillQuery,
    zone: ReportingZone,
    store: Arc<RwLock<S>>,
) -> Result<Vec<Bill>, EngineError> {
    let filter = bill_filter(query, zone)?;
    let bills = read_bills(&store, kind, &filter).await?;
    if bills.is_empty() {
        tracing::debug!(collection = kind.collection(), ?filter, "No bills matched.");
    }
    Ok(bills)
}

pub async fn handle_list_expenses<S: RecordStore>(
    period: &Period,
    zone: ReportingZone,
    store: Arc<RwLock<S>>,
) -> Result<Vec<Expense>, EngineError> {
    let window = window_for(period, zone)?;
    let guard = store.read().await;
    let expenses = guard.select_expenses(&window)?;
    Ok(expenses)
}
