// Handler for recording a miscellaneous expense
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::data::store::RecordStore;
use crate::error::EngineError;
use crate::models::form::ExpenseForm;
use shared::models::{Expense, NewExpense};

pub async fn handle_record_expense<S: RecordStore>(
    form: ExpenseForm,
    created_at: DateTime<Utc>,
    store: Arc<RwLock<S>>,
) -> Result<Expense, EngineError> {
    let valid = form.validate().map_err(|e| {
        tracing::warn!(error = %e, "Rejected expense form.");
        e
    })?;

    let mut guard = store.write().await;
    let expense = guard.insert_expense(NewExpense {
        kind: valid.kind,
        amount: valid.amount,
        description: valid.description,
        gst: valid.gst,
        created_at,
    })?;
    drop(guard);

    tracing::debug!(id = expense.id, kind = %expense.kind, total = expense.total(), "Stored expense.");
    Ok(expense)
}
