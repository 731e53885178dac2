// Handlers for deleting bills and expenses. Records are never edited; removing
// one needs the operator to type DELETE.
use shared::models::BillKind;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::helpers::bill_label;
use crate::data::store::RecordStore;
use crate::error::EngineError;

pub const DELETE_CONFIRMATION: &str = "DELETE";

fn check_confirmation(confirmation: &str, target: &str) -> Result<(), EngineError> {
    if confirmation == DELETE_CONFIRMATION {
        Ok(())
    } else {
        tracing::warn!(target_record = %target, "Delete not confirmed; nothing removed.");
        Err(EngineError::DeleteNotConfirmed(target.to_string()))
    }
}

pub async fn handle_delete_bill<S: RecordStore>(
    kind: BillKind,
    id: u64,
    confirmation: &str,
    store: Arc<RwLock<S>>,
) -> Result<(), EngineError> {
    let target = bill_label(kind, id);
    check_confirmation(confirmation, &target)?;

    let mut guard = store.write().await;
    if guard.delete_bill(kind, id)? {
        Ok(())
    } else {
        Err(EngineError::NotFound(target))
    }
}

pub async fn handle_delete_expense<S: RecordStore>(
    id: u64,
    confirmation: &str,
    store: Arc<RwLock<S>>,
) -> Result<(), EngineError> {
    let target = format!("expense {}", id);
    check_confirmation(confirmation, &target)?;

    let mut guard = store.write().await;
    if guard.delete_expense(id)? {
        Ok(())
    } else {
        Err(EngineError::NotFound(target))
    }
}
