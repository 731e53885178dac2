// Handler for recording a purchase or sell bill
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::data::store::RecordStore;
use crate::error::EngineError;
use crate::models::form::BillForm;
use shared::models::{Bill, BillKind, NewBillRow};

pub async fn handle_record_bill<S: RecordStore>(
    kind: BillKind,
    form: BillForm,
    created_at: DateTime<Utc>,
    store: Arc<RwLock<S>>,
) -> Result<Bill, EngineError> {
    let valid = match form.validate() {
        Ok(valid) => valid,
        Err(e) => {
            tracing::warn!(collection = kind.collection(), error = %e, "Rejected bill form.");
            return Err(e);
        }
    };

    let new_row = NewBillRow::from_items(
        kind,
        valid.customer,
        valid.contact,
        valid.description,
        valid.items,
        created_at,
    );

    let mut guard = store.write().await;
    let row = guard.insert_bill(kind, new_row)?;
    drop(guard);

    let bill = Bill::from_row(kind, row);
    tracing::debug!(
        collection = kind.collection(),
        bill_number = bill.bill_number,
        taxable = bill.totals.taxable,
        gst = bill.totals.gst,
        grand_total = bill.totals.grand_total,
        "Stored bill."
    );
    Ok(bill)
}
