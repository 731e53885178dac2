// JSON snapshot of a MemoryStore, used by the command line between runs.
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::store::MemoryStore;

/// Loads a snapshot, or an empty store when the file does not exist yet.
pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<MemoryStore> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::info!(path = %path.display(), "No ledger snapshot yet, starting empty.");
        return Ok(MemoryStore::new());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Reading ledger snapshot: {}", path.display()))?;
    let store: MemoryStore = serde_json::from_str(&raw)
        .with_context(|| format!("Parsing ledger snapshot JSON in {}", path.display()))?;
    Ok(store)
}

/// Writes the snapshot next to its destination first, then renames it over.
pub fn save<P: AsRef<Path>>(store: &MemoryStore, path: P) -> Result<()> {
    let path = path.as_ref();
    let encoded = serde_json::to_string_pretty(store).context("Encoding ledger snapshot")?;
    let staging = path.with_extension("json.tmp");
    fs::write(&staging, encoded)
        .with_context(|| format!("Writing ledger snapshot: {}", staging.display()))?;
    fs::rename(&staging, path)
        .with_context(|| format!("Replacing ledger snapshot: {}", path.display()))?;
    tracing::debug!(path = %path.display(), "Saved ledger snapshot.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::store::{BillFilter, RecordStore};
    use chrono::{TimeZone, Utc};
    use shared::ist::TimeWindow;
    use shared::models::{BillKind, LineItem, NewBillRow, NewExpense};
    use tempfile::tempdir;

    #[test]
    fn test_missing_snapshot_is_empty_store() {
        let dir = tempdir().unwrap();
        let store = load_or_default(dir.path().join("ledger.json")).unwrap();
        assert_eq!(store.bill_count(BillKind::Sell), 0);
        assert_eq!(store.expense_count(), 0);
    }

    #[test]
    fn test_save_then_load_keeps_sequences() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let created_at = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();

        let mut store = MemoryStore::new();
        let bill = NewBillRow::from_items(
            BillKind::Purchase,
            "Ravi".into(),
            None,
            None,
            vec![LineItem::new("Silver", 82.5, 120.0)],
            created_at,
        );
        store.insert_bill(BillKind::Purchase, bill.clone()).unwrap();
        store
            .insert_expense(NewExpense { kind: "Rent".into(), amount: 15000.0, description: None, gst: 0.0, created_at })
            .unwrap();
        save(&store, &path).unwrap();

        let mut reloaded = load_or_default(&path).unwrap();
        let rows = reloaded.select_bills(BillKind::Purchase, &BillFilter::Window(TimeWindow::unbounded())).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total, 9900.0);
        assert_eq!(rows[0].created_at, created_at);
        assert_eq!(reloaded.expense_count(), 1);

        let next = reloaded.insert_bill(BillKind::Purchase, bill).unwrap();
        assert_eq!(next.bill_number, 2);
    }

    #[test]
    fn test_corrupt_snapshot_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        fs::write(&path, "[1, 2").unwrap();
        let err = load_or_default(&path).unwrap_err();
        assert!(err.to_string().contains("Parsing ledger snapshot JSON"));
    }
}
