// Record store seam. The shop's records live in an external database; the
// engine only needs insert / select / delete over three collections.
use serde::{Deserialize, Serialize};
use shared::ist::TimeWindow;
use shared::models::{BillKind, BillRow, Expense, NewBillRow, NewExpense};

use crate::error::EngineError;

/// How bill rows are selected. A search term replaces the date filter.
#[derive(Debug, Clone, PartialEq)]
pub enum BillFilter {
    Window(TimeWindow),
    Search(String),
}

pub trait RecordStore: Send + Sync {
    /// Inserts a bill, assigning `id` and the next `bill_number` of its collection.
    fn insert_bill(&mut self, kind: BillKind, bill: NewBillRow) -> Result<BillRow, EngineError>;

    /// Matching rows, newest first.
    fn select_bills(&self, kind: BillKind, filter: &BillFilter) -> Result<Vec<BillRow>, EngineError>;

    fn find_bill(&self, kind: BillKind, id: u64) -> Result<Option<BillRow>, EngineError>;

    /// Returns whether a row was removed.
    fn delete_bill(&mut self, kind: BillKind, id: u64) -> Result<bool, EngineError>;

    fn insert_expense(&mut self, expense: NewExpense) -> Result<Expense, EngineError>;

    /// Rows inside the window, newest first.
    fn select_expenses(&self, window: &TimeWindow) -> Result<Vec<Expense>, EngineError>;

    fn delete_expense(&mut self, id: u64) -> Result<bool, EngineError>;
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct BillTable {
    #[serde(default)]
    last_id: u64,
    #[serde(default)]
    last_bill_number: u64,
    #[serde(default)]
    rows: Vec<BillRow>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ExpenseTable {
    #[serde(default)]
    last_id: u64,
    #[serde(default)]
    rows: Vec<Expense>,
}

/// In-process store. Serializable so the command line can keep it in a JSON file.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MemoryStore {
    #[serde(default)]
    purchase_bills: BillTable,
    #[serde(default)]
    sell_bills: BillTable,
    #[serde(default)]
    expenses: ExpenseTable,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self, kind: BillKind) -> &BillTable {
        match kind {
            BillKind::Purchase => &self.purchase_bills,
            BillKind::Sell => &self.sell_bills,
        }
    }

    fn table_mut(&mut self, kind: BillKind) -> &mut BillTable {
        match kind {
            BillKind::Purchase => &mut self.purchase_bills,
            BillKind::Sell => &mut self.sell_bills,
        }
    }

    pub fn bill_count(&self, kind: BillKind) -> usize {
        self.table(kind).rows.len()
    }

    pub fn expense_count(&self) -> usize {
        self.expenses.rows.len()
    }
}

/// Case-insensitive match on customer, contact or description; a numeric term
/// also matches the bill number exactly.
pub fn matches_search(row: &BillRow, term: &str) -> bool {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    if let Ok(number) = needle.parse::<u64>() {
        if row.bill_number == number {
            return true;
        }
    }
    let contains = |field: Option<&str>| field.map_or(false, |value| value.to_lowercase().contains(&needle));
    contains(Some(row.customer.as_str())) || contains(row.contact.as_deref()) || contains(row.description.as_deref())
}

fn newest_first<T, F>(rows: &mut [T], key: F)
where
    F: Fn(&T) -> (chrono::DateTime<chrono::Utc>, u64),
{
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
}

impl RecordStore for MemoryStore {
    fn insert_bill(&mut self, kind: BillKind, bill: NewBillRow) -> Result<BillRow, EngineError> {
        let table = self.table_mut(kind);
        let id = table
            .last_id
            .checked_add(1)
            .ok_or_else(|| EngineError::StoreError(format!("{} id sequence exhausted", kind.collection())))?;
        let bill_number = table
            .last_bill_number
            .checked_add(1)
            .ok_or_else(|| EngineError::StoreError(format!("{} bill numbers exhausted", kind.collection())))?;
        let row = BillRow {
            id,
            bill_number,
            customer: bill.customer,
            contact: bill.contact,
            description: bill.description,
            items: bill.items,
            total: bill.total,
            gst: bill.gst,
            created_at: bill.created_at,
        };
        table.last_id = id;
        table.last_bill_number = bill_number;
        table.rows.push(row.clone());
        Ok(row)
    }

    fn select_bills(&self, kind: BillKind, filter: &BillFilter) -> Result<Vec<BillRow>, EngineError> {
        let mut rows: Vec<BillRow> = self
            .table(kind)
            .rows
            .iter()
            .filter(|row| match filter {
                BillFilter::Window(window) => window.contains(row.created_at),
                BillFilter::Search(term) => matches_search(row, term),
            })
            .cloned()
            .collect();
        newest_first(&mut rows, |row| (row.created_at, row.id));
        Ok(rows)
    }

    fn find_bill(&self, kind: BillKind, id: u64) -> Result<Option<BillRow>, EngineError> {
        Ok(self.table(kind).rows.iter().find(|row| row.id == id).cloned())
    }

    fn delete_bill(&mut self, kind: BillKind, id: u64) -> Result<bool, EngineError> {
        let rows = &mut self.table_mut(kind).rows;
        let before = rows.len();
        rows.retain(|row| row.id != id);
        Ok(rows.len() != before)
    }

    fn insert_expense(&mut self, expense: NewExpense) -> Result<Expense, EngineError> {
        let id = self
            .expenses
            .last_id
            .checked_add(1)
            .ok_or_else(|| EngineError::StoreError("expenses id sequence exhausted".to_string()))?;
        let row = Expense {
            id,
            kind: expense.kind,
            amount: expense.amount,
            description: expense.description,
            gst: expense.gst,
            created_at: expense.created_at,
        };
        self.expenses.last_id = id;
        self.expenses.rows.push(row.clone());
        Ok(row)
    }

    fn select_expenses(&self, window: &TimeWindow) -> Result<Vec<Expense>, EngineError> {
        let mut rows: Vec<Expense> = self
            .expenses
            .rows
            .iter()
            .filter(|row| window.contains(row.created_at))
            .cloned()
            .collect();
        newest_first(&mut rows, |row| (row.created_at, row.id));
        Ok(rows)
    }

    fn delete_expense(&mut self, id: u64) -> Result<bool, EngineError> {
        let before = self.expenses.rows.len();
        self.expenses.rows.retain(|row| row.id != id);
        Ok(self.expenses.rows.len() != before)
    }
}
