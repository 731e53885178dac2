// engine/src/services/ledger_service/mod.rs
// LedgerService owns the shared store handle and dispatches each operation to
// its handler module.

use shared::ist::ReportingZone;
use shared::models::{Bill, BillKind, Expense};
use std::io::Write;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::clock::{Clock, SystemClock};
use crate::config::settings::ShopSettings;
use crate::data::csv_export;
use crate::data::store::RecordStore;
use crate::error::EngineError;
use crate::models::form::{BillForm, ExpenseForm};
use crate::models::query::{BillQuery, Period};

pub mod dashboard;
pub mod delete_record;
pub mod helpers;
pub mod invoice;
pub mod list_records;
pub mod record_bill;
pub mod record_expense;

pub use dashboard::DashboardReport;

pub struct LedgerService<S: RecordStore> {
    store: Arc<RwLock<S>>,
    zone: ReportingZone,
    clock: Arc<dyn Clock>,
}

impl<S: RecordStore> LedgerService<S> {
    pub fn new(store: Arc<RwLock<S>>, zone: ReportingZone) -> Self {
        Self::with_clock(store, zone, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<RwLock<S>>, zone: ReportingZone, clock: Arc<dyn Clock>) -> Self {
        LedgerService { store, zone, clock }
    }

    pub fn zone(&self) -> ReportingZone {
        self.zone
    }

    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }

    pub fn store(&self) -> Arc<RwLock<S>> {
        self.store.clone()
    }

    pub async fn record_bill(&self, kind: BillKind, form: BillForm) -> Result<Bill, EngineError> {
        tracing::info!(
            collection = kind.collection(),
            customer = %form.customer,
            items = form.items.len(),
            "Received bill, dispatching to handler."
        );
        record_bill::handle_record_bill(kind, form, self.clock.now(), self.store.clone()).await
    }

    pub async fn record_expense(&self, form: ExpenseForm) -> Result<Expense, EngineError> {
        tracing::info!(kind = %form.kind, amount = %form.amount, "Received expense, dispatching to handler.");
        record_expense::handle_record_expense(form, self.clock.now(), self.store.clone()).await
    }

    pub async fn list_bills(&self, kind: BillKind, query: &BillQuery) -> Result<Vec<Bill>, EngineError> {
        tracing::info!(
            collection = kind.collection(),
            period = %query.period.label(),
            search = ?query.search,
            "Listing bills."
        );
        list_records::handle_list_bills(kind, query, self.zone, self.store.clone()).await
    }

    pub async fn list_expenses(&self, period: &Period) -> Result<Vec<Expense>, EngineError> {
        tracing::info!(period = %period.label(), "Listing expenses.");
        list_records::handle_list_expenses(period, self.zone, self.store.clone()).await
    }

    pub async fn delete_bill(&self, kind: BillKind, id: u64, confirmation: &str) -> Result<(), EngineError> {
        tracing::info!(collection = kind.collection(), id, "Received bill delete.");
        delete_record::handle_delete_bill(kind, id, confirmation, self.store.clone()).await
    }

    pub async fn delete_expense(&self, id: u64, confirmation: &str) -> Result<(), EngineError> {
        tracing::info!(id, "Received expense delete.");
        delete_record::handle_delete_expense(id, confirmation, self.store.clone()).await
    }

    /// `month` is 0-based.
    pub async fn dashboard(&self, month: i32, year: i32) -> Result<DashboardReport, EngineError> {
        tracing::info!(month, year, "Building dashboard.");
        dashboard::handle_dashboard(month, year, self.zone, self.store.clone()).await
    }

    pub async fn invoice(&self, kind: BillKind, id: u64, shop: &ShopSettings) -> Result<String, EngineError> {
        tracing::info!(collection = kind.collection(), id, "Rendering invoice.");
        let bill = invoice::handle_find_bill(kind, id, self.store.clone()).await?;
        Ok(invoice::render_invoice(&bill, shop, self.zone))
    }

    pub async fn export_bills_csv<W: Write>(
        &self,
        kind: BillKind,
        query: &BillQuery,
        writer: W,
    ) -> Result<usize, EngineError> {
        let bills = self.list_bills(kind, query).await?;
        csv_export::write_bills(writer, &bills, self.zone)
    }

    pub async fn export_expenses_csv<W: Write>(&self, period: &Period, writer: W) -> Result<usize, EngineError> {
        let expenses = self.list_expenses(period).await?;
        csv_export::write_expenses(writer, &expenses, self.zone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::store::MemoryStore;
    use crate::models::form::ItemInput;
    use crate::services::clock::FixedClock;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use shared::finance::{add, gst, multiply};
    use shared::ist::ist_month_range;

    fn create_test_service(now: DateTime<Utc>) -> LedgerService<MemoryStore> {
        let store = Arc::new(RwLock::new(MemoryStore::new()));
        LedgerService::with_clock(store, ReportingZone::IST, Arc::new(FixedClock(now)))
    }

    // Service sharing the store with `base` but stamping a different instant.
    fn at(base: &LedgerService<MemoryStore>, now: DateTime<Utc>) -> LedgerService<MemoryStore> {
        LedgerService::with_clock(base.store(), base.zone(), Arc::new(FixedClock(now)))
    }

    fn mid_january() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
    }

    fn bill_form(customer: &str, items: &[(&str, &str, &str)]) -> BillForm {
        BillForm {
            customer: customer.to_string(),
            contact: String::new(),
            description: String::new(),
            items: items.iter().map(|(m, r, w)| ItemInput::new(m, r, w)).collect(),
        }
    }

    fn expense_form(kind: &str, amount: &str, gst: &str) -> ExpenseForm {
        ExpenseForm {
            kind: kind.to_string(),
            amount: amount.to_string(),
            description: String::new(),
            gst: gst.to_string(),
        }
    }

    fn january() -> Period {
        Period::Month { month: 0, year: 2026 }
    }

    #[tokio::test]
    async fn test_sell_bill_persists_grand_total() {
        let service = create_test_service(mid_january());
        let bill = service
            .record_bill(BillKind::Sell, bill_form("Asha", &[("Gold", "6250", "10.5"), ("Silver", "82.5", "120")]))
            .await
            .unwrap();

        let subtotal = add(multiply(6250.0, 10.5), multiply(82.5, 120.0));
        assert_eq!(bill.totals.taxable, subtotal);
        assert_eq!(bill.totals.grand_total, add(subtotal, gst(subtotal)));
        assert_eq!(bill.bill_number, 1);

        let store = service.store();
        let guard = store.read().await;
        let row = guard.find_bill(BillKind::Sell, bill.id).unwrap().unwrap();
        assert_eq!(row.total, add(subtotal, gst(subtotal)));
        assert_eq!(row.gst, gst(subtotal));
        assert_eq!(row.created_at, mid_january());
    }

    #[tokio::test]
    async fn test_purchase_bill_persists_subtotal() {
        let service = create_test_service(mid_january());
        let bill = service
            .record_bill(BillKind::Purchase, bill_form("Ravi", &[("Gold", "6000", "2")]))
            .await
            .unwrap();

        let store = service.store();
        let guard = store.read().await;
        let row = guard.find_bill(BillKind::Purchase, bill.id).unwrap().unwrap();
        assert_eq!(row.total, 12000.0);
        assert_eq!(row.gst, 360.0);
        assert_eq!(bill.totals.grand_total, add(row.total, row.gst));
    }

    #[tokio::test]
    async fn test_invalid_bill_is_not_stored() {
        let service = create_test_service(mid_january());
        let result = service.record_bill(BillKind::Sell, bill_form("Asha", &[("Gold", "0", "2")])).await;
        assert!(matches!(result, Err(EngineError::ValidationError(_))));
        assert_eq!(service.store().read().await.bill_count(BillKind::Sell), 0);
    }

    #[tokio::test]
    async fn test_month_listing_is_half_open() {
        let range = ist_month_range(0, 2026).unwrap();
        let base = create_test_service(range.start);
        base.record_bill(BillKind::Purchase, bill_form("first", &[("Gold", "1", "1")])).await.unwrap();
        at(&base, range.end - Duration::milliseconds(1))
            .record_bill(BillKind::Purchase, bill_form("last", &[("Gold", "1", "1")]))
            .await
            .unwrap();
        at(&base, range.end)
            .record_bill(BillKind::Purchase, bill_form("february", &[("Gold", "1", "1")]))
            .await
            .unwrap();

        let bills = base.list_bills(BillKind::Purchase, &BillQuery::for_period(january())).await.unwrap();
        let names: Vec<&str> = bills.iter().map(|b| b.customer.as_str()).collect();
        assert_eq!(names, vec!["last", "first"]);
    }

    #[tokio::test]
    async fn test_range_listing_is_closed() {
        let day_start = ReportingZone::IST.date_bound(Some("2026-01-10"), false).unwrap();
        let day_end = ReportingZone::IST.date_bound(Some("2026-01-10"), true).unwrap();
        let base = create_test_service(day_start);
        base.record_bill(BillKind::Sell, bill_form("opening", &[("Gold", "1", "1")])).await.unwrap();
        at(&base, day_end)
            .record_bill(BillKind::Sell, bill_form("closing", &[("Gold", "1", "1")]))
            .await
            .unwrap();
        at(&base, day_end + Duration::milliseconds(1))
            .record_bill(BillKind::Sell, bill_form("next day", &[("Gold", "1", "1")]))
            .await
            .unwrap();

        let period = Period::Range { start: Some("2026-01-10".into()), end: Some("2026-01-10".into()) };
        let bills = base.list_bills(BillKind::Sell, &BillQuery::for_period(period)).await.unwrap();
        assert_eq!(bills.len(), 2);

        let open_start = Period::Range { start: None, end: Some("2026-01-10".into()) };
        let bills = base.list_bills(BillKind::Sell, &BillQuery::for_period(open_start)).await.unwrap();
        assert_eq!(bills.len(), 2);
    }

    #[tokio::test]
    async fn test_search_ignores_period() {
        let service = create_test_service(mid_january());
        service.record_bill(BillKind::Sell, bill_form("Meena Shah", &[("Gold", "1", "1")])).await.unwrap();
        let query = BillQuery::search("meena", Period::Month { month: 5, year: 2020 });
        let bills = service.list_bills(BillKind::Sell, &query).await.unwrap();
        assert_eq!(bills.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_requires_typed_confirmation() {
        let service = create_test_service(mid_january());
        let bill = service.record_bill(BillKind::Sell, bill_form("Asha", &[("Gold", "1", "1")])).await.unwrap();

        let refused = service.delete_bill(BillKind::Sell, bill.id, "delete").await;
        assert!(matches!(refused, Err(EngineError::DeleteNotConfirmed(_))));
        assert_eq!(service.store().read().await.bill_count(BillKind::Sell), 1);

        service.delete_bill(BillKind::Sell, bill.id, "DELETE").await.unwrap();
        assert_eq!(service.store().read().await.bill_count(BillKind::Sell), 0);

        let missing = service.delete_bill(BillKind::Sell, bill.id, "DELETE").await;
        assert!(matches!(missing, Err(EngineError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_expense_record_list_delete() {
        let service = create_test_service(mid_january());
        let expense = service.record_expense(expense_form("Electricity", "1200", "216")).await.unwrap();
        assert_eq!(expense.total(), 1416.0);

        let listed = service.list_expenses(&january()).await.unwrap();
        assert_eq!(listed, vec![expense.clone()]);

        assert!(service.delete_expense(expense.id, "").await.is_err());
        service.delete_expense(expense.id, "DELETE").await.unwrap();
        assert!(service.list_expenses(&january()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dashboard_rollup() {
        let service = create_test_service(mid_january());
        service.record_bill(BillKind::Sell, bill_form("A", &[("Gold", "1000", "1")])).await.unwrap();
        service.record_bill(BillKind::Sell, bill_form("B", &[("Gold", "500", "2")])).await.unwrap();
        service.record_bill(BillKind::Purchase, bill_form("C", &[("Gold", "800", "1")])).await.unwrap();
        service.record_expense(expense_form("Rent", "100", "18")).await.unwrap();
        at(&service, Utc.with_ymd_and_hms(2026, 2, 10, 0, 0, 0).unwrap())
            .record_bill(BillKind::Sell, bill_form("February", &[("Gold", "99999", "1")]))
            .await
            .unwrap();

        let report = service.dashboard(0, 2026).await.unwrap();
        assert_eq!(report.label, "January 2026");
        let summary = report.summary;
        assert_eq!(summary.sales.count, 2);
        assert_eq!(summary.sales.amount, 2000.0);
        assert_eq!(summary.sales.gst, 60.0);
        assert_eq!(summary.sales.total, 2060.0);
        assert_eq!(summary.purchases.total, 824.0);
        assert_eq!(summary.expenses.total, 118.0);
        assert_eq!(summary.net_gst(), 18.0);
        assert_eq!(summary.net_profit(), 1118.0);
    }

    #[tokio::test]
    async fn test_invoice_for_missing_bill() {
        let service = create_test_service(mid_january());
        let result = service.invoice(BillKind::Purchase, 9, &ShopSettings::default()).await;
        assert!(matches!(result, Err(EngineError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_invoice_renders_stored_bill() {
        let service = create_test_service(mid_january());
        let bill = service.record_bill(BillKind::Purchase, bill_form("Ravi", &[("Gold", "6000", "2")])).await.unwrap();
        let text = service.invoice(BillKind::Purchase, bill.id, &ShopSettings::default()).await.unwrap();
        assert!(text.contains("Bill No: 1"));
        assert!(text.contains("₹12,360.00"));
    }

    #[tokio::test]
    async fn test_export_bills_csv() {
        let service = create_test_service(mid_january());
        service.record_bill(BillKind::Sell, bill_form("Asha", &[("Gold", "6000", "2")])).await.unwrap();
        let mut out = Vec::new();
        let written = service
            .export_bills_csv(BillKind::Sell, &BillQuery::for_period(january()), &mut out)
            .await
            .unwrap();
        assert_eq!(written, 1);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("12000.00,360.00,12360.00"));
    }

    #[tokio::test]
    async fn test_export_expenses_csv() {
        let service = create_test_service(mid_january());
        service.record_expense(expense_form("Rent", "15000", "")).await.unwrap();
        let mut out = Vec::new();
        let written = service.export_expenses_csv(&january(), &mut out).await.unwrap();
        assert_eq!(written, 1);
        assert!(String::from_utf8(out).unwrap().contains("Rent,,15000.00,0.00,15000.00"));
    }
}
