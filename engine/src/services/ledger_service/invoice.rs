// Printable plain-text invoice for a stored bill
use shared::finance::format_currency;
use shared::ist::ReportingZone;
use shared::models::{Bill, BillKind};
use std::fmt::Write as _;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::helpers::bill_label;
use crate::config::settings::ShopSettings;
use crate::data::store::RecordStore;
use crate::error::EngineError;

const WIDTH: usize = 56;

pub async fn handle_find_bill<S: RecordStore>(
    kind: BillKind,
    id: u64,
    store: Arc<RwLock<S>>,
) -> Result<Bill, EngineError> {
    let guard = store.read().await;
    match guard.find_bill(kind, id)? {
        Some(row) => Ok(Bill::from_row(kind, row)),
        None => Err(EngineError::NotFound(bill_label(kind, id))),
    }
}

fn centered(out: &mut String, text: &str) {
    let _ = writeln!(out, "{:^width$}", text, width = WIDTH);
}

pub fn render_invoice(bill: &Bill, shop: &ShopSettings, zone: ReportingZone) -> String {
    let rule = "=".repeat(WIDTH);
    let thin = "-".repeat(WIDTH);
    let mut out = String::new();

    let _ = writeln!(out, "{}", rule);
    centered(&mut out, &shop.name);
    centered(&mut out, bill.kind.label());
    if !shop.contact.trim().is_empty() {
        centered(&mut out, &format!("Contact: {}", shop.contact));
    }
    let _ = writeln!(out, "{}", rule);

    let party = match bill.kind {
        BillKind::Purchase => "Vendor / Customer",
        BillKind::Sell => "Customer",
    };
    let _ = writeln!(out, "{}: {}", party, bill.customer);
    let _ = writeln!(out, "Contact: {}", bill.contact.as_deref().unwrap_or("N/A"));
    if let Some(description) = &bill.description {
        let _ = writeln!(out, "Note: {}", description);
    }
    let _ = writeln!(out, "Bill No: {}", bill.bill_number);
    let _ = writeln!(out, "Date: {}", zone.format_instant(bill.created_at));
    let _ = writeln!(out, "{}", thin);

    let _ = writeln!(out, "{:<16}{:>12}{:>12}{:>16}", "Item", "Rate (₹)", "Weight (g)", "Amount (₹)");
    for item in &bill.items {
        let _ = writeln!(
            out,
            "{:<16}{:>12}{:>12}{:>16}",
            item.metal,
            item.rate,
            item.weight,
            format_currency(item.amount)
        );
    }
    let _ = writeln!(out, "{}", thin);

    let grand_label = match bill.kind {
        BillKind::Purchase => "Total Paid",
        BillKind::Sell => "Total",
    };
    let _ = writeln!(out, "{:>38}{:>18}", "Subtotal:", format_currency(bill.totals.taxable));
    let _ = writeln!(out, "{:>38}{:>18}", "GST (3%):", format_currency(bill.totals.gst));
    let _ = writeln!(out, "{:>38}{:>18}", format!("{}:", grand_label), format_currency(bill.totals.grand_total));
    let _ = writeln!(out, "{}", thin);
    centered(&mut out, &shop.footer);
    out
}
