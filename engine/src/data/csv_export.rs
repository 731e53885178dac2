// CSV export of listed bills and expenses.
use csv::WriterBuilder;
use serde::Serialize;
use shared::ist::ReportingZone;
use shared::models::{Bill, Expense};
use std::io::Write;

use crate::error::EngineError;

#[derive(Debug, Serialize)]
struct BillCsvRecord<'a> {
    bill_number: u64,
    date: String,
    customer: &'a str,
    contact: &'a str,
    description: &'a str,
    items: usize,
    taxable: String,
    gst: String,
    grand_total: String,
}

#[derive(Debug, Serialize)]
struct ExpenseCsvRecord<'a> {
    id: u64,
    date: String,
    #[serde(rename = "type")]
    kind: &'a str,
    description: &'a str,
    amount: String,
    gst: String,
    total: String,
}

// Two fixed decimals, no grouping or symbol, so spreadsheets read it as a number.
fn plain_amount(value: f64) -> String {
    format!("{:.2}", value)
}

/// Writes one row per bill and returns the number of rows written.
pub fn write_bills<W: Write>(
    writer: W,
    bills: &[Bill],
    zone: ReportingZone,
) -> Result<usize, EngineError> {
    let mut wtr = WriterBuilder::new().has_headers(true).from_writer(writer);
    for bill in bills {
        wtr.serialize(BillCsvRecord {
            bill_number: bill.bill_number,
            date: zone.format_instant(bill.created_at),
            customer: &bill.customer,
            contact: bill.contact.as_deref().unwrap_or(""),
            description: bill.description.as_deref().unwrap_or(""),
            items: bill.items.len(),
            taxable: plain_amount(bill.totals.taxable),
            gst: plain_amount(bill.totals.gst),
            grand_total: plain_amount(bill.totals.grand_total),
        })?;
    }
    wtr.flush()?;
    Ok(bills.len())
}

pub fn write_expenses<W: Write>(writer: W, expenses: &[Expense], zone: ReportingZone) -> Result<usize, EngineError> {
    let mut wtr = WriterBuilder::new().has_headers(true).from_writer(writer);
    for expense in expenses {
        wtr.serialize(ExpenseCsvRecord {
            id: expense.id,
            date: zone.format_instant(expense.created_at),
            kind: &expense.kind,
            description: expense.description.as_deref().unwrap_or(""),
            amount: plain_amount(expense.amount),
            gst: plain_amount(expense.gst),
            total: plain_amount(expense.total()),
        })?;
    }
    wtr.flush()?;
    Ok(expenses.len())
}
