use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::finance::{add, gst, multiply, round2, subtract, sum_amounts};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BillKind {
    Purchase,
    Sell,
}

impl BillKind {
    /// Name of the collection the external store keeps these bills in.
    pub fn collection(&self) -> &'static str {
        match self {
            BillKind::Purchase => "purchase_bills",
            BillKind::Sell => "sell_bills",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BillKind::Purchase => "Purchase Bill",
            BillKind::Sell => "Sell Bill",
        }
    }

    /// Value persisted in a row's `total` column. Purchase rows keep the
    /// taxable subtotal there, sell rows keep the grand total.
    pub fn stored_total(&self, totals: &BillTotals) -> f64 {
        match self {
            BillKind::Purchase => totals.taxable,
            BillKind::Sell => totals.grand_total,
        }
    }

    /// Rebuilds named totals from a row's `total` and `gst` columns.
    pub fn totals_from_stored(&self, total: f64, gst: f64) -> BillTotals {
        let gst = round2(gst);
        match self {
            BillKind::Purchase => BillTotals {
                taxable: round2(total),
                gst,
                grand_total: add(total, gst),
            },
            BillKind::Sell => BillTotals {
                taxable: subtract(total, gst),
                gst,
                grand_total: round2(total),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    pub metal: String,
    pub rate: f64,
    pub weight: f64,
    pub amount: f64,
}

impl LineItem {
    pub fn new(metal: impl Into<String>, rate: f64, weight: f64) -> Self {
        LineItem {
            metal: metal.into(),
            rate,
            weight,
            amount: multiply(rate, weight),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct BillTotals {
    pub taxable: f64,
    pub gst: f64,
    pub grand_total: f64,
}

impl BillTotals {
    pub fn from_items(items: &[LineItem]) -> Self {
        let taxable = sum_amounts(items.iter().map(|item| item.amount));
        let tax = gst(taxable);
        BillTotals {
            taxable,
            gst: tax,
            grand_total: add(taxable, tax),
        }
    }
}

/// A bill as the external store persists it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BillRow {
    pub id: u64,
    pub bill_number: u64,
    pub customer: String,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub items: Vec<LineItem>,
    pub total: f64,
    pub gst: f64,
    #[serde(with = "timestamp_format")]
    pub created_at: DateTime<Utc>,
}

/// Bill fields supplied on insert; the store assigns `id` and `bill_number`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBillRow {
    pub customer: String,
    pub contact: Option<String>,
    pub description: Option<String>,
    pub items: Vec<LineItem>,
    pub total: f64,
    pub gst: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Bill {
    pub id: u64,
    pub bill_number: u64,
    pub kind: BillKind,
    pub customer: String,
    pub contact: Option<String>,
    pub description: Option<String>,
    pub items: Vec<LineItem>,
    pub totals: BillTotals,
    pub created_at: DateTime<Utc>,
}

impl Bill {
    pub fn from_row(kind: BillKind, row: BillRow) -> Self {
        Bill {
            id: row.id,
            bill_number: row.bill_number,
            kind,
            customer: row.customer,
            contact: row.contact,
            description: row.description,
            items: row.items,
            totals: kind.totals_from_stored(row.total, row.gst),
            created_at: row.created_at,
        }
    }

    pub fn to_row(&self) -> BillRow {
        BillRow {
            id: self.id,
            bill_number: self.bill_number,
            customer: self.customer.clone(),
            contact: self.contact.clone(),
            description: self.description.clone(),
            items: self.items.clone(),
            total: self.kind.stored_total(&self.totals),
            gst: self.totals.gst,
            created_at: self.created_at,
        }
    }
}

impl NewBillRow {
    /// Builds the insert payload for `kind`, totals computed from the items.
    pub fn from_items(
        kind: BillKind,
        customer: String,
        contact: Option<String>,
        description: Option<String>,
        items: Vec<LineItem>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let totals = BillTotals::from_items(&items);
        NewBillRow {
            customer,
            contact,
            description,
            items,
            total: kind.stored_total(&totals),
            gst: totals.gst,
            created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub gst: f64,
    #[serde(with = "timestamp_format")]
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Amount plus GST. Shown to the user, never stored.
    pub fn total(&self) -> f64 {
        add(self.amount, self.gst)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub kind: String,
    pub amount: f64,
    pub description: Option<String>,
    pub gst: f64,
    pub created_at: DateTime<Utc>,
}

/// Serde adapter for `created_at`: writes canonical ISO-8601 UTC, reads every
/// form `ist::parse_timestamp` understands.
pub mod timestamp_format {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    use crate::ist::{parse_timestamp, to_iso};

    pub fn serialize<S>(instant: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&to_iso(*instant))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp '{}'", raw)))
    }
}
