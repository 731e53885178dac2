// Monthly dashboard rollup over the three record collections.
use serde::Serialize;

use crate::finance::{add, subtract};
use crate::models::{Bill, Expense};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Default)]
pub struct CategoryStats {
    pub count: usize,
    /// Taxable amount.
    pub amount: f64,
    pub gst: f64,
    /// Amount plus GST.
    pub total: f64,
}

impl CategoryStats {
    pub fn from_bills(bills: &[Bill]) -> Self {
        bills.iter().fold(CategoryStats::default(), |acc, bill| CategoryStats {
            count: acc.count + 1,
            amount: add(acc.amount, bill.totals.taxable),
            gst: add(acc.gst, bill.totals.gst),
            total: add(acc.total, bill.totals.grand_total),
        })
    }

    pub fn from_expenses(expenses: &[Expense]) -> Self {
        expenses.iter().fold(CategoryStats::default(), |acc, expense| CategoryStats {
            count: acc.count + 1,
            amount: add(acc.amount, expense.amount),
            gst: add(acc.gst, expense.gst),
            total: add(acc.total, expense.total()),
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Default)]
pub struct DashboardSummary {
    pub sales: CategoryStats,
    pub purchases: CategoryStats,
    pub expenses: CategoryStats,
}

impl DashboardSummary {
    pub fn from_records(sells: &[Bill], purchases: &[Bill], expenses: &[Expense]) -> Self {
        DashboardSummary {
            sales: CategoryStats::from_bills(sells),
            purchases: CategoryStats::from_bills(purchases),
            expenses: CategoryStats::from_expenses(expenses),
        }
    }

    /// GST collected on sales minus GST paid on purchases and expenses.
    /// Positive means tax is payable.
    pub fn net_gst(&self) -> f64 {
        subtract(self.sales.gst, add(self.purchases.gst, self.expenses.gst))
    }

    pub fn outflow(&self) -> f64 {
        add(self.purchases.total, self.expenses.total)
    }

    pub fn net_profit(&self) -> f64 {
        subtract(self.sales.total, self.outflow())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BillKind, BillTotals, LineItem};
    use chrono::Utc;

    fn bill(kind: BillKind, rate: f64, weight: f64) -> Bill {
        let items = vec![LineItem::new("Gold", rate, weight)];
        Bill {
            id: 1,
            bill_number: 1,
            kind,
            customer: "Test".to_string(),
            contact: None,
            description: None,
            totals: BillTotals::from_items(&items),
            items,
            created_at: Utc::now(),
        }
    }

    fn expense(amount: f64, gst: f64) -> Expense {
        Expense {
            id: 1,
            kind: "Electricity".to_string(),
            amount,
            description: None,
            gst,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_summary() {
        let summary = DashboardSummary::from_records(&[], &[], &[]);
        assert_eq!(summary, DashboardSummary::default());
        assert_eq!(summary.net_profit(), 0.0);
    }

    #[test]
    fn test_rollup_reads_named_totals() {
        let sells = vec![bill(BillKind::Sell, 1000.0, 1.0), bill(BillKind::Sell, 500.0, 2.0)];
        let purchases = vec![bill(BillKind::Purchase, 800.0, 1.0)];
        let expenses = vec![expense(100.0, 18.0)];
        let summary = DashboardSummary::from_records(&sells, &purchases, &expenses);

        assert_eq!(summary.sales.count, 2);
        assert_eq!(summary.sales.amount, 2000.0);
        assert_eq!(summary.sales.gst, 60.0);
        assert_eq!(summary.sales.total, 2060.0);

        assert_eq!(summary.purchases.amount, 800.0);
        assert_eq!(summary.purchases.gst, 24.0);
        assert_eq!(summary.purchases.total, 824.0);

        assert_eq!(summary.expenses.total, 118.0);

        assert_eq!(summary.net_gst(), 18.0);
        assert_eq!(summary.outflow(), 942.0);
        assert_eq!(summary.net_profit(), 1118.0);
    }
}
