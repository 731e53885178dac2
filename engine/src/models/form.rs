// Entry forms as the operator fills them in: free text, validated before any
// record reaches the store.
use serde::Deserialize;
use shared::finance::{parse_numeric_or_zero, round2};
use shared::models::LineItem;
use shared::utils::non_blank;
use std::str::FromStr;

use crate::error::EngineError;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ItemInput {
    pub metal: String,
    pub rate: String,
    pub weight: String,
}

impl ItemInput {
    pub fn new(metal: &str, rate: &str, weight: &str) -> Self {
        ItemInput {
            metal: metal.to_string(),
            rate: rate.to_string(),
            weight: weight.to_string(),
        }
    }
}

/// `metal:rate:weight`, e.g. `Gold 22K:6250:10.5`. The metal may itself contain `:`.
impl FromStr for ItemInput {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.rsplitn(3, ':');
        let weight = parts.next();
        let rate = parts.next();
        let metal = parts.next();
        match (metal, rate, weight) {
            (Some(metal), Some(rate), Some(weight)) => Ok(ItemInput::new(metal, rate, weight)),
            _ => Err(EngineError::ValidationError(format!(
                "Item '{}' must look like metal:rate:weight",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct BillForm {
    pub customer: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub description: String,
    pub items: Vec<ItemInput>,
}

/// A bill form that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidBill {
    pub customer: String,
    pub contact: Option<String>,
    pub description: Option<String>,
    pub items: Vec<LineItem>,
}

impl BillForm {
    pub fn validate(&self) -> Result<ValidBill, EngineError> {
        let customer = non_blank(&self.customer)
            .ok_or_else(|| EngineError::ValidationError("Customer Name is required".to_string()))?;
        if self.items.is_empty() {
            return Err(EngineError::ValidationError("Add at least one item".to_string()));
        }
        if self
            .items
            .iter()
            .any(|i| i.metal.trim().is_empty() || i.rate.trim().is_empty() || i.weight.trim().is_empty())
        {
            return Err(EngineError::ValidationError("Please fill all item details".to_string()));
        }

        let mut items = Vec::with_capacity(self.items.len());
        for input in &self.items {
            let rate = parse_numeric_or_zero(&input.rate);
            let weight = parse_numeric_or_zero(&input.weight);
            if rate <= 0.0 || weight <= 0.0 {
                return Err(EngineError::ValidationError(
                    "Weight and Rate must be greater than 0".to_string(),
                ));
            }
            items.push(LineItem::new(input.metal.trim(), rate, weight));
        }

        Ok(ValidBill {
            customer,
            contact: non_blank(&self.contact),
            description: non_blank(&self.description),
            items,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ExpenseForm {
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub gst: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidExpense {
    pub kind: String,
    pub amount: f64,
    pub description: Option<String>,
    pub gst: f64,
}

impl ExpenseForm {
    pub fn validate(&self) -> Result<ValidExpense, EngineError> {
        let kind = match non_blank(&self.kind) {
            Some(kind) if !self.amount.trim().is_empty() => kind,
            _ => return Err(EngineError::ValidationError("Fill all fields".to_string())),
        };
        let amount = round2(parse_numeric_or_zero(&self.amount));
        let gst = round2(parse_numeric_or_zero(&self.gst));
        if amount < 0.0 || gst < 0.0 {
            return Err(EngineError::ValidationError(
                "Amount and GST cannot be negative".to_string(),
            ));
        }
        Ok(ValidExpense {
            kind,
            amount,
            description: non_blank(&self.description),
            gst,
        })
    }
}
