// Currency arithmetic for bills and expenses.
// Every figure is scaled by 100, rounded to an integer and scaled back, with an
// EPSILON nudge so values like 1.005 land on the expected side of the half.
use crate::utils::group_indian;

/// Flat GST rate applied to bill subtotals.
pub const GST_RATE: f64 = 0.03;

pub const CURRENCY_SYMBOL: &str = "₹";

/// NaN and infinities become zero; every other value passes through.
pub fn finite_or_zero(x: f64) -> f64 {
    if x.is_finite() {
        x
    } else {
        0.0
    }
}

/// Coerces a form field into a number. Blank or non-numeric text is zero.
pub fn parse_numeric_or_zero(input: &str) -> f64 {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().map(finite_or_zero).unwrap_or(0.0)
}

/// Magnitude from which every f64 is a whole number, so there are no cents to round.
const WHOLE_NUMBERS_FROM: f64 = 4_503_599_627_370_496.0; // 2^52

/// Rounds to two decimals. Halves go away from zero for non-negative values
/// only: the EPSILON nudge pulls negative halves toward zero (`-1.005` is `-1.0`).
/// Very large values are returned unchanged, so the result is always finite.
pub fn round2(x: f64) -> f64 {
    let n = finite_or_zero(x);
    if n.abs() >= WHOLE_NUMBERS_FROM {
        return n;
    }
    ((n + f64::EPSILON) * 100.0).round() / 100.0
}

pub fn add(a: f64, b: f64) -> f64 {
    round2(finite_or_zero(a) + finite_or_zero(b))
}

pub fn subtract(a: f64, b: f64) -> f64 {
    round2(finite_or_zero(a) - finite_or_zero(b))
}

/// Rate × weight for a line item.
pub fn multiply(a: f64, b: f64) -> f64 {
    round2(finite_or_zero(a) * finite_or_zero(b))
}

pub fn gst(amount: f64) -> f64 {
    multiply(amount, GST_RATE)
}

/// Folds amounts with `add`, so the running subtotal stays rounded at every step.
pub fn sum_amounts<I>(amounts: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    amounts.into_iter().fold(0.0, add)
}

/// Formats an amount as rupees with lakh/crore grouping, e.g. `₹1,20,500.50`.
pub fn format_currency(amount: f64) -> String {
    let value = round2(amount);
    let fixed = format!("{:.2}", value.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{}{}.{}", sign, CURRENCY_SYMBOL, group_indian(integer), fraction)
}
