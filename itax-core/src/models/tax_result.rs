use serde::{Deserialize, Serialize};

/// Tax attributed to a single bracket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketTax {
    #[serde(rename = "level")]
    pub label: String,
    pub tax: f64,
}

/// Outcome of a single-record calculation.
///
/// `net_tax` and `refund` are never both positive. `per_bracket_tax` always
/// lists every bracket in table order, zero entries included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxResult {
    #[serde(rename = "tax")]
    pub net_tax: f64,

    #[serde(
        rename = "taxRefund",
        default,
        skip_serializing_if = "is_zero"
    )]
    pub refund: f64,

    #[serde(rename = "taxLevel")]
    pub per_bracket_tax: Vec<BracketTax>,
}

impl TaxResult {
    /// Sum of the per-bracket entries, i.e. tax before withholding.
    pub fn total_tax(&self) -> f64 {
        self.per_bracket_tax.iter().map(|b| b.tax).sum()
    }
}

/// Outcome for one row of a batch calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRowResult {
    pub total_income: f64,
    pub tax: f64,
    pub tax_refund: f64,
}

/// All rows of a batch calculation, in input order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BatchResult {
    pub taxes: Vec<BatchRowResult>,
}

fn is_zero(value: &f64) -> bool {
    *value == 0.0
}
