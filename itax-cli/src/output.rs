//! JSON shapes printed by the `itax` commands.

use anyhow::Result;
use itax_core::calculations::common::round_half_up;
use itax_core::{BatchResult, BatchRowResult, BracketTax, DeductionConfig, TaxResult};
use serde::Serialize;

/// Current deduction settings, as printed by `deductions show`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeductionsView {
    pub personal_deduction: f64,
    pub k_receipt: f64,
}

impl From<DeductionConfig> for DeductionsView {
    fn from(config: DeductionConfig) -> Self {
        Self {
            personal_deduction: config.personal_deduction,
            k_receipt: config.max_k_receipt_deduction,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalDeductionView {
    pub personal_deduction: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KReceiptView {
    pub k_receipt: f64,
}

/// The result of one command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Report {
    Tax(TaxResult),
    Batch(BatchResult),
    Deductions(DeductionsView),
    PersonalDeduction(PersonalDeductionView),
    KReceipt(KReceiptView),
}

impl Report {
    /// Copy of the report with every amount rounded half-up to cents.
    pub fn rounded(&self) -> Self {
        let r = round_half_up;
        match self {
            Self::Tax(result) => Self::Tax(TaxResult {
                net_tax: r(result.net_tax),
                refund: r(result.refund),
                per_bracket_tax: result
                    .per_bracket_tax
                    .iter()
                    .map(|b| BracketTax {
                        label: b.label.clone(),
                        tax: r(b.tax),
                    })
                    .collect(),
            }),
            Self::Batch(batch) => Self::Batch(BatchResult {
                taxes: batch
                    .taxes
                    .iter()
                    .map(|row| BatchRowResult {
                        total_income: r(row.total_income),
                        tax: r(row.tax),
                        tax_refund: r(row.tax_refund),
                    })
                    .collect(),
            }),
            Self::Deductions(view) => Self::Deductions(DeductionsView {
                personal_deduction: r(view.personal_deduction),
                k_receipt: r(view.k_receipt),
            }),
            Self::PersonalDeduction(view) => Self::PersonalDeduction(PersonalDeductionView {
                personal_deduction: r(view.personal_deduction),
            }),
            Self::KReceipt(view) => Self::KReceipt(KReceiptView {
                k_receipt: r(view.k_receipt),
            }),
        }
    }
}

/// Pretty-printed JSON for `report`.
pub fn render(
    report: &Report,
    round_cents: bool,
) -> Result<String> {
    let json = if round_cents {
        serde_json::to_string_pretty(&report.rounded())?
    } else {
        serde_json::to_string_pretty(report)?
    };
    Ok(json)
}
