//! Progressive bracket tax for a single income record.
//!
//! # Calculation
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Allowances are summed per kind and capped |
//! | 2    | Net income = total income − personal deduction − allowances |
//! | 3    | Each bracket taxes the slice of net income inside it |
//! | 4    | Total tax = sum of bracket taxes |
//! | 5    | Withholding is settled against total tax, yielding tax due or a refund |
//!
//! Net income may be negative, in which case every bracket contributes zero.
//! All arithmetic is `f64` and nothing is rounded.
//!
//! # Example
//!
//! ```
//! use itax_core::calculations::IncomeTaxCalculator;
//! use itax_core::{Allowance, DeductionConfig, IncomeRecord};
//!
//! let record = IncomeRecord {
//!     total_income: 500_000.0,
//!     withholding_tax: 0.0,
//!     allowances: vec![Allowance::donation(200_000.0)],
//! };
//! let config = DeductionConfig {
//!     personal_deduction: 60_000.0,
//!     max_k_receipt_deduction: 50_000.0,
//! };
//!
//! let result = IncomeTaxCalculator::default().calculate(&record, &config);
//!
//! assert_eq!(result.net_tax, 19_000.0);
//! assert_eq!(result.refund, 0.0);
//! assert_eq!(result.per_bracket_tax.len(), 5);
//! ```

use tracing::debug;

use crate::calculations::allowance::normalize_allowances;
use crate::{BracketTax, DeductionConfig, IncomeRecord, TaxBracket, TaxResult, tax_brackets};

/// Calculator over a bracket table.
///
/// Brackets must be sorted ascending and contiguous. [`Default`] uses the
/// statutory table from [`tax_brackets`].
#[derive(Debug, Clone, Copy)]
pub struct IncomeTaxCalculator<'a> {
    brackets: &'a [TaxBracket],
}

impl Default for IncomeTaxCalculator<'static> {
    fn default() -> Self {
        Self::new(tax_brackets())
    }
}

impl<'a> IncomeTaxCalculator<'a> {
    pub fn new(brackets: &'a [TaxBracket]) -> Self {
        Self { brackets }
    }

    pub fn brackets(&self) -> &'a [TaxBracket] {
        self.brackets
    }

    /// Computes tax due or refund together with the per-bracket breakdown.
    ///
    /// `record` is expected to have passed
    /// [`validate_record`](crate::calculations::validate_record).
    pub fn calculate(
        &self,
        record: &IncomeRecord,
        config: &DeductionConfig,
    ) -> TaxResult {
        let net_income = self.net_income(record, config);
        let per_bracket_tax = self.bracket_taxes(net_income);
        let total_tax: f64 = per_bracket_tax.iter().map(|b| b.tax).sum();
        let (net_tax, refund) = settle(total_tax, record.withholding_tax);

        debug!(net_income, total_tax, net_tax, refund, "calculated income tax");

        TaxResult {
            net_tax,
            refund,
            per_bracket_tax,
        }
    }

    /// Computes tax due and refund without building a breakdown.
    pub fn calculate_net(
        &self,
        record: &IncomeRecord,
        config: &DeductionConfig,
    ) -> (f64, f64) {
        let net_income = self.net_income(record, config);
        let total_tax = self.total_tax(net_income);
        settle(total_tax, record.withholding_tax)
    }

    /// Income left after the personal deduction and capped allowances.
    pub fn net_income(
        &self,
        record: &IncomeRecord,
        config: &DeductionConfig,
    ) -> f64 {
        let allowances = normalize_allowances(&record.allowances, config.max_k_receipt_deduction);
        record.total_income - config.personal_deduction - allowances.total()
    }

    /// Tax attributed to each bracket, in table order.
    pub fn bracket_taxes(
        &self,
        net_income: f64,
    ) -> Vec<BracketTax> {
        self.brackets
            .iter()
            .map(|bracket| BracketTax {
                label: bracket.label.to_string(),
                tax: bracket.tax_for(net_income),
            })
            .collect()
    }

    /// Tax on `net_income` before withholding.
    pub fn total_tax(
        &self,
        net_income: f64,
    ) -> f64 {
        self.brackets.iter().map(|b| b.tax_for(net_income)).sum()
    }
}

/// Splits the difference between tax and withholding into tax due or refund.
fn settle(
    total_tax: f64,
    withholding_tax: f64,
) -> (f64, f64) {
    if total_tax >= withholding_tax {
        (total_tax - withholding_tax, 0.0)
    } else {
        (0.0, withholding_tax - total_tax)
    }
}
