//! Reduction of itemized allowances into capped totals.

use crate::{Allowance, AllowanceKind};

/// Hard ceiling on the donation allowance, independent of configuration.
pub const MAX_DONATION_DEDUCTION: f64 = 100_000.0;

/// Allowance totals after each category's ceiling has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NormalizedAllowances {
    pub donation: f64,
    pub k_receipt: f64,
}

impl NormalizedAllowances {
    /// Combined amount deducted from income.
    pub fn total(&self) -> f64 {
        self.donation + self.k_receipt
    }
}

/// Sums allowances per kind and caps each sum.
///
/// Donations are capped at [`MAX_DONATION_DEDUCTION`]; k-receipts at
/// `max_k_receipt`. The cap applies to the sum, not to individual entries.
pub fn normalize_allowances(
    allowances: &[Allowance],
    max_k_receipt: f64,
) -> NormalizedAllowances {
    let donation = sum_of(allowances, AllowanceKind::Donation);
    let k_receipt = sum_of(allowances, AllowanceKind::KReceipt);

    NormalizedAllowances {
        donation: donation.min(MAX_DONATION_DEDUCTION),
        k_receipt: k_receipt.min(max_k_receipt),
    }
}

fn sum_of(
    allowances: &[Allowance],
    kind: AllowanceKind,
) -> f64 {
    allowances
        .iter()
        .filter(|a| a.kind == kind)
        .map(|a| a.amount)
        .sum()
}
