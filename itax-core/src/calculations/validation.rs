//! Input validation for income records.
//!
//! Checks run in a fixed order and stop at the first violation:
//! allowance amounts, allowance types, total income, withholding tax.

use thiserror::Error;
use tracing::warn;

use crate::{Allowance, AllowanceKind, IncomeRecord, IncomeRequest};

/// A request was rejected before any tax was computed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("allowance amount must be non-negative.")]
    NegativeAllowance(f64),

    #[error("allowance type must be donation or k-receipt.")]
    UnknownAllowanceType(String),

    #[error("total income must be ≥ 0.")]
    NegativeIncome(f64),

    #[error("withholding tax must be between 0 and total income.")]
    WithholdingOutOfRange { wht: f64, total_income: f64 },
}

/// Validates a raw request and converts it into an [`IncomeRecord`].
pub fn validate_request(request: &IncomeRequest) -> Result<IncomeRecord, ValidationError> {
    if let Some(input) = request.allowances.iter().find(|a| not_a_valid_amount(a.amount)) {
        warn!(amount = input.amount, "rejected negative allowance");
        return Err(ValidationError::NegativeAllowance(input.amount));
    }

    let allowances = request
        .allowances
        .iter()
        .map(|input| {
            AllowanceKind::parse(&input.allowance_type)
                .map(|kind| Allowance {
                    kind,
                    amount: input.amount,
                })
                .ok_or_else(|| {
                    warn!(allowance_type = %input.allowance_type, "rejected allowance type");
                    ValidationError::UnknownAllowanceType(input.allowance_type.clone())
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    validate_record(IncomeRecord {
        total_income: request.total_income,
        withholding_tax: request.wht,
        allowances,
    })
}

/// Checks the invariants of an already-typed [`IncomeRecord`].
pub fn validate_record(record: IncomeRecord) -> Result<IncomeRecord, ValidationError> {
    if let Some(allowance) = record.allowances.iter().find(|a| not_a_valid_amount(a.amount)) {
        warn!(amount = allowance.amount, "rejected negative allowance");
        return Err(ValidationError::NegativeAllowance(allowance.amount));
    }

    if not_a_valid_amount(record.total_income) {
        warn!(total_income = record.total_income, "rejected total income");
        return Err(ValidationError::NegativeIncome(record.total_income));
    }

    if not_a_valid_amount(record.withholding_tax) || record.withholding_tax > record.total_income {
        warn!(
            wht = record.withholding_tax,
            total_income = record.total_income,
            "rejected withholding tax"
        );
        return Err(ValidationError::WithholdingOutOfRange {
            wht: record.withholding_tax,
            total_income: record.total_income,
        });
    }

    Ok(record)
}

// NaN and infinities are out of range alongside negatives.
fn not_a_valid_amount(value: f64) -> bool {
    !value.is_finite() || value < 0.0
}
