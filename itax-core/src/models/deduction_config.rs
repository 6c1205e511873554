use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Personal deduction applied when the store has no value.
pub const DEFAULT_PERSONAL_DEDUCTION: f64 = 60_000.0;

/// K-receipt ceiling applied when the store has no value.
pub const DEFAULT_MAX_K_RECEIPT_DEDUCTION: f64 = 50_000.0;

/// Range an administrator may set the personal deduction to.
pub const PERSONAL_DEDUCTION_LIMIT: RangeInclusive<f64> = 10_000.0..=100_000.0;

/// Range an administrator may set the k-receipt ceiling to.
pub const K_RECEIPT_LIMIT: RangeInclusive<f64> = 0.0..=100_000.0;

/// Deduction parameters read from the configuration store.
///
/// Both values come from a single read so one calculation never observes a
/// half-applied update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeductionConfig {
    pub personal_deduction: f64,
    pub max_k_receipt_deduction: f64,
}

impl Default for DeductionConfig {
    fn default() -> Self {
        Self {
            personal_deduction: DEFAULT_PERSONAL_DEDUCTION,
            max_k_receipt_deduction: DEFAULT_MAX_K_RECEIPT_DEDUCTION,
        }
    }
}

/// An administrator tried to store a deduction outside its allowed range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeductionLimitError {
    #[error("Invalid amount is required 10,000.0 to 100,000.0")]
    PersonalOutOfRange(f64),

    #[error("Invalid amount is required 0.0 to 100,000.0")]
    KReceiptOutOfRange(f64),
}

impl DeductionLimitError {
    pub fn amount(&self) -> f64 {
        match self {
            Self::PersonalOutOfRange(amount) | Self::KReceiptOutOfRange(amount) => *amount,
        }
    }
}

/// Checks a personal deduction against [`PERSONAL_DEDUCTION_LIMIT`].
pub fn check_personal_deduction(amount: f64) -> Result<f64, DeductionLimitError> {
    if PERSONAL_DEDUCTION_LIMIT.contains(&amount) {
        Ok(amount)
    } else {
        Err(DeductionLimitError::PersonalOutOfRange(amount))
    }
}

/// Checks a k-receipt ceiling against [`K_RECEIPT_LIMIT`].
pub fn check_k_receipt_deduction(amount: f64) -> Result<f64, DeductionLimitError> {
    if K_RECEIPT_LIMIT.contains(&amount) {
        Ok(amount)
    } else {
        Err(DeductionLimitError::KReceiptOutOfRange(amount))
    }
}
