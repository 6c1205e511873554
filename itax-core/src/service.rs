//! Calculation entry points backed by a [`DeductionStore`].
//!
//! The engine in [`crate::calculations`] is pure; this layer validates input,
//! reads the current deduction settings, and hands both to the engine. Each
//! call reads the store afresh, so administrator updates apply to the next
//! calculation.

use thiserror::Error;
use tracing::info;

use crate::calculations::batch::{BatchCalculator, BatchError, RowSource, read_header};
use crate::calculations::income_tax::IncomeTaxCalculator;
use crate::calculations::validation::{ValidationError, validate_request};
use crate::db::store::{DeductionStore, StoreError};
use crate::models::{
    BatchResult, DeductionConfig, DeductionLimitError, IncomeRequest, TaxResult,
    check_k_receipt_deduction, check_personal_deduction,
};

/// Any failure of a [`TaxService`] operation.
#[derive(Debug, Error)]
pub enum CalculationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error(transparent)]
    Limit(#[from] DeductionLimitError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CalculationError {
    /// True when the caller supplied bad input, false when a collaborator
    /// failed.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}

pub struct TaxService<'a> {
    store: &'a dyn DeductionStore,
    calculator: IncomeTaxCalculator<'static>,
}

impl<'a> TaxService<'a> {
    pub fn new(store: &'a dyn DeductionStore) -> Self {
        Self {
            store,
            calculator: IncomeTaxCalculator::default(),
        }
    }

    /// Validates `request` and calculates its tax against the current
    /// deduction settings.
    pub async fn calculate(
        &self,
        request: &IncomeRequest,
    ) -> Result<TaxResult, CalculationError> {
        let record = validate_request(request)?;
        let config = self.store.deduction_config().await?;

        let result = self.calculator.calculate(&record, &config);
        info!(
            total_income = record.total_income,
            tax = result.net_tax,
            refund = result.refund,
            "tax calculated"
        );
        Ok(result)
    }

    /// Calculates every row of a tabular source.
    ///
    /// The header is checked before the store is read; only the personal
    /// deduction is consulted.
    pub async fn calculate_batch<S: RowSource + ?Sized>(
        &self,
        source: &mut S,
    ) -> Result<BatchResult, CalculationError> {
        read_header(source)?;
        let personal_deduction = self.store.personal_deduction().await?;

        let taxes =
            BatchCalculator::new(self.calculator).calculate_rows(source, personal_deduction)?;
        Ok(BatchResult { taxes })
    }

    /// Current deduction settings.
    pub async fn deductions(&self) -> Result<DeductionConfig, CalculationError> {
        Ok(self.store.deduction_config().await?)
    }

    /// Stores a new personal deduction after checking its allowed range.
    pub async fn set_personal_deduction(
        &self,
        amount: f64,
    ) -> Result<f64, CalculationError> {
        let amount = check_personal_deduction(amount)?;
        self.store.set_personal_deduction(amount).await?;
        info!(amount, "personal deduction updated");
        Ok(amount)
    }

    /// Stores a new k-receipt ceiling after checking its allowed range.
    pub async fn set_k_receipt_deduction(
        &self,
        amount: f64,
    ) -> Result<f64, CalculationError> {
        let amount = check_k_receipt_deduction(amount)?;
        self.store.set_k_receipt_deduction(amount).await?;
        info!(amount, "k-receipt deduction updated");
        Ok(amount)
    }
}
