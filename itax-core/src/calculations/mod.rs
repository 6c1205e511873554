//! Progressive income tax calculations.
//!
//! Work flows bottom-up: a request is validated into an [`IncomeRecord`],
//! its allowances are reduced to capped totals, and the remaining net income
//! is spread across the bracket table.
//!
//! [`IncomeRecord`]: crate::IncomeRecord

pub mod allowance;
pub mod batch;
pub mod common;
pub mod income_tax;
pub mod validation;

pub use allowance::{MAX_DONATION_DEDUCTION, NormalizedAllowances, normalize_allowances};
pub use batch::{
    BATCH_HEADER, BatchCalculator, BatchError, MemoryRowSource, RowSource, RowSourceError,
};
pub use income_tax::IncomeTaxCalculator;
pub use validation::{ValidationError, validate_record, validate_request};
