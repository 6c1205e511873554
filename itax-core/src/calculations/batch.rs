//! Batch calculation over tabular input.
//!
//! ## Input format
//!
//! The first row must be the header, exactly as below (case- and
//! order-sensitive). Every following row holds three numbers.
//!
//! ```csv
//! totalIncome,wht,donation
//! 500000.0,0.0,0.0
//! 600000.0,40000.0,20000.0
//! ```
//!
//! Each row is taxed as an income record with a single donation allowance.
//! The first malformed row aborts the whole batch.

use thiserror::Error;
use tracing::{debug, info};

use crate::calculations::income_tax::IncomeTaxCalculator;
use crate::calculations::validation::{ValidationError, validate_record};
use crate::{Allowance, BatchRowResult, DeductionConfig, IncomeRecord};

/// Expected header row of a batch input.
pub const BATCH_HEADER: [&str; 3] = ["totalIncome", "wht", "donation"];

/// Failure reported by a [`RowSource`] for input it cannot read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowSourceError {
    #[error("malformed input at line {line}: {message}")]
    Malformed { line: u64, message: String },

    #[error("failed to read input: {0}")]
    Io(String),
}

/// A reader of delimited rows.
///
/// `Ok(None)` marks the end of input; malformed input is an `Err`.
pub trait RowSource {
    fn next_row(&mut self) -> Result<Option<Vec<String>>, RowSourceError>;
}

impl<S: RowSource + ?Sized> RowSource for &mut S {
    fn next_row(&mut self) -> Result<Option<Vec<String>>, RowSourceError> {
        (**self).next_row()
    }
}

/// A [`RowSource`] over rows already held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryRowSource {
    rows: std::collections::VecDeque<Vec<String>>,
}

impl MemoryRowSource {
    pub fn new<I, R, F>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = F>,
        F: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }
}

impl RowSource for MemoryRowSource {
    fn next_row(&mut self) -> Result<Option<Vec<String>>, RowSourceError> {
        Ok(self.rows.pop_front())
    }
}

/// Errors that abort a batch calculation.
///
/// Row numbers count data rows from 1; the header is not counted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BatchError {
    #[error("input is empty; header must be 'totalIncome,wht,donation'")]
    MissingHeader,

    #[error("Header of content is 'totalIncome,wht,donation' only")]
    InvalidHeader(Vec<String>),

    #[error("row {row} has {found} columns; every row must have 3")]
    ColumnCount { row: usize, found: usize },

    #[error("row {row}: {column} column has format incorrect ('{value}')")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: {source}")]
    InvalidRecord {
        row: usize,
        #[source]
        source: ValidationError,
    },

    #[error(transparent)]
    Source(#[from] RowSourceError),
}

/// Reads the header row from `source` and checks it against [`BATCH_HEADER`].
pub fn read_header<S: RowSource + ?Sized>(source: &mut S) -> Result<(), BatchError> {
    let header = source.next_row()?.ok_or(BatchError::MissingHeader)?;

    let matches = header.len() == BATCH_HEADER.len()
        && header.iter().zip(BATCH_HEADER).all(|(h, e)| h.as_str() == e);
    if !matches {
        return Err(BatchError::InvalidHeader(header));
    }

    Ok(())
}

/// Converts one data row into a validated [`IncomeRecord`].
///
/// `row` is the 1-based data row number used in error messages.
pub fn parse_row(
    row: usize,
    fields: &[String],
) -> Result<IncomeRecord, BatchError> {
    if fields.len() != BATCH_HEADER.len() {
        return Err(BatchError::ColumnCount {
            row,
            found: fields.len(),
        });
    }

    let total_income = parse_number(row, "Income", &fields[0])?;
    let withholding_tax = parse_number(row, "Wht", &fields[1])?;
    let donation = parse_number(row, "Donate", &fields[2])?;

    validate_record(IncomeRecord {
        total_income,
        withholding_tax,
        allowances: vec![Allowance::donation(donation)],
    })
    .map_err(|source| BatchError::InvalidRecord { row, source })
}

fn parse_number(
    row: usize,
    column: &'static str,
    value: &str,
) -> Result<f64, BatchError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .ok_or_else(|| BatchError::InvalidNumber {
            row,
            column,
            value: value.to_string(),
        })
}

/// Batch wrapper around [`IncomeTaxCalculator`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchCalculator<'a> {
    calculator: IncomeTaxCalculator<'a>,
}

impl<'a> BatchCalculator<'a> {
    pub fn new(calculator: IncomeTaxCalculator<'a>) -> Self {
        Self { calculator }
    }

    /// Reads the header and then every data row from `source`.
    pub fn calculate<S: RowSource + ?Sized>(
        &self,
        source: &mut S,
        personal_deduction: f64,
    ) -> Result<Vec<BatchRowResult>, BatchError> {
        read_header(source)?;
        self.calculate_rows(source, personal_deduction)
    }

    /// Calculates every remaining row of `source`; the header must already
    /// have been consumed with [`read_header`].
    pub fn calculate_rows<S: RowSource + ?Sized>(
        &self,
        source: &mut S,
        personal_deduction: f64,
    ) -> Result<Vec<BatchRowResult>, BatchError> {
        // Batch rows never carry k-receipt allowances.
        let config = DeductionConfig {
            personal_deduction,
            max_k_receipt_deduction: 0.0,
        };

        let mut results = Vec::new();
        while let Some(fields) = source.next_row()? {
            let row = results.len() + 1;
            let record = parse_row(row, &fields)?;
            let (tax, tax_refund) = self.calculator.calculate_net(&record, &config);

            debug!(row, total_income = record.total_income, tax, tax_refund, "calculated batch row");

            results.push(BatchRowResult {
                total_income: record.total_income,
                tax,
                tax_refund,
            });
        }

        info!(rows = results.len(), "batch calculation complete");
        Ok(results)
    }
}
