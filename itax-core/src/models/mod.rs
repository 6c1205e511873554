mod allowance;
mod deduction_config;
mod income_record;
mod tax_bracket;
mod tax_result;

pub use allowance::{Allowance, AllowanceInput, AllowanceKind};
pub use deduction_config::{
    DEFAULT_MAX_K_RECEIPT_DEDUCTION, DEFAULT_PERSONAL_DEDUCTION, DeductionConfig,
    DeductionLimitError, K_RECEIPT_LIMIT, PERSONAL_DEDUCTION_LIMIT, check_k_receipt_deduction,
    check_personal_deduction,
};
pub use income_record::{IncomeRecord, IncomeRequest};
pub use tax_bracket::{TAX_BRACKETS, TaxBracket, tax_brackets};
pub use tax_result::{BatchResult, BatchRowResult, BracketTax, TaxResult};
