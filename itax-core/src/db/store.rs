use async_trait::async_trait;
use thiserror::Error;

use crate::models::DeductionConfig;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Persistent home of the administrator-controlled deduction settings.
///
/// Implementations must make [`deduction_config`](Self::deduction_config)
/// return both values from one consistent read.
#[async_trait]
pub trait DeductionStore: Send + Sync {
    // Personal deduction
    async fn personal_deduction(&self) -> Result<f64, StoreError>;
    async fn set_personal_deduction(
        &self,
        amount: f64,
    ) -> Result<(), StoreError>;

    // K-receipt ceiling
    async fn k_receipt_deduction(&self) -> Result<f64, StoreError>;
    async fn set_k_receipt_deduction(
        &self,
        amount: f64,
    ) -> Result<(), StoreError>;

    // Snapshot of both
    async fn deduction_config(&self) -> Result<DeductionConfig, StoreError>;
}
