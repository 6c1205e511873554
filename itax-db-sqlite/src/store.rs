use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use itax_core::{
    DEFAULT_MAX_K_RECEIPT_DEDUCTION, DEFAULT_PERSONAL_DEDUCTION, DeductionConfig, DeductionStore,
    StoreError,
};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use tracing::debug;

use crate::amount::get_amount_or;

/// The settable columns of the `deductions` row.
#[derive(Debug, Clone, Copy)]
enum Setting {
    Personal,
    MaxKReceipt,
}

impl Setting {
    fn upsert_sql(self) -> &'static str {
        match self {
            Self::Personal => {
                "INSERT INTO deductions (id, personal, updated_at) VALUES (1, ?, ?)
                 ON CONFLICT(id) DO UPDATE SET
                    personal = excluded.personal,
                    updated_at = excluded.updated_at"
            }
            Self::MaxKReceipt => {
                "INSERT INTO deductions (id, max_k_receipt, updated_at) VALUES (1, ?, ?)
                 ON CONFLICT(id) DO UPDATE SET
                    max_k_receipt = excluded.max_k_receipt,
                    updated_at = excluded.updated_at"
            }
        }
    }
}

pub struct SqliteDeductionStore {
    pool: SqlitePool,
}

impl SqliteDeductionStore {
    /// Connect to `database_url` (a sqlx SQLite URL such as
    /// `sqlite:itax.db?mode=rwc` or `sqlite::memory:`).
    ///
    /// In-memory databases are pinned to a single long-lived connection so
    /// every query sees the same data.
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database URL: {}", database_url))?;

        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to database: {}", database_url))?;
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Time of the last settings update, if the row exists.
    pub async fn updated_at(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        let row = self.fetch_row().await?;
        row.map(|row| {
            let raw: String = row
                .try_get("updated_at")
                .map_err(|e| StoreError::Database(format!("Failed to get updated_at: {}", e)))?;
            parse_datetime(&raw)
        })
        .transpose()
    }

    async fn fetch_row(&self) -> Result<Option<SqliteRow>, StoreError> {
        sqlx::query("SELECT personal, max_k_receipt, updated_at FROM deductions WHERE id = 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    async fn upsert(
        &self,
        setting: Setting,
        amount: f64,
    ) -> Result<(), StoreError> {
        let now = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

        let result = sqlx::query(setting.upsert_sql())
            .bind(amount)
            .bind(&now)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        debug!(?setting, amount, "deduction setting stored");
        Ok(())
    }
}

fn config_from_row(row: Option<&SqliteRow>) -> Result<DeductionConfig, StoreError> {
    let Some(row) = row else {
        return Ok(DeductionConfig::default());
    };

    Ok(DeductionConfig {
        personal_deduction: get_amount_or(row, "personal", DEFAULT_PERSONAL_DEDUCTION)?,
        max_k_receipt_deduction: get_amount_or(
            row,
            "max_k_receipt",
            DEFAULT_MAX_K_RECEIPT_DEDUCTION,
        )?,
    })
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    // SQLite stores timestamps in various formats, try common ones
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
        .map_err(|e| StoreError::Database(format!("Failed to parse datetime '{}': {}", s, e)))
}

#[async_trait]
impl DeductionStore for SqliteDeductionStore {
    async fn personal_deduction(&self) -> Result<f64, StoreError> {
        Ok(config_from_row(self.fetch_row().await?.as_ref())?.personal_deduction)
    }

    async fn set_personal_deduction(
        &self,
        amount: f64,
    ) -> Result<(), StoreError> {
        self.upsert(Setting::Personal, amount).await
    }

    async fn k_receipt_deduction(&self) -> Result<f64, StoreError> {
        Ok(config_from_row(self.fetch_row().await?.as_ref())?.max_k_receipt_deduction)
    }

    async fn set_k_receipt_deduction(
        &self,
        amount: f64,
    ) -> Result<(), StoreError> {
        self.upsert(Setting::MaxKReceipt, amount).await
    }

    // One SELECT reads both columns of the same row.
    async fn deduction_config(&self) -> Result<DeductionConfig, StoreError> {
        config_from_row(self.fetch_row().await?.as_ref())
    }
}
