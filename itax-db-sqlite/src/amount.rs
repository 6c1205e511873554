use itax_core::StoreError;
use sqlx::{Row, TypeInfo, ValueRef};

/// Get an optional amount from a row, handling both INTEGER and REAL SQLite
/// types. NULL yields `None`.
pub fn get_optional_amount(
    row: &sqlx::sqlite::SqliteRow,
    column: &str,
) -> Result<Option<f64>, StoreError> {
    let value_ref = row
        .try_get_raw(column)
        .map_err(|e| StoreError::Database(format!("Column '{}' not found: {}", column, e)))?;

    if value_ref.is_null() {
        return Ok(None);
    }

    let type_name = value_ref.type_info().name().to_string();

    match type_name.as_str() {
        "INTEGER" => {
            let val: i64 = row.try_get(column).map_err(|e| {
                StoreError::Database(format!("Failed to get INTEGER from '{}': {}", column, e))
            })?;
            Ok(Some(val as f64))
        }
        "REAL" => {
            let val: f64 = row.try_get(column).map_err(|e| {
                StoreError::Database(format!("Failed to get REAL from '{}': {}", column, e))
            })?;
            Ok(Some(val))
        }
        _ => Err(StoreError::Database(format!(
            "Unexpected type '{}' for column '{}'",
            type_name, column
        ))),
    }
}

/// Get an amount from a row, substituting `default` for NULL.
pub fn get_amount_or(
    row: &sqlx::sqlite::SqliteRow,
    column: &str,
    default: f64,
) -> Result<f64, StoreError> {
    Ok(get_optional_amount(row, column)?.unwrap_or(default))
}
