pub mod calculations;
pub mod db;
pub mod models;
pub mod service;

pub use db::store::{DeductionStore, StoreError};
pub use models::*;
pub use service::{CalculationError, TaxService};
