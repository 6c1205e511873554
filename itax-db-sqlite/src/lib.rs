//! SQLite backend for the deduction settings store.

mod amount;
pub mod factory;
pub mod store;

pub use factory::SqliteStoreFactory;
pub use store::SqliteDeductionStore;
