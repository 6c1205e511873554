pub mod factory;
pub mod memory;
pub mod store;

pub use factory::{DbConfig, StoreFactory, StoreRegistry};
pub use memory::{InMemoryDeductionStore, MemoryStoreFactory};
pub use store::{DeductionStore, StoreError};
