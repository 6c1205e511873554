use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use super::factory::{DbConfig, StoreFactory};
use super::store::{DeductionStore, StoreError};
use crate::models::DeductionConfig;

/// A [`DeductionStore`] held entirely in process memory.
///
/// Both settings live behind one lock, so a snapshot can never mix an old
/// personal deduction with a new k-receipt ceiling.
#[derive(Debug, Default)]
pub struct InMemoryDeductionStore {
    config: RwLock<DeductionConfig>,
}

impl InMemoryDeductionStore {
    pub fn new(config: DeductionConfig) -> Self {
        Self {
            config: RwLock::new(config),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, DeductionConfig>, StoreError> {
        self.config
            .read()
            .map_err(|e| StoreError::Database(format!("deduction lock poisoned: {e}")))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, DeductionConfig>, StoreError> {
        self.config
            .write()
            .map_err(|e| StoreError::Database(format!("deduction lock poisoned: {e}")))
    }
}

#[async_trait]
impl DeductionStore for InMemoryDeductionStore {
    async fn personal_deduction(&self) -> Result<f64, StoreError> {
        Ok(self.read()?.personal_deduction)
    }

    async fn set_personal_deduction(
        &self,
        amount: f64,
    ) -> Result<(), StoreError> {
        self.write()?.personal_deduction = amount;
        Ok(())
    }

    async fn k_receipt_deduction(&self) -> Result<f64, StoreError> {
        Ok(self.read()?.max_k_receipt_deduction)
    }

    async fn set_k_receipt_deduction(
        &self,
        amount: f64,
    ) -> Result<(), StoreError> {
        self.write()?.max_k_receipt_deduction = amount;
        Ok(())
    }

    async fn deduction_config(&self) -> Result<DeductionConfig, StoreError> {
        Ok(*self.read()?)
    }
}

/// [`StoreFactory`] for the `"memory"` backend.
///
/// The connection string is ignored; every call starts from
/// [`DeductionConfig::default`].
pub struct MemoryStoreFactory;

#[async_trait]
impl StoreFactory for MemoryStoreFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(
        &self,
        _config: &DbConfig,
    ) -> Result<Box<dyn DeductionStore>, StoreError> {
        Ok(Box::new(InMemoryDeductionStore::default()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::thread;
    use std::time::{Duration, Instant};

    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn starts_with_defaults() {
        let store = InMemoryDeductionStore::default();

        assert_eq!(store.personal_deduction().await.unwrap(), 60_000.0);
        assert_eq!(store.k_receipt_deduction().await.unwrap(), 50_000.0);
    }

    #[tokio::test]
    async fn setters_are_visible_to_getters() {
        let store = InMemoryDeductionStore::default();

        store.set_personal_deduction(70_000.0).await.unwrap();
        store.set_k_receipt_deduction(0.0).await.unwrap();

        assert_eq!(
            store.deduction_config().await.unwrap(),
            DeductionConfig {
                personal_deduction: 70_000.0,
                max_k_receipt_deduction: 0.0,
            }
        );
    }

    #[tokio::test]
    async fn snapshot_never_mixes_updates() {
        let store = Arc::new(InMemoryDeductionStore::new(DeductionConfig {
            personal_deduction: 10_000.0,
            max_k_receipt_deduction: 10_000.0,
        }));
        let stop = Arc::new(AtomicBool::new(false));
        let writes = Arc::new(AtomicUsize::new(0));

        // OS thread so writes land while the reader below is running.
        let writer = {
            let store = Arc::clone(&store);
            let stop = Arc::clone(&stop);
            let writes = Arc::clone(&writes);
            thread::spawn(move || {
                let mut step = 0u32;
                while !stop.load(Ordering::Acquire) {
                    step = (step + 1) % 900;
                    let amount = 10_000.0 + f64::from(step) * 100.0;
                    {
                        let mut guard = store.write().unwrap();
                        guard.personal_deduction = amount;
                        guard.max_k_receipt_deduction = amount;
                    }
                    writes.fetch_add(1, Ordering::Release);
                    thread::yield_now();
                }
            })
        };

        let deadline = Instant::now() + Duration::from_secs(10);
        let mut seen = HashSet::new();
        let mut reads = 0usize;
        while seen.len() < 5 && Instant::now() < deadline {
            let snapshot = store.deduction_config().await.unwrap();
            assert_eq!(snapshot.personal_deduction, snapshot.max_k_receipt_deduction);
            seen.insert(snapshot.personal_deduction.to_bits());
            reads += 1;
            tokio::task::yield_now().await;
        }
        let writes_during_reads = writes.load(Ordering::Acquire);

        stop.store(true, Ordering::Release);
        writer.join().unwrap();

        assert!(reads > 0);
        assert!(writes_during_reads > 0);
        assert!(
            seen.len() >= 5,
            "reader saw only {} distinct snapshots",
            seen.len()
        );
    }

    #[tokio::test]
    async fn memory_factory_creates_default_store() {
        let store = MemoryStoreFactory
            .create(&DbConfig::default())
            .await
            .expect("memory store");

        assert_eq!(
            store.deduction_config().await.unwrap(),
            DeductionConfig::default()
        );
    }

    #[test]
    fn backend_name_is_memory() {
        assert_eq!(MemoryStoreFactory.backend_name(), "memory");
    }
}
