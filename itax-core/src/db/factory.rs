use std::collections::HashMap;

use async_trait::async_trait;
use tracing::debug;

use super::store::{DeductionStore, StoreError};

/// Where the deduction settings live.
///
/// `backend` selects a registered [`StoreFactory`] and is matched without
/// regard to case or surrounding whitespace. `connection_string` is handed
/// to that factory as is.
///
/// | backend  | connection_string                                |
/// |----------|--------------------------------------------------|
/// | `sqlite` | `itax.db`, `sqlite:itax.db?mode=rwc`, `:memory:` |
/// | `memory` | ignored                                          |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub backend: String,
    pub connection_string: String,
}

impl DbConfig {
    /// Settings held in process memory, reset on every run.
    pub fn memory() -> Self {
        Self {
            backend: "memory".to_string(),
            connection_string: String::new(),
        }
    }

    /// Settings persisted in the SQLite database at `path`.
    pub fn sqlite(path: impl Into<String>) -> Self {
        Self {
            backend: "sqlite".to_string(),
            connection_string: path.into(),
        }
    }

    fn backend_key(&self) -> String {
        self.backend.trim().to_ascii_lowercase()
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self::sqlite(":memory:")
    }
}

/// Opens a [`DeductionStore`] for one backend.
#[async_trait]
pub trait StoreFactory: Send + Sync {
    /// Lowercase name selected through [`DbConfig::backend`].
    fn backend_name(&self) -> &'static str;

    /// Opens the storage, seeding the default deductions when it is new.
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn DeductionStore>, StoreError>;
}

/// The deduction store backends this process can open.
pub struct StoreRegistry {
    factories: HashMap<&'static str, Box<dyn StoreFactory>>,
}

impl StoreRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Adds a backend. A later factory with the same name wins.
    pub fn register(
        &mut self,
        factory: Box<dyn StoreFactory>,
    ) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Registered backend names in alphabetical order.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Opens the store named by `config.backend` and reads its deduction
    /// settings once, so a store without a usable settings row fails here
    /// rather than on the first calculation.
    ///
    /// # Errors
    /// * [`StoreError::Configuration`] when the backend is not registered.
    /// * Whatever the factory or the first settings read returns.
    pub async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn DeductionStore>, StoreError> {
        let key = config.backend_key();
        let factory = self.factories.get(key.as_str()).ok_or_else(|| {
            StoreError::Configuration(format!(
                "unknown deduction store '{}'; expected one of: {}",
                config.backend,
                self.available_backends().join(", ")
            ))
        })?;

        let store = factory.create(config).await?;
        let deductions = store.deduction_config().await?;
        debug!(
            backend = %key,
            personal_deduction = deductions.personal_deduction,
            k_receipt = deductions.max_k_receipt_deduction,
            "deduction store ready"
        );

        Ok(store)
    }
}

impl Default for StoreRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::{DbConfig, StoreError, StoreFactory, StoreRegistry};
    use crate::db::memory::{InMemoryDeductionStore, MemoryStoreFactory};
    use crate::db::store::DeductionStore;
    use crate::models::DeductionConfig;

    /// Records whether `create` was reached.
    struct TrackedFactory {
        name: &'static str,
        opened: Arc<AtomicBool>,
    }

    #[async_trait]
    impl StoreFactory for TrackedFactory {
        fn backend_name(&self) -> &'static str {
            self.name
        }

        async fn create(
            &self,
            _config: &DbConfig,
        ) -> Result<Box<dyn DeductionStore>, StoreError> {
            self.opened.store(true, Ordering::SeqCst);
            Ok(Box::new(InMemoryDeductionStore::default()))
        }
    }

    fn tracked(name: &'static str) -> (Box<dyn StoreFactory>, Arc<AtomicBool>) {
        let opened = Arc::new(AtomicBool::new(false));
        (
            Box::new(TrackedFactory {
                name,
                opened: Arc::clone(&opened),
            }),
            opened,
        )
    }

    struct UnreachableFactory;

    #[async_trait]
    impl StoreFactory for UnreachableFactory {
        fn backend_name(&self) -> &'static str {
            "unreachable"
        }

        async fn create(
            &self,
            _config: &DbConfig,
        ) -> Result<Box<dyn DeductionStore>, StoreError> {
            Err(StoreError::Connection("server down".to_string()))
        }
    }

    /// Opens fine but has no settings row to read.
    struct UnseededStore;

    #[async_trait]
    impl DeductionStore for UnseededStore {
        async fn personal_deduction(&self) -> Result<f64, StoreError> {
            Err(StoreError::NotFound)
        }

        async fn set_personal_deduction(
            &self,
            _amount: f64,
        ) -> Result<(), StoreError> {
            Ok(())
        }

        async fn k_receipt_deduction(&self) -> Result<f64, StoreError> {
            Err(StoreError::NotFound)
        }

        async fn set_k_receipt_deduction(
            &self,
            _amount: f64,
        ) -> Result<(), StoreError> {
            Ok(())
        }

        async fn deduction_config(&self) -> Result<DeductionConfig, StoreError> {
            Err(StoreError::NotFound)
        }
    }

    struct UnseededFactory;

    #[async_trait]
    impl StoreFactory for UnseededFactory {
        fn backend_name(&self) -> &'static str {
            "unseeded"
        }

        async fn create(
            &self,
            _config: &DbConfig,
        ) -> Result<Box<dyn DeductionStore>, StoreError> {
            Ok(Box::new(UnseededStore))
        }
    }

    #[test]
    fn default_config_is_in_memory_sqlite() {
        assert_eq!(DbConfig::default(), DbConfig::sqlite(":memory:"));
        assert_eq!(DbConfig::default().backend, "sqlite");
    }

    #[test]
    fn memory_config_has_no_connection_string() {
        let config = DbConfig::memory();

        assert_eq!(config.backend, "memory");
        assert!(config.connection_string.is_empty());
    }

    #[test]
    fn backends_are_listed_alphabetically() {
        let mut registry = StoreRegistry::new();
        assert!(registry.available_backends().is_empty());

        let (sqlite, _) = tracked("sqlite");
        registry.register(sqlite);
        registry.register(Box::new(MemoryStoreFactory));

        assert_eq!(registry.available_backends(), vec!["memory", "sqlite"]);
    }

    #[tokio::test]
    async fn later_registration_wins() {
        let mut registry = StoreRegistry::new();
        let (first, first_opened) = tracked("sqlite");
        let (second, second_opened) = tracked("sqlite");
        registry.register(first);
        registry.register(second);

        registry.create(&DbConfig::sqlite(":memory:")).await.unwrap();

        assert_eq!(registry.available_backends(), vec!["sqlite"]);
        assert!(!first_opened.load(Ordering::SeqCst));
        assert!(second_opened.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn opens_only_the_selected_backend() {
        let mut registry = StoreRegistry::new();
        let (sqlite, sqlite_opened) = tracked("sqlite");
        let (memory, memory_opened) = tracked("memory");
        registry.register(sqlite);
        registry.register(memory);

        let store = registry.create(&DbConfig::memory()).await.unwrap();

        assert_eq!(
            store.deduction_config().await.unwrap(),
            DeductionConfig::default()
        );
        assert!(memory_opened.load(Ordering::SeqCst));
        assert!(!sqlite_opened.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn backend_name_ignores_case_and_whitespace() {
        let mut registry = StoreRegistry::new();
        let (sqlite, opened) = tracked("sqlite");
        registry.register(sqlite);

        let config = DbConfig {
            backend: " SQLite ".to_string(),
            connection_string: ":memory:".to_string(),
        };
        registry.create(&config).await.unwrap();

        assert!(opened.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn unknown_backend_lists_the_known_ones() {
        let mut registry = StoreRegistry::new();
        registry.register(Box::new(MemoryStoreFactory));
        let (sqlite, _) = tracked("sqlite");
        registry.register(sqlite);

        let config = DbConfig {
            backend: "postgres".to_string(),
            connection_string: String::new(),
        };

        match registry.create(&config).await {
            Err(StoreError::Configuration(msg)) => assert_eq!(
                msg,
                "unknown deduction store 'postgres'; expected one of: memory, sqlite"
            ),
            Err(other) => panic!("expected Configuration error, got {other:?}"),
            Ok(_) => panic!("expected an error"),
        }
    }

    #[tokio::test]
    async fn factory_errors_are_surfaced() {
        let mut registry = StoreRegistry::new();
        registry.register(Box::new(UnreachableFactory));

        let config = DbConfig {
            backend: "unreachable".to_string(),
            connection_string: String::new(),
        };

        assert!(matches!(
            registry.create(&config).await,
            Err(StoreError::Connection(_))
        ));
    }

    #[tokio::test]
    async fn store_without_settings_fails_to_open() {
        let mut registry = StoreRegistry::new();
        registry.register(Box::new(UnseededFactory));

        let config = DbConfig {
            backend: "unseeded".to_string(),
            connection_string: String::new(),
        };

        assert!(matches!(
            registry.create(&config).await,
            Err(StoreError::NotFound)
        ));
    }
}
