use super::log_store::LogStore;
use super::mem_backend::MemBackend;

pub type InMemoryStore = LogStore<MemBackend>;

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        LogStore::with_backend(MemBackend::new())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::BaseDocument;
    use crate::overlay::PatchFields;
    use crate::source::StaticSource;

    /// Builds an in-memory store pre-seeded with slots, plus a source.
    pub struct StoreFixture {
        pub store: InMemoryStore,
        pub source: StaticSource,
    }

    impl StoreFixture {
        pub fn new(doc: BaseDocument) -> Self {
            Self {
                store: InMemoryStore::new(),
                source: StaticSource::new(doc),
            }
        }

        pub fn with_limit(mut self, max_value_bytes: usize) -> Self {
            self.store =
                LogStore::with_backend(MemBackend::new().with_max_value_bytes(max_value_bytes));
            self
        }

        pub fn with_patch(self, key: &str, fields: PatchFields) -> Self {
            let mut overlay = self.store.load_overlay().unwrap();
            overlay.upsert(key, fields);
            self.store.save_overlay(&overlay).unwrap();
            self
        }

        pub fn with_imported_base(self, doc: &BaseDocument) -> Self {
            self.store.save_base(doc).unwrap();
            self
        }
    }
}
