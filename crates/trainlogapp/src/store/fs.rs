use super::fs_backend::FsBackend;
use super::log_store::LogStore;
use std::path::PathBuf;

/// Production store: slots are JSON files under a data directory.
pub type FileStore = LogStore<FsBackend>;

impl FileStore {
    pub fn new(data_dir: PathBuf) -> Self {
        LogStore::with_backend(FsBackend::new(data_dir))
    }

    pub fn with_limit(data_dir: PathBuf, max_value_bytes: usize) -> Self {
        LogStore::with_backend(FsBackend::new(data_dir).with_max_value_bytes(max_value_bytes))
    }
}
