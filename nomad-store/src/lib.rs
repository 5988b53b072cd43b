pub mod app_config;
pub mod file_store;
pub mod memory;
pub mod redis_repo;

use app_config::{StorageBackend, StorageConfig};
use nomad_core::{CoreResult, KeyValueStore};
use std::sync::Arc;
use tracing::info;

pub use file_store::FileStore;
pub use memory::MemoryStore;
pub use redis_repo::RedisStore;

/// Open the backend named in the storage section.
pub fn open_store(config: &StorageConfig) -> CoreResult<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match config.backend {
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
        StorageBackend::File => Arc::new(FileStore::open(&config.path)?),
        StorageBackend::Redis => Arc::new(RedisStore::connect(&config.redis_url, &config.key_prefix)?),
    };
    info!("Opened {:?} storage backend", config.backend);
    Ok(store)
}
