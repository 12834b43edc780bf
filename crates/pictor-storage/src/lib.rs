//! pictor-storage: object store adapter.
//!
//! Objects are addressed by [`ObjectKey`] (`{directory}/{file_name}`) and
//! live in an [`ObjectStore`] backend:
//!
//! - [`S3ObjectStore`]: any S3-compatible bucket via `aws-sdk-s3`
//! - [`MemoryObjectStore`]: process-local map for development and tests
//!
//! Callers go through [`Storage`], which applies the configured
//! [`StorageFailurePolicy`] to every backend failure.

pub mod key;
pub mod memory;
pub mod s3;
pub mod storage;
pub mod store;

pub use key::ObjectKey;
pub use memory::MemoryObjectStore;
pub use pictor_core::config::StorageFailurePolicy;
pub use s3::S3ObjectStore;
pub use storage::Storage;
pub use store::{ObjectStore, PutOptions, StorageError, StoredObject};

use std::sync::Arc;

use pictor_core::config::{StorageBackend, StorageConfig};

/// Build the backend selected by `config`, wrapped in a [`Storage`] facade.
pub async fn from_config(config: &StorageConfig) -> Storage {
    let store: Arc<dyn ObjectStore> = match config.backend {
        StorageBackend::S3 => Arc::new(S3ObjectStore::from_config(config).await),
        StorageBackend::Memory => Arc::new(MemoryObjectStore::new()),
    };
    tracing::info!(
        backend = store.name(),
        policy = ?config.failure_policy,
        "Object store ready"
    );
    Storage::new(store, config.failure_policy)
}
