//! Storage facade applying the failure policy.
//!
//! Under [`StorageFailurePolicy::Suppress`] every backend failure is logged
//! at error level and then reported as success (uploads, deletes) or as a
//! missing object (downloads). Callers cannot tell a failed write from a
//! successful one. [`StorageFailurePolicy::Propagate`] hands the
//! [`StorageError`] back instead.

use std::sync::Arc;

use bytes::Bytes;

use crate::key::ObjectKey;
use crate::store::{ObjectStore, PutOptions, StorageError, StoredObject};
use crate::StorageFailurePolicy;

/// Cheaply cloneable handle over the configured backend.
#[derive(Clone)]
pub struct Storage {
    store: Arc<dyn ObjectStore>,
    policy: StorageFailurePolicy,
}

impl Storage {
    pub fn new(store: Arc<dyn ObjectStore>, policy: StorageFailurePolicy) -> Self {
        Self { store, policy }
    }

    /// Write `body` to `{directory}/{file_name}`.
    pub async fn upload(
        &self,
        body: Bytes,
        file_name: &str,
        directory: &str,
        content_type: Option<&str>,
        acl: Option<&str>,
    ) -> Result<(), StorageError> {
        let key = ObjectKey::new(directory, file_name);
        let options = PutOptions {
            content_type: content_type.map(str::to_string),
            acl: acl.map(str::to_string),
        };

        match self.store.put(&key, body, options).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::error!(key = %key, error = %e, "Failed to upload file to object store");
                self.resolve(e, ())
            }
        }
    }

    /// Read `{directory}/{file_name}`.
    pub async fn download(
        &self,
        file_name: &str,
        directory: &str,
    ) -> Result<Option<StoredObject>, StorageError> {
        let key = ObjectKey::new(directory, file_name);

        match self.store.get(&key).await {
            Ok(object) => Ok(object),
            Err(e) => {
                tracing::error!(key = %key, error = %e, "Failed to download file from object store");
                self.resolve(e, None)
            }
        }
    }

    /// Remove `{directory}/{file_name}`.
    pub async fn delete(&self, file_name: &str, directory: &str) -> Result<(), StorageError> {
        let key = ObjectKey::new(directory, file_name);

        match self.store.delete(&key).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::error!(key = %key, error = %e, "Failed to delete file from object store");
                self.resolve(e, ())
            }
        }
    }

    fn resolve<T>(&self, error: StorageError, suppressed: T) -> Result<T, StorageError> {
        match self.policy {
            StorageFailurePolicy::Suppress => Ok(suppressed),
            StorageFailurePolicy::Propagate => Err(error),
        }
    }
}
