//! Backend trait and the types it exchanges.

use async_trait::async_trait;
use bytes::Bytes;

use crate::key::ObjectKey;

/// Content type assumed when the backend has none recorded.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// An object read back from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Bytes,
    pub content_type: String,
}

/// Optional attributes attached on write.
#[derive(Debug, Clone, Default)]
pub struct PutOptions {
    pub content_type: Option<String>,
    /// Canned ACL name (e.g. `public-read`).
    pub acl: Option<String>,
}

impl PutOptions {
    pub fn with_content_type(content_type: impl Into<String>) -> Self {
        Self {
            content_type: Some(content_type.into()),
            acl: None,
        }
    }
}

/// A backend failure. A missing object is not an error.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The provider rejected the request or could not be reached.
    #[error("{operation} {key} failed: {message}")]
    Backend {
        operation: &'static str,
        key: String,
        message: String,
    },

    /// The object body could not be read to completion.
    #[error("reading body of {key} failed: {message}")]
    Body { key: String, message: String },
}

impl StorageError {
    pub fn backend(operation: &'static str, key: &ObjectKey, message: impl ToString) -> Self {
        StorageError::Backend {
            operation,
            key: key.to_string(),
            message: message.to_string(),
        }
    }
}

/// Byte-blob storage keyed by [`ObjectKey`].
///
/// Implementations are shared across requests behind an `Arc`.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Short identifier for logs (e.g. `"s3"`).
    fn name(&self) -> &'static str;

    /// Write `body` at `key`, replacing any existing object.
    async fn put(&self, key: &ObjectKey, body: Bytes, options: PutOptions)
        -> Result<(), StorageError>;

    /// Read the object at `key`; `Ok(None)` when it does not exist.
    async fn get(&self, key: &ObjectKey) -> Result<Option<StoredObject>, StorageError>;

    /// Remove the object at `key`. Removing a missing object succeeds.
    async fn delete(&self, key: &ObjectKey) -> Result<(), StorageError>;
}
