//! Outcome of the image pipeline.
//!
//! An [`ImageError`] is what a caller sees when an upload or delete is
//! refused. It carries user-facing feedback only; the underlying cause is
//! logged where it happens and never travels with the error.

use serde::Serialize;
use std::fmt;

/// Category of a pipeline failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ErrorKind {
    /// The bytes are not an accepted, decodable image.
    InvalidContent,
    /// Moderation flagged the image.
    InappropriateContent,
    /// The moderation backend could not be reached.
    ServiceUnavailable,
    /// The object store failed (only under the `propagate` failure policy).
    StorageUnavailable,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidContent => write!(f, "invalid_content"),
            Self::InappropriateContent => write!(f, "inappropriate_content"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
            Self::StorageUnavailable => write!(f, "storage_unavailable"),
        }
    }
}

/// A refused upload or delete.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ImageError {
    kind: ErrorKind,
    message: String,
}

impl ImageError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_content(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidContent, message)
    }

    pub fn inappropriate_content() -> Self {
        Self::new(ErrorKind::InappropriateContent, "Inappropriate Content")
    }

    pub fn service_unavailable() -> Self {
        Self::new(ErrorKind::ServiceUnavailable, "Service Unavailable")
    }

    pub fn storage_unavailable() -> Self {
        Self::new(ErrorKind::StorageUnavailable, "Storage Unavailable")
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Message safe to show to the uploader.
    pub fn user_feedback(&self) -> &str {
        &self.message
    }
}
