//! Infrastructure error type for pictor.
//!
//! Configuration loading, server start-up and the CLI funnel their failures
//! into [`Error`]. Refused uploads are not errors in this sense; they are
//! reported through [`crate::ImageError`].

/// Unified error type covering start-up and tooling failures.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configuration could not be read or parsed.
    #[error("Config error: {0}")]
    Config(String),

    /// Input data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Convenience constructor for [`Error::Config`].
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
