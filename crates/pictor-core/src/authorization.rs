//! The authorization capability handed to the pipeline.
//!
//! The pipeline never inspects credentials. It only needs something it can
//! attach to log lines so that every upload, delete and moderation rejection
//! can be traced back to whoever asked for it.

use std::fmt;

/// An authenticated caller, as far as logging is concerned.
pub trait Authorization: fmt::Debug + Send + Sync {
    /// Compact, secret-free description for structured log fields.
    fn format_for_logs(&self) -> String;
}

/// Caller used by offline tools and by servers running without auth.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl Authorization for Anonymous {
    fn format_for_logs(&self) -> String {
        "anonymous".to_string()
    }
}
