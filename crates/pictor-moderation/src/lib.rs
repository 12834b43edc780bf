//! pictor-moderation: content moderation adapter.
//!
//! A [`Moderator`] turns image bytes into a list of moderation labels. The
//! only production implementation is [`HttpModerator`], which talks to a
//! remote label-detection service.

mod http;

pub use http::HttpModerator;

use async_trait::async_trait;
use pictor_core::config::ModerationConfig;

/// Why the moderation backend could not produce labels.
#[derive(Debug, thiserror::Error)]
pub enum ModerationError {
    /// The HTTP client could not be constructed.
    #[error("moderation client setup failed: {0}")]
    Client(String),

    /// Moderation is enabled but no endpoint is configured.
    #[error("moderation endpoint is not configured")]
    NotConfigured,

    /// The request failed or timed out.
    #[error("moderation request failed: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("moderation backend returned status {0}")]
    Status(u16),

    /// The response body could not be decoded.
    #[error("moderation response could not be decoded: {0}")]
    Decode(String),
}

/// Label detection for uploaded images.
///
/// Any `Err` is treated by callers as "moderation unavailable".
#[async_trait]
pub trait Moderator: Send + Sync {
    /// Short identifier for logs.
    fn name(&self) -> &'static str;

    /// Detect moderation labels in an encoded image.
    async fn detect_moderation_labels(&self, image: &[u8]) -> Result<Vec<String>, ModerationError>;
}

/// Build the moderator described by `config`, or `None` when moderation is
/// disabled.
pub fn from_config(config: &ModerationConfig) -> Result<Option<HttpModerator>, ModerationError> {
    if !config.enabled {
        return Ok(None);
    }
    let endpoint = config
        .endpoint
        .clone()
        .ok_or(ModerationError::NotConfigured)?;
    HttpModerator::new(
        endpoint,
        config.api_key.clone(),
        config.min_confidence,
        std::time::Duration::from_secs(config.timeout_secs),
    )
    .map(Some)
}
