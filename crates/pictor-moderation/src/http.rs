//! HTTP label-detection client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{ModerationError, Moderator};

#[derive(Debug, Deserialize)]
struct LabelsResponse {
    #[serde(default)]
    labels: Vec<Label>,
}

#[derive(Debug, Deserialize)]
struct Label {
    name: String,
    #[serde(default)]
    parent_name: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    confidence: Option<f32>,
}

/// Moderator that POSTs raw image bytes to a remote endpoint.
///
/// The endpoint answers with `{"labels": [{"name", "parent_name", "confidence"}]}`.
/// Both the label name and its non-empty parent are reported. There are no
/// retries; any failure is surfaced as a [`ModerationError`].
#[derive(Debug, Clone)]
pub struct HttpModerator {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    min_confidence: f32,
}

impl HttpModerator {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        min_confidence: f32,
        timeout: Duration,
    ) -> Result<Self, ModerationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ModerationError::Client(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
            min_confidence,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Moderator for HttpModerator {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn detect_moderation_labels(&self, image: &[u8]) -> Result<Vec<String>, ModerationError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .query(&[("min_confidence", self.min_confidence.to_string())])
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec());

        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let resp = request.send().await.map_err(|e| {
            warn!(endpoint = %self.endpoint, error = %e, "Moderation request failed");
            ModerationError::Transport(e.to_string())
        })?;

        let status = resp.status();
        if !status.is_success() {
            warn!(endpoint = %self.endpoint, status = %status, "Moderation backend returned error status");
            return Err(ModerationError::Status(status.as_u16()));
        }

        let body: LabelsResponse = resp.json().await.map_err(|e| {
            warn!(endpoint = %self.endpoint, error = %e, "Failed to decode moderation response");
            ModerationError::Decode(e.to_string())
        })?;

        let mut labels = Vec::with_capacity(body.labels.len() * 2);
        for label in body.labels {
            if let Some(parent) = label.parent_name.filter(|p| !p.is_empty()) {
                labels.push(parent);
            }
            labels.push(label.name);
        }

        debug!(count = labels.len(), "Moderation labels detected");
        Ok(labels)
    }
}
