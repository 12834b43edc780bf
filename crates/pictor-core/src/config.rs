//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON and carries the
//! server, auth, storage, avatar and moderation sections. Every section
//! defaults sensibly so a completely empty `{}` file is valid. Deployment
//! environment variables are layered on top by [`Config::apply_env`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::Error;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub avatars: AvatarConfig,
    pub moderation: ModerationConfig,
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str).map_err(|e| Error::config(format!("parse error: {e}")))
    }

    /// Read and parse a config file, failing on any error.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_json(&contents)
    }

    /// Load configuration from a file path, falling back to defaults if the
    /// path is `None` or the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file {}: {e}", path.display());
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Apply deployment environment overrides from the process environment.
    pub fn apply_process_env(&mut self) {
        self.apply_env(|name| std::env::var(name).ok());
    }

    /// Apply environment overrides using `lookup` to resolve variable names.
    ///
    /// Unparseable numeric or boolean values are ignored with a warning.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("APP_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("APP_PORT") {
            match port.parse() {
                Ok(p) => self.server.port = p,
                Err(_) => tracing::warn!("Ignoring invalid APP_PORT value {port:?}"),
            }
        }
        if let Some(bucket) = lookup("AWS_S3_BUCKET_NAME") {
            self.storage.bucket = bucket;
        }
        if let Some(region) = lookup("AWS_REGION") {
            self.storage.region = region;
        }
        if let Some(endpoint) = lookup("AWS_ENDPOINT_URL") {
            self.storage.endpoint = Some(endpoint);
        }
        if let Some(name) = lookup("DEFAULT_AVATAR_FILENAME") {
            self.avatars.default_avatar_filename = name;
        }
        if let Some(flag) = lookup("SHOULD_FILTER_INAPPROPRIATE_CONTENT") {
            match parse_bool(&flag) {
                Some(b) => self.moderation.enabled = b,
                None => tracing::warn!(
                    "Ignoring invalid SHOULD_FILTER_INAPPROPRIATE_CONTENT value {flag:?}"
                ),
            }
        }
        if let Some(endpoint) = lookup("MODERATION_ENDPOINT") {
            self.moderation.endpoint = Some(endpoint);
        }
        if let Some(key) = lookup("ADMIN_API_KEY") {
            self.auth.enabled = true;
            self.auth.admin_api_key = Some(key);
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.server.port == 0 {
            warnings.push("server.port is 0; a random port will be assigned".into());
        }

        if self.auth.enabled && self.auth.admin_api_key.is_none() {
            warnings.push(
                "auth is enabled but admin_api_key is not set; admin routes will reject every request"
                    .into(),
            );
        }

        if self.storage.backend == StorageBackend::S3 && self.storage.bucket.is_empty() {
            warnings.push("storage.bucket is empty".into());
        }

        if self.storage.access_key_id.is_some() != self.storage.secret_access_key.is_some() {
            warnings.push(
                "only one of storage.access_key_id / storage.secret_access_key is set; \
                 falling back to the default credential chain"
                    .into(),
            );
        }

        if self.avatars.default_avatar_filename.contains('/') {
            warnings.push("avatars.default_avatar_filename should not contain '/'".into());
        }

        if self.moderation.enabled && self.moderation.endpoint.is_none() {
            warnings.push("moderation is enabled but moderation.endpoint is not set".into());
        }

        warnings
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted request body, in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            max_upload_bytes: 16 * 1024 * 1024,
        }
    }
}

/// Admin authentication settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub enabled: bool,
    /// Bearer token accepted on admin routes.
    pub admin_api_key: Option<String>,
}

/// Which object store implementation to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    S3,
    /// Process-local storage; contents are lost on restart.
    Memory,
}

/// What the storage adapter does when the object store fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageFailurePolicy {
    /// Log the failure and report success (writes) or absence (reads).
    #[default]
    Suppress,
    /// Return the failure to the caller.
    Propagate,
}

/// Object store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible stores such as MinIO.
    pub endpoint: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub force_path_style: bool,
    pub failure_policy: StorageFailurePolicy,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::S3,
            bucket: String::new(),
            region: "us-east-1".into(),
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
            force_path_style: false,
            failure_policy: StorageFailurePolicy::Suppress,
        }
    }
}

/// Avatar serving settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarConfig {
    /// File inside the avatars directory served when a user has no avatar.
    pub default_avatar_filename: String,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            default_avatar_filename: "default.png".into(),
        }
    }
}

/// Content moderation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationConfig {
    pub enabled: bool,
    /// Label-detection endpoint receiving the image bytes.
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    /// Minimum label confidence (0-100) requested from the backend.
    pub min_confidence: f32,
    pub timeout_secs: u64,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            api_key: None,
            min_confidence: 50.0,
            timeout_secs: 10,
        }
    }
}

/// Default config file locations searched by the CLI.
pub fn default_config_paths() -> Vec<PathBuf> {
    vec![
        PathBuf::from("./pictor.json"),
        PathBuf::from("/etc/pictor/config.json"),
    ]
}
