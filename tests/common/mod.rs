//! Shared test harness for integration tests.
//!
//! [`TestHarness`] builds a full [`AppContext`] over an in-memory object
//! store, with an optional [`FakeModerator`], and drives the router through
//! `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use bytes::Bytes;
use http_body_util::BodyExt;
use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};
use parking_lot::Mutex;
use tower::ServiceExt;

use pictor_core::config::{Config, StorageFailurePolicy};
use pictor_moderation::{ModerationError, Moderator};
use pictor_server::context::AppContext;
use pictor_server::router::build_router;
use pictor_storage::{
    MemoryObjectStore, ObjectKey, ObjectStore, PutOptions, Storage, StorageError, StoredObject,
};

pub const ADMIN_KEY: &str = "test-admin-key";

/// Moderator returning canned labels and counting calls.
#[derive(Default)]
pub struct FakeModerator {
    labels: Vec<String>,
    unavailable: bool,
    calls: Mutex<usize>,
}

impl FakeModerator {
    pub fn returning(labels: &[&str]) -> Self {
        Self {
            labels: labels.iter().map(|l| l.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock()
    }
}

#[async_trait]
impl Moderator for FakeModerator {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn detect_moderation_labels(&self, _image: &[u8]) -> Result<Vec<String>, ModerationError> {
        *self.calls.lock() += 1;
        if self.unavailable {
            return Err(ModerationError::Transport("connection refused".into()));
        }
        Ok(self.labels.clone())
    }
}

/// Object store whose every operation fails.
pub struct FailingStore;

#[async_trait]
impl ObjectStore for FailingStore {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn put(&self, key: &ObjectKey, _: Bytes, _: PutOptions) -> Result<(), StorageError> {
        Err(StorageError::backend("put", key, "connection reset"))
    }

    async fn get(&self, key: &ObjectKey) -> Result<Option<StoredObject>, StorageError> {
        Err(StorageError::backend("get", key, "connection reset"))
    }

    async fn delete(&self, key: &ObjectKey) -> Result<(), StorageError> {
        Err(StorageError::backend("delete", key, "connection reset"))
    }
}

/// Test harness wrapping a fully-constructed [`AppContext`].
pub struct TestHarness {
    pub ctx: AppContext,
    pub store: Arc<MemoryObjectStore>,
}

impl TestHarness {
    /// Default config (auth off, moderation off) over an empty memory store.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self::build(config, None)
    }

    pub fn with_moderator(moderator: Arc<FakeModerator>) -> Self {
        Self::build(Config::default(), Some(moderator as Arc<dyn Moderator>))
    }

    /// Auth enabled with [`ADMIN_KEY`].
    pub fn with_auth() -> Self {
        let mut config = Config::default();
        config.auth.enabled = true;
        config.auth.admin_api_key = Some(ADMIN_KEY.to_string());
        Self::with_config(config)
    }

    fn build(config: Config, moderator: Option<Arc<dyn Moderator>>) -> Self {
        let store = Arc::new(MemoryObjectStore::new());
        let storage = Storage::new(store.clone(), config.storage.failure_policy);
        let ctx = AppContext::new(config, storage, moderator);
        Self { ctx, store }
    }

    pub fn router(&self) -> Router {
        build_router(self.ctx.clone())
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router().oneshot(request).await.unwrap()
    }

    pub async fn seed(&self, directory: &str, file_name: &str, body: &[u8], content_type: &str) {
        self.store
            .put(
                &ObjectKey::new(directory, file_name),
                Bytes::copy_from_slice(body),
                PutOptions::with_content_type(content_type),
            )
            .await
            .unwrap();
    }

    pub async fn stored(&self, directory: &str, file_name: &str) -> Option<StoredObject> {
        self.store
            .get(&ObjectKey::new(directory, file_name))
            .await
            .unwrap()
    }
}

/// Context over a store that always fails, using `policy`.
pub fn failing_context(policy: StorageFailurePolicy) -> AppContext {
    let mut config = Config::default();
    config.storage.failure_policy = policy;
    AppContext::new(config, Storage::new(Arc::new(FailingStore), policy), None)
}

pub async fn body_bytes(response: Response<Body>) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

pub async fn body_to_string(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await.to_vec()).unwrap()
}

pub fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    encode(
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, image::Rgba([30, 60, 90, 255]))),
        ImageFormat::Png,
    )
}

pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
    encode(
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([90, 60, 30]))),
        ImageFormat::Jpeg,
    )
}

pub fn gif(width: u32, height: u32) -> Vec<u8> {
    encode(
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, image::Rgba([1, 2, 3, 255]))),
        ImageFormat::Gif,
    )
}

pub fn bmp(width: u32, height: u32) -> Vec<u8> {
    encode(
        DynamicImage::ImageRgb8(RgbImage::new(width, height)),
        ImageFormat::Bmp,
    )
}

/// Build a `multipart/form-data` body; returns `(content_type, body)`.
pub fn multipart(fields: &[(&str, &[u8])]) -> (String, Vec<u8>) {
    const BOUNDARY: &str = "pictor-test-boundary";
    let mut body = Vec::new();
    for (name, data) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{name}.bin\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}
