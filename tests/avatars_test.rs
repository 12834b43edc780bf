//! Avatar route integration tests.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use pictor_core::config::{Config, StorageFailurePolicy};
use pictor_server::router::build_router;
use tower::ServiceExt;

use common::{
    body_bytes, body_to_string, bmp, failing_context, gif, jpeg, multipart, png, FakeModerator,
    TestHarness, ADMIN_KEY,
};

fn upload(user_id: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(format!("/api/v1/users/{user_id}/avatar"))
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .body(Body::from(body))
        .unwrap()
}

fn upload_with_token(user_id: &str, body: Vec<u8>, token: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(format!("/api/v1/users/{user_id}/avatar"))
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body))
        .unwrap()
}

fn delete(user_id: &str) -> Request<Body> {
    Request::builder()
        .method(Method::DELETE)
        .uri(format!("/api/v1/users/{user_id}/avatar"))
        .body(Body::empty())
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_upload_resizes_oversized_avatar() {
    let harness = TestHarness::new();

    let response = harness.send(upload("1000", png(2000, 1000))).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let object = harness.stored("avatars", "1000.png").await.unwrap();
    assert_eq!(object.content_type, "image/png");
    let img = image::load_from_memory(&object.body).unwrap();
    assert_eq!((img.width(), img.height()), (512, 256));
}

#[tokio::test]
async fn test_upload_keeps_small_avatar_resolution() {
    let harness = TestHarness::new();

    let response = harness.send(upload("7", png(300, 200))).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let object = harness.stored("avatars", "7.png").await.unwrap();
    let img = image::load_from_memory(&object.body).unwrap();
    assert_eq!((img.width(), img.height()), (300, 200));
}

#[tokio::test]
async fn test_upload_jpeg_is_stored_as_jpeg() {
    let harness = TestHarness::new();

    let response = harness.send(upload("8", jpeg(40, 40))).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(harness.store.keys(), vec!["avatars/8.jpeg".to_string()]);
}

#[tokio::test]
async fn test_upload_unknown_bytes_is_bad_request() {
    let harness = TestHarness::new();

    let response = harness.send(upload("1", b"not an image".to_vec())).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_to_string(response).await, "Invalid Image Format");
    assert!(harness.store.is_empty());
}

#[tokio::test]
async fn test_upload_bmp_is_rejected_content_type() {
    let moderator = Arc::new(FakeModerator::returning(&[]));
    let harness = TestHarness::with_moderator(moderator.clone());

    let response = harness.send(upload("1", bmp(16, 16))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_to_string(response).await, "Invalid Image Content Type");
    assert_eq!(moderator.calls(), 0);
}

#[tokio::test]
async fn test_upload_non_numeric_user_id_is_bad_request() {
    let harness = TestHarness::new();

    let response = harness.send(upload("alice", png(8, 8))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(harness.store.is_empty());
}

#[tokio::test]
async fn test_upload_over_body_limit_is_rejected() {
    let mut config = Config::default();
    config.server.max_upload_bytes = 1024;
    let harness = TestHarness::with_config(config);

    let response = harness.send(upload("1", vec![0u8; 4096])).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_upload_multipart_prefers_file_content_field() {
    let harness = TestHarness::new();
    let image = png(10, 10);
    let (content_type, body) = multipart(&[("note", &b"hello"[..]), ("file_content", image.as_slice())]);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/users/55/avatar")
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap();

    let response = harness.send(request).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(harness.stored("avatars", "55.png").await.is_some());
}

#[tokio::test]
async fn test_upload_multipart_falls_back_to_first_field() {
    let harness = TestHarness::new();
    let image = png(10, 10);
    let (content_type, body) = multipart(&[("upload", image.as_slice())]);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/users/56/avatar")
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap();

    let response = harness.send(request).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(harness.stored("avatars", "56.png").await.is_some());
}

// ---------------------------------------------------------------------------
// Moderation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_upload_with_disallowed_label_is_rejected() {
    let moderator = Arc::new(FakeModerator::returning(&["Hate Symbols"]));
    let harness = TestHarness::with_moderator(moderator.clone());

    let response = harness.send(upload("3", png(64, 64))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_to_string(response).await, "Inappropriate Content");
    assert_eq!(moderator.calls(), 1);
    assert!(harness.store.is_empty());
}

#[tokio::test]
async fn test_upload_with_moderation_outage_is_503() {
    let harness = TestHarness::with_moderator(Arc::new(FakeModerator::unavailable()));

    let response = harness.send(upload("3", png(64, 64))).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_to_string(response).await, "Service Unavailable");
    assert!(harness.store.is_empty());
}

#[tokio::test]
async fn test_gif_upload_skips_moderation() {
    let moderator = Arc::new(FakeModerator::returning(&["Explicit Nudity"]));
    let harness = TestHarness::with_moderator(moderator.clone());

    let response = harness.send(upload("4", gif(20, 20))).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(moderator.calls(), 0);
    assert!(harness.stored("avatars", "4.gif").await.is_some());
}

// ---------------------------------------------------------------------------
// Fetch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_get_avatar_appends_png_extension() {
    let harness = TestHarness::new();
    harness.seed("avatars", "1000.png", b"avatar-1000", "image/png").await;

    let response = harness.send(get("/api/v1/avatars/1000")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    assert_eq!(&body_bytes(response).await[..], b"avatar-1000");
}

#[tokio::test]
async fn test_public_alias_serves_same_avatar() {
    let harness = TestHarness::new();
    harness.seed("avatars", "9.jpeg", b"jpeg-9", "image/jpeg").await;

    let response = harness.send(get("/public/api/v1/avatars/9.jpeg")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
    assert_eq!(&body_bytes(response).await[..], b"jpeg-9");
}

#[tokio::test]
async fn test_missing_avatar_falls_back_to_default() {
    let harness = TestHarness::new();
    harness.seed("avatars", "default.png", b"default", "image/png").await;

    let response = harness.send(get("/api/v1/avatars/424242")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(&body_bytes(response).await[..], b"default");
}

#[tokio::test]
async fn test_configured_default_avatar_is_used() {
    let mut config = Config::default();
    config.avatars.default_avatar_filename = "placeholder.webp".into();
    let harness = TestHarness::with_config(config);
    harness
        .seed("avatars", "placeholder.webp", b"placeholder", "image/webp")
        .await;

    let response = harness.send(get("/api/v1/avatars/1")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/webp");
}

#[tokio::test]
async fn test_missing_avatar_without_default_is_404() {
    let harness = TestHarness::new();

    let response = harness.send(get("/api/v1/avatars/1")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_nested_or_traversal_path_is_404() {
    let harness = TestHarness::new();
    harness.seed("avatars", "default.png", b"default", "image/png").await;
    harness.seed("avatars", "1.png", b"one", "image/png").await;

    for uri in [
        "/api/v1/avatars/nested/1.png",
        "/api/v1/avatars/..%2F1.png",
        "/public/api/v1/avatars/a..png",
    ] {
        let response = harness.send(get(uri)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_delete_removes_every_extension() {
    let harness = TestHarness::new();
    harness.seed("avatars", "5.png", b"png", "image/png").await;
    harness.seed("avatars", "5.jpeg", b"jpeg", "image/jpeg").await;
    harness.seed("avatars", "5.webp", b"webp", "image/webp").await;
    harness.seed("avatars", "6.png", b"other", "image/png").await;

    let response = harness.send(delete("5")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(harness.store.keys(), vec!["avatars/6.png".to_string()]);
}

#[tokio::test]
async fn test_delete_missing_avatar_is_204() {
    let harness = TestHarness::new();

    let response = harness.send(delete("77")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_upload_then_fetch_then_delete() {
    let harness = TestHarness::new();

    let response = harness.send(upload("12", jpeg(30, 20))).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = harness.send(get("/api/v1/avatars/12.jpeg")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");

    let response = harness.send(delete("12")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = harness.send(get("/api/v1/avatars/12.jpeg")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Admin authorization
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_admin_routes_require_token_when_auth_enabled() {
    let harness = TestHarness::with_auth();

    let response = harness.send(upload("1", png(8, 8))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = harness
        .send(upload_with_token("1", png(8, 8), "wrong-key"))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = harness.send(delete("1")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    assert!(harness.store.is_empty());
}

#[tokio::test]
async fn test_admin_token_allows_upload() {
    let harness = TestHarness::with_auth();

    let response = harness
        .send(upload_with_token("1", png(8, 8), ADMIN_KEY))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(harness.stored("avatars", "1.png").await.is_some());
}

#[tokio::test]
async fn test_avatar_fetch_is_public_when_auth_enabled() {
    let harness = TestHarness::with_auth();
    harness.seed("avatars", "1.png", b"one", "image/png").await;

    let response = harness.send(get("/api/v1/avatars/1")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Storage failure policy
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_suppress_policy_hides_storage_failures() {
    let app = build_router(failing_context(StorageFailurePolicy::Suppress));

    let response = app.clone().oneshot(upload("1", png(8, 8))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.clone().oneshot(delete("1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.oneshot(get("/api/v1/avatars/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_propagate_policy_surfaces_storage_failures() {
    let app = build_router(failing_context(StorageFailurePolicy::Propagate));

    let response = app.clone().oneshot(upload("1", png(8, 8))).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_to_string(response).await, "Storage Unavailable");

    let response = app.oneshot(delete("1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// ---------------------------------------------------------------------------
// Misc
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_health() {
    let harness = TestHarness::new();

    let response = harness.send(get("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_string(response).await, "ok");
}

#[tokio::test]
async fn test_request_id_is_generated_and_echoed() {
    let harness = TestHarness::new();

    let response = harness.send(get("/health")).await;
    assert!(response.headers().contains_key("x-request-id"));

    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "req-abc")
        .body(Body::empty())
        .unwrap();
    let response = harness.send(request).await;
    assert_eq!(response.headers()["x-request-id"], "req-abc");
}

#[tokio::test]
async fn test_refused_upload_keeps_request_id() {
    let harness = TestHarness::new();

    let mut request = upload("5", b"not an image".to_vec());
    request
        .headers_mut()
        .insert("x-request-id", "req-refused".parse().unwrap());
    let response = harness.send(request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()["x-request-id"], "req-refused");
    assert_eq!(body_to_string(response).await, "Invalid Image Format");
}
