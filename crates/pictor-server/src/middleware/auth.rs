//! Admin authorization middleware.
//!
//! Admin routes require `Authorization: Bearer <admin_api_key>`. When auth is
//! disabled every caller is treated as an anonymous admin. The resolved
//! [`AdminAuthorization`] is inserted into request extensions and handed to
//! the pipeline for log attribution.

use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use pictor_core::config::AuthConfig;
use pictor_core::Authorization;
use sha2::{Digest, Sha256};

use crate::context::AppContext;

/// Length in hex characters of the key fingerprint shown in logs.
const FINGERPRINT_LEN: usize = 12;

/// A caller allowed to use admin routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminAuthorization {
    /// Short SHA-256 fingerprint of the presented key; `None` when auth is off.
    key_fingerprint: Option<String>,
}

impl AdminAuthorization {
    pub fn anonymous() -> Self {
        Self {
            key_fingerprint: None,
        }
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            key_fingerprint: Some(fingerprint(token)),
        }
    }
}

impl Authorization for AdminAuthorization {
    fn format_for_logs(&self) -> String {
        match &self.key_fingerprint {
            Some(fp) => format!("admin(key:{fp})"),
            None => "admin(anonymous)".to_string(),
        }
    }
}

fn fingerprint(token: &str) -> String {
    let mut hex = hex::encode(Sha256::digest(token.as_bytes()));
    hex.truncate(FINGERPRINT_LEN);
    hex
}

/// Resolve the caller from the raw `Authorization` header value.
///
/// Returns `None` when auth is enabled and the bearer token is missing,
/// malformed or wrong. An enabled config with no key rejects everyone.
pub fn resolve_admin(auth: &AuthConfig, authorization: Option<&str>) -> Option<AdminAuthorization> {
    if !auth.enabled {
        return Some(AdminAuthorization::anonymous());
    }

    let expected = auth.admin_api_key.as_deref().filter(|k| !k.is_empty())?;
    let token = authorization?.strip_prefix("Bearer ")?;

    (token == expected).then(|| AdminAuthorization::with_token(token))
}

/// Middleware guarding admin routes.
pub async fn require_admin(
    State(ctx): State<AppContext>,
    mut request: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match resolve_admin(&ctx.config.auth, authorization) {
        Some(admin) => {
            request.extensions_mut().insert(admin);
            Ok(next.run(request).await)
        }
        None => {
            tracing::warn!(path = %request.uri().path(), "Rejected unauthorized admin request");
            Err((StatusCode::UNAUTHORIZED, "Unauthorized").into_response())
        }
    }
}
