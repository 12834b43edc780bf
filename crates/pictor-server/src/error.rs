//! Pipeline error to HTTP response conversion.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use pictor_core::{ErrorKind, ImageError};

/// HTTP status for a pipeline failure.
///
/// Kinds without an explicit mapping fall back to 500.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidContent | ErrorKind::InappropriateContent => StatusCode::BAD_REQUEST,
        ErrorKind::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        other => {
            tracing::warn!(kind = %other, "Unmapped error kind while resolving http status code");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Wrapper so handlers can return `Result<_, AppError>`.
#[derive(Debug)]
pub struct AppError {
    inner: ImageError,
    request_id: Option<String>,
}

impl AppError {
    pub fn new(inner: ImageError) -> Self {
        Self {
            inner,
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, id: String) -> Self {
        self.request_id = Some(id);
        self
    }
}

impl From<ImageError> for AppError {
    fn from(e: ImageError) -> Self {
        Self::new(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = status_for(self.inner.kind());
        let request_id = self.request_id.as_deref().unwrap_or("-");

        if status.is_server_error() {
            tracing::error!(
                request_id,
                status = %status,
                kind = %self.inner.kind(),
                "Server error in API handler"
            );
        } else {
            tracing::info!(
                request_id,
                status = %status,
                feedback = self.inner.user_feedback(),
                "Refused API request"
            );
        }

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.inner.user_feedback().to_string(),
        )
            .into_response()
    }
}
