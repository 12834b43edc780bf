//! Avatar upload, serving and deletion.

use std::path::Path as FsPath;

use axum::extract::{FromRequest, Multipart, Path, Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use bytes::Bytes;
use pictor_core::ImageType;

use crate::context::AppContext;
use crate::error::AppError;
use crate::middleware::auth::AdminAuthorization;
use crate::middleware::request_id::RequestId;

/// Multipart field carrying the file in form uploads.
pub const FILE_FIELD: &str = "file_content";

/// Extension assumed when a fetch path has none.
const DEFAULT_EXTENSION: &str = "png";

/// Upload payload: the raw request body, or one field of a multipart form.
///
/// Multipart bodies yield the [`FILE_FIELD`] field, or the first field when
/// none has that name.
#[derive(Debug)]
pub struct UploadBody(pub Bytes);

impl<S> FromRequest<S> for UploadBody
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if !is_multipart {
            let body = Bytes::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            return Ok(Self(body));
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;

        let mut first = None;
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(IntoResponse::into_response)?
        {
            let is_file = field.name() == Some(FILE_FIELD);
            let data = field.bytes().await.map_err(IntoResponse::into_response)?;
            if is_file {
                return Ok(Self(data));
            }
            first.get_or_insert(data);
        }

        first
            .map(Self)
            .ok_or_else(|| (StatusCode::BAD_REQUEST, "Missing file content").into_response())
    }
}

/// Object name for a fetch path, or `None` when the path is unsafe.
///
/// Only a single path segment is allowed; a missing extension defaults to
/// `.png`.
pub fn avatar_file_name(file_path: &str) -> Option<String> {
    if file_path.is_empty()
        || file_path.contains("..")
        || file_path.contains('/')
        || file_path.contains('\\')
    {
        return None;
    }

    if FsPath::new(file_path).extension().is_some() {
        Some(file_path.to_string())
    } else {
        Some(format!("{file_path}.{DEFAULT_EXTENSION}"))
    }
}

/// POST /api/v1/users/{user_id}/avatar
pub async fn upload_avatar(
    State(ctx): State<AppContext>,
    Extension(admin): Extension<AdminAuthorization>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    Path(user_id): Path<u64>,
    UploadBody(body): UploadBody,
) -> Result<StatusCode, AppError> {
    ctx.pipeline
        .upload_image(ImageType::UserAvatar, body, &user_id.to_string(), &admin)
        .await
        .map_err(|e| AppError::from(e).with_request_id(request_id))?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/users/{user_id}/avatar
pub async fn delete_avatar(
    State(ctx): State<AppContext>,
    Extension(admin): Extension<AdminAuthorization>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    Path(user_id): Path<u64>,
) -> Result<StatusCode, AppError> {
    ctx.pipeline
        .delete_image(ImageType::UserAvatar, &user_id.to_string(), &admin)
        .await
        .map_err(|e| AppError::from(e).with_request_id(request_id))?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/avatars/{*file_path} and its public alias.
///
/// Falls back to the configured default avatar when the requested one does
/// not exist.
pub async fn get_avatar(
    State(ctx): State<AppContext>,
    Path(file_path): Path<String>,
) -> Response {
    let Some(file_name) = avatar_file_name(&file_path) else {
        tracing::debug!(file_path = %file_path, "Rejected avatar path");
        return StatusCode::NOT_FOUND.into_response();
    };

    let directory = ImageType::UserAvatar.directory();
    let default_name = &ctx.config.avatars.default_avatar_filename;

    let mut object = ctx
        .storage
        .download(&file_name, directory)
        .await
        .ok()
        .flatten();
    if object.is_none() {
        object = ctx
            .storage
            .download(default_name, directory)
            .await
            .ok()
            .flatten();
    }

    match object {
        Some(object) => {
            tracing::debug!(file_name = %file_name, size = object.body.len(), "Served user avatar");
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, object.content_type)],
                object.body,
            )
                .into_response()
        }
        None => {
            tracing::warn!(
                file_name = %file_name,
                default_avatar = %default_name,
                "Neither the requested nor the default avatar exists"
            );
            StatusCode::NOT_FOUND.into_response()
        }
    }
}
