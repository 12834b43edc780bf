//! Upload and delete orchestration.

use std::sync::Arc;

use bytes::Bytes;
use pictor_core::{Authorization, ImageError, ImageType};
use pictor_moderation::Moderator;
use pictor_storage::Storage;
use tracing::{error, info, warn};

use crate::policy::{self, DELETE_CANDIDATE_EXTENSIONS};
use crate::transform::{self, ProcessedImage, TransformError};

/// A refused codec step: what the uploader sees and what the logs get.
#[derive(Debug)]
struct CodecFailure {
    error: ImageError,
    cause: String,
}

impl From<TransformError> for CodecFailure {
    fn from(e: TransformError) -> Self {
        let error = match &e {
            TransformError::UnknownFormat => ImageError::invalid_content("Invalid Image Format"),
            TransformError::UnsupportedContentType(_) => {
                ImageError::invalid_content("Invalid Image Content Type")
            }
            TransformError::Decode(_) | TransformError::Encode(_) => {
                ImageError::invalid_content("Invalid Image")
            }
        };
        Self {
            error,
            cause: e.to_string(),
        }
    }
}

/// Run the codec on the blocking pool. A panic surfaces as "Invalid Image".
async fn run_codec(image_type: ImageType, raw: Bytes) -> Result<ProcessedImage, CodecFailure> {
    match tokio::task::spawn_blocking(move || transform::normalize(image_type, &raw)).await {
        Ok(result) => result.map_err(CodecFailure::from),
        Err(e) => Err(CodecFailure {
            error: ImageError::invalid_content("Invalid Image"),
            cause: format!("image processing task failed: {e}"),
        }),
    }
}

/// Validates, normalizes, moderates and stores images.
///
/// Holds no per-request state; share it behind an `Arc`.
#[derive(Clone)]
pub struct ImagePipeline {
    storage: Storage,
    moderator: Option<Arc<dyn Moderator>>,
}

impl ImagePipeline {
    /// `moderator` is `Some` only when moderation is enabled.
    pub fn new(storage: Storage, moderator: Option<Arc<dyn Moderator>>) -> Self {
        Self { storage, moderator }
    }

    /// Decode, bound and re-encode `raw` for `image_type` on the blocking
    /// pool. A codec panic is reported like any other decode failure.
    pub async fn process_image(
        &self,
        image_type: ImageType,
        raw: Bytes,
    ) -> Result<ProcessedImage, ImageError> {
        run_codec(image_type, raw).await.map_err(|f| {
            warn!(image_type = %image_type, cause = %f.cause, "Failed to process image");
            f.error
        })
    }

    /// Validate, normalize, moderate and store an image at
    /// `{directory}/{base_name}.{extension}`.
    pub async fn upload_image(
        &self,
        image_type: ImageType,
        raw: Bytes,
        base_name: &str,
        authorization: &dyn Authorization,
    ) -> Result<(), ImageError> {
        let input_size = raw.len();

        let processed = run_codec(image_type, raw).await.map_err(|f| {
            warn!(
                file_name = base_name,
                image_type = %image_type,
                input_size,
                authorization = %authorization.format_for_logs(),
                reason = f.error.user_feedback(),
                cause = %f.cause,
                "Failed to process image upload"
            );
            f.error
        })?;

        let file_name = format!("{base_name}.{}", processed.extension);

        if let Some(moderator) = self.moderation_target(image_type, processed.mime_type) {
            let labels = moderator
                .detect_moderation_labels(&processed.bytes)
                .await
                .map_err(|e| {
                    error!(
                        moderator = moderator.name(),
                        file_name = %file_name,
                        error = %e,
                        "Moderation service unavailable"
                    );
                    ImageError::service_unavailable()
                })?;

            if policy::should_disallow_upload(&labels) {
                warn!(
                    target: "pictor::audit",
                    image_type = %image_type,
                    file_name = %file_name,
                    labels = ?labels,
                    authorization = %authorization.format_for_logs(),
                    "Rejected inappropriate image upload"
                );
                return Err(ImageError::inappropriate_content());
            }
        }

        let size = processed.bytes.len();
        self.storage
            .upload(
                processed.bytes,
                &file_name,
                image_type.directory(),
                Some(processed.mime_type),
                None,
            )
            .await
            .map_err(|_| ImageError::storage_unavailable())?;

        info!(
            file_name = %file_name,
            image_type = %image_type,
            size,
            width = processed.width,
            height = processed.height,
            authorization = %authorization.format_for_logs(),
            "Uploaded image"
        );
        Ok(())
    }

    /// Remove `base_name` under every candidate extension.
    ///
    /// The sweep always runs to completion. Under the propagate policy the
    /// first storage failure is reported afterwards.
    pub async fn delete_image(
        &self,
        image_type: ImageType,
        base_name: &str,
        authorization: &dyn Authorization,
    ) -> Result<(), ImageError> {
        let mut failed = false;
        for extension in DELETE_CANDIDATE_EXTENSIONS {
            let file_name = format!("{base_name}.{extension}");
            if self
                .storage
                .delete(&file_name, image_type.directory())
                .await
                .is_err()
            {
                failed = true;
            }
        }

        if failed {
            return Err(ImageError::storage_unavailable());
        }

        info!(
            file_name = base_name,
            image_type = %image_type,
            authorization = %authorization.format_for_logs(),
            "Deleted image"
        );
        Ok(())
    }

    fn moderation_target(&self, image_type: ImageType, mime_type: &str) -> Option<&dyn Moderator> {
        if image_type.is_moderation_exempt() || policy::is_video_mime_type(mime_type) {
            return None;
        }
        self.moderator.as_deref()
    }
}

/// Synchronous form of [`ImagePipeline::process_image`].
pub fn process(image_type: ImageType, raw: &[u8]) -> Result<ProcessedImage, ImageError> {
    transform::normalize(image_type, raw).map_err(|e| {
        let failure = CodecFailure::from(e);
        warn!(image_type = %image_type, cause = %failure.cause, "Failed to process image");
        failure.error
    })
}
