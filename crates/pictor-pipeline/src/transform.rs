//! Decode, bound and re-encode image bytes.
//!
//! This is the CPU-bound half of the pipeline. Everything here is
//! synchronous; callers on the async runtime go through
//! [`crate::ImagePipeline::process_image`].

use std::io::Cursor;

use bytes::Bytes;
use image::imageops::FilterType;
use image::ImageFormat;
use pictor_core::ImageType;

use crate::policy;

/// A normalized image ready to be moderated and stored.
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub bytes: Bytes,
    pub format: ImageFormat,
    pub mime_type: &'static str,
    /// Lowercased format name used as the stored file extension.
    pub extension: &'static str,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum TransformError {
    #[error("image format could not be determined")]
    UnknownFormat,

    #[error("content type {0} is not accepted")]
    UnsupportedContentType(&'static str),

    #[error("decode failed: {0}")]
    Decode(image::ImageError),

    #[error("encode failed: {0}")]
    Encode(image::ImageError),
}

/// Dimensions after fitting `width`x`height` within `cap` on both axes.
///
/// The longer side becomes exactly `cap`; the shorter side is scaled by the
/// same ratio and rounded down, but never below one pixel. Images already
/// within the cap are returned unchanged.
pub fn fit_within(width: u32, height: u32, cap: u32) -> (u32, u32) {
    if width <= cap && height <= cap {
        return (width, height);
    }
    let longest = u64::from(width.max(height));
    let scale = |side: u32| ((u64::from(side) * u64::from(cap)) / longest).max(1) as u32;
    (scale(width), scale(height))
}

/// File extension for a stored image of `format`.
fn extension_for(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "png",
        ImageFormat::Jpeg => "jpeg",
        ImageFormat::Gif => "gif",
        ImageFormat::WebP => "webp",
        other => other.extensions_str().first().copied().unwrap_or("bin"),
    }
}

pub(crate) fn normalize(image_type: ImageType, data: &[u8]) -> Result<ProcessedImage, TransformError> {
    let format = image::guess_format(data).map_err(|_| TransformError::UnknownFormat)?;

    let mime_type = format.to_mime_type();
    if !policy::is_allowed_mime_type(mime_type) {
        return Err(TransformError::UnsupportedContentType(mime_type));
    }

    let mut img =
        image::load_from_memory_with_format(data, format).map_err(TransformError::Decode)?;

    let (width, height) = fit_within(img.width(), img.height(), image_type.max_single_dimension());
    if (width, height) != (img.width(), img.height()) {
        img = img.resize_exact(width, height, FilterType::CatmullRom);
    }

    let mut buf = Cursor::new(Vec::with_capacity(data.len()));
    img.write_to(&mut buf, format).map_err(TransformError::Encode)?;

    Ok(ProcessedImage {
        bytes: Bytes::from(buf.into_inner()),
        format,
        mime_type,
        extension: extension_for(format),
        width,
        height,
    })
}
