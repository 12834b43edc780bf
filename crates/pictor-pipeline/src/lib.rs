//! pictor-pipeline: the image upload pipeline.
//!
//! [`ImagePipeline`] turns untrusted upload bytes into a stored image:
//!
//! 1. detect the format and check its MIME type against [`ALLOWED_MIME_TYPES`]
//! 2. decode and shrink to the image type's single-dimension cap
//! 3. re-encode in the detected format
//! 4. run moderation unless the image type or format is exempt
//! 5. persist through [`pictor_storage::Storage`]
//!
//! Deletes sweep every extension in [`DELETE_CANDIDATE_EXTENSIONS`].

mod pipeline;
pub mod policy;
mod transform;

pub use pipeline::{process, ImagePipeline};
pub use policy::{
    should_disallow_upload, ALLOWED_MIME_TYPES, DELETE_CANDIDATE_EXTENSIONS,
    DISALLOWED_MODERATION_LABELS, VIDEO_MIME_TYPES,
};
pub use transform::{fit_within, ProcessedImage};

pub use image::ImageFormat;
