//! Static acceptance rules.

/// MIME types accepted for upload.
pub const ALLOWED_MIME_TYPES: [&str; 4] = ["image/png", "image/jpeg", "image/gif", "image/webp"];

/// Animated formats that skip moderation.
pub const VIDEO_MIME_TYPES: [&str; 1] = ["image/gif"];

/// Moderation labels that block an upload.
pub const DISALLOWED_MODERATION_LABELS: [&str; 8] = [
    "Explicit Nudity",
    "Explicit Sexual Activity",
    "Sex Toys",
    "Obstructed Intimate Parts",
    "Self-Harm",
    "Blood & Gore",
    "Death and Emaciation",
    "Hate Symbols",
];

/// Extensions swept when an image is deleted.
pub const DELETE_CANDIDATE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

pub fn is_allowed_mime_type(mime_type: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&mime_type)
}

pub fn is_video_mime_type(mime_type: &str) -> bool {
    VIDEO_MIME_TYPES.contains(&mime_type)
}

/// True when any label is in [`DISALLOWED_MODERATION_LABELS`].
pub fn should_disallow_upload<S: AsRef<str>>(labels: &[S]) -> bool {
    labels
        .iter()
        .any(|label| DISALLOWED_MODERATION_LABELS.contains(&label.as_ref()))
}
