//! Image type definitions.
//!
//! Every [`ImageType`] maps to a fixed storage directory and a maximum
//! single-dimension size. Both are static; nothing about an image type is
//! configurable at runtime.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of an uploaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageType {
    /// A user's profile picture.
    UserAvatar,
    /// The banner shown behind a user's profile.
    UserProfileBackground,
    /// A clan's icon.
    ClanIcon,
    /// An in-game screenshot.
    Screenshot,
}

impl ImageType {
    /// All image types, in declaration order.
    pub const ALL: [ImageType; 4] = [
        ImageType::UserAvatar,
        ImageType::UserProfileBackground,
        ImageType::ClanIcon,
        ImageType::Screenshot,
    ];

    /// Object-store directory holding images of this type.
    pub fn directory(&self) -> &'static str {
        match self {
            Self::UserAvatar => "avatars",
            Self::UserProfileBackground => "profile-backgrounds",
            Self::ClanIcon => "clan-icons",
            Self::Screenshot => "screenshots",
        }
    }

    /// Largest allowed width or height in pixels.
    pub fn max_single_dimension(&self) -> u32 {
        match self {
            Self::UserAvatar => 512,
            Self::UserProfileBackground => 1920,
            Self::ClanIcon => 256,
            Self::Screenshot => 1920,
        }
    }

    /// Screenshots skip content moderation because of their volume.
    pub fn is_moderation_exempt(&self) -> bool {
        matches!(self, Self::Screenshot)
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::UserAvatar => "user_avatar",
            Self::UserProfileBackground => "user_profile_background",
            Self::ClanIcon => "clan_icon",
            Self::Screenshot => "screenshot",
        }
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| crate::Error::Validation(format!("unknown image type: {s}")))
    }
}
