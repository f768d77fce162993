//! Media kinds and upload limits.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum accepted image upload (20 MB).
pub const MAX_IMAGE_BYTES: u64 = 20 * 1024 * 1024;
/// Maximum accepted video upload (50 MB).
pub const MAX_VIDEO_BYTES: u64 = 50 * 1024 * 1024;

/// Allow-listed image content types.
pub const IMAGE_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/gif"];
/// Allow-listed video content types.
pub const VIDEO_CONTENT_TYPES: &[&str] = &["video/mp4", "video/quicktime", "video/webm"];

/// Kind of creative being analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Returns the kind as a string for display and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }

    /// Maximum payload size accepted for this kind.
    pub fn max_bytes(&self) -> u64 {
        match self {
            Self::Image => MAX_IMAGE_BYTES,
            Self::Video => MAX_VIDEO_BYTES,
        }
    }

    /// Classify a normalized content type against the allow-lists.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        if IMAGE_CONTENT_TYPES.contains(&content_type) {
            Some(Self::Image)
        } else if VIDEO_CONTENT_TYPES.contains(&content_type) {
            Some(Self::Video)
        } else {
            None
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_content_type() {
        assert_eq!(MediaKind::from_content_type("image/png"), Some(MediaKind::Image));
        assert_eq!(MediaKind::from_content_type("video/quicktime"), Some(MediaKind::Video));
        assert_eq!(MediaKind::from_content_type("application/pdf"), None);
        assert_eq!(MediaKind::from_content_type("video/x-msvideo"), None);
    }

    #[test]
    fn test_limits() {
        assert_eq!(MediaKind::Image.max_bytes(), 20 * 1024 * 1024);
        assert_eq!(MediaKind::Video.max_bytes(), 50 * 1024 * 1024);
    }
}
