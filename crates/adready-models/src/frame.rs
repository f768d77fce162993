//! Extracted video frames.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A still frame pulled from a video at a given offset.
///
/// Frames for one asset are always kept in ascending timestamp order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedFrame {
    /// Offset into the video, rounded to one decimal place
    pub timestamp: f64,
    /// MIME type of the encoded image
    pub mime_type: String,
    /// Base64-encoded image bytes
    pub image_base64: String,
}

impl ExtractedFrame {
    /// Create a JPEG frame.
    pub fn jpeg(timestamp: f64, image_base64: impl Into<String>) -> Self {
        Self {
            timestamp,
            mime_type: "image/jpeg".to_string(),
            image_base64: image_base64.into(),
        }
    }

    /// Human-readable offset label, e.g. `2.5s`.
    pub fn label(&self) -> String {
        format!("{:.1}s", self.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label() {
        assert_eq!(ExtractedFrame::jpeg(0.0, "").label(), "0.0s");
        assert_eq!(ExtractedFrame::jpeg(29.5, "").label(), "29.5s");
    }
}
