//! Media classification against the upload allow-list.

use adready_models::MediaKind;

use crate::error::{MediaError, MediaResult};

/// A classified upload. Only ever an image or a video.
#[derive(Debug, Clone)]
pub struct MediaAsset {
    bytes: Vec<u8>,
    content_type: String,
    kind: MediaKind,
}

impl MediaAsset {
    /// Classify a buffer by its declared content type.
    ///
    /// The buffer length is the authoritative size check.
    pub fn classify(bytes: Vec<u8>, declared_content_type: &str) -> MediaResult<Self> {
        let content_type = normalize_content_type(declared_content_type);
        let kind = MediaKind::from_content_type(&content_type)
            .ok_or_else(|| MediaError::UnsupportedMediaType(declared_content_type.to_string()))?;

        ensure_within_limit(kind, bytes.len() as u64)?;

        Ok(Self {
            bytes,
            content_type,
            kind,
        })
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    /// Normalized content type (lower-case, parameters stripped).
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// File extension used when staging the asset to disk.
    pub fn file_extension(&self) -> &'static str {
        match self.content_type.as_str() {
            "image/jpeg" => "jpg",
            "image/png" => "png",
            "image/webp" => "webp",
            "image/gif" => "gif",
            "video/quicktime" => "mov",
            "video/webm" => "webm",
            _ => "mp4",
        }
    }

    /// Encode the image as a `data:` URL for thumbnails.
    pub fn data_url(&self) -> String {
        use base64::Engine;
        format!(
            "data:{};base64,{}",
            self.content_type,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// Fast reject from a declared length (e.g. a `Content-Length` header)
/// before the body has been read.
pub fn check_declared_length(declared_content_type: &str, declared_length: u64) -> MediaResult<MediaKind> {
    let content_type = normalize_content_type(declared_content_type);
    let kind = MediaKind::from_content_type(&content_type)
        .ok_or_else(|| MediaError::UnsupportedMediaType(declared_content_type.to_string()))?;
    ensure_within_limit(kind, declared_length)?;
    Ok(kind)
}

/// Lower-case a content type and strip any parameters.
pub fn normalize_content_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn ensure_within_limit(kind: MediaKind, size: u64) -> MediaResult<()> {
    let limit = kind.max_bytes();
    if size > limit {
        return Err(MediaError::PayloadTooLarge { kind, size, limit });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use adready_models::media::{MAX_IMAGE_BYTES, MAX_VIDEO_BYTES};

    #[test]
    fn test_classify_image_and_video() {
        let image = MediaAsset::classify(vec![1, 2, 3], "image/png").unwrap();
        assert_eq!(image.kind(), MediaKind::Image);
        assert_eq!(image.file_extension(), "png");

        let video = MediaAsset::classify(vec![0; 16], "Video/QuickTime; codecs=avc1").unwrap();
        assert_eq!(video.kind(), MediaKind::Video);
        assert_eq!(video.content_type(), "video/quicktime");
        assert_eq!(video.file_extension(), "mov");
    }

    #[test]
    fn test_classify_rejects_unlisted_types() {
        for ct in ["application/pdf", "image/svg+xml", "video/x-matroska", ""] {
            let err = MediaAsset::classify(vec![1], ct).unwrap_err();
            assert!(matches!(err, MediaError::UnsupportedMediaType(_)), "{ct}");
        }
    }

    #[test]
    fn test_classify_enforces_buffer_limit() {
        let too_big = vec![0u8; MAX_IMAGE_BYTES as usize + 1];
        let err = MediaAsset::classify(too_big, "image/jpeg").unwrap_err();
        assert!(matches!(
            err,
            MediaError::PayloadTooLarge {
                kind: MediaKind::Image,
                ..
            }
        ));
    }

    #[test]
    fn test_declared_length_fast_reject() {
        assert_eq!(
            check_declared_length("video/mp4", MAX_VIDEO_BYTES).unwrap(),
            MediaKind::Video
        );
        assert!(matches!(
            check_declared_length("video/mp4", MAX_VIDEO_BYTES + 1),
            Err(MediaError::PayloadTooLarge { .. })
        ));
        // A video-sized image is still rejected under the image limit.
        assert!(check_declared_length("image/gif", MAX_IMAGE_BYTES + 1).is_err());
    }

    #[test]
    fn test_data_url() {
        let image = MediaAsset::classify(b"abc".to_vec(), "image/jpeg").unwrap();
        assert_eq!(image.data_url(), "data:image/jpeg;base64,YWJj");
    }
}
