//! The transcoder capability used by the analysis pipeline.
//!
//! The pipeline only needs three operations from a transcoder. Keeping them
//! behind [`Transcoder`] isolates the one OS-specific dependency (spawning
//! ffmpeg/ffprobe) and lets tests substitute an in-process fake.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::probe::{probe_media, ProbeInfo};

/// Frames are downscaled to at most this width.
pub const FRAME_MAX_WIDTH: u32 = 720;
/// JPEG quality passed to `-q:v`.
pub const FRAME_JPEG_QUALITY: u8 = 4;
/// Sample rate of the isolated audio track.
pub const AUDIO_SAMPLE_RATE: u32 = 16_000;
/// Bitrate of the isolated audio track.
pub const AUDIO_BITRATE: &str = "64k";

/// Media operations the pipeline needs.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Whether the underlying tooling can be used at all.
    fn is_available(&self) -> bool;

    /// Inspect duration and streams.
    async fn probe(&self, input: &Path) -> MediaResult<ProbeInfo>;

    /// Seek to `timestamp` and encode exactly one still image.
    ///
    /// `scratch` is a path inside the request workspace that may be used
    /// for the intermediate file.
    async fn extract_frame(&self, input: &Path, timestamp: f64, scratch: &Path) -> MediaResult<Vec<u8>>;

    /// Isolate the first `max_seconds` of audio as a compressed mono track.
    async fn extract_audio(&self, input: &Path, max_seconds: f64, scratch: &Path) -> MediaResult<Vec<u8>>;
}

/// Per-call timeouts for the FFmpeg transcoder.
#[derive(Debug, Clone, Copy)]
pub struct TranscoderTimeouts {
    pub probe_secs: u64,
    pub command_secs: u64,
}

impl Default for TranscoderTimeouts {
    fn default() -> Self {
        Self {
            probe_secs: 10,
            command_secs: 20,
        }
    }
}

/// [`Transcoder`] backed by the ffmpeg and ffprobe CLIs.
///
/// Binary paths are resolved once at construction and cached.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    ffmpeg: Option<PathBuf>,
    ffprobe: Option<PathBuf>,
    timeouts: TranscoderTimeouts,
}

impl FfmpegTranscoder {
    /// Resolve ffmpeg/ffprobe from `PATH`.
    pub fn detect(timeouts: TranscoderTimeouts) -> Self {
        let ffmpeg = check_ffmpeg().ok();
        let ffprobe = check_ffprobe().ok();

        if ffmpeg.is_none() || ffprobe.is_none() {
            warn!(
                ffmpeg = ffmpeg.is_some(),
                ffprobe = ffprobe.is_some(),
                "Transcoder binaries not found, video analysis disabled"
            );
        } else {
            debug!(?ffmpeg, ?ffprobe, "Resolved transcoder binaries");
        }

        Self {
            ffmpeg,
            ffprobe,
            timeouts,
        }
    }

    /// Use explicit binary paths.
    pub fn with_paths(ffmpeg: impl Into<PathBuf>, ffprobe: impl Into<PathBuf>, timeouts: TranscoderTimeouts) -> Self {
        Self {
            ffmpeg: Some(ffmpeg.into()),
            ffprobe: Some(ffprobe.into()),
            timeouts,
        }
    }

    fn runner(&self) -> MediaResult<FfmpegRunner> {
        let ffmpeg = self.ffmpeg.as_ref().ok_or(MediaError::FfmpegNotFound)?;
        Ok(FfmpegRunner::new(ffmpeg).with_timeout(self.timeouts.command_secs))
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    fn is_available(&self) -> bool {
        self.ffmpeg.is_some() && self.ffprobe.is_some()
    }

    async fn probe(&self, input: &Path) -> MediaResult<ProbeInfo> {
        let ffprobe = self.ffprobe.as_ref().ok_or(MediaError::FfprobeNotFound)?;
        probe_media(ffprobe, input, self.timeouts.probe_secs).await
    }

    async fn extract_frame(&self, input: &Path, timestamp: f64, scratch: &Path) -> MediaResult<Vec<u8>> {
        let cmd = FfmpegCommand::new(input, scratch)
            .seek(timestamp)
            .single_frame()
            .video_filter(format!("scale='min({},iw)':-2", FRAME_MAX_WIDTH))
            .jpeg_quality(FRAME_JPEG_QUALITY);

        self.runner()?.run(&cmd).await?;
        read_output(scratch, || format!("no frame produced at {:.1}s", timestamp)).await
    }

    async fn extract_audio(&self, input: &Path, max_seconds: f64, scratch: &Path) -> MediaResult<Vec<u8>> {
        let cmd = FfmpegCommand::new(input, scratch)
            .duration(max_seconds)
            .no_video()
            .mono(AUDIO_SAMPLE_RATE)
            .audio_codec("libmp3lame")
            .audio_bitrate(AUDIO_BITRATE);

        self.runner()?.run(&cmd).await?;
        read_output(scratch, || "no audio produced".to_string()).await
    }
}

/// Read an ffmpeg output file; ffmpeg can exit 0 without writing anything
/// (e.g. when seeking past the end).
async fn read_output(path: &Path, describe: impl FnOnce() -> String) -> MediaResult<Vec<u8>> {
    match tokio::fs::read(path).await {
        Ok(bytes) if !bytes.is_empty() => Ok(bytes),
        Ok(_) => Err(MediaError::ffmpeg_failed(describe(), None, Some(0))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(MediaError::ffmpeg_failed(describe(), None, Some(0)))
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_unresolved_transcoder_is_unavailable() {
        let transcoder = FfmpegTranscoder {
            ffmpeg: None,
            ffprobe: Some(PathBuf::from("/usr/bin/ffprobe")),
            timeouts: TranscoderTimeouts::default(),
        };
        assert!(!transcoder.is_available());
        assert!(matches!(transcoder.runner(), Err(MediaError::FfmpegNotFound)));
    }

    #[test]
    fn test_explicit_paths_are_available() {
        let transcoder = FfmpegTranscoder::with_paths("ffmpeg", "ffprobe", TranscoderTimeouts::default());
        assert!(transcoder.is_available());
    }

    #[tokio::test]
    async fn test_read_output_rejects_missing_and_empty_files() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.jpg");
        assert!(matches!(
            read_output(&missing, || "x".into()).await,
            Err(MediaError::FfmpegFailed { .. })
        ));

        let empty = dir.path().join("empty.jpg");
        tokio::fs::write(&empty, b"").await.unwrap();
        assert!(read_output(&empty, || "x".into()).await.is_err());

        let full = dir.path().join("full.jpg");
        tokio::fs::write(&full, b"jpeg").await.unwrap();
        assert_eq!(read_output(&full, || "x".into()).await.unwrap(), b"jpeg");
    }
}
