//! Opening-audio isolation.

use std::path::Path;
use tracing::debug;

use crate::error::MediaResult;
use crate::transcoder::Transcoder;
use crate::workspace::Workspace;

/// How much of the opening audio is isolated for transcription.
pub const AUDIO_WINDOW_SECS: f64 = 15.0;
/// Artifacts smaller than this are treated as "no audio track".
pub const MIN_AUDIO_BYTES: usize = 1000;

/// Outcome of isolating the opening audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioTrack {
    /// No audio stream, or nothing worth transcribing
    Missing,
    /// Compressed mono audio ready for transcription
    Extracted(Vec<u8>),
}

/// Isolate the first [`AUDIO_WINDOW_SECS`] of audio.
///
/// `has_audio_stream` comes from the probe; when it is false the transcoder
/// is not invoked at all.
pub async fn extract_opening_audio(
    transcoder: &dyn Transcoder,
    source: &Path,
    workspace: &Workspace,
    has_audio_stream: bool,
) -> MediaResult<AudioTrack> {
    if !has_audio_stream {
        debug!("Probe reported no audio stream");
        return Ok(AudioTrack::Missing);
    }

    let bytes = transcoder
        .extract_audio(source, AUDIO_WINDOW_SECS, &workspace.audio_path())
        .await?;

    if bytes.len() < MIN_AUDIO_BYTES {
        debug!(size = bytes.len(), "Extracted audio below size floor");
        return Ok(AudioTrack::Missing);
    }

    Ok(AudioTrack::Extracted(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MediaError;
    use crate::probe::ProbeInfo;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedAudio {
        size: usize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Transcoder for FixedAudio {
        fn is_available(&self) -> bool {
            true
        }

        async fn probe(&self, _input: &Path) -> MediaResult<ProbeInfo> {
            Ok(ProbeInfo::unknown())
        }

        async fn extract_frame(&self, _input: &Path, _timestamp: f64, _scratch: &Path) -> MediaResult<Vec<u8>> {
            Err(MediaError::internal("unused"))
        }

        async fn extract_audio(&self, _input: &Path, max_seconds: f64, _scratch: &Path) -> MediaResult<Vec<u8>> {
            assert_eq!(max_seconds, AUDIO_WINDOW_SECS);
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![0; self.size])
        }
    }

    #[tokio::test]
    async fn test_small_artifact_is_missing_track() {
        let ws = Workspace::create(None).unwrap();
        let transcoder = FixedAudio {
            size: MIN_AUDIO_BYTES - 1,
            calls: AtomicUsize::new(0),
        };
        let track = extract_opening_audio(&transcoder, Path::new("in.mp4"), &ws, true)
            .await
            .unwrap();
        assert_eq!(track, AudioTrack::Missing);
    }

    #[tokio::test]
    async fn test_extracted_audio_is_returned() {
        let ws = Workspace::create(None).unwrap();
        let transcoder = FixedAudio {
            size: 4096,
            calls: AtomicUsize::new(0),
        };
        let track = extract_opening_audio(&transcoder, Path::new("in.mp4"), &ws, true)
            .await
            .unwrap();
        assert!(matches!(track, AudioTrack::Extracted(ref b) if b.len() == 4096));
    }

    #[tokio::test]
    async fn test_no_audio_stream_skips_transcoder() {
        let ws = Workspace::create(None).unwrap();
        let transcoder = FixedAudio {
            size: 4096,
            calls: AtomicUsize::new(0),
        };
        let track = extract_opening_audio(&transcoder, Path::new("in.mp4"), &ws, false)
            .await
            .unwrap();
        assert_eq!(track, AudioTrack::Missing);
        assert_eq!(transcoder.calls.load(Ordering::SeqCst), 0);
    }
}
