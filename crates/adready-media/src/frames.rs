//! Duration-aware frame sampling.
//!
//! Three bands of timestamps are sampled:
//! - opening `{0, 1, 2, 3}`: always kept, the first seconds decide the scroll
//! - middle `{5, 8, 12}`: kept only if strictly before `duration - 4`
//! - end `{d-3, d-1, d-0.5}`: clamped to zero and kept if positive, carries
//!   the call to action and end card
//!
//! Timestamps are rounded to one decimal and deduplicated. If more than
//! [`MAX_FRAMES`] candidates survive, bands are admitted in priority order
//! opening, end, middle, so the middle band is truncated first. The result is
//! sorted ascending.

use base64::Engine;
use std::path::Path;
use tracing::{debug, warn};

use adready_models::ExtractedFrame;

use crate::error::{MediaError, MediaResult};
use crate::transcoder::Transcoder;
use crate::workspace::Workspace;

/// Upper bound on frames sent for one asset.
pub const MAX_FRAMES: usize = 10;
/// Duration assumed when probing fails.
pub const DEFAULT_DURATION_SECS: f64 = 30.0;

const OPENING_BAND: [f64; 4] = [0.0, 1.0, 2.0, 3.0];
const MIDDLE_BAND: [f64; 3] = [5.0, 8.0, 12.0];
const END_BAND_OFFSETS: [f64; 3] = [3.0, 1.0, 0.5];
const END_BAND_GUARD_SECS: f64 = 4.0;

/// Resolve a probed duration, falling back to [`DEFAULT_DURATION_SECS`].
pub fn effective_duration(probed: Option<f64>) -> f64 {
    probed
        .filter(|d| d.is_finite() && *d > 0.0)
        .unwrap_or(DEFAULT_DURATION_SECS)
}

/// Deterministic, strictly ascending sample timestamps for a video.
pub fn sample_timestamps(duration: f64) -> Vec<f64> {
    let duration = effective_duration(Some(duration));

    let opening = OPENING_BAND.into_iter();
    let end = END_BAND_OFFSETS
        .into_iter()
        .map(|offset| (duration - offset).max(0.0))
        .filter(|t| *t > 0.0);
    let middle = MIDDLE_BAND
        .into_iter()
        .filter(|t| *t < duration - END_BAND_GUARD_SECS);

    // Work in tenths of a second so rounding and dedup are exact.
    let mut tenths: Vec<u64> = Vec::with_capacity(MAX_FRAMES);
    for t in opening.chain(end).chain(middle) {
        let tenth = (t * 10.0).round() as u64;
        if tenths.len() == MAX_FRAMES {
            break;
        }
        if !tenths.contains(&tenth) {
            tenths.push(tenth);
        }
    }

    tenths.sort_unstable();
    tenths.into_iter().map(|t| t as f64 / 10.0).collect()
}

/// Frames that were extracted plus the timestamps that failed.
#[derive(Debug, Clone)]
pub struct FrameExtraction {
    /// Chronological frames
    pub frames: Vec<ExtractedFrame>,
    /// Timestamps whose extraction failed and were skipped
    pub skipped: Vec<f64>,
}

/// Extract one JPEG frame per timestamp.
///
/// Individual failures are logged and skipped. Fails only when no frame at
/// all could be produced.
pub async fn extract_frames(
    transcoder: &dyn Transcoder,
    source: &Path,
    workspace: &Workspace,
    timestamps: &[f64],
) -> MediaResult<FrameExtraction> {
    let mut frames = Vec::with_capacity(timestamps.len());
    let mut skipped = Vec::new();

    for (index, &timestamp) in timestamps.iter().enumerate() {
        let scratch = workspace.frame_path(index);
        match transcoder.extract_frame(source, timestamp, &scratch).await {
            Ok(bytes) => {
                debug!(timestamp, size = bytes.len(), "Extracted frame");
                frames.push(ExtractedFrame::jpeg(
                    timestamp,
                    base64::engine::general_purpose::STANDARD.encode(&bytes),
                ));
            }
            Err(e) => {
                warn!(timestamp, error = %e, "Frame extraction failed, skipping timestamp");
                skipped.push(timestamp);
            }
        }
    }

    if frames.is_empty() {
        return Err(MediaError::FrameExtractionFailed {
            attempted: timestamps.len(),
        });
    }

    frames.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
    Ok(FrameExtraction { frames, skipped })
}
