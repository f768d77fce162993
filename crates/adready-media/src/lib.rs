#![deny(unreachable_patterns)]
//! FFmpeg CLI wrapper and evidence extraction for ad creatives.
//!
//! This crate provides:
//! - Content-type classification and upload size limits
//! - Type-safe FFmpeg command building with bounded, kill-on-drop execution
//! - FFprobe duration and stream probing
//! - A narrow [`Transcoder`] capability trait with an FFmpeg implementation
//! - Duration-aware frame sampling biased toward the opening and closing seconds
//! - Opening-audio isolation for transcription
//! - A scoped per-request [`Workspace`] that is removed on every exit path

pub mod audio;
pub mod classify;
pub mod command;
pub mod error;
pub mod frames;
pub mod probe;
pub mod transcoder;
pub mod workspace;

pub use audio::{extract_opening_audio, AudioTrack, AUDIO_WINDOW_SECS, MIN_AUDIO_BYTES};
pub use classify::{check_declared_length, normalize_content_type, MediaAsset};
pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use error::{MediaError, MediaResult};
pub use frames::{
    effective_duration, extract_frames, sample_timestamps, FrameExtraction, MAX_FRAMES,
};
pub use probe::{probe_media, ProbeInfo};
pub use transcoder::{FfmpegTranscoder, Transcoder, TranscoderTimeouts};
pub use workspace::Workspace;
