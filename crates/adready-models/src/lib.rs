//! Shared data models for the AdReady creative analyzer.
//!
//! This crate provides Serde-serializable types for:
//! - Media kinds and upload limits
//! - Extracted video frames
//! - Audio transcripts and the derived audio hook analysis
//! - Ad copy supplied alongside a creative
//! - The oracle scorecard and the canonical analysis result

pub mod audio;
pub mod category;
pub mod copy;
pub mod frame;
pub mod ids;
pub mod media;
pub mod result;

// Re-export common types
pub use audio::{AudioAnalysis, TranscriptWord, Transcription};
pub use category::{Category, CategoryError};
pub use copy::AdCopy;
pub use frame::ExtractedFrame;
pub use ids::{AnalysisId, ReportId};
pub use media::MediaKind;
pub use result::{
    AnalysisResult, CategoryScore, CopyAnalysis, ExecutiveSummary, HookAnalysis, QuickAudit,
    ScoreExplanation, Scorecard, Verdict, VideoNotes,
};
