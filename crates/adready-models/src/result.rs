//! Oracle scorecard and canonical analysis result models.
//!
//! The [`Scorecard`] mirrors the JSON schema requested from the reasoning
//! oracle. Every non-optional field is required when deserializing; the
//! optional blocks are required or forbidden depending on the media kind and
//! whether ad copy was supplied, which the analyzer checks after parsing.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::audio::AudioAnalysis;
use crate::copy::AdCopy;
use crate::frame::ExtractedFrame;
use crate::media::MediaKind;

/// Binary checklist signals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuickAudit {
    pub offer_mentioned: bool,
    pub urgency_present: bool,
    /// Video only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_card_present: Option<bool>,
}

/// Score for one of the fixed categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CategoryScore {
    pub name: String,
    /// 1..=10
    pub score: u8,
    pub reason: String,
}

/// Opening-seconds assessment (video only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HookAnalysis {
    /// 1..=10
    pub first_frame_score: u8,
    pub first_frame_assessment: String,
    pub first_three_seconds_assessment: String,
    pub hook_type: String,
}

/// Ad copy assessment (only when copy was supplied).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CopyAnalysis {
    /// 1..=10
    pub copy_score: u8,
    pub headline_feedback: String,
    pub primary_text_feedback: String,
    pub description_feedback: String,
    pub copy_visual_alignment: String,
    pub suggested_headline: String,
    pub suggested_primary_text: String,
    /// The copy exactly as submitted, echoed back by the analyzer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted: Option<AdCopy>,
}

/// Video-specific production notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoNotes {
    pub pacing: String,
    pub sound_off_compatible: bool,
    pub end_card_assessment: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExecutiveSummary {
    pub biggest_strength: String,
    pub biggest_risk: String,
    pub quick_win: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreExplanation {
    pub score_driver: String,
    pub score_drag: String,
}

/// The scorecard produced by the reasoning oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Scorecard {
    /// 0..=100
    pub overall_score: u8,
    pub quick_audit: QuickAudit,
    pub categories: Vec<CategoryScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hook_analysis: Option<HookAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_analysis: Option<CopyAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_notes: Option<VideoNotes>,
    pub policy_flags: Vec<String>,
    pub top_fixes: Vec<String>,
    pub verdict_reason: String,
    pub whats_working: String,
    pub executive_summary: ExecutiveSummary,
    pub score_explanation: ScoreExplanation,
}

/// Coarse readiness bucket derived from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    ReadyToScale,
    MinorTweaks,
    NeedsWork,
    NotReady,
}

impl Verdict {
    pub fn from_score(overall_score: u8) -> Self {
        match overall_score {
            80..=u8::MAX => Self::ReadyToScale,
            60..=79 => Self::MinorTweaks,
            40..=59 => Self::NeedsWork,
            _ => Self::NotReady,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReadyToScale => "ready_to_scale",
            Self::MinorTweaks => "minor_tweaks",
            Self::NeedsWork => "needs_work",
            Self::NotReady => "not_ready",
        }
    }
}

/// Canonical output of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(flatten)]
    pub scorecard: Scorecard,
    pub media_type: MediaKind,
    /// Video only, chronological
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extracted_frames: Vec<ExtractedFrame>,
    /// Video only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_analysis: Option<AudioAnalysis>,
    /// Image only, as a `data:` URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisResult {
    pub fn verdict(&self) -> Verdict {
        Verdict::from_score(self.scorecard.overall_score)
    }

    pub fn overall_score(&self) -> u8 {
        self.scorecard.overall_score
    }
}
