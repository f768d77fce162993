//! Oracle response validation and result assembly.

use std::collections::HashSet;

use chrono::Utc;
use tracing::debug;

use adready_models::{
    AdCopy, AnalysisResult, AudioAnalysis, Category, ExtractedFrame, MediaKind, Scorecard,
};

use crate::error::{AnalysisError, AnalyzerResult};

const SCORE_RANGE: std::ops::RangeInclusive<u8> = 1..=10;

/// Strip a surrounding markdown code fence (```json or ```).
pub fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string (e.g. "json") up to the first newline.
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest.trim_start_matches("json"),
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Parse and validate the oracle text for the given kind.
///
/// Categories come back in canonical order with canonical names. Blocks that
/// must not exist for the kind, and `copyAnalysis` when no copy was supplied,
/// are dropped.
pub fn parse_scorecard(raw: &str, kind: MediaKind, copy_supplied: bool) -> AnalyzerResult<Scorecard> {
    let body = strip_code_fence(raw);
    if body.is_empty() {
        return Err(AnalysisError::unparseable("empty response"));
    }

    let mut scorecard: Scorecard = serde_json::from_str(body)
        .map_err(|e| AnalysisError::unparseable(format!("invalid scorecard JSON: {}", e)))?;

    if scorecard.overall_score > 100 {
        return Err(AnalysisError::unparseable(format!(
            "overallScore {} is outside 0-100",
            scorecard.overall_score
        )));
    }

    normalize_categories(&mut scorecard)?;

    match kind {
        MediaKind::Image => {
            scorecard.hook_analysis = None;
            scorecard.video_notes = None;
            scorecard.quick_audit.end_card_present = None;
        }
        MediaKind::Video => {
            let hook = scorecard
                .hook_analysis
                .as_ref()
                .ok_or_else(|| AnalysisError::unparseable("missing hookAnalysis"))?;
            check_score("hookAnalysis.firstFrameScore", hook.first_frame_score)?;
            if scorecard.video_notes.is_none() {
                return Err(AnalysisError::unparseable("missing videoNotes"));
            }
            if scorecard.quick_audit.end_card_present.is_none() {
                return Err(AnalysisError::unparseable("missing quickAudit.endCardPresent"));
            }
        }
    }

    if copy_supplied {
        let copy = scorecard
            .copy_analysis
            .as_ref()
            .ok_or_else(|| AnalysisError::unparseable("missing copyAnalysis"))?;
        check_score("copyAnalysis.copyScore", copy.copy_score)?;
    } else {
        scorecard.copy_analysis = None;
    }

    debug!(overall_score = scorecard.overall_score, "Scorecard validated");
    Ok(scorecard)
}

fn check_score(field: &str, score: u8) -> AnalyzerResult<()> {
    if SCORE_RANGE.contains(&score) {
        Ok(())
    } else {
        Err(AnalysisError::unparseable(format!("{} {} is outside 1-10", field, score)))
    }
}

fn normalize_categories(scorecard: &mut Scorecard) -> AnalyzerResult<()> {
    if scorecard.categories.len() != Category::ALL.len() {
        return Err(AnalysisError::unparseable(format!(
            "expected {} categories, got {}",
            Category::ALL.len(),
            scorecard.categories.len()
        )));
    }

    let mut seen = HashSet::new();
    let mut keyed = Vec::with_capacity(scorecard.categories.len());
    for mut entry in scorecard.categories.drain(..) {
        let category = Category::from_name(&entry.name)
            .map_err(|e| AnalysisError::unparseable(e.to_string()))?;
        if !seen.insert(category) {
            return Err(AnalysisError::unparseable(format!(
                "duplicate category {}",
                category.name()
            )));
        }
        check_score(category.name(), entry.score)?;
        entry.name = category.name().to_string();
        keyed.push((category, entry));
    }

    keyed.sort_by_key(|(category, _)| category.position());
    scorecard.categories = keyed.into_iter().map(|(_, entry)| entry).collect();
    Ok(())
}

/// Deterministic evidence merged into the final result.
#[derive(Debug, Clone, Default)]
pub struct ResultEvidence {
    pub frames: Vec<ExtractedFrame>,
    pub audio: Option<AudioAnalysis>,
    pub thumbnail: Option<String>,
    pub ad_copy: Option<AdCopy>,
}

/// Merge a validated scorecard with the deterministic evidence.
pub fn assemble_result(mut scorecard: Scorecard, kind: MediaKind, evidence: ResultEvidence) -> AnalysisResult {
    if let Some(copy_analysis) = scorecard.copy_analysis.as_mut() {
        copy_analysis.submitted = evidence.ad_copy;
    }

    let (frames, audio, thumbnail) = match kind {
        MediaKind::Image => (Vec::new(), None, evidence.thumbnail),
        MediaKind::Video => (evidence.frames, evidence.audio, None),
    };

    AnalysisResult {
        scorecard,
        media_type: kind,
        extracted_frames: frames,
        audio_analysis: audio,
        thumbnail,
        analyzed_at: Utc::now(),
    }
}
