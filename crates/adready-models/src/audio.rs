//! Audio transcript and audio hook analysis models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Score reported when no audio analysis could be performed.
pub const UNAVAILABLE_AUDIO_SCORE: u8 = 0;
/// Score reported when the creative has no audio track at all.
pub const NO_AUDIO_TRACK_SCORE: u8 = 1;
/// Neutral score for music-only creatives.
pub const MUSIC_ONLY_SCORE: u8 = 6;

/// A single transcribed word with timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TranscriptWord {
    pub word: String,
    /// Start offset in seconds
    pub start: f64,
    /// End offset in seconds
    pub end: f64,
}

/// Output of the transcription oracle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Transcription {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub words: Vec<TranscriptWord>,
}

impl Transcription {
    /// Number of spoken words, preferring word timings over the raw text.
    pub fn word_count(&self) -> usize {
        if self.words.is_empty() {
            self.text.split_whitespace().count()
        } else {
            self.words.len()
        }
    }

    /// Returns true when nothing was transcribed.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.words.is_empty()
    }

    /// Join all words that start at or before `max_start` seconds.
    ///
    /// Returns `None` when no word qualifies.
    pub fn words_until(&self, max_start: f64) -> Option<String> {
        let line = self
            .words
            .iter()
            .filter(|w| w.start <= max_start)
            .map(|w| w.word.trim())
            .filter(|w| !w.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        (!line.is_empty()).then_some(line)
    }

    /// Start time of the first spoken word.
    pub fn first_word_start(&self) -> Option<f64> {
        self.words
            .iter()
            .map(|w| w.start)
            .min_by(|a, b| a.total_cmp(b))
    }
}

/// Audio evidence derived from the opening seconds of a video.
///
/// Immutable once computed. `available == false` means the analysis could
/// not run at all, which is distinct from a creative with no audio track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AudioAnalysis {
    pub available: bool,
    pub has_voiceover: bool,
    /// First spoken word at or before 2.0s
    pub voiceover_starts_early: bool,
    /// Words spoken at or before 5.0s
    pub opening_line: Option<String>,
    /// Words spoken at or before 10.0s
    pub transcript: Option<String>,
    pub audio_hook_score: u8,
    pub audio_hook_assessment: String,
    pub is_music_only: bool,
}

impl AudioAnalysis {
    /// Audio analysis could not be performed (oracle missing or failed).
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            available: false,
            has_voiceover: false,
            voiceover_starts_early: false,
            opening_line: None,
            transcript: None,
            audio_hook_score: UNAVAILABLE_AUDIO_SCORE,
            audio_hook_assessment: reason.into(),
            is_music_only: false,
        }
    }

    /// The creative carries no usable audio track.
    pub fn no_audio_track() -> Self {
        Self {
            available: true,
            has_voiceover: false,
            voiceover_starts_early: false,
            opening_line: None,
            transcript: None,
            audio_hook_score: NO_AUDIO_TRACK_SCORE,
            audio_hook_assessment: "No audio track detected. The creative relies entirely on visuals and on-screen text.".to_string(),
            is_music_only: false,
        }
    }

    /// No meaningful spoken hook; message delivery is on-screen.
    pub fn music_only(assessment: impl Into<String>, transcript: Option<String>) -> Self {
        Self {
            available: true,
            has_voiceover: false,
            voiceover_starts_early: false,
            opening_line: None,
            transcript,
            audio_hook_score: MUSIC_ONLY_SCORE,
            audio_hook_assessment: assessment.into(),
            is_music_only: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(w: &str, start: f64) -> TranscriptWord {
        TranscriptWord {
            word: w.to_string(),
            start,
            end: start + 0.3,
        }
    }

    #[test]
    fn test_words_until() {
        let t = Transcription {
            text: "one two three".into(),
            words: vec![word("one", 0.5), word("two", 4.9), word("three", 7.0)],
        };
        assert_eq!(t.words_until(5.0).as_deref(), Some("one two"));
        assert_eq!(t.words_until(10.0).as_deref(), Some("one two three"));
        assert_eq!(t.words_until(0.1), None);
    }

    #[test]
    fn test_word_count_falls_back_to_text() {
        let t = Transcription {
            text: "shop now today".into(),
            words: vec![],
        };
        assert_eq!(t.word_count(), 3);
        assert!(!t.is_empty());
        assert!(Transcription::default().is_empty());
    }

    #[test]
    fn test_scores_are_distinct() {
        assert_eq!(AudioAnalysis::unavailable("x").audio_hook_score, 0);
        assert_eq!(AudioAnalysis::no_audio_track().audio_hook_score, 1);
        assert_eq!(AudioAnalysis::music_only("x", None).audio_hook_score, 6);
        assert!(!AudioAnalysis::unavailable("x").available);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(AudioAnalysis::no_audio_track()).unwrap();
        assert_eq!(json["audioHookScore"], 1);
        assert_eq!(json["isMusicOnly"], false);
    }
}
