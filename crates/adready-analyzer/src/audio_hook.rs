//! Audio hook heuristics.
//!
//! Classification and scoring are pure; [`analyze_audio`] wraps them with
//! extraction and transcription and never fails.

use std::path::Path;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use adready_media::{extract_opening_audio, AudioTrack, Transcoder, Workspace};
use adready_models::{AudioAnalysis, Transcription};
use adready_oracle::TranscriptionOracle;

use crate::metrics;

/// First word at or before this offset counts as an early voiceover.
pub const EARLY_START_SECS: f64 = 2.0;
/// Words starting at or before this offset form the opening line.
pub const OPENING_LINE_SECS: f64 = 5.0;
/// Words starting at or before this offset form the reported transcript.
pub const TRANSCRIPT_SECS: f64 = 10.0;

/// Below this many words there is no real spoken hook.
const MIN_HOOK_WORDS: usize = 5;
/// Short transcripts containing a sign-off are end-card voiceovers.
const SIGN_OFF_MAX_WORDS: usize = 15;
/// Opening-line length used when the oracle returned no word timings.
const UNTIMED_OPENING_WORDS: usize = 12;

const BASE_SCORE: i32 = 5;

const CUE_WORDS: &[&str] = &["you", "your", "want", "need", "tired", "stop", "imagine", "finally"];
const GREETINGS: &[&str] = &["hi", "hello", "hey", "welcome"];
const SIGN_OFF_PHRASES: &[&str] = &[
    "thanks for watching",
    "thank you for watching",
    "subscribe",
    "link in bio",
    "link in the bio",
    "shop now",
    "buy now",
    "order now",
    "learn more",
    "sign up",
    "download now",
    "tap the link",
    "click the link",
];

/// Score the spoken opening from 1 to 10.
///
/// `opening_line_lower` must already be lower-cased.
pub fn score_audio_hook(first_word_start: f64, opening_line_lower: &str) -> u8 {
    let mut score = BASE_SCORE;

    if first_word_start <= EARLY_START_SECS {
        score += 2;
    } else {
        score -= 2;
    }

    // Cues match anywhere in the line, so "yourself" counts as "your".
    let has_cue = opening_line_lower.contains('?')
        || CUE_WORDS.iter().any(|cue| opening_line_lower.contains(cue));
    let first_token = opening_line_lower
        .split(|c: char| !c.is_alphanumeric())
        .find(|t| !t.is_empty());

    if has_cue {
        score += 2;
    } else if first_token.is_some_and(|t| GREETINGS.contains(&t)) {
        score -= 1;
    }

    score.clamp(1, 10) as u8
}

/// Classify a transcript into music-only or voiceover and score its hook.
pub fn classify_transcript(transcription: &Transcription) -> AudioAnalysis {
    if transcription.is_empty() {
        return AudioAnalysis::music_only(
            "No speech detected. The creative is music or sound only, so the hook must land visually.",
            None,
        );
    }

    let word_count = transcription.word_count();
    let full_text = full_text(transcription);
    let transcript = if transcription.words.is_empty() {
        Some(full_text.clone())
    } else {
        transcription.words_until(TRANSCRIPT_SECS)
    };

    if word_count < MIN_HOOK_WORDS {
        return AudioAnalysis::music_only(
            format!(
                "Only {} spoken word{} detected. There is no voiceover hook; the opening relies on visuals and music.",
                word_count,
                if word_count == 1 { "" } else { "s" }
            ),
            transcript,
        );
    }

    let lowered = full_text.to_lowercase();
    if word_count < SIGN_OFF_MAX_WORDS && SIGN_OFF_PHRASES.iter().any(|p| lowered.contains(p)) {
        return AudioAnalysis::music_only(
            "The only voiceover is an end-card sign-off or call to action. Nothing is spoken to hook the viewer in the opening seconds.",
            transcript,
        );
    }

    let (first_word_start, opening_line) = match transcription.first_word_start() {
        Some(start) => (start, transcription.words_until(OPENING_LINE_SECS)),
        // Untimed transcripts are scored as a late start.
        None => (
            f64::INFINITY,
            Some(
                full_text
                    .split_whitespace()
                    .take(UNTIMED_OPENING_WORDS)
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
        ),
    };

    let starts_early = first_word_start <= EARLY_START_SECS;
    let opening_lower = opening_line.as_deref().unwrap_or_default().to_lowercase();
    let score = score_audio_hook(first_word_start, &opening_lower);

    AudioAnalysis {
        available: true,
        has_voiceover: true,
        voiceover_starts_early: starts_early,
        opening_line,
        transcript,
        audio_hook_score: score,
        audio_hook_assessment: assess(starts_early, first_word_start, score),
        is_music_only: false,
    }
}

fn full_text(transcription: &Transcription) -> String {
    let text = transcription.text.trim();
    if !text.is_empty() {
        return text.to_string();
    }
    transcription
        .words
        .iter()
        .map(|w| w.word.trim())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn assess(starts_early: bool, first_word_start: f64, score: u8) -> String {
    let timing = if starts_early {
        format!("Voiceover starts early ({:.1}s), inside the scroll-stop window.", first_word_start)
    } else if first_word_start.is_finite() {
        format!(
            "Voiceover starts late ({:.1}s); most viewers decide before the first word.",
            first_word_start
        )
    } else {
        "Voiceover timing could not be measured.".to_string()
    };

    let strength = match score {
        8..=10 => "The opening line speaks directly to the viewer and earns attention.",
        6..=7 => "The opening line is serviceable but could call out the viewer or their problem more directly.",
        _ => "The opening line does little to hook; lead with a question or a pain point.",
    };

    format!("{} {}", timing, strength)
}

/// Extract, transcribe and classify the opening audio.
///
/// Every failure degrades to an unavailable record.
pub async fn analyze_audio(
    transcoder: &dyn Transcoder,
    transcriber: Option<&dyn TranscriptionOracle>,
    source: &Path,
    workspace: &Workspace,
    has_audio_stream: bool,
    transcription_timeout: Duration,
) -> AudioAnalysis {
    let Some(transcriber) = transcriber else {
        debug!("No transcription oracle configured, skipping audio");
        metrics::record_audio_outcome("unavailable");
        return AudioAnalysis::unavailable(
            "Audio analysis unavailable: no transcription service is configured.",
        );
    };

    let audio = match extract_opening_audio(transcoder, source, workspace, has_audio_stream).await {
        Ok(AudioTrack::Extracted(bytes)) => bytes,
        Ok(AudioTrack::Missing) => {
            metrics::record_audio_outcome("no_audio_track");
            return AudioAnalysis::no_audio_track();
        }
        Err(e) => {
            warn!(error = %e, "Audio extraction failed");
            metrics::record_audio_outcome("unavailable");
            return AudioAnalysis::unavailable("Audio analysis unavailable: the audio track could not be extracted.");
        }
    };

    let started = Instant::now();
    let outcome = tokio::time::timeout(transcription_timeout, transcriber.transcribe(audio)).await;
    let elapsed = started.elapsed().as_secs_f64();

    let transcription = match outcome {
        Ok(Ok(t)) => {
            metrics::record_oracle_call("transcription", true, elapsed);
            t
        }
        Ok(Err(e)) => {
            warn!(error = %e, "Transcription failed");
            metrics::record_oracle_call("transcription", false, elapsed);
            metrics::record_audio_outcome("unavailable");
            return AudioAnalysis::unavailable("Audio analysis unavailable: transcription failed.");
        }
        Err(_) => {
            warn!(timeout_secs = transcription_timeout.as_secs(), "Transcription timed out");
            metrics::record_oracle_call("transcription", false, elapsed);
            metrics::record_audio_outcome("unavailable");
            return AudioAnalysis::unavailable("Audio analysis unavailable: transcription timed out.");
        }
    };

    let analysis = classify_transcript(&transcription);
    metrics::record_audio_outcome(if analysis.is_music_only { "music_only" } else { "voiceover" });
    info!(
        has_voiceover = analysis.has_voiceover,
        score = analysis.audio_hook_score,
        "Audio classified"
    );
    analysis
}

#[cfg(test)]
mod tests {
    use super::*;
    use adready_media::{MediaError, MediaResult, ProbeInfo};
    use adready_models::TranscriptWord;
    use adready_oracle::{OracleError, OracleResult};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn words(spec: &[(&str, f64)]) -> Transcription {
        Transcription {
            text: spec.iter().map(|(w, _)| *w).collect::<Vec<_>>().join(" "),
            words: spec
                .iter()
                .map(|(w, s)| TranscriptWord {
                    word: w.to_string(),
                    start: *s,
                    end: s + 0.3,
                })
                .collect(),
        }
    }

    #[test]
    fn test_greeting_only_is_music_only() {
        let analysis = classify_transcript(&words(&[("Hey", 0.1), ("there", 0.4)]));
        assert!(analysis.is_music_only);
        assert!(!analysis.has_voiceover);
        assert_eq!(analysis.audio_hook_score, 6);
        assert!(analysis.audio_hook_assessment.contains("no voiceover hook"));
    }

    #[test]
    fn test_question_hook_scores_nine() {
        assert_eq!(score_audio_hook(1.2, "tired of waiting?"), 9);
    }

    #[test]
    fn test_early_question_voiceover() {
        let analysis = classify_transcript(&words(&[
            ("Tired", 1.2),
            ("of", 1.5),
            ("waiting?", 1.7),
            ("Meet", 3.0),
            ("the", 3.2),
            ("fastest", 3.4),
            ("kettle", 3.8),
            ("ever", 6.0),
        ]));
        assert!(analysis.has_voiceover);
        assert!(analysis.voiceover_starts_early);
        assert_eq!(analysis.opening_line.as_deref(), Some("Tired of waiting? Meet the fastest kettle"));
        assert_eq!(analysis.audio_hook_score, 9);
    }

    #[test]
    fn test_late_greeting_scores_low() {
        assert_eq!(score_audio_hook(3.0, "hello everyone, this is our store"), 2);
        assert_eq!(score_audio_hook(3.0, "our store is open"), 3);
        assert_eq!(score_audio_hook(0.5, "hello and welcome"), 6);
    }

    #[test]
    fn test_cue_words_match_inside_longer_words() {
        assert_eq!(score_audio_hook(0.5, "treat yourself today"), 9);
        assert_eq!(score_audio_hook(3.0, "hey, unstoppable deals inside"), 5);
    }

    #[test]
    fn test_score_always_in_range() {
        let starts = [0.0, 1.9, 2.0, 2.1, 9.5, f64::INFINITY];
        let lines = ["", "hi", "hey you?", "welcome", "finally", "plain words", "?"];
        for start in starts {
            for line in lines {
                let score = score_audio_hook(start, line);
                assert!((1..=10).contains(&score), "{start} {line:?} -> {score}");
            }
        }
    }

    #[test]
    fn test_sign_off_voiceover_is_end_card_only() {
        let analysis = classify_transcript(&words(&[
            ("Shop", 12.0),
            ("now", 12.2),
            ("at", 12.4),
            ("our", 12.5),
            ("store", 12.7),
            ("today", 13.0),
        ]));
        assert!(analysis.is_music_only);
        assert_eq!(analysis.audio_hook_score, 6);
        assert!(analysis.audio_hook_assessment.contains("end-card"));
    }

    #[test]
    fn test_empty_transcript_is_music_only() {
        let analysis = classify_transcript(&Transcription::default());
        assert!(analysis.is_music_only);
        assert_eq!(analysis.transcript, None);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let t = words(&[("You", 0.3), ("need", 0.5), ("this", 0.7), ("right", 0.9), ("now", 1.1)]);
        assert_eq!(classify_transcript(&t), classify_transcript(&t));
    }

    #[test]
    fn test_untimed_transcript_is_scored_late() {
        let t = Transcription {
            text: "Our bakery opens early every single morning downtown".into(),
            words: vec![],
        };
        let analysis = classify_transcript(&t);
        assert!(analysis.has_voiceover);
        assert!(!analysis.voiceover_starts_early);
        assert_eq!(analysis.audio_hook_score, 3);
    }

    struct AudioOnly {
        size: usize,
    }

    #[async_trait]
    impl Transcoder for AudioOnly {
        fn is_available(&self) -> bool {
            true
        }

        async fn probe(&self, _input: &Path) -> MediaResult<ProbeInfo> {
            Ok(ProbeInfo::unknown())
        }

        async fn extract_frame(&self, _input: &Path, _timestamp: f64, _scratch: &Path) -> MediaResult<Vec<u8>> {
            Err(MediaError::internal("unused"))
        }

        async fn extract_audio(&self, _input: &Path, _max_seconds: f64, _scratch: &Path) -> MediaResult<Vec<u8>> {
            Ok(vec![7; self.size])
        }
    }

    struct ScriptedTranscriber {
        result: Result<Transcription, ()>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TranscriptionOracle for ScriptedTranscriber {
        async fn transcribe(&self, _audio: Vec<u8>) -> OracleResult<Transcription> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result
                .clone()
                .map_err(|_| OracleError::RequestFailed {
                    status: 500,
                    body: "boom".into(),
                })
        }
    }

    #[tokio::test]
    async fn test_missing_transcriber_is_unavailable() {
        let ws = Workspace::create(None).unwrap();
        let analysis = analyze_audio(
            &AudioOnly { size: 4096 },
            None,
            Path::new("in.mp4"),
            &ws,
            true,
            Duration::from_secs(5),
        )
        .await;
        assert!(!analysis.available);
        assert_eq!(analysis.audio_hook_score, 0);
    }

    #[tokio::test]
    async fn test_tiny_audio_is_no_track_without_oracle_call() {
        let ws = Workspace::create(None).unwrap();
        let transcriber = ScriptedTranscriber {
            result: Ok(Transcription::default()),
            calls: AtomicUsize::new(0),
        };
        let analysis = analyze_audio(
            &AudioOnly { size: 10 },
            Some(&transcriber),
            Path::new("in.mp4"),
            &ws,
            true,
            Duration::from_secs(5),
        )
        .await;
        assert_eq!(analysis.audio_hook_score, 1);
        assert!(analysis.available);
        assert_eq!(transcriber.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_transcription_failure_degrades() {
        let ws = Workspace::create(None).unwrap();
        let transcriber = ScriptedTranscriber {
            result: Err(()),
            calls: AtomicUsize::new(0),
        };
        let analysis = analyze_audio(
            &AudioOnly { size: 4096 },
            Some(&transcriber),
            Path::new("in.mp4"),
            &ws,
            true,
            Duration::from_secs(5),
        )
        .await;
        assert!(!analysis.available);
        assert_eq!(analysis.audio_hook_score, 0);
        assert_eq!(transcriber.calls.load(Ordering::SeqCst), 1);
    }
}
