//! Analyzer configuration.

use std::path::PathBuf;
use std::time::Duration;

use adready_media::TranscoderTimeouts;
use adready_oracle::{DEFAULT_GEMINI_MODEL, DEFAULT_TRANSCRIPTION_MODEL};

/// Analyzer configuration.
#[derive(Clone)]
pub struct AnalyzerConfig {
    /// Reasoning oracle credential; analysis is refused without it
    pub gemini_api_key: Option<String>,
    /// Reasoning model name
    pub gemini_model: String,
    /// Override for the reasoning endpoint
    pub gemini_base_url: Option<String>,
    /// Transcription credential; audio analysis is skipped without it
    pub transcription_api_key: Option<String>,
    /// Transcription model name
    pub transcription_model: String,
    /// Override for the transcription endpoint
    pub transcription_base_url: Option<String>,
    /// Parent directory for per-request workspaces (system temp dir if unset)
    pub work_dir: Option<PathBuf>,
    /// Timeout for each ffmpeg invocation
    pub ffmpeg_timeout: Duration,
    /// Timeout for each ffprobe invocation
    pub probe_timeout: Duration,
    /// Timeout for the reasoning call
    pub oracle_timeout: Duration,
    /// Timeout for the transcription call
    pub transcription_timeout: Duration,
    /// Overall deadline for one analysis
    pub analysis_timeout: Duration,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: None,
            transcription_api_key: None,
            transcription_model: DEFAULT_TRANSCRIPTION_MODEL.to_string(),
            transcription_base_url: None,
            work_dir: None,
            ffmpeg_timeout: Duration::from_secs(20),
            probe_timeout: Duration::from_secs(10),
            oracle_timeout: Duration::from_secs(60),
            transcription_timeout: Duration::from_secs(30),
            analysis_timeout: Duration::from_secs(90),
        }
    }
}

impl AnalyzerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            gemini_api_key: non_empty_var("GEMINI_API_KEY"),
            gemini_model: non_empty_var("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_base_url: non_empty_var("GEMINI_BASE_URL"),
            transcription_api_key: non_empty_var("TRANSCRIPTION_API_KEY")
                .or_else(|| non_empty_var("OPENAI_API_KEY")),
            transcription_model: non_empty_var("TRANSCRIPTION_MODEL")
                .unwrap_or(defaults.transcription_model),
            transcription_base_url: non_empty_var("TRANSCRIPTION_BASE_URL"),
            work_dir: non_empty_var("ADREADY_WORK_DIR").map(PathBuf::from),
            ffmpeg_timeout: secs_var("ADREADY_FFMPEG_TIMEOUT_SECS", defaults.ffmpeg_timeout),
            probe_timeout: secs_var("ADREADY_PROBE_TIMEOUT_SECS", defaults.probe_timeout),
            oracle_timeout: secs_var("ADREADY_ORACLE_TIMEOUT_SECS", defaults.oracle_timeout),
            transcription_timeout: secs_var(
                "ADREADY_TRANSCRIPTION_TIMEOUT_SECS",
                defaults.transcription_timeout,
            ),
            analysis_timeout: secs_var("ADREADY_ANALYSIS_TIMEOUT_SECS", defaults.analysis_timeout),
        }
    }

    /// Per-call timeouts handed to the FFmpeg transcoder.
    pub fn transcoder_timeouts(&self) -> TranscoderTimeouts {
        TranscoderTimeouts {
            probe_secs: self.probe_timeout.as_secs().max(1),
            command_secs: self.ffmpeg_timeout.as_secs().max(1),
        }
    }
}

// Keys are redacted so the config can be logged at startup.
impl std::fmt::Debug for AnalyzerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyzerConfig")
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "<redacted>"))
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field(
                "transcription_api_key",
                &self.transcription_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("transcription_model", &self.transcription_model)
            .field("transcription_base_url", &self.transcription_base_url)
            .field("work_dir", &self.work_dir)
            .field("ffmpeg_timeout", &self.ffmpeg_timeout)
            .field("probe_timeout", &self.probe_timeout)
            .field("oracle_timeout", &self.oracle_timeout)
            .field("transcription_timeout", &self.transcription_timeout)
            .field("analysis_timeout", &self.analysis_timeout)
            .finish()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn secs_var(name: &str, default: Duration) -> Duration {
    std::env::var(name)
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalyzerConfig::default();
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.gemini_model, "gemini-2.5-flash");
        assert_eq!(config.transcription_model, "whisper-1");
        assert_eq!(config.analysis_timeout, Duration::from_secs(90));
    }

    #[test]
    fn test_transcoder_timeouts_never_zero() {
        let config = AnalyzerConfig {
            ffmpeg_timeout: Duration::from_millis(10),
            ..Default::default()
        };
        let timeouts = config.transcoder_timeouts();
        assert_eq!(timeouts.command_secs, 1);
        assert_eq!(timeouts.probe_secs, 10);
    }

    #[test]
    fn test_debug_redacts_keys() {
        let config = AnalyzerConfig {
            gemini_api_key: Some("super-secret".into()),
            ..Default::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
