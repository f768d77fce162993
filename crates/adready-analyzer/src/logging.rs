//! Structured analysis logging and subscriber setup.

use tracing::{error, info, warn, Span};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use adready_models::{AnalysisId, MediaKind};

/// Carries the analysis id and media kind into every lifecycle event.
#[derive(Debug, Clone)]
pub struct AnalysisLogger {
    analysis_id: String,
    media_kind: MediaKind,
}

impl AnalysisLogger {
    pub fn new(analysis_id: &AnalysisId, media_kind: MediaKind) -> Self {
        Self {
            analysis_id: analysis_id.to_string(),
            media_kind,
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(
            analysis_id = %self.analysis_id,
            media_kind = %self.media_kind,
            "Analysis started: {}", message
        );
    }

    pub fn log_progress(&self, message: &str) {
        info!(
            analysis_id = %self.analysis_id,
            media_kind = %self.media_kind,
            "Analysis progress: {}", message
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!(
            analysis_id = %self.analysis_id,
            media_kind = %self.media_kind,
            "Analysis warning: {}", message
        );
    }

    /// Log a fatal failure with its stable error code.
    pub fn log_error(&self, error_kind: &str, message: &str) {
        error!(
            analysis_id = %self.analysis_id,
            media_kind = %self.media_kind,
            error_kind,
            "Analysis failed: {}", message
        );
    }

    pub fn log_completion(&self, overall_score: u8, elapsed_secs: f64) {
        info!(
            analysis_id = %self.analysis_id,
            media_kind = %self.media_kind,
            overall_score,
            elapsed_secs,
            "Analysis completed"
        );
    }

    pub fn analysis_id(&self) -> &str {
        &self.analysis_id
    }

    pub fn media_kind(&self) -> MediaKind {
        self.media_kind
    }

    /// Span wrapping the whole analysis.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "analysis",
            analysis_id = %self.analysis_id,
            media_kind = %self.media_kind
        )
    }
}

/// Install the global subscriber.
///
/// `LOG_FORMAT=json` selects JSON lines; anything else gets the ANSI
/// formatter. `RUST_LOG` is honoured on top of the `adready=info` default.
pub fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let mut env_filter = EnvFilter::from_default_env();
    for directive in ["adready=info", "hyper=warn", "reqwest=warn"] {
        if let Ok(d) = directive.parse() {
            env_filter = env_filter.add_directive(d);
        }
    }

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .with_writer(std::io::stderr),
            )
            .with(env_filter)
            .init();
    }
}
