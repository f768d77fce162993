//! Analysis metrics.
//!
//! Recording is a no-op until the host installs a recorder.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use adready_models::MediaKind;

/// Install the Prometheus recorder.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    Ok(handle)
}

/// Metric names as constants for consistency.
pub mod names {
    // Lifecycle
    pub const ANALYSES_STARTED_TOTAL: &str = "adready_analyses_started_total";
    pub const ANALYSES_COMPLETED_TOTAL: &str = "adready_analyses_completed_total";
    pub const ANALYSES_FAILED_TOTAL: &str = "adready_analyses_failed_total";
    pub const ANALYSIS_DURATION_SECONDS: &str = "adready_analysis_duration_seconds";

    // Media
    pub const FRAMES_EXTRACTED_TOTAL: &str = "adready_frames_extracted_total";
    pub const FRAME_EXTRACTION_FAILURES_TOTAL: &str = "adready_frame_extraction_failures_total";
    pub const AUDIO_OUTCOMES_TOTAL: &str = "adready_audio_outcomes_total";

    // Oracles
    pub const ORACLE_DURATION_SECONDS: &str = "adready_oracle_duration_seconds";
}

pub fn record_analysis_started(kind: MediaKind) {
    counter!(names::ANALYSES_STARTED_TOTAL, "kind" => kind.as_str()).increment(1);
}

pub fn record_analysis_completed(kind: MediaKind, duration_secs: f64) {
    counter!(names::ANALYSES_COMPLETED_TOTAL, "kind" => kind.as_str()).increment(1);
    histogram!(names::ANALYSIS_DURATION_SECONDS, "kind" => kind.as_str()).record(duration_secs);
}

/// `kind` is `None` when the request was rejected before classification.
pub fn record_analysis_failed(kind: Option<MediaKind>, error_kind: &'static str) {
    let labels = [
        ("kind", kind.map(|k| k.as_str()).unwrap_or("unknown").to_string()),
        ("error_kind", error_kind.to_string()),
    ];
    counter!(names::ANALYSES_FAILED_TOTAL, &labels).increment(1);
}

pub fn record_frames(extracted: usize, skipped: usize) {
    counter!(names::FRAMES_EXTRACTED_TOTAL).increment(extracted as u64);
    if skipped > 0 {
        counter!(names::FRAME_EXTRACTION_FAILURES_TOTAL).increment(skipped as u64);
    }
}

/// `outcome` is one of `unavailable`, `no_audio_track`, `music_only`, `voiceover`.
pub fn record_audio_outcome(outcome: &'static str) {
    counter!(names::AUDIO_OUTCOMES_TOTAL, "outcome" => outcome).increment(1);
}

/// `oracle` is `reasoning` or `transcription`.
pub fn record_oracle_call(oracle: &'static str, success: bool, duration_secs: f64) {
    let labels = [
        ("oracle", oracle.to_string()),
        ("status", if success { "ok" } else { "error" }.to_string()),
    ];
    histogram!(names::ORACLE_DURATION_SECONDS, &labels).record(duration_secs);
}
