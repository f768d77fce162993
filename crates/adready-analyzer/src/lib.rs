//! Creative readiness analysis for ad images and videos.
//!
//! Turns one uploaded creative into a small deterministic evidence bundle
//! (sampled frames, opening-audio heuristics, ad copy), submits it to a
//! reasoning oracle, and validates the returned scorecard into an
//! [`AnalysisResult`](adready_models::AnalysisResult).

pub mod audio_hook;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod prompt;
pub mod response;
pub mod store;

pub use audio_hook::{analyze_audio, classify_transcript, score_audio_hook};
pub use config::AnalyzerConfig;
pub use error::{AnalysisError, AnalyzerResult, ErrorKind};
pub use logging::{init_tracing, AnalysisLogger};
pub use pipeline::CreativeAnalyzer;
pub use prompt::{build_prompt, PromptSpec, SYSTEM_PROMPT};
pub use response::{assemble_result, parse_scorecard, strip_code_fence, ResultEvidence};
pub use store::{InMemoryReportStore, ReportMetadata, ReportStore, StoreError, StoreResult, StoredReport};
