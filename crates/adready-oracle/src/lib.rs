//! Clients for the external oracles consumed by the analyzer.
//!
//! Both services are black boxes reached over HTTP:
//! - the reasoning oracle turns an [`AnalysisPrompt`] into free text
//!   (Gemini `generateContent`)
//! - the transcription oracle turns audio bytes into a word-timed
//!   transcript (OpenAI-compatible `audio/transcriptions`)
//!
//! Neither client retries. A failed multimodal call is expensive, so retry
//! policy belongs to whoever invokes the pipeline.

pub mod error;
pub mod gemini;
pub mod reasoning;
pub mod request;
pub mod transcription;

pub use error::{OracleError, OracleResult};
pub use gemini::{GeminiClient, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};
pub use reasoning::ReasoningOracle;
pub use request::{AnalysisPrompt, ContentBlock};
pub use transcription::{
    TranscriptionOracle, WhisperClient, DEFAULT_TRANSCRIPTION_BASE_URL,
    DEFAULT_TRANSCRIPTION_MODEL,
};
