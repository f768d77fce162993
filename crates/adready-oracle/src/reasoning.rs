//! Reasoning oracle contract.

use async_trait::async_trait;

use crate::error::OracleResult;
use crate::request::AnalysisPrompt;

/// A multimodal model that answers an [`AnalysisPrompt`] with text.
#[async_trait]
pub trait ReasoningOracle: Send + Sync {
    /// Submit the prompt and return the raw text response.
    async fn complete(&self, prompt: &AnalysisPrompt) -> OracleResult<String>;

    /// Model identifier, for logs.
    fn model(&self) -> &str;
}
