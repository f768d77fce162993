//! Gemini client for creative scoring.
//!
//! Sends the system prompt as `systemInstruction` and the evidence as one
//! user turn of inline images followed by the instruction text, with JSON
//! output requested through `responseMimeType`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{OracleError, OracleResult};
use crate::reasoning::ReasoningOracle;
use crate::request::{AnalysisPrompt, ContentBlock};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Gemini API client.
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    timeout_secs: u64,
    client: Client,
}

/// Gemini API request.
#[derive(Debug, Serialize)]
struct GeminiRequest {
    #[serde(rename = "systemInstruction")]
    system_instruction: SystemInstruction,
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    temperature: f32,
}

/// Gemini API response.
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

impl GeminiClient {
    /// Create a new Gemini client.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, timeout_secs: u64) -> OracleResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(OracleError::not_configured("GEMINI_API_KEY is empty"));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| OracleError::transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            model: model.into(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            timeout_secs,
            client,
        })
    }

    /// Point the client at a different endpoint (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn build_request(prompt: &AnalysisPrompt) -> GeminiRequest {
        let parts = prompt
            .blocks()
            .iter()
            .map(|block| match block {
                ContentBlock::Text { text } => Part::Text { text: text.clone() },
                ContentBlock::Image {
                    mime_type,
                    data_base64,
                } => Part::InlineData {
                    inline_data: InlineData {
                        mime_type: mime_type.clone(),
                        data: data_base64.clone(),
                    },
                },
            })
            .collect();

        GeminiRequest {
            system_instruction: SystemInstruction {
                parts: vec![Part::Text {
                    text: prompt.system_prompt().to_string(),
                }],
            },
            contents: vec![Content {
                role: "user".to_string(),
                parts,
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                temperature: 0.2,
            },
        }
    }

    fn extract_text(response: GeminiResponse) -> OracleResult<String> {
        if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(OracleError::EmptyResponse(format!("prompt blocked: {}", reason)));
        }

        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| OracleError::EmptyResponse("no candidates".to_string()))?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(OracleError::EmptyResponse(format!(
                "finish reason {}",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }

        Ok(text)
    }
}

#[async_trait]
impl ReasoningOracle for GeminiClient {
    async fn complete(&self, prompt: &AnalysisPrompt) -> OracleResult<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let request = Self::build_request(prompt);

        info!(
            model = %self.model,
            images = prompt.image_count(),
            "Calling Gemini generateContent"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| OracleError::from_reqwest(e, self.timeout_secs))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            warn!(status, "Gemini API returned an error");
            return Err(OracleError::from_status(status, error_text));
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| OracleError::invalid_response(format!("Failed to parse Gemini response: {}", e)))?;

        let text = Self::extract_text(gemini_response)?;
        debug!(chars = text.len(), "Gemini response received");
        Ok(text)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn prompt() -> AnalysisPrompt {
        AnalysisPrompt::new(
            "You are an ad reviewer.",
            vec![
                ContentBlock::image("image/jpeg", "AAAA"),
                ContentBlock::text("Score this."),
            ],
        )
    }

    async fn client_for(server: &MockServer) -> GeminiClient {
        GeminiClient::new("test-key", "gemini-test", 5)
            .unwrap()
            .with_base_url(server.uri())
    }

    #[test]
    fn test_request_shape() {
        let request = GeminiClient::build_request(&prompt());
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "You are an ad reviewer.");
        let parts = &json["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[0]["inlineData"]["data"], "AAAA");
        assert_eq!(parts[1]["text"], "Score this.");
        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");
    }

    #[test]
    fn test_empty_key_is_not_configured() {
        assert!(matches!(
            GeminiClient::new("  ", DEFAULT_GEMINI_MODEL, 5),
            Err(OracleError::NotConfigured(_))
        ));
    }

    #[tokio::test]
    async fn test_complete_returns_candidate_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-test:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {"parts": [{"text": "{\"overallScore\": "}, {"text": "70}"}]},
                    "finishReason": "STOP"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = client_for(&server).await.complete(&prompt()).await.unwrap();
        assert_eq!(text, "{\"overallScore\": 70}");
    }

    #[tokio::test]
    async fn test_rate_limit_is_distinguished() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("RESOURCE_EXHAUSTED"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).await.complete(&prompt()).await.unwrap_err();
        assert!(matches!(err, OracleError::RateLimited(_)));
    }

    #[tokio::test]
    async fn test_auth_failure_is_distinguished() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("PERMISSION_DENIED"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.complete(&prompt()).await.unwrap_err();
        assert!(matches!(err, OracleError::AuthFailed(_)));
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).await.complete(&prompt()).await.unwrap_err();
        assert!(matches!(err, OracleError::RequestFailed { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_blocked_prompt_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [],
                "promptFeedback": {"blockReason": "SAFETY"}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).await.complete(&prompt()).await.unwrap_err();
        assert!(matches!(err, OracleError::EmptyResponse(ref m) if m.contains("SAFETY")));
    }
}
