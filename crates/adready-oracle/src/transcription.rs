//! Transcription oracle contract and an OpenAI-compatible client.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

use adready_models::Transcription;

use crate::error::{OracleError, OracleResult};

pub const DEFAULT_TRANSCRIPTION_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-1";

/// Speech-to-text with word-level timestamps.
#[async_trait]
pub trait TranscriptionOracle: Send + Sync {
    /// Transcribe compressed audio bytes.
    async fn transcribe(&self, audio: Vec<u8>) -> OracleResult<Transcription>;
}

/// Client for an OpenAI-compatible `audio/transcriptions` endpoint.
pub struct WhisperClient {
    api_key: String,
    model: String,
    base_url: String,
    timeout_secs: u64,
    client: Client,
}

impl WhisperClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, timeout_secs: u64) -> OracleResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(OracleError::not_configured("transcription API key is empty"));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| OracleError::transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            model: model.into(),
            base_url: DEFAULT_TRANSCRIPTION_BASE_URL.to_string(),
            timeout_secs,
            client,
        })
    }

    /// Point the client at a different endpoint (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn build_form(&self, audio: Vec<u8>) -> OracleResult<Form> {
        let file = Part::bytes(audio)
            .file_name("opening_audio.mp3")
            .mime_str("audio/mpeg")
            .map_err(|e| OracleError::transport(format!("Invalid audio part: {}", e)))?;

        Ok(Form::new()
            .part("file", file)
            .text("model", self.model.clone())
            .text("response_format", "verbose_json")
            .text("timestamp_granularities[]", "word"))
    }
}

#[async_trait]
impl TranscriptionOracle for WhisperClient {
    async fn transcribe(&self, audio: Vec<u8>) -> OracleResult<Transcription> {
        let url = format!("{}/audio/transcriptions", self.base_url);
        info!(model = %self.model, size = audio.len(), "Requesting transcription");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(self.build_form(audio)?)
            .send()
            .await
            .map_err(|e| OracleError::from_reqwest(e, self.timeout_secs))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            warn!(status, "Transcription API returned an error");
            return Err(OracleError::from_status(status, error_text));
        }

        let transcription: Transcription = response.json().await.map_err(|e| {
            OracleError::invalid_response(format!("Failed to parse transcription: {}", e))
        })?;

        debug!(
            words = transcription.words.len(),
            chars = transcription.text.len(),
            "Transcription received"
        );
        Ok(transcription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> WhisperClient {
        WhisperClient::new("sk-test", DEFAULT_TRANSCRIPTION_MODEL, 5)
            .unwrap()
            .with_base_url(format!("{}/v1", server.uri()))
    }

    #[tokio::test]
    async fn test_transcribe_parses_word_timings() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/audio/transcriptions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "task": "transcribe",
                "language": "english",
                "duration": 14.9,
                "text": "Tired of waiting?",
                "words": [
                    {"word": "Tired", "start": 1.2, "end": 1.5},
                    {"word": "of", "start": 1.5, "end": 1.6},
                    {"word": "waiting?", "start": 1.6, "end": 2.1}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let transcription = client_for(&server)
            .await
            .transcribe(vec![0u8; 2048])
            .await
            .unwrap();

        assert_eq!(transcription.text, "Tired of waiting?");
        assert_eq!(transcription.words.len(), 3);
        assert_eq!(transcription.first_word_start(), Some(1.2));
    }

    #[tokio::test]
    async fn test_missing_words_defaults_to_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"text": ""})))
            .mount(&server)
            .await;

        let transcription = client_for(&server).await.transcribe(vec![1; 1500]).await.unwrap();
        assert!(transcription.is_empty());
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid_api_key"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.transcribe(vec![1; 1500]).await.unwrap_err();
        assert!(matches!(err, OracleError::AuthFailed(_)));
    }
}
