//! End-to-end creative analysis.
//!
//! One call to [`CreativeAnalyzer::analyze`] is one logical task. For video
//! the source is staged into a private [`Workspace`], probed once, and frame
//! extraction runs concurrently with audio extraction and transcription. The
//! whole analysis runs under the configured deadline; when it expires the
//! in-flight future is dropped, which kills any child process and removes the
//! workspace.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn, Instrument};

use adready_media::{
    effective_duration, extract_frames, sample_timestamps, FfmpegTranscoder, MediaAsset, ProbeInfo,
    Transcoder, Workspace,
};
use adready_models::{AdCopy, AnalysisId, AnalysisResult, AudioAnalysis, ExtractedFrame, MediaKind, Scorecard};
use adready_oracle::{
    AnalysisPrompt, GeminiClient, ReasoningOracle, TranscriptionOracle, WhisperClient,
};

use crate::audio_hook::analyze_audio;
use crate::config::AnalyzerConfig;
use crate::error::{AnalysisError, AnalyzerResult};
use crate::logging::AnalysisLogger;
use crate::metrics;
use crate::prompt::{build_prompt, PromptSpec};
use crate::response::{assemble_result, parse_scorecard, ResultEvidence};

/// Creative analyzer with injected transcoder and oracles.
pub struct CreativeAnalyzer {
    config: AnalyzerConfig,
    transcoder: Arc<dyn Transcoder>,
    reasoning: Option<Arc<dyn ReasoningOracle>>,
    transcriber: Option<Arc<dyn TranscriptionOracle>>,
}

struct VideoEvidence {
    frames: Vec<ExtractedFrame>,
    audio: AudioAnalysis,
}

impl CreativeAnalyzer {
    /// Analyzer without oracles; attach them with the `with_*` methods.
    pub fn new(config: AnalyzerConfig, transcoder: Arc<dyn Transcoder>) -> Self {
        Self {
            config,
            transcoder,
            reasoning: None,
            transcriber: None,
        }
    }

    pub fn with_reasoning(mut self, reasoning: Arc<dyn ReasoningOracle>) -> Self {
        self.reasoning = Some(reasoning);
        self
    }

    pub fn with_transcriber(mut self, transcriber: Arc<dyn TranscriptionOracle>) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    /// Build the production analyzer: ffmpeg from `PATH`, Gemini, and an
    /// OpenAI-compatible transcriber when their keys are set.
    pub fn from_config(config: AnalyzerConfig) -> AnalyzerResult<Self> {
        let transcoder = Arc::new(FfmpegTranscoder::detect(config.transcoder_timeouts()));
        let mut analyzer = Self::new(config.clone(), transcoder);

        match &config.gemini_api_key {
            Some(key) => {
                let mut client = GeminiClient::new(
                    key.clone(),
                    config.gemini_model.clone(),
                    config.oracle_timeout.as_secs().max(1),
                )?;
                if let Some(url) = &config.gemini_base_url {
                    client = client.with_base_url(url.clone());
                }
                analyzer = analyzer.with_reasoning(Arc::new(client));
            }
            None => warn!("GEMINI_API_KEY not set, analyses will be refused"),
        }

        match &config.transcription_api_key {
            Some(key) => {
                let mut client = WhisperClient::new(
                    key.clone(),
                    config.transcription_model.clone(),
                    config.transcription_timeout.as_secs().max(1),
                )?;
                if let Some(url) = &config.transcription_base_url {
                    client = client.with_base_url(url.clone());
                }
                analyzer = analyzer.with_transcriber(Arc::new(client));
            }
            None => info!("No transcription key set, video audio analysis disabled"),
        }

        Ok(analyzer)
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn has_reasoning(&self) -> bool {
        self.reasoning.is_some()
    }

    pub fn has_transcriber(&self) -> bool {
        self.transcriber.is_some()
    }

    pub fn transcoder_available(&self) -> bool {
        self.transcoder.is_available()
    }

    /// Analyze one creative.
    pub async fn analyze(
        &self,
        bytes: Vec<u8>,
        content_type: &str,
        ad_copy: Option<AdCopy>,
    ) -> AnalyzerResult<AnalysisResult> {
        let Some(reasoning) = self.reasoning.clone() else {
            let err = AnalysisError::OracleNotConfigured("no reasoning oracle credential".to_string());
            metrics::record_analysis_failed(None, err.kind().as_str());
            return Err(err);
        };

        let asset = match MediaAsset::classify(bytes, content_type) {
            Ok(asset) => asset,
            Err(e) => {
                let err = AnalysisError::from(e);
                warn!(content_type, error_kind = err.kind().as_str(), "Rejected upload");
                metrics::record_analysis_failed(None, err.kind().as_str());
                return Err(err);
            }
        };

        let kind = asset.kind();
        let logger = AnalysisLogger::new(&AnalysisId::new(), kind);
        let span = logger.create_span();
        metrics::record_analysis_started(kind);
        logger.log_start(&format!("{} bytes of {}", asset.len(), asset.content_type()));

        let started = Instant::now();
        let deadline = self.config.analysis_timeout;
        let outcome = tokio::time::timeout(
            deadline,
            self.run(&asset, ad_copy, reasoning.as_ref(), &logger),
        )
        .instrument(span)
        .await;

        let result = outcome.unwrap_or_else(|_| Err(AnalysisError::DeadlineExceeded(deadline.as_secs())));
        let elapsed = started.elapsed().as_secs_f64();

        match &result {
            Ok(analysis) => {
                metrics::record_analysis_completed(kind, elapsed);
                logger.log_completion(analysis.overall_score(), elapsed);
            }
            Err(e) => {
                metrics::record_analysis_failed(Some(kind), e.kind().as_str());
                logger.log_error(e.kind().as_str(), &e.to_string());
            }
        }

        result
    }

    async fn run(
        &self,
        asset: &MediaAsset,
        ad_copy: Option<AdCopy>,
        reasoning: &dyn ReasoningOracle,
        logger: &AnalysisLogger,
    ) -> AnalyzerResult<AnalysisResult> {
        let ad_copy = ad_copy.and_then(AdCopy::normalized);
        let kind = asset.kind();

        match kind {
            MediaKind::Image => {
                let thumbnail = asset.data_url();
                let data_base64 = thumbnail
                    .split_once(',')
                    .map(|(_, data)| data)
                    .unwrap_or_default();
                let prompt = build_prompt(
                    &PromptSpec::Image {
                        mime_type: asset.content_type(),
                        data_base64,
                    },
                    ad_copy.as_ref(),
                );

                let scorecard = self.score(reasoning, &prompt, kind, ad_copy.is_some()).await?;
                Ok(assemble_result(
                    scorecard,
                    kind,
                    ResultEvidence {
                        thumbnail: Some(thumbnail),
                        ad_copy,
                        ..Default::default()
                    },
                ))
            }
            MediaKind::Video => {
                let evidence = self.gather_video_evidence(asset, logger).await?;
                let prompt = build_prompt(
                    &PromptSpec::Video {
                        frames: &evidence.frames,
                        audio: Some(&evidence.audio),
                    },
                    ad_copy.as_ref(),
                );

                let scorecard = self.score(reasoning, &prompt, kind, ad_copy.is_some()).await?;
                Ok(assemble_result(
                    scorecard,
                    kind,
                    ResultEvidence {
                        frames: evidence.frames,
                        audio: Some(evidence.audio),
                        ad_copy,
                        ..Default::default()
                    },
                ))
            }
        }
    }

    async fn gather_video_evidence(
        &self,
        asset: &MediaAsset,
        logger: &AnalysisLogger,
    ) -> AnalyzerResult<VideoEvidence> {
        if !self.transcoder.is_available() {
            return Err(AnalysisError::TranscoderUnavailable);
        }

        let workspace = Workspace::create(self.config.work_dir.as_deref())?;
        let source = workspace
            .stage_source(asset.bytes(), asset.file_extension())
            .await?;

        let probe = match self.transcoder.probe(&source).await {
            Ok(info) => info,
            Err(e) => {
                logger.log_warning(&format!("probe failed, assuming defaults: {}", e));
                ProbeInfo::unknown()
            }
        };
        let duration = effective_duration(probe.duration);
        let timestamps = sample_timestamps(duration);
        logger.log_progress(&format!(
            "duration {:.1}s, sampling {} frames, audio stream: {}",
            duration,
            timestamps.len(),
            probe.has_audio
        ));

        let (frames, audio) = tokio::join!(
            extract_frames(self.transcoder.as_ref(), &source, &workspace, &timestamps),
            analyze_audio(
                self.transcoder.as_ref(),
                self.transcriber.as_deref(),
                &source,
                &workspace,
                probe.has_audio,
                self.config.transcription_timeout,
            ),
        );

        let frames = match frames {
            Ok(extraction) => {
                metrics::record_frames(extraction.frames.len(), extraction.skipped.len());
                if !extraction.skipped.is_empty() {
                    logger.log_warning(&format!("skipped frames at {:?}", extraction.skipped));
                }
                extraction.frames
            }
            Err(e) => {
                metrics::record_frames(0, timestamps.len());
                return Err(e.into());
            }
        };

        if let Err(e) = workspace.close() {
            warn!(error = %e, "Failed to remove analysis workspace");
        }

        Ok(VideoEvidence { frames, audio })
    }

    async fn score(
        &self,
        reasoning: &dyn ReasoningOracle,
        prompt: &AnalysisPrompt,
        kind: MediaKind,
        copy_supplied: bool,
    ) -> AnalyzerResult<Scorecard> {
        let timeout = self.config.oracle_timeout;
        let started = Instant::now();
        let outcome = tokio::time::timeout(timeout, reasoning.complete(prompt)).await;
        let elapsed = started.elapsed().as_secs_f64();

        let raw = match outcome {
            Ok(Ok(text)) => {
                metrics::record_oracle_call("reasoning", true, elapsed);
                text
            }
            Ok(Err(e)) => {
                metrics::record_oracle_call("reasoning", false, elapsed);
                return Err(e.into());
            }
            Err(_) => {
                metrics::record_oracle_call("reasoning", false, elapsed);
                return Err(AnalysisError::unexpected(format!(
                    "reasoning oracle timed out after {} seconds",
                    timeout.as_secs()
                )));
            }
        };

        info!(model = reasoning.model(), chars = raw.len(), "Reasoning oracle responded");
        parse_scorecard(&raw, kind, copy_supplied)
    }
}
