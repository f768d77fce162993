//! Report persistence contract.
//!
//! Hosts persist finished analyses through [`ReportStore`]. The in-memory
//! implementation backs tests and single-process hosts. It keeps each report
//! as its JSON document, the shape a document database would hold, so reads
//! always decode a fresh copy.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

use adready_models::{AnalysisResult, ReportId};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to encode or decode report: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Metadata stored alongside a result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

/// A persisted analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredReport {
    pub id: ReportId,
    #[serde(flatten)]
    pub metadata: ReportMetadata,
    pub result: AnalysisResult,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Persist a finished result and return its opaque id.
    async fn save(&self, result: AnalysisResult, metadata: ReportMetadata) -> StoreResult<ReportId>;

    async fn get(&self, id: &ReportId) -> StoreResult<Option<StoredReport>>;

    /// Reports whose brand name contains `brand` (case-insensitive), created
    /// within `max_age`, newest first.
    ///
    /// Substring matching is approximate: "Acme" also matches "Acme Labs".
    async fn find_recent_for_brand(&self, brand: &str, max_age: Duration) -> StoreResult<Vec<StoredReport>>;
}

/// Process-local [`ReportStore`].
#[derive(Debug, Default)]
pub struct InMemoryReportStore {
    documents: RwLock<HashMap<ReportId, String>>,
}

impl InMemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    async fn insert(&self, report: &StoredReport) -> StoreResult<()> {
        let document = serde_json::to_string(report)?;
        self.documents.write().await.insert(report.id.clone(), document);
        Ok(())
    }
}

#[async_trait]
impl ReportStore for InMemoryReportStore {
    async fn save(&self, result: AnalysisResult, metadata: ReportMetadata) -> StoreResult<ReportId> {
        let id = ReportId::new();
        let report = StoredReport {
            id: id.clone(),
            metadata,
            result,
            created_at: Utc::now(),
        };
        self.insert(&report).await?;
        debug!(report_id = %id, "Saved report");
        Ok(id)
    }

    async fn get(&self, id: &ReportId) -> StoreResult<Option<StoredReport>> {
        self.documents
            .read()
            .await
            .get(id)
            .map(|document| serde_json::from_str(document))
            .transpose()
            .map_err(StoreError::from)
    }

    async fn find_recent_for_brand(&self, brand: &str, max_age: Duration) -> StoreResult<Vec<StoredReport>> {
        let needle = brand.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let cutoff = Utc::now() - max_age;
        let mut matches = Vec::new();
        for document in self.documents.read().await.values() {
            let report: StoredReport = serde_json::from_str(document)?;
            let brand_matches = report
                .metadata
                .brand_name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&needle));
            if brand_matches && report.created_at >= cutoff {
                matches.push(report);
            }
        }

        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adready_models::{
        CategoryScore, ExecutiveSummary, MediaKind, QuickAudit, ScoreExplanation, Scorecard,
    };

    fn result(score: u8) -> AnalysisResult {
        AnalysisResult {
            scorecard: Scorecard {
                overall_score: score,
                quick_audit: QuickAudit {
                    offer_mentioned: false,
                    urgency_present: false,
                    end_card_present: None,
                },
                categories: vec![CategoryScore {
                    name: "Message Clarity".into(),
                    score: 5,
                    reason: "ok".into(),
                }],
                hook_analysis: None,
                copy_analysis: None,
                video_notes: None,
                policy_flags: vec![],
                top_fixes: vec![],
                verdict_reason: String::new(),
                whats_working: String::new(),
                executive_summary: ExecutiveSummary {
                    biggest_strength: String::new(),
                    biggest_risk: String::new(),
                    quick_win: String::new(),
                },
                score_explanation: ScoreExplanation {
                    score_driver: String::new(),
                    score_drag: String::new(),
                },
            },
            media_type: MediaKind::Image,
            extracted_frames: vec![],
            audio_analysis: None,
            thumbnail: None,
            analyzed_at: Utc::now(),
        }
    }

    fn brand(name: &str) -> ReportMetadata {
        ReportMetadata {
            brand_name: Some(name.to_string()),
            file_name: None,
        }
    }

    #[tokio::test]
    async fn test_save_and_get() {
        let store = InMemoryReportStore::new();
        let id = store.save(result(64), brand("Acme")).await.unwrap();

        let report = store.get(&id).await.unwrap().unwrap();
        assert_eq!(report.result.overall_score(), 64);
        assert_eq!(report.metadata.brand_name.as_deref(), Some("Acme"));
        assert!(store.get(&ReportId::from("missing")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_brand_lookup_is_case_insensitive_substring() {
        let store = InMemoryReportStore::new();
        store.save(result(50), brand("Acme Labs")).await.unwrap();
        store.save(result(70), brand("ACME")).await.unwrap();
        store.save(result(90), brand("Globex")).await.unwrap();
        store.save(result(10), ReportMetadata::default()).await.unwrap();

        let found = store.find_recent_for_brand("acme", Duration::days(30)).await.unwrap();
        assert_eq!(found.len(), 2);
        assert!(found[0].created_at >= found[1].created_at);

        assert!(store
            .find_recent_for_brand("  ", Duration::days(30))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_document_is_a_serialization_error() {
        let store = InMemoryReportStore::new();
        let id = ReportId::from("broken");
        store.documents.write().await.insert(id.clone(), "{not json".to_string());

        assert!(matches!(store.get(&id).await, Err(StoreError::Serialization(_))));
        assert!(matches!(
            store.find_recent_for_brand("acme", Duration::days(1)).await,
            Err(StoreError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn test_brand_lookup_respects_max_age() {
        let store = InMemoryReportStore::new();
        store
            .insert(&StoredReport {
                id: ReportId::new(),
                metadata: brand("Acme"),
                result: result(50),
                created_at: Utc::now() - Duration::days(10),
            })
            .await
            .unwrap();

        let found = store.find_recent_for_brand("acme", Duration::days(7)).await.unwrap();
        assert!(found.is_empty());
        assert_eq!(store.len().await, 1);
    }
}
