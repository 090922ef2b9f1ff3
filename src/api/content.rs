// Content Analyzer
// Answers `analyzePage`: extract visible text, then run the scoring pipeline

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use super::error::ServiceError;
use crate::models::ScanSummary;
use crate::services::detection::analyze_text;
use crate::services::text_extractor::extract_text_content;
use crate::services::{DocumentSource, ExtractionError, FileDocument};

#[derive(Clone, Default)]
pub struct ContentAnalyzer {
    attached: Option<Arc<dyn DocumentSource>>,
}

impl ContentAnalyzer {
    /// Analyzer with no attached document; requests must carry text or a path.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(source: Arc<dyn DocumentSource>) -> Self {
        Self {
            attached: Some(source),
        }
    }

    pub async fn analyze_page(
        &self,
        text: Option<String>,
        path: Option<PathBuf>,
    ) -> Result<ScanSummary, ServiceError> {
        let t0 = Instant::now();

        let extracted = match (text, path) {
            (Some(text), _) => text,
            (None, Some(path)) => self.extract(&FileDocument::new(path)).await?,
            (None, None) => {
                let source = self.attached.as_ref().ok_or(ExtractionError::NoDocument)?;
                self.extract(source.as_ref()).await?
            }
        };

        let summary = analyze_text(&extracted);
        info!(
            words = summary.words_analyzed,
            ai_percent = summary.ai_content_percent,
            confidence = summary.confidence.as_str(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "page.analyzed"
        );
        Ok(summary)
    }

    async fn extract(&self, source: &dyn DocumentSource) -> Result<String, ServiceError> {
        let elements = source.visible_elements().await?;
        Ok(extract_text_content(&elements))
    }
}
